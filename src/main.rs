use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use racha::calculate::calculate_win_rate;
use racha::config::AppConfig;
use racha::draw::{DrawError, Jitter, RandomJitter};
use racha::models::{Game, GameId, NewPlayer, Player, PlayerId, RsvpStatus};
use racha::service::{DrawOptions, DrawService, PlayerMatchStats};
use racha::storage::{JsonlStore, StorageConfig};

#[derive(Parser)]
#[command(name = "racha")]
#[command(about = "Pickup soccer organizer: balanced team draws")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./racha.toml")]
    config: String,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Schedule a new game
    NewGame {
        /// Match day (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Kick-off time (e.g. 19:30)
        #[arg(long)]
        time: String,

        /// Pitch or venue
        #[arg(long)]
        location: String,

        /// Team size, clamped to 3..=11
        #[arg(long, default_value_t = 5)]
        players_per_team: i64,
    },

    /// Add an RSVP to a game
    AddPlayer {
        /// Game ID
        #[arg(long)]
        game: String,

        /// Player name
        #[arg(long)]
        name: String,

        /// WhatsApp contact (10 to 15 digits)
        #[arg(long)]
        whatsapp: Option<String>,

        /// Preferred position (Zagueiro, Meio-Campo, Atacante)
        #[arg(long)]
        position: Option<String>,

        /// RSVP status (confirmed, maybe, not_going)
        #[arg(long, default_value = "confirmed")]
        status: RsvpStatus,
    },

    /// Change a player's RSVP status
    SetStatus {
        /// Game ID
        #[arg(long)]
        game: String,

        /// Player ID
        #[arg(long)]
        player: String,

        /// RSVP status (confirmed, maybe, not_going)
        #[arg(long)]
        status: RsvpStatus,
    },

    /// Draw two balanced teams from the confirmed players of a game
    Draw {
        /// Game ID
        #[arg(long)]
        game: String,

        /// Replace teams that were already drawn
        #[arg(long)]
        overwrite: bool,

        /// Seed the tie-breaking jitter to replay a draw
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Record the final score of a drawn game
    Finish {
        /// Game ID
        #[arg(long)]
        game: String,

        /// Goals scored by team 1
        #[arg(long)]
        score1: i64,

        /// Goals scored by team 2
        #[arg(long)]
        score2: i64,

        /// Per-player line as PLAYER_ID:GOALS:ASSISTS (repeatable)
        #[arg(long = "stat")]
        stats: Vec<String>,
    },

    /// Show a game's RSVPs and teams
    Show {
        /// Game ID
        #[arg(long)]
        game: String,
    },

    /// List stored games
    Games,
}

fn load_config(path: &str) -> Result<AppConfig> {
    let path = PathBuf::from(path);
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    AppConfig::from_file(&path).with_context(|| format!("Failed to load config {:?}", path))
}

fn parse_stat(line: &str) -> Result<PlayerMatchStats> {
    let parts: Vec<&str> = line.split(':').collect();
    let [player_id, goals, assists] = parts.as_slice() else {
        bail!("Invalid --stat '{}' (expected PLAYER_ID:GOALS:ASSISTS)", line);
    };

    Ok(PlayerMatchStats {
        player_id: PlayerId::from(player_id.trim()),
        goals: goals
            .trim()
            .parse()
            .with_context(|| format!("Invalid goals in --stat '{}'", line))?,
        assists: assists
            .trim()
            .parse()
            .with_context(|| format!("Invalid assists in --stat '{}'", line))?,
    })
}

fn print_team(label: &str, players: &[&Player]) {
    println!("{} ({} players)", label, players.len());
    for p in players {
        let position = p.preferred_position.as_deref().unwrap_or("-");
        println!("  {:<24} {:<12} {}", p.name, position, p.id);
    }
}

fn print_game(game: &Game) {
    println!(
        "=== {} {} @ {} ({} per team) ===",
        game.date, game.time, game.location, game.players_per_team
    );
    println!("ID: {}", game.id);
    if let (Some(s1), Some(s2)) = (game.final_score_team1, game.final_score_team2) {
        println!("Final score: {} x {}", s1, s2);
    }

    if game.teams_drawn {
        print_team("Team 1", &game.team(1));
        print_team("Team 2", &game.team(2));
    }

    println!("RSVPs:");
    for p in &game.players {
        println!("  {:<24} {}", p.name, p.status);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(&cli.config)?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = PathBuf::from(dir);
    }
    let log_level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting racha v{}", env!("CARGO_PKG_VERSION"));

    let store = Arc::new(JsonlStore::new(StorageConfig::new(config.data_dir.clone())));
    let service = DrawService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        config.draw.clone(),
    );

    match cli.command {
        Commands::NewGame {
            date,
            time,
            location,
            players_per_team,
        } => {
            let game = service
                .create_game(date, &time, &location, players_per_team)
                .await?;
            println!("Created game {}", game.id);
            print_game(&game);
        }

        Commands::AddPlayer {
            game,
            name,
            whatsapp,
            position,
            status,
        } => {
            let game_id = GameId::from(game);
            let player = service
                .add_player(
                    &game_id,
                    NewPlayer {
                        name,
                        whatsapp,
                        preferred_position: position,
                        status,
                    },
                )
                .await?;
            println!("Added {} ({}) as {}", player.name, player.status, player.id);
            if player.preferred_position.is_some() && player.position().is_none() {
                println!("  (position not recognized; ignored when balancing)");
            }
        }

        Commands::SetStatus {
            game,
            player,
            status,
        } => {
            let game_id = GameId::from(game);
            service
                .set_player_status(&game_id, &PlayerId::from(player), status)
                .await?;
            println!("Status updated to {}", status);
        }

        Commands::Draw {
            game,
            overwrite,
            seed,
        } => {
            let game_id = GameId::from(game);
            let mut jitter: Box<dyn Jitter> = match seed {
                Some(seed) => Box::new(RandomJitter::seeded(seed)),
                None => Box::new(RandomJitter::new()),
            };

            match service
                .draw(&game_id, DrawOptions { overwrite }, jitter.as_mut())
                .await
            {
                Ok(outcome) => {
                    println!("\n=== Teams drawn ===");
                    let team1: Vec<&Player> = outcome.result.team1.iter().collect();
                    let team2: Vec<&Player> = outcome.result.team2.iter().collect();
                    print_team("Team 1", &team1);
                    print_team("Team 2", &team2);
                    if !outcome.gaps.is_empty() {
                        let gaps: Vec<String> =
                            outcome.gaps.iter().map(|g| g.to_string()).collect();
                        println!("\n(history unavailable: {})", gaps.join(", "));
                    }
                }
                Err(DrawError::AlreadyDrawn) => {
                    eprintln!("Teams are already drawn for this game. Re-run with --overwrite to replace them.");
                }
                Err(e @ DrawError::InsufficientPlayers { .. }) => {
                    eprintln!("{} ({} missing)", e, e.shortfall().unwrap_or(0));
                }
                Err(DrawError::Persistence { result, source }) => {
                    tracing::warn!("Saving draw failed ({}), retrying once", source);
                    service
                        .save_draw(&result)
                        .await
                        .context("Failed to save drawn teams")?;
                    println!("Teams drawn and saved on retry (draw {})", result.id);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Commands::Finish {
            game,
            score1,
            score2,
            stats,
        } => {
            let entries = stats
                .iter()
                .map(|s| parse_stat(s))
                .collect::<Result<Vec<_>>>()?;
            let game_id = GameId::from(game);

            let finished = service
                .finish_game(&game_id, score1, score2, &entries)
                .await?;
            println!(
                "Game {} finished: {} x {}",
                finished.game.id,
                finished.game.final_score_team1.unwrap_or(0),
                finished.game.final_score_team2.unwrap_or(0)
            );

            for row in &finished.statistics {
                println!(
                    "  {:<24} {} games, win rate {:.0}%",
                    row.name,
                    row.stats.total_games,
                    calculate_win_rate(row.stats.wins, row.stats.losses, row.stats.draws) * 100.0
                );
            }
        }

        Commands::Show { game } => {
            let game_id = GameId::from(game);
            let game = store
                .list_games()?
                .into_iter()
                .find(|g| g.id == game_id)
                .with_context(|| format!("Game {} not found", game_id))?;
            print_game(&game);
        }

        Commands::Games => {
            let games = store.list_games()?;
            if games.is_empty() {
                println!("No games stored in {:?}.", config.data_dir);
            }
            for game in games {
                let confirmed = game.confirmed_players().len();
                let state = if game.finished {
                    "finished"
                } else if game.teams_drawn {
                    "drawn"
                } else {
                    "open"
                };
                println!(
                    "{}  {} {:<6} {:<24} {:>2} confirmed  {}",
                    game.id, game.date, game.time, game.location, confirmed, state
                );
            }
        }
    }

    Ok(())
}
