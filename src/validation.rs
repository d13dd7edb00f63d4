//! Input normalization for names, contacts and counters.

use std::sync::OnceLock;

use regex::Regex;

/// Maximum stored length of a player name, in characters.
pub const MAX_NAME_LEN: usize = 80;

fn control_whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\r\n\t]+").expect("valid regex"))
}

fn repeated_whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s{2,}").expect("valid regex"))
}

fn non_digits() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\D").expect("valid regex"))
}

/// Collapse line breaks and repeated spaces, trim, and cap the length.
pub fn sanitize_name(input: &str) -> String {
    let flattened = control_whitespace().replace_all(input, " ");
    let collapsed = repeated_whitespace().replace_all(&flattened, " ");
    collapsed.trim().chars().take(MAX_NAME_LEN).collect()
}

/// Contacts are optional; when given they must hold 10 to 15 digits.
pub fn is_valid_whatsapp(input: &str) -> bool {
    if input.is_empty() {
        return true;
    }
    let digits = non_digits().replace_all(input, "");
    (10..=15).contains(&digits.len())
}

/// Clamp a user-entered counter (goals, assists, score) into `[0, max]`.
pub fn clamp_count(n: i64, max: u32) -> u32 {
    n.clamp(0, i64::from(max)) as u32
}
