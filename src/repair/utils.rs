/// 1) Trim whitespace, then strip every leading/trailing double quote.
pub fn clean_fragment(raw: &str) -> &str {
    raw.trim().trim_matches('"')
}

/// 2) True if the text carries at least one ASCII digit.
pub fn contains_digit(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
}
