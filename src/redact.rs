//! Secret masking for log output.

/// Shortest value that still gets a partial reveal. Anything shorter is
/// masked completely.
const MIN_REVEAL_LEN: usize = 16;
const HEAD: usize = 8;
const TAIL: usize = 4;

/// Mask a secret for logging: first 8 and last 4 characters of long
/// values, nothing of short ones.
pub fn mask(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < MIN_REVEAL_LEN {
        return "***".to_string();
    }
    let head: String = chars[..HEAD].iter().collect();
    let tail: String = chars[chars.len() - TAIL..].iter().collect();
    format!("{}...{}", head, tail)
}
