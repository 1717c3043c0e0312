//! Header text canonicalization used everywhere headers are compared.
//! Matching is insensitive to case, whitespace, and punctuation so that
//! "Partner SKU", "partner_sku" and "Partner-SKU#" all resolve to one key.

/// Normalizes header text to its comparison key: lowercase, ASCII
/// alphanumerics only. An empty result means "no header".
pub fn normalize_header(text: &str) -> String {
    text.chars()
        .filter(|character| character.is_ascii_alphanumeric())
        .map(|character| character.to_ascii_lowercase())
        .collect()
}
