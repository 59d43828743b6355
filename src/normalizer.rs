//! Comparison keys for hotel names.
//!
//! The key is lossy on purpose: two different hotels with close names can end
//! up with the same key.

const ACCENTS: &[(char, char)] = &[
    ('ô', 'o'),
    ('é', 'e'),
    ('è', 'e'),
    ('ê', 'e'),
    ('ë', 'e'),
    ('à', 'a'),
    ('â', 'a'),
    ('î', 'i'),
    ('ï', 'i'),
    ('û', 'u'),
    ('ù', 'u'),
    ('ü', 'u'),
    ('ç', 'c'),
];

const HOTEL_KEYWORD: &str = "hotel";

fn strip_accent(c: char) -> char {
    ACCENTS
        .iter()
        .find(|(accented, _)| *accented == c)
        .map(|(_, base)| *base)
        .unwrap_or(c)
}

/// Builds the key used to match the same hotel across two snapshots.
///
/// Steps run in this order: lowercase, accent folding, removal of the word
/// "hotel", removal of the digits 1 to 9, and finally removal of everything
/// outside `[a-zA-Z0-9]`. Zero is kept.
pub fn normalize_name(name: &str) -> String {
    let folded: String = name.to_lowercase().chars().map(strip_accent).collect();

    folded
        .replace(HOTEL_KEYWORD, "")
        .chars()
        .filter(|c| !matches!(c, '1'..='9'))
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}
