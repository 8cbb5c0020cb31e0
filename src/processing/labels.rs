// Label heuristics shared by the normalizer, the anchor extractor and the mapper
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // "Child:" / "Ребенок:" at the start of a line
    static ref LABEL_START: Regex = Regex::new(r"^[A-ZА-ЯЁ][a-zа-яё]*:").unwrap();
    static ref NUMERIC_ONLY: Regex = Regex::new(r"^[0-9]+$").unwrap();
    static ref TRAILING_COLON: Regex = Regex::new(r":\s*$").unwrap();
    static ref COLON_BEFORE_CAPITAL: Regex = Regex::new(r":\p{Lu}").unwrap();

    // Applied in order, so "Child: Name: X" loses both prefixes
    static ref LABEL_PREFIX_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)^child\s*:\s*").unwrap(),
        Regex::new(r"(?i)^name\s*:\s*").unwrap(),
        Regex::new(r"(?i)^имя\s*:\s*").unwrap(),
        Regex::new(r"(?i)^ребенок\s*:\s*").unwrap(),
        Regex::new(r"(?i)^[a-zа-яё]+\s*:\s*").unwrap(),
    ];
}

/// True when the text starts like a new `Label:` pair.
pub fn looks_like_label(text: &str) -> bool {
    LABEL_START.is_match(text.trim())
}

pub fn is_numeric_only(text: &str) -> bool {
    NUMERIC_ONLY.is_match(text.trim())
}

/// A line that can be consumed as the value of a preceding label.
pub fn is_value_candidate(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty() && !looks_like_label(text) && !is_numeric_only(text)
}

/// A line ending in a colon, or with a colon glued to a capitalised word.
pub fn is_label_line(text: &str) -> bool {
    TRAILING_COLON.is_match(text) || COLON_BEFORE_CAPITAL.is_match(text)
}

/// Strip any leading `Label:` the extractor failed to separate from the value.
pub fn remove_label_prefix(value: &str) -> String {
    let mut cleaned = value.trim().to_string();
    for pattern in LABEL_PREFIX_PATTERNS.iter() {
        cleaned = pattern.replace(&cleaned, "").into_owned();
    }
    cleaned.trim().to_string()
}
