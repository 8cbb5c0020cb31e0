// Anchor-based field extraction over normalized OCR lines
use crate::models::{
    ExtractedField, ExtractedFields, FieldAnchors, Language, NormalizedLine, RecordType,
    ANCHOR_DICTIONARY,
};
use crate::processing::labels::is_value_candidate;
use log::debug;
use std::ops::Range;

/// Only the first few lines are sampled for language detection.
const LANGUAGE_SAMPLE_LINES: usize = 5;

/// Values shorter than this trigger next-line recovery.
const MIN_VALUE_CHARS: usize = 2;

/// Which dictionary produced a match. The primary (document language)
/// dictionary is always consulted before the en+ru union.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DictionaryTier {
    Primary,
    Fallback,
}

impl DictionaryTier {
    fn confidence(&self, similarity: f64) -> f64 {
        match self {
            DictionaryTier::Primary => (0.7 + similarity * 0.3).min(1.0),
            DictionaryTier::Fallback => (0.6 + similarity * 0.3).min(0.9),
        }
    }
}

/// Script-based language guess. Mixed or script-less text yields `Auto`.
pub fn detect_language(text: &str) -> Language {
    let has_cyrillic = text
        .chars()
        .any(|c| matches!(c, 'А'..='я' | 'Ё' | 'ё'));
    let has_latin = text.chars().any(|c| c.is_ascii_alphabetic());

    match (has_cyrillic, has_latin) {
        (true, false) => Language::Ru,
        (false, true) => Language::En,
        _ => Language::Auto,
    }
}

/// Case-insensitive closeness of two strings: 1.0 when equal, 0.9 when one
/// contains the other, otherwise the share of the shorter string's
/// characters that occur anywhere in the longer one.
pub fn similarity(a: &str, b: &str) -> f64 {
    let s1 = a.trim().to_lowercase();
    let s2 = b.trim().to_lowercase();

    if s1 == s2 {
        return 1.0;
    }
    if s1.contains(&s2) || s2.contains(&s1) {
        return 0.9;
    }

    let len1 = s1.chars().count();
    let len2 = s2.chars().count();
    let (longer, shorter, longer_len) = if len1 > len2 {
        (&s1, &s2, len1)
    } else {
        (&s2, &s1, len2)
    };

    let matches = shorter.chars().filter(|c| longer.contains(*c)).count();
    matches as f64 / longer_len.max(1) as f64
}

/// Byte range of `needle` in `haystack`, compared case-insensitively.
fn find_ignore_case(haystack: &str, needle: &str) -> Option<Range<usize>> {
    let needle = needle.to_lowercase();
    if needle.is_empty() {
        return None;
    }

    // Lowercasing can change byte lengths, so keep a map from every folded
    // byte back to the start of the original character.
    let mut folded = String::with_capacity(haystack.len());
    let mut origin: Vec<usize> = Vec::with_capacity(haystack.len() + 1);
    for (idx, ch) in haystack.char_indices() {
        for lower in ch.to_lowercase() {
            let before = folded.len();
            folded.push(lower);
            origin.extend(std::iter::repeat(idx).take(folded.len() - before));
        }
    }
    origin.push(haystack.len());

    let start = folded.find(&needle)?;
    let end = start + needle.len();
    Some(origin[start]..origin[end])
}

/// Text following `anchor` on the line, without the separating colon,
/// dashes, dots or whitespace.
pub fn extract_value_after_anchor(text: &str, anchor: &str) -> String {
    let Some(range) = find_ignore_case(text, anchor) else {
        return String::new();
    };

    text[range.end..]
        .trim_start_matches(|c: char| c == ':' || c.is_whitespace())
        .trim_start_matches(|c: char| matches!(c, ':' | '-' | '.') || c.is_whitespace())
        .trim()
        .to_string()
}

/// The line after `index`, if it reads like a value rather than a new label.
fn value_line_after(lines: &[NormalizedLine], index: usize) -> Option<&NormalizedLine> {
    lines
        .get(index + 1)
        .filter(|next| is_value_candidate(&next.text))
}

/// Extract raw field values for `record_type` from normalized lines.
///
/// Lines are scanned top to bottom. On each line every not-yet-found field
/// is tried against the document-language dictionary, then against the
/// en+ru union at a lower confidence. The first anchor that yields a value
/// wins for that field.
pub fn extract_fields_from_anchors(
    lines: &[NormalizedLine],
    record_type: RecordType,
    language: Language,
) -> ExtractedFields {
    let mut result = ExtractedFields::new();

    if lines.is_empty() {
        return result;
    }

    let working_language = match language {
        Language::Auto => {
            let sample = lines
                .iter()
                .take(LANGUAGE_SAMPLE_LINES)
                .map(|line| line.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            let detected = detect_language(&sample);
            result.debug.language_detected = Some(detected);
            debug!("detected document language: {}", detected);
            match detected {
                Language::Auto => Language::En,
                other => other,
            }
        }
        explicit => explicit,
    };

    let anchors = ANCHOR_DICTIONARY.get(record_type);
    let passes = [
        (DictionaryTier::Primary, anchors.for_language(working_language)),
        (DictionaryTier::Fallback, anchors.for_language(Language::Auto)),
    ];

    for (index, line) in lines.iter().enumerate() {
        let line_lower = line.text.trim().to_lowercase();

        for (tier, table) in passes.iter() {
            for entry in table.iter() {
                if result.contains_field(entry.field) {
                    continue;
                }
                if let Some(field) = match_field(lines, index, &line_lower, entry, *tier) {
                    debug!(
                        "{} matched anchor \"{}\" on line {} ({:?}, confidence {:.2})",
                        entry.field, field.matched_anchor, line.original_index, tier, field.confidence
                    );
                    result.record(entry.field, field);
                }
            }
        }
    }

    result
}

fn match_field(
    lines: &[NormalizedLine],
    index: usize,
    line_lower: &str,
    entry: &FieldAnchors,
    tier: DictionaryTier,
) -> Option<ExtractedField> {
    let line = &lines[index];

    for anchor in &entry.anchors {
        let anchor_lower = anchor.phrase.to_lowercase();
        if !line_lower.contains(&anchor_lower) {
            continue;
        }

        let mut value = extract_value_after_anchor(&line.text, anchor.phrase);
        let mut sources = line.source_indices();

        if value.chars().count() < MIN_VALUE_CHARS {
            if let Some(next) = value_line_after(lines, index) {
                value = next.text.trim().to_string();
                sources.extend(next.source_indices());
            }
        }

        if value.is_empty() {
            continue;
        }

        return Some(ExtractedField {
            raw_value: value,
            confidence: tier.confidence(similarity(line_lower, &anchor_lower)),
            source_line_indices: sources,
            matched_anchor: anchor.phrase.to_string(),
            anchor_language: anchor.language,
        });
    }

    None
}
