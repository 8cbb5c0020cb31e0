use crate::models::{Line, NormalizedLine};
use crate::processing::labels::{is_label_line, is_value_candidate, looks_like_label};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

/// Label lines at or above this length are treated as complete.
const SHORT_LABEL_MAX_CHARS: usize = 50;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    // "Born.- 1931" style separators
    static ref DOT_HYPHEN: Regex = Regex::new(r"\.\s?-").unwrap();
    static ref COLON_SPACES: Regex = Regex::new(r":\s{2,}").unwrap();
}

/// Whitespace and separator cleanup for a single line of OCR text.
pub fn normalize_line_text(text: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(text.trim(), " ");
    let colons = collapsed.replace('：', ":");
    let separators = DOT_HYPHEN.replace_all(&colons, ": ");
    COLON_SPACES
        .replace_all(&separators, ": ")
        .trim()
        .to_string()
}

/// Clean every line and re-join label/value pairs the OCR engine wrapped.
///
/// Single forward pass: a label line pulls the following value line onto
/// itself, and a line ending in a comma pulls one more continuation line.
/// Blank lines are dropped.
pub fn normalize_ocr_lines(lines: &[Line]) -> Vec<NormalizedLine> {
    let texts: Vec<String> = lines
        .iter()
        .map(|line| normalize_line_text(&line.text))
        .collect();

    let mut normalized = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < texts.len() {
        if texts[i].is_empty() {
            i += 1;
            continue;
        }

        let mut text = texts[i].clone();
        let mut joined = vec![i];
        let mut next = i + 1;

        if is_label_line(&text) && text.chars().count() < SHORT_LABEL_MAX_CHARS {
            if let Some(j) = next_non_blank(&texts, next) {
                if is_value_candidate(&texts[j]) {
                    text = format!("{} {}", text.trim_end(), texts[j]);
                    joined.push(j);
                    next = j + 1;
                }
            }
        }

        // A bare number may continue a comma-wrapped value ("June 2," / "1931")
        if text.ends_with(',') {
            if let Some(j) = next_non_blank(&texts, next) {
                if !looks_like_label(&texts[j]) {
                    text = format!("{} {}", text, texts[j]);
                    joined.push(j);
                    next = j + 1;
                }
            }
        }

        let is_wrapped = joined.len() > 1;
        if is_wrapped {
            debug!("joined wrapped lines {:?} into \"{}\"", joined, text);
        }

        normalized.push(NormalizedLine {
            text,
            original_index: i,
            original_line_id: lines[i].id.clone(),
            is_wrapped,
            joined_indices: if is_wrapped { Some(joined) } else { None },
        });

        i = next;
    }

    normalized
}

fn next_non_blank(texts: &[String], from: usize) -> Option<usize> {
    (from..texts.len()).find(|&j| !texts[j].is_empty())
}
