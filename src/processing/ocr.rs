use crate::models::{BoundingBox, Line};
use crate::utils::OcrError;
use log::debug;
use std::path::Path;

/// Height of a synthetic line box when lines come from plain text.
const SYNTHETIC_LINE_HEIGHT: f64 = 20.0;
const SYNTHETIC_LINE_WIDTH: f64 = 100.0;

/// OcrLineReader turns OCR output (plain text or JSON lines) into `Line`s
pub struct OcrLineReader;

impl OcrLineReader {
    /// One line per non-blank newline-delimited segment, with a stacked
    /// synthetic bounding box and no tokens.
    pub fn from_text(text: &str) -> Vec<Line> {
        text.lines()
            .filter(|segment| !segment.trim().is_empty())
            .enumerate()
            .map(|(idx, segment)| Line {
                id: format!("line-{}", idx),
                text: segment.to_string(),
                bounding_box: BoundingBox {
                    x: 0.0,
                    y: idx as f64 * SYNTHETIC_LINE_HEIGHT,
                    w: SYNTHETIC_LINE_WIDTH,
                    h: SYNTHETIC_LINE_HEIGHT,
                },
                tokens: Vec::new(),
            })
            .collect()
    }

    /// Parse a JSON array of line objects (`id`, `text`, `boundingBox`/`bbox`, `tokens`).
    pub fn from_json(json: &str) -> Result<Vec<Line>, OcrError> {
        let mut lines: Vec<Line> = serde_json::from_str(json)?;
        for (idx, line) in lines.iter_mut().enumerate() {
            if line.id.is_empty() {
                line.id = format!("line-{}", idx);
            }
        }
        Ok(lines)
    }

    /// Read lines from a file, as JSON when `json` is set, otherwise as plain text.
    pub fn from_file<P: AsRef<Path>>(path: P, json: bool) -> Result<Vec<Line>, OcrError> {
        let content = std::fs::read_to_string(&path)?;
        debug!(
            "read {} bytes of OCR output from {}",
            content.len(),
            path.as_ref().display()
        );
        Self::from_content(&content, json)
    }

    pub fn from_content(content: &str, json: bool) -> Result<Vec<Line>, OcrError> {
        if json {
            Self::from_json(content)
        } else {
            Ok(Self::from_text(content))
        }
    }
}

pub fn lines_from_text(text: &str) -> Vec<Line> {
    OcrLineReader::from_text(text)
}

pub fn lines_from_json(json: &str) -> Result<Vec<Line>, OcrError> {
    OcrLineReader::from_json(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_lines_from_text() {
        let lines = lines_from_text("Child: Stepan\n\n   \nBirth date: 5/10/1931\r\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].id, "line-0");
        assert_eq!(lines[1].id, "line-1");
        assert_eq!(lines[1].text, "Birth date: 5/10/1931");
        assert_eq!(lines[1].bounding_box.y, 20.0);
        assert_eq!(lines[1].bounding_box.h, 20.0);
        assert!(lines[0].tokens.is_empty());
    }

    #[test]
    fn test_lines_from_json() {
        let json = r#"[
            {"id": "a", "text": "Child:", "bbox": {"x": 1, "y": 2, "w": 3, "h": 4}, "tokens": []},
            {"text": "Stepan", "tokens": [{"text": "Stepan", "confidence": 0.98}]}
        ]"#;
        let lines = lines_from_json(json).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].id, "a");
        assert_eq!(lines[0].bounding_box.w, 3.0);
        assert_eq!(lines[1].id, "line-1");
        assert_eq!(lines[1].tokens[0].confidence, Some(0.98));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = lines_from_json(r#"{"text": "not an array"}"#).unwrap_err();
        assert!(matches!(err, OcrError::MalformedInput(_)));
    }

    #[test]
    fn reads_plain_text_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Ребенок: Степан").unwrap();
        writeln!(file, "Родители: Иван и Мария").unwrap();

        let lines = OcrLineReader::from_file(file.path(), false).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "Ребенок: Степан");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = OcrLineReader::from_file("/nonexistent/ocr.txt", false).unwrap_err();
        assert!(matches!(err, OcrError::IoError(_)));
    }
}
