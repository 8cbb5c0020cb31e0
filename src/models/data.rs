use crate::utils::OcrError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Sacramental record kinds the extractor has anchor dictionaries for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Baptism,
    Marriage,
    Funeral,
}

impl RecordType {
    pub const ALL: [RecordType; 3] = [RecordType::Baptism, RecordType::Marriage, RecordType::Funeral];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Baptism => "baptism",
            RecordType::Marriage => "marriage",
            RecordType::Funeral => "funeral",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = OcrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "baptism" => Ok(RecordType::Baptism),
            "marriage" => Ok(RecordType::Marriage),
            "funeral" => Ok(RecordType::Funeral),
            other => Err(OcrError::UnknownRecordType(other.to_string())),
        }
    }
}

/// Document language. `Auto` asks the extractor to detect it from the text;
/// an anchor itself is always `En` or `Ru`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Ru,
    #[default]
    Auto,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ru => "ru",
            Language::Auto => "auto",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = OcrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "ru" | "russian" => Ok(Language::Ru),
            "auto" => Ok(Language::Auto),
            other => Err(OcrError::UnknownLanguage(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    #[serde(default, alias = "bbox", rename = "boundingBox")]
    pub bounding_box: Option<BoundingBox>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// One line of OCR output as produced by the upstream vision parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    #[serde(default)]
    pub id: String,
    pub text: String,
    #[serde(default, alias = "bbox", rename = "boundingBox")]
    pub bounding_box: BoundingBox,
    #[serde(default)]
    pub tokens: Vec<Token>,
}

impl Line {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Line {
            id: id.into(),
            text: text.into(),
            bounding_box: BoundingBox::default(),
            tokens: Vec::new(),
        }
    }
}

/// A logical line after whitespace/punctuation cleanup and wrap joining.
/// `original_index` is always the first constituent source line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedLine {
    pub text: String,
    pub original_index: usize,
    pub original_line_id: String,
    pub is_wrapped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joined_indices: Option<Vec<usize>>,
}

impl NormalizedLine {
    /// Every source line index that contributed to this line.
    pub fn source_indices(&self) -> Vec<usize> {
        match &self.joined_indices {
            Some(indices) => indices.clone(),
            None => vec![self.original_index],
        }
    }

    /// Rebuild a plain `Line` from this normalized line, e.g. to run another pass.
    pub fn to_line(&self) -> Line {
        Line::new(self.original_line_id.clone(), self.text.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedField {
    pub raw_value: String,
    pub confidence: f64,
    pub source_line_indices: Vec<usize>,
    pub matched_anchor: String,
    pub anchor_language: Language,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractionDebug {
    pub matched_anchor: BTreeMap<String, String>,
    pub source_line_indexes: BTreeMap<String, Vec<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_detected: Option<Language>,
}

/// Per-document extraction output. Fields are keyed by `"<field>_raw"`;
/// `confidence_by_field` and `debug` are keyed by the bare field key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractedFields {
    #[serde(flatten)]
    pub fields: BTreeMap<String, ExtractedField>,
    pub confidence_by_field: BTreeMap<String, f64>,
    pub debug: ExtractionDebug,
}

impl ExtractedFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw_key(field_key: &str) -> String {
        format!("{}_raw", field_key)
    }

    /// Look up by raw key, e.g. `"child_name_raw"`.
    pub fn get(&self, raw_key: &str) -> Option<&ExtractedField> {
        self.fields.get(raw_key)
    }

    pub fn contains_field(&self, field_key: &str) -> bool {
        self.fields.contains_key(&Self::raw_key(field_key))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn record(&mut self, field_key: &str, field: ExtractedField) {
        self.confidence_by_field
            .insert(field_key.to_string(), field.confidence);
        self.debug
            .matched_anchor
            .insert(field_key.to_string(), field.matched_anchor.clone());
        self.debug
            .source_line_indexes
            .insert(field_key.to_string(), field.source_line_indices.clone());
        self.fields.insert(Self::raw_key(field_key), field);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappedFormField {
    pub value: String,
    pub confidence: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingResult {
    pub form_patch: BTreeMap<String, MappedFormField>,
    pub mapping_confidence: f64,
    pub per_field_confidence: BTreeMap<String, f64>,
    pub reasons: BTreeMap<String, String>,
    pub extracted: ExtractedFields,
}

impl MappingResult {
    pub fn value(&self, canonical_key: &str) -> Option<&str> {
        self.form_patch
            .get(canonical_key)
            .map(|field| field.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub issue_type: ValidationIssueType,
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationIssueType {
    MissingField,
    UnparsedDate,
}

/// Which canonical fields still need manual entry after auto-mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewReport {
    pub is_complete: bool,
    pub missing_fields: Vec<String>,
    pub issues: Vec<ValidationIssue>,
}
