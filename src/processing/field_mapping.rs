use crate::models::{
    mapping_rules, ExtractedField, ExtractedFields, MappedFormField, MappingResult,
    MappingTarget, RecordType,
};
use crate::processing::dates::{parse_date, FALLBACK_CONFIDENCE};
use crate::processing::labels::remove_label_prefix;
use lazy_static::lazy_static;
use log::{debug, info, warn};
use regex::Regex;
use std::collections::BTreeMap;

/// Confidence multiplier for names obtained by splitting a parents line.
const PARENTS_SPLIT_FACTOR: f64 = 0.9;

lazy_static! {
    // (literal probe, splitter) in the order they are tried
    static ref PARENT_SEPARATORS: Vec<(&'static str, Regex)> = vec![
        (" and ", Regex::new(r"(?i)\s+and\s+").unwrap()),
        (" & ", Regex::new(r"\s+&\s+").unwrap()),
        (" и ", Regex::new(r"\s+и\s+").unwrap()),
    ];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentsSplit {
    pub father: String,
    pub mother: Option<String>,
}

/// Split "John and Mary Smith" into father and mother. A value that does not
/// split into exactly two parts goes to the father as a whole.
pub fn split_parents(value: &str) -> ParentsSplit {
    let cleaned = remove_label_prefix(value);

    for (probe, separator) in PARENT_SEPARATORS.iter() {
        if !cleaned.contains(probe) {
            continue;
        }
        let parts: Vec<&str> = separator.split(&cleaned).collect();
        if parts.len() == 2 {
            return ParentsSplit {
                father: parts[0].trim().to_string(),
                mother: Some(parts[1].trim().to_string()),
            };
        }
    }

    ParentsSplit {
        father: cleaned,
        mother: None,
    }
}

/// Accumulates form fields together with their confidence and reason.
#[derive(Debug, Default)]
struct FormPatch {
    fields: BTreeMap<String, MappedFormField>,
    confidence: BTreeMap<String, f64>,
    reasons: BTreeMap<String, String>,
}

impl FormPatch {
    fn set(&mut self, key: &str, value: String, confidence: f64, reason: String) {
        self.confidence.insert(key.to_string(), confidence);
        self.reasons.insert(key.to_string(), reason.clone());
        self.fields.insert(
            key.to_string(),
            MappedFormField {
                value,
                confidence,
                reason,
            },
        );
    }

    fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }
}

/// FieldMapper turns raw anchor values into canonical, typed form fields
pub struct FieldMapper;

impl FieldMapper {
    pub fn map(extracted: ExtractedFields, record_type: RecordType) -> MappingResult {
        let mut patch = FormPatch::default();

        for rule in mapping_rules(record_type) {
            let Some(field) = extracted.get(rule.extracted_key) else {
                continue;
            };

            match rule.target {
                MappingTarget::Direct(key) => Self::map_direct(&mut patch, key, field),
                MappingTarget::Date(key) => Self::map_date(&mut patch, key, field),
                MappingTarget::Parents { father, mother } => {
                    Self::map_parents(&mut patch, father, mother, field)
                }
            }
        }

        let mapping_confidence = if patch.confidence.is_empty() {
            0.0
        } else {
            patch.confidence.values().sum::<f64>() / patch.confidence.len() as f64
        };

        info!(
            "mapped {} of {} extracted {} fields (confidence {:.2})",
            patch.fields.len(),
            extracted.len(),
            record_type,
            mapping_confidence
        );

        MappingResult {
            form_patch: patch.fields,
            mapping_confidence,
            per_field_confidence: patch.confidence,
            reasons: patch.reasons,
            extracted,
        }
    }

    fn map_direct(patch: &mut FormPatch, key: &str, field: &ExtractedField) {
        let cleaned = remove_label_prefix(&field.raw_value);
        if cleaned.is_empty() {
            debug!("{}: nothing left after removing label from \"{}\"", key, field.raw_value);
            return;
        }

        let reason = if cleaned == field.raw_value.trim() {
            format!("Extracted from \"{}\" anchor", field.matched_anchor)
        } else {
            format!(
                "Extracted from \"{}\" anchor, cleaned \"{}\" -> \"{}\"",
                field.matched_anchor, field.raw_value, cleaned
            )
        };
        patch.set(key, cleaned, field.confidence, reason);
    }

    fn map_date(patch: &mut FormPatch, key: &str, field: &ExtractedField) {
        // An earlier date anchor already filled this key
        if patch.contains(key) {
            return;
        }

        match parse_date(&field.raw_value) {
            Some(parsed) => {
                let iso = parsed.iso();
                let mut reason = format!("Parsed \"{}\" -> \"{}\"", field.raw_value, iso);
                if parsed.confidence <= FALLBACK_CONFIDENCE {
                    reason.push_str(" (fallback parser)");
                }
                patch.set(key, iso, parsed.confidence.min(field.confidence), reason);
            }
            None => {
                warn!("{}: could not parse date \"{}\"", key, field.raw_value);
                patch.reasons.insert(
                    key.to_string(),
                    format!("Failed to parse date: \"{}\"", field.raw_value),
                );
            }
        }
    }

    fn map_parents(patch: &mut FormPatch, father_key: &str, mother_key: &str, field: &ExtractedField) {
        let split = split_parents(&field.raw_value);
        let confidence = field.confidence * PARENTS_SPLIT_FACTOR;

        match split.mother {
            Some(mother) => {
                let father = remove_label_prefix(&split.father);
                if !father.is_empty() {
                    patch.set(father_key, father, confidence, "Split from parents field".to_string());
                }
                let mother = remove_label_prefix(&mother);
                if !mother.is_empty() {
                    patch.set(mother_key, mother, confidence, "Split from parents field".to_string());
                }
            }
            None if !split.father.is_empty() => {
                patch.set(
                    father_key,
                    split.father,
                    confidence,
                    "Parents field could not be split, assigned to father".to_string(),
                );
            }
            None => {}
        }
    }
}

/// Map extracted anchor values to canonical form fields for `record_type`.
pub fn map_extracted_fields_to_form(extracted: ExtractedFields, record_type: RecordType) -> MappingResult {
    FieldMapper::map(extracted, record_type)
}
