use crate::models::{canonical_fields, MappingResult, RecordType, ReviewReport, ValidationIssue, ValidationIssueType};

pub struct ReviewValidator;

impl ReviewValidator {
    /// List the canonical fields auto-mapping left empty, so the caller can
    /// ask for manual entry. Never changes the mapping itself.
    pub fn validate(result: &MappingResult, record_type: RecordType) -> ReviewReport {
        let mut issues = Vec::new();
        let mut missing_fields = Vec::new();

        for key in canonical_fields(record_type) {
            if result.form_patch.contains_key(key) {
                continue;
            }
            missing_fields.push(key.to_string());

            // The mapper leaves a reason behind for dates it could not parse
            match result.reasons.get(key) {
                Some(reason) if reason.starts_with("Failed to parse date") => {
                    issues.push(ValidationIssue {
                        issue_type: ValidationIssueType::UnparsedDate,
                        field: key.to_string(),
                        message: format!("{} needs manual entry: {}", key, reason),
                    });
                }
                _ => {
                    issues.push(ValidationIssue {
                        issue_type: ValidationIssueType::MissingField,
                        field: key.to_string(),
                        message: format!("{} was not found and needs manual entry", key),
                    });
                }
            }
        }

        ReviewReport {
            is_complete: issues.is_empty(),
            missing_fields,
            issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExtractedField, ExtractedFields, Language};
    use crate::processing::map_extracted_fields_to_form;

    fn field(raw_value: &str) -> ExtractedField {
        ExtractedField {
            raw_value: raw_value.to_string(),
            confidence: 0.9,
            source_line_indices: vec![0],
            matched_anchor: "anchor".to_string(),
            anchor_language: Language::En,
        }
    }

    #[test]
    fn test_missing_and_unparsed_fields() {
        let mut extracted = ExtractedFields::new();
        extracted.record("deceased_name", field("Petr Ivanov"));
        extracted.record("death_date", field("smudged"));
        let result = map_extracted_fields_to_form(extracted, RecordType::Funeral);

        let report = ReviewValidator::validate(&result, RecordType::Funeral);
        assert!(!report.is_complete);
        assert_eq!(
            report.missing_fields,
            vec!["death_date", "funeral_date", "burial_location", "clergy"]
        );
        assert_eq!(report.issues[0].issue_type, ValidationIssueType::UnparsedDate);
        assert_eq!(report.issues[0].field, "death_date");
        assert_eq!(report.issues[1].issue_type, ValidationIssueType::MissingField);
    }

    #[test]
    fn test_complete_marriage_record() {
        let mut extracted = ExtractedFields::new();
        extracted.record("groom_name", field("Ivan Petrov"));
        extracted.record("bride_name", field("Anna Sidorova"));
        extracted.record("marriage_date", field("5/10/1931"));
        extracted.record("witnesses", field("Oleg, Maria"));
        extracted.record("clergy", field("Fr. Nikolai"));
        let result = map_extracted_fields_to_form(extracted, RecordType::Marriage);

        let report = ReviewValidator::validate(&result, RecordType::Marriage);
        assert!(report.is_complete);
        assert!(report.missing_fields.is_empty());
    }
}
