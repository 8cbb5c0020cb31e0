use crate::models::{Language, Line, MappingResult, NormalizedLine, RecordType, ReviewReport};
use crate::processing::{extract_fields_from_anchors, lines_from_text, map_extracted_fields_to_form, normalize_ocr_lines};
use crate::validation::ReviewValidator;
use log::info;
use serde::Serialize;

/// Everything one pass over a document produces.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub normalized_lines: Vec<NormalizedLine>,
    pub mapping: MappingResult,
    pub review: ReviewReport,
}

pub struct RecordPipeline {
    record_type: RecordType,
    language: Language,
}

impl RecordPipeline {
    pub fn new(record_type: RecordType) -> Self {
        RecordPipeline {
            record_type,
            language: Language::Auto,
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn language(&self) -> Language {
        self.language
    }

    // Normalize, extract, map, then review what is still missing
    pub fn run(&self, lines: &[Line]) -> PipelineOutput {
        // Step 1: Re-join wrapped label/value lines
        let normalized_lines = normalize_ocr_lines(lines);

        // Step 2: Pull raw values off the anchors
        let extracted = extract_fields_from_anchors(&normalized_lines, self.record_type, self.language);

        // Step 3: Convert to canonical form fields
        let mapping = map_extracted_fields_to_form(extracted, self.record_type);

        // Step 4: Flag fields that need manual entry
        let review = ReviewValidator::validate(&mapping, self.record_type);

        info!(
            "{} record: {} source lines -> {} normalized, {} fields mapped, {} need review",
            self.record_type,
            lines.len(),
            normalized_lines.len(),
            mapping.form_patch.len(),
            review.missing_fields.len()
        );

        PipelineOutput {
            normalized_lines,
            mapping,
            review,
        }
    }

    /// Run on plain OCR text, one line per newline.
    pub fn run_text(&self, text: &str) -> PipelineOutput {
        self.run(&lines_from_text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_name_on_one_line() {
        let output = RecordPipeline::new(RecordType::Baptism)
            .with_language(Language::En)
            .run_text("Child: Stepan Роздольский");
        let child = output.mapping.extracted.get("child_name_raw").unwrap();
        assert_eq!(child.raw_value, "Stepan Роздольский");
        assert_eq!(output.mapping.value("child_name"), Some("Stepan Роздольский"));
    }

    #[test]
    fn child_name_on_wrapped_lines() {
        let output = RecordPipeline::new(RecordType::Baptism)
            .with_language(Language::En)
            .run_text("Child:\nStepan Роздольский");
        let child = output.mapping.extracted.get("child_name_raw").unwrap();
        assert_eq!(child.raw_value, "Stepan Роздольский");
        assert_eq!(child.source_line_indices, vec![0, 1]);
    }

    #[test]
    fn birth_date_is_iso_formatted() {
        let output = RecordPipeline::new(RecordType::Baptism).run_text("Birth date: 5/10/1931");
        assert_eq!(output.mapping.value("date_of_birth"), Some("1931-05-10"));
    }

    #[test]
    fn birth_date_wrapped_after_comma() {
        let output = RecordPipeline::new(RecordType::Baptism)
            .with_language(Language::En)
            .run_text("Born: June 2,\n1931");
        assert_eq!(output.normalized_lines.len(), 1);
        assert_eq!(output.mapping.value("date_of_birth"), Some("1931-06-02"));
        assert_eq!(
            output.mapping.extracted.get("birth_date_raw").unwrap().source_line_indices,
            vec![0, 1]
        );
    }

    #[test]
    fn parents_line_splits() {
        let output = RecordPipeline::new(RecordType::Baptism).run_text("Parents: John and Mary Smith");
        assert_eq!(output.mapping.value("father_name"), Some("John"));
        assert_eq!(output.mapping.value("mother_name"), Some("Mary Smith"));
    }

    #[test]
    fn russian_child_name() {
        let output = RecordPipeline::new(RecordType::Baptism)
            .with_language(Language::Ru)
            .run_text("Ребенок: Степан Роздольский");
        let child = output.mapping.extracted.get("child_name_raw").unwrap();
        assert_eq!(child.raw_value, "Степан Роздольский");
    }

    #[test]
    fn separate_labels_are_not_joined() {
        let output = RecordPipeline::new(RecordType::Baptism).run_text("Child: Stepan\nBirth date: 5/10/1931");
        assert_eq!(output.normalized_lines.len(), 2);
        assert_eq!(output.mapping.value("child_name"), Some("Stepan"));
        assert_eq!(output.mapping.value("date_of_birth"), Some("1931-05-10"));
    }

    #[test]
    fn full_baptism_entry() {
        let text = "Child:\n\
                    Stepan Роздольский\n\
                    Birth date: 5/10/1931\n\
                    Baptism date: June 2, 1931\n\
                    Place of birth: Kyiv\n\
                    Parents: John and Mary Smith\n\
                    Godparents: Ivan Petrov,\n\
                    Anna Petrova\n\
                    Priest: Fr. Nikolai";
        let output = RecordPipeline::new(RecordType::Baptism).run_text(text);
        let mapping = &output.mapping;

        assert_eq!(mapping.value("child_name"), Some("Stepan Роздольский"));
        assert_eq!(mapping.value("date_of_birth"), Some("1931-05-10"));
        assert_eq!(mapping.value("date_of_baptism"), Some("1931-06-02"));
        assert_eq!(mapping.value("place_of_birth"), Some("Kyiv"));
        assert_eq!(mapping.value("father_name"), Some("John"));
        assert_eq!(mapping.value("mother_name"), Some("Mary Smith"));
        assert_eq!(mapping.value("godparents"), Some("Ivan Petrov, Anna Petrova"));
        assert_eq!(mapping.value("performed_by"), Some("Fr. Nikolai"));
        assert!(output.review.is_complete);

        assert!((0.0..=1.0).contains(&mapping.mapping_confidence));
        for field in mapping.form_patch.values() {
            assert!((0.0..=1.0).contains(&field.confidence));
            assert!(!field.reason.is_empty());
        }
    }

    #[test]
    fn defaults_to_auto_language() {
        let pipeline = RecordPipeline::new(RecordType::Marriage);
        assert_eq!(pipeline.record_type(), RecordType::Marriage);
        assert_eq!(pipeline.language(), Language::Auto);
        assert_eq!(Language::default(), Language::Auto);
        assert_eq!(pipeline.with_language(Language::Ru).language(), Language::Ru);
    }

    #[test]
    fn empty_document() {
        let output = RecordPipeline::new(RecordType::Funeral).run(&[]);
        assert!(output.normalized_lines.is_empty());
        assert!(output.mapping.extracted.is_empty());
        assert_eq!(output.mapping.mapping_confidence, 0.0);
        assert_eq!(output.review.missing_fields.len(), 5);
    }
}
