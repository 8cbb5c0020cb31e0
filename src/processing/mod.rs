pub mod dates;
pub mod extractors;
pub mod field_mapping;
pub mod labels;
pub mod normalizer;
pub mod ocr;

pub use dates::{parse_date, ParsedDate};
pub use extractors::{detect_language, extract_fields_from_anchors, similarity};
pub use field_mapping::{map_extracted_fields_to_form, split_parents, FieldMapper};
pub use labels::remove_label_prefix;
pub use normalizer::{normalize_line_text, normalize_ocr_lines};
pub use ocr::{lines_from_json, lines_from_text, OcrLineReader};
