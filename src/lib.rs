pub mod models;
pub mod processing;
pub mod validation;
pub mod utils;
pub mod record_pipeline;

pub use processing::{extract_fields_from_anchors, map_extracted_fields_to_form, normalize_ocr_lines};
pub use record_pipeline::{PipelineOutput, RecordPipeline};
pub use utils::OcrError;
