pub mod data;
pub mod rules;

pub use data::*;
pub use rules::{
    canonical_fields, mapping_rules, Anchor, AnchorDictionary, FieldAnchors, MappingRule,
    MappingTarget, RecordAnchors, ANCHOR_DICTIONARY,
};
