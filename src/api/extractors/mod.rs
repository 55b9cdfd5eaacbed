//! Custom request extractors.

pub mod trimmed;
mod validated_json;

pub use validated_json::ValidatedJson;
