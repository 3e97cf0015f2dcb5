//! Conversion orchestration for the flowdoc platform.
//!
//! Bridges the document engine in `flowdoc-document` with the
//! text-generation collaborator in `flowdoc-ai`: natural-language
//! descriptions become validated document text, and pairs of documents
//! become diff reports with an advisory summary.

pub mod error;
pub mod orchestrator;
pub mod prompts;

pub use error::ConversionError;
pub use orchestrator::{ConversionOrchestrator, ConversionOutcome, DiffReport, MergeOutcome};
