//! Workflow document engine for the flowdoc platform.
//!
//! This crate parses, validates, scores, diffs, lays out and
//! template-instantiates workflow documents:
//!
//! - **Model**: documents, blocks and connections with opaque config
//! - **Parser**: YAML text to documents and back, plus canonical reformatting
//! - **Validator**: structural rules collected as data, never thrown
//! - **Scorer / Metadata**: complexity metric and summary extraction
//! - **Differ**: field-level change sets between document versions
//! - **Layout**: hierarchical, force-directed and grid coordinates
//! - **Templates**: a read-only registry of parameterized skeletons
//!
//! Everything here is pure and synchronous; the conversion orchestrator
//! that talks to the text-generation collaborator lives in
//! `flowdoc-convert`.

pub mod complexity;
pub mod diff;
pub mod error;
pub mod graph;
pub mod layout;
pub mod metadata;
pub mod model;
pub mod parse;
pub mod template;
pub mod validate;

pub use diff::{Change, DiffResult, FieldDiff, FieldDiffKind};
pub use error::{ParseError, TemplateError};
pub use graph::DocumentGraph;
pub use layout::{LayoutAlgorithm, LayoutOutcome, LayoutReport};
pub use metadata::DocumentMetadata;
pub use model::{Block, Connection, Document, Position};
pub use template::{Template, TemplateOutcome, TemplateRegistry, TemplateSummary};
pub use validate::ValidationResult;
