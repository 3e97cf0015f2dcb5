//! Text-generation collaborator interface for the flowdoc platform.
//!
//! This crate defines the single external capability the document engine
//! depends on: turning a prompt into free-form text. It carries the
//! backend trait, request/response types and the streamed event shape;
//! all use of the interface lives in `flowdoc-convert`.

pub mod backend;
pub mod error;

pub use backend::{LlmBackend, LlmRequest, LlmResponse, LlmStreamEvent};
pub use error::LlmError;
