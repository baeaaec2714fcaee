//! Core trait abstractions (AI, DocumentSource, ProgressSink).

pub mod ai;
pub mod progress;
pub mod source;

pub use ai::AI;
pub use progress::ProgressSink;
pub use source::{DocumentRef, DocumentSource};
