//! Error taxonomy for the annotation engine
//!
//! Only caller mistakes are errors. An undo on an empty page and a cancelled
//! text prompt are defined no-ops and never surface here.

use crate::actor::ActorId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnnotatorError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unknown actor {0}")]
    UnknownActor(ActorId),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("page {page} out of range (page_count={page_count})")]
    PageOutOfRange { page: usize, page_count: usize },
}

impl AnnotatorError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }
}

/// Result type for annotation engine operations
pub type AnnotatorResult<T> = Result<T, AnnotatorError>;
