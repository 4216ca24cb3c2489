//! Error types for reqtrace.
//!
//! Only structural misuse is an error here (unknown enum names from user
//! input). Diagnostic findings — broken references, version drift,
//! self-links, cycles, coverage gaps — are plain data returned by the
//! analyzers and never surface as errors.

use thiserror::Error;

/// Top-level result type for reqtrace operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Top-level error type for reqtrace.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown link type: '{0}' (expected derives, refines, implements, satisfies, verifies, or relates)")]
    UnknownLinkType(String),

    #[error("unknown link status: '{0}' (expected active, needsReview, proposed, deprecated, or broken)")]
    UnknownStatus(String),

    #[error("unknown link side: '{0}' (expected source or target)")]
    UnknownSide(String),
}
