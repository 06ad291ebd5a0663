//! Engine error types
//!
//! None of these are fatal: the controller treats a rejected run as a no-op.

use super::Algorithm;
use thiserror::Error;

/// Errors raised before an algorithm emits its first step
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Search started without a target value
    #[error("{algorithm} needs a target value")]
    MissingTarget { algorithm: Algorithm },

    /// Name does not match any known algorithm
    #[error("unknown algorithm '{name}'")]
    UnknownAlgorithm { name: String },
}
