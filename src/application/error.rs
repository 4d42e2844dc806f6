use thiserror::Error;

use crate::convert::ConversionError;
use crate::domain::{CommandError, ValidationError};

/// Everything a single invocation can fail with. Each failure is scoped to
/// its own request and surfaced to the immediate caller; none is fatal to
/// the process.
#[derive(Error, Debug)]
pub enum AppError {
    /// Free-text input matched neither grammar.
    #[error("malformed command: {0}")]
    Malformed(#[from] CommandError),

    /// Structured input failed field-level validation.
    #[error("invalid record request: {0}")]
    Validation(#[from] ValidationError),

    /// Sender is not on the allow-list. Kept distinct from malformed input
    /// so the presentation layer can reject without revealing whether the
    /// command itself was valid.
    #[error("sender not allowed: {0}")]
    Unauthorized(String),

    /// Currency conversion failed; the record attempt fails entirely.
    #[error("currency conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    /// Persistence or query failed.
    #[error("storage error: {0}")]
    Store(#[from] anyhow::Error),
}
