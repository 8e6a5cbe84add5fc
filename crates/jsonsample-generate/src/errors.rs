use jsonsample_core::{Error, Position};
use thiserror::Error;

/// Errors returned by the synthesis engine.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// The declaration text could not be read.
    #[error(transparent)]
    Declaration(#[from] Error),
    /// An internal invariant was violated while building the value tree.
    #[error("resolution error: {0}")]
    Resolution(String),
}

impl SynthesisError {
    pub fn position(&self) -> Option<Position> {
        match self {
            SynthesisError::Declaration(err) => Some(err.position()),
            SynthesisError::Resolution(_) => None,
        }
    }
}
