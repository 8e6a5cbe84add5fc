use thiserror::Error;

use crate::source::Position;

/// Errors raised while reading declarations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The text is not a sequence of supported declarations.
    #[error("{position}: {message}")]
    Syntax { position: Position, message: String },
    /// A field statement does not bind exactly one identifier.
    #[error("illegal field at {position}: {message}")]
    MalformedField { position: Position, message: String },
    /// A `json` annotation is present but cannot be parsed.
    #[error("invalid json tag at {position}: {message}")]
    MalformedTag { position: Position, message: String },
}

impl Error {
    /// Source position the error points at.
    pub fn position(&self) -> Position {
        match self {
            Error::Syntax { position, .. }
            | Error::MalformedField { position, .. }
            | Error::MalformedTag { position, .. } => *position,
        }
    }

    pub(crate) fn syntax(position: Position, message: impl Into<String>) -> Self {
        Error::Syntax {
            position,
            message: message.into(),
        }
    }
}

/// Convenience alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, Error>;
