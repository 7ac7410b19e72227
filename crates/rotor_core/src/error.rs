//! Error types for the Rotor engine.

use thiserror::Error;

use crate::parser::scanner::Loc;

/// All errors that can be produced by the Rotor engine.
///
/// The `Syntax`, `Type`, and `Range` variants carry the source location of
/// the offending construct so the [`Diagnostics`](crate::diagnostics::Diagnostics)
/// renderer can underline it.  Errors raised from native built-ins have no
/// location and use [`Loc::default`].
#[derive(Debug, Clone, Error)]
pub enum RotorError {
    /// A syntax error found while lexing or parsing.
    #[error("SyntaxError: {msg}")]
    Syntax {
        /// Location of the offending span.
        loc: Loc,
        /// Human-readable description.
        msg: String,
    },

    /// A runtime type error (bad operand, non-callable callee, ...).
    #[error("TypeError: {msg}")]
    Type {
        /// Location of the offending span.
        loc: Loc,
        /// Human-readable description.
        msg: String,
    },

    /// A runtime range error (argument-count violation, zero modulo, ...).
    #[error("RangeError: {msg}")]
    Range {
        /// Location of the offending span.
        loc: Loc,
        /// Human-readable description.
        msg: String,
    },

    /// An internal engine error that should not occur in normal operation.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RotorError {
    /// Creates a [`RotorError::Syntax`] at `loc`.
    pub fn syntax(loc: Loc, msg: impl Into<String>) -> Self {
        Self::Syntax {
            loc,
            msg: msg.into(),
        }
    }

    /// Creates a [`RotorError::Type`] at `loc`.
    pub fn type_error(loc: Loc, msg: impl Into<String>) -> Self {
        Self::Type {
            loc,
            msg: msg.into(),
        }
    }

    /// Creates a [`RotorError::Range`] at `loc`.
    pub fn range(loc: Loc, msg: impl Into<String>) -> Self {
        Self::Range {
            loc,
            msg: msg.into(),
        }
    }

    /// Returns the source location attached to this error, if any.
    pub fn loc(&self) -> Option<Loc> {
        match self {
            Self::Syntax { loc, .. } | Self::Type { loc, .. } | Self::Range { loc, .. } => {
                Some(*loc)
            }
            Self::Internal(_) => None,
        }
    }
}

/// Convenient `Result` alias for fallible engine operations.
pub type RotorResult<T> = Result<T, RotorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_category() {
        let err = RotorError::syntax(Loc::default(), "unexpected token");
        assert_eq!(err.to_string(), "SyntaxError: unexpected token");

        let err = RotorError::type_error(Loc::default(), "1 is not a function");
        assert_eq!(err.to_string(), "TypeError: 1 is not a function");
    }

    #[test]
    fn test_loc_accessor() {
        let loc = Loc {
            offset: 3,
            len: 2,
            line: 1,
        };
        assert_eq!(RotorError::range(loc, "x").loc(), Some(loc));
        assert_eq!(RotorError::Internal("x".into()).loc(), None);
    }
}
