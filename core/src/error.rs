//! Errors that might be returned by parsing, once a failure has left the realm
//! of combinators.

use thiserror::Error;

use crate::input::Position;


/// A parse failure as an owned, thread-safe error.
///
/// This is what a [`Failure`](crate::Failure) becomes when the caller wants a
/// plain value-or-error, e.g. from
/// [`ParseResultExt::into_value`](crate::ParseResultExt::into_value).  The
/// expected set is rendered to text here, so this carries no type parameters
/// and no predicates, which lets it be propagated with `?` into any error type
/// that holds `std::error::Error`s.
#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum ParseError {
    /// A symbol was seen that none of the alternatives could begin with.
    #[error("failure at position {position}, expected {expected}")]
    Expected {
        /// Where the unexpected symbol was.
        position: Position,
        /// Description of the symbols that would have allowed progress.
        expected: String,
    },
    /// The input ended where more was required.
    #[error("failure at position {position}, unexpected end of input, expected {expected}")]
    EndOfInput {
        /// Where the input ended.
        position: Position,
        /// Description of the symbols that would have allowed progress.
        expected: String,
    },
    /// Some other reason, e.g. from [`fail_with`](crate::parser::fail_with).
    #[error("failure at position {position}, {message}")]
    Message {
        /// Where the failure happened.
        position: Position,
        /// What went wrong.
        message: String,
    },
}

impl ParseError {
    /// Where the failure happened.
    pub fn position(&self) -> Position {
        match self {
            Self::Expected { position, .. }
            | Self::EndOfInput { position, .. }
            | Self::Message { position, .. }
                => *position,
        }
    }

    /// Did the input end too early?
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, Self::EndOfInput { .. })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let e = ParseError::Expected { position: Position(3), expected: "digit".into() };
        assert_eq!(e.to_string(), "failure at position 3, expected digit");
        assert_eq!(e.position(), Position(3));
        assert!(!e.is_end_of_input());

        let e = ParseError::EndOfInput { position: Position(0), expected: "'a'".into() };
        assert_eq!(e.to_string(),
                   "failure at position 0, unexpected end of input, expected 'a'");
        assert!(e.is_end_of_input());

        let e = ParseError::Message { position: Position(7), message: "too big".into() };
        assert_eq!(e.to_string(), "failure at position 7, too big");
    }

    #[test]
    fn is_std_error() {
        fn check<E: std::error::Error + Send + Sync + 'static>(_: &E) {}
        check(&ParseError::Message { position: Position(0), message: String::new() });
    }
}
