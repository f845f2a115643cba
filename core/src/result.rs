//! The outcomes of applying parsers.

use std::{borrow::Cow, cmp::Ordering, fmt};

use crate::{
    error::ParseError,
    input::{Input, Position},
    symbol_set::{Symbol, SymbolSet},
};


/// What applying a parser gives: a [`Success`] or a [`Failure`].
pub type ParseResult<'s, T, A> = Result<Success<'s, T, A>, Failure<T>>;


/// A parsed value plus the cursor just past what was consumed to produce it.
pub struct Success<'s, T, A> {
    /// The parsed value.
    pub value: A,
    /// Where parsing continues.
    pub next: Input<'s, T>,
}

impl<'s, T, A> Success<'s, T, A> {
    /// Make a new one.
    #[inline]
    pub fn new(value: A, next: Input<'s, T>) -> Self {
        Self { value, next }
    }

    /// The position of the continuation cursor.
    #[inline]
    pub fn position(&self) -> Position {
        self.next.position()
    }

    /// Transform the value, keeping the continuation.
    #[inline]
    pub fn map<B>(self, f: impl FnOnce(A) -> B) -> Success<'s, T, B> {
        Success { value: f(self.value), next: self.next }
    }
}

impl<'s, T, A> fmt::Debug for Success<'s, T, A>
    where A: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Success")
         .field("value", &self.value)
         .field("next", &self.next)
         .finish()
    }
}


/// Why a [`Failure`] happened.
#[derive(Clone, PartialEq, Debug)]
pub enum FailureKind<T> {
    /// The symbol at the failure position is not in this set of the symbols
    /// that would have allowed progress.
    Expected(SymbolSet<T>),
    /// The input ended at the failure position, and one of this set of symbols
    /// would have allowed progress.
    EndOfInput(SymbolSet<T>),
    /// Some reason that is not about specific symbols.
    Message(Cow<'static, str>),
}

impl<T> FailureKind<T> {
    fn set(&self) -> Option<&SymbolSet<T>> {
        match self {
            Self::Expected(set) | Self::EndOfInput(set) => Some(set),
            Self::Message(_) => None,
        }
    }
}


/// A failed parse: the position where it failed, and why.
#[derive(Clone, PartialEq, Debug)]
pub struct Failure<T> {
    position: Position,
    kind: FailureKind<T>,
}

impl<T> Failure<T> {
    /// A failure because the symbol at `position` is not in `expected`.
    pub fn expected(position: Position, expected: SymbolSet<T>) -> Self {
        Self { position, kind: FailureKind::Expected(expected) }
    }

    /// A failure because the input ended at `position`, where one of
    /// `expected` was required.
    pub fn end_of_input(position: Position, expected: SymbolSet<T>) -> Self {
        Self { position, kind: FailureKind::EndOfInput(expected) }
    }

    /// A failure for some other reason, described by `message`.
    pub fn message(position: Position, message: impl Into<Cow<'static, str>>) -> Self {
        Self { position, kind: FailureKind::Message(message.into()) }
    }

    /// Where the failure happened.
    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Why the failure happened.
    #[inline]
    pub fn kind(&self) -> &FailureKind<T> {
        &self.kind
    }

    /// The set of symbols that would have allowed progress, if this failure is
    /// about symbols.
    pub fn expected_set(&self) -> Option<&SymbolSet<T>> {
        self.kind.set()
    }

    /// Did the input end too early?
    pub fn is_end_of_input(&self) -> bool {
        matches!(self.kind, FailureKind::EndOfInput(_))
    }
}

impl<T> Failure<T>
    where T: Symbol,
{
    /// Combine the failures of two alternatives that were tried from the same
    /// position.  The one that got further wins.  At the same position, their
    /// expected sets are unioned, so that the result describes every symbol
    /// either alternative could have continued with.
    pub fn merge(self, other: Self) -> Self {
        use FailureKind::*;

        match self.position.cmp(&other.position) {
            Ordering::Greater => self,
            Ordering::Less => other,
            Ordering::Equal => {
                let position = self.position;
                let kind = match (self.kind, other.kind) {
                    (EndOfInput(a), EndOfInput(b))
                    | (EndOfInput(a), Expected(b))
                    | (Expected(a), EndOfInput(b))
                        => EndOfInput(a.union(b)),
                    (Expected(a), Expected(b))
                        => Expected(a.union(b)),
                    // A message says more than an empty set does, but a set of
                    // actual symbols says more than a message.
                    (Message(m), Expected(s)) | (Expected(s), Message(m))
                        => if s.is_empty() { Message(m) } else { Expected(s) },
                    (Message(m), EndOfInput(s)) | (EndOfInput(s), Message(m))
                        => if s.is_empty() { Message(m) } else { EndOfInput(s) },
                    (Message(m), Message(_))
                        => Message(m),
                };
                Self { position, kind }
            }
        }
    }

    /// Convert into an owned error, rendering the expected set to text.
    pub fn into_error(self) -> ParseError {
        let position = self.position;
        match self.kind {
            FailureKind::Expected(set)
                => ParseError::Expected { position, expected: set.to_string() },
            FailureKind::EndOfInput(set)
                => ParseError::EndOfInput { position, expected: set.to_string() },
            FailureKind::Message(message)
                => ParseError::Message { position, message: message.into_owned() },
        }
    }
}

impl<T> fmt::Display for Failure<T>
    where T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FailureKind::Expected(set)
                => write!(f, "at position {}: expected {}", self.position, set),
            FailureKind::EndOfInput(set)
                => write!(f, "at position {}: unexpected end of input, expected {}",
                          self.position, set),
            FailureKind::Message(message)
                => write!(f, "at position {}: {}", self.position, message),
        }
    }
}

impl<T> From<Failure<T>> for ParseError
    where T: Symbol,
{
    fn from(failure: Failure<T>) -> Self {
        failure.into_error()
    }
}


/// Conveniences for [`ParseResult`]s.
pub trait ParseResultExt<'s, T, A> {
    /// The parsed value, or the failure as an owned error.
    fn into_value(self) -> Result<A, ParseError>;

    /// Transform the value of a success, leaving a failure as is.
    fn map_value<B, F>(self, f: F) -> ParseResult<'s, T, B>
        where F: FnOnce(A) -> B;

    /// The position reached: after the consumed input for a success, or where
    /// it failed for a failure.
    fn reached(&self) -> Position;
}

impl<'s, T, A> ParseResultExt<'s, T, A> for ParseResult<'s, T, A>
    where T: Symbol,
{
    fn into_value(self) -> Result<A, ParseError> {
        self.map(|success| success.value).map_err(Failure::into_error)
    }

    fn map_value<B, F>(self, f: F) -> ParseResult<'s, T, B>
        where F: FnOnce(A) -> B,
    {
        self.map(|success| success.map(f))
    }

    fn reached(&self) -> Position {
        match self {
            Ok(success) => success.position(),
            Err(failure) => failure.position(),
        }
    }
}
