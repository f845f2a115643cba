//! Used by the integration tests of both the [core](../pcomb_core/index.html)
//! and the [full](../pcomb/index.html) crates.  It provides test suites that
//! can be run against any backing of [`Input`]s, so that every kind of source
//! is held to exactly the same behavior, and it renders parse results to
//! owned [`ParseError`]s so that expected results can be written as plain
//! values.

use pcomb_core::*;


pub mod suites;

pub mod utils;


/// Parse the given text, from a source made by `make`, with `parser`.
pub fn parse_text<S, M, A>(make: &M, parser: &Parser<char, A>, text: &'static str)
                           -> Result<A, ParseError>
    where M: Fn(&'static str) -> S,
          S: Source<char>,
          A: 'static,
{
    let source = make(text);
    parser.parse(source.input()).into_value()
}

/// Like [`parse_text`] but only apply `parser`, so input may remain, and also
/// give how far it got.
pub fn apply_text<S, M, A>(make: &M, parser: &Parser<char, A>, text: &'static str)
                           -> Result<(A, usize), ParseError>
    where M: Fn(&'static str) -> S,
          S: Source<char>,
          A: 'static,
{
    let source = make(text);
    parser.apply(source.input())
          .map(|success| (success.value, success.next.position().index()))
          .map_err(Failure::into_error)
}

/// The error for when the symbol at `position` is not one of `expected`.
pub fn expected(position: usize, expected: &str) -> ParseError {
    ParseError::Expected { position: Position(position), expected: expected.into() }
}

/// The error for when the input ended at `position` where one of `expected`
/// was required.
pub fn end_of_input(position: usize, expected: &str) -> ParseError {
    ParseError::EndOfInput { position: Position(position), expected: expected.into() }
}

/// The error for a failure with a message.
pub fn message(position: usize, message: &str) -> ParseError {
    ParseError::Message { position: Position(position), message: message.into() }
}
