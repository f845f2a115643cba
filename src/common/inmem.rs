//! Parsing inputs that are entirely in memory.

use crate::{Input, ParseError, ParseResultExt, Parser, Symbol, text::chars};


/// Parse all of `text` with `parser`.
///
/// ```
/// use pcomb::{common::inmem::parse_str, text::int};
///
/// assert_eq!(parse_str(&int(), "-42"), Ok(-42));
/// assert!(parse_str(&int(), "42!").is_err());
/// ```
pub fn parse_str<A>(parser: &Parser<char, A>, text: &str) -> Result<A, ParseError>
    where A: 'static,
{
    parse_symbols(parser, &chars(text))
}

/// Parse all of `symbols` with `parser`.
pub fn parse_symbols<T, A>(parser: &Parser<T, A>, symbols: &[T]) -> Result<A, ParseError>
    where T: Symbol,
          A: 'static,
{
    parser.parse(Input::new(symbols)).into_value()
}
