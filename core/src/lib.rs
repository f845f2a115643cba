//! The core of a parser-combinator engine: small parsers are composed into
//! larger ones that consume a sequence of input symbols and produce typed
//! results, with precise failure reporting (the position of a failure plus the
//! set of symbols that were expected there).
//!
//! This core crate is generic over the type of the input symbols.  Anything
//! that is [`Symbol`] (cloneable, comparable for equality, debuggable, and
//! shareable between threads) can be parsed, e.g. `char`s, bytes, or the tokens
//! produced by some separate lexer.  The full crate, `pcomb`, layers
//! character-specific parsers, regular expressions, reader-backed input and
//! diagnostics rendering on top of this.
//!
//! Every [`Parser`] knows two static properties of itself, which are computed
//! once, from the shape of the combinator tree, and then reused:
//!
//! * Whether it [accepts empty input](Parser::accepts_empty), i.e. whether it
//! can succeed without consuming any symbol.
//!
//! * Its [first set](Parser::first_set), i.e. the [`SymbolSet`] of symbols on
//! which it can begin a match.
//!
//! The repetition combinators consult these to predict whether another round
//! can possibly match, which is what lets them stop without invoking their
//! sub-parser and what lets them refuse sub-parsers that would loop forever.
//!
//! Parse failures are ordinary values, the `Err` variant of a [`ParseResult`],
//! so that [alternatives](Parser::or) can be tried cheaply.  Defects in how a
//! grammar was assembled (using an unassigned [`Ref`], repeating a parser that
//! accepts empty input, left recursion) are panics instead, because they are
//! not outcomes of parsing and must never be recovered from by trying another
//! alternative.
//!
//! Parsers are immutable after construction and are `Send + Sync`, so one
//! grammar may be applied concurrently to any number of independent
//! [`Input`]s.
//!
//! ```
//! use pcomb_core::{Input, parser::{satisfy, value}};
//!
//! let digit = satisfy("digit", |c: &char| c.is_ascii_digit())
//!     .map(|c| c.to_digit(10).unwrap_or(0));
//! let list = digit.sep_by(value(','));
//!
//! let text: Vec<char> = "1,2,3".chars().collect();
//! let result = list.parse(Input::new(&text));
//! assert_eq!(result.map(|s| s.value).ok(), Some(vec![1, 2, 3]));
//! ```

pub mod error;
pub use error::ParseError;

pub mod input;
pub use input::{Input, Position, Source, SymbolSource, StreamSource, EndOfInput};

pub mod symbol_set;
pub use symbol_set::{Symbol, SymbolSet, Predicate};

pub mod result;
pub use result::{ParseResult, ParseResultExt, Success, Failure, FailureKind};

pub mod parser;
pub use parser::{Parser, Parse, Ref};
