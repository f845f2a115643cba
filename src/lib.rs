//! Parser combinators for text, layered on top of [`pcomb_core`].
//!
//! This crate:
//!
//! * Re-exports all of [`pcomb_core`], whose parsers are generic over the type
//! of the input symbols.
//!
//! * Provides [parsers of characters and text](text), such as [`text::chr`],
//! [`text::string`], and numbers.
//!
//! * Provides a [regular-expression parser](regex::regex), which matches the
//! longest prefix of the input, in time linear in what it inspects.  (Only
//! with the default `regex` feature.)
//!
//! * Provides a [source](source_stream) of the characters decoded from any
//! `io::Read`, which is read only as far as parsing gets.
//!
//! * [Reports](diagnostic) parse errors against the parsed text, with line and
//! column, as `miette` diagnostics.
//!
//! * Provides [ready-made](common) functions for parsing strings, iterators of
//! characters, and readers.
//!
//! ```
//! use pcomb::{
//!     Ref, common::inmem::parse_str, diagnostic::{render, Diagnostic}, parser::between,
//!     text::{chr, skip_ws, uint},
//! };
//!
//! // list := '[' (list | uint) (',' (list | uint))* ']', counting the numbers
//! let list: Ref<char, u64> = Ref::new();
//! let item = skip_ws().and_r(list.parser().or(uint().constant(1))).and_l(skip_ws());
//! list.assign(between(chr('['), chr(']'), item.sep_by(chr(',')))
//!                 .map(|counts| counts.into_iter().sum()));
//!
//! assert_eq!(parse_str(&list.parser(), "[1, [2, 3], []]"), Ok(3));
//!
//! let text = "[1, 2";
//! let error = parse_str(&list.parser(), text).unwrap_err();
//! assert_eq!(Diagnostic::new(&error, text).to_string(),
//!            "1:6: unexpected end of input, expected ']'");
//! assert!(render(&error, text).contains("[1, 2"));
//! ```
//!
//! [`pcomb_core`]: ../pcomb_core/index.html


// Re-export everything from the core crate. (Except items shadowed by ours,
// which are re-exported elsewhere.)
#[doc(no_inline)]
pub use pcomb_core::*;

/// Ready-made functions that parse whole inputs of common kinds.
pub mod common {
    pub mod inmem;
    pub mod stream;
}

pub mod diagnostic;

#[cfg(feature = "regex")]
pub mod regex;

/// Character sources that read incrementally.
pub mod source_stream {
    mod reader_chars;
    pub use reader_chars::*;
}

pub mod text;

// The below module shadows that of `pcomb_core` but re-exports everything from
// it in addition to providing some of its own items.

pub mod error;
pub use error::{Error, ReadError};
#[cfg(feature = "regex")]
pub use error::GrammarError;
