//! Errors of the full crate, in addition to the core crate's [`ParseError`]
//! which is re-exported here.

use std::io;

use thiserror::Error;

#[doc(no_inline)]
pub use pcomb_core::error::*;


/// Why a reader-backed source stopped producing characters before the end of
/// its reader.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The reader itself failed.
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
    /// The bytes read are not UTF-8.
    #[error("invalid UTF-8 in input at byte offset {offset}")]
    InvalidUtf8 {
        /// How many bytes were successfully decoded before the invalid ones.
        offset: usize,
    },
}


/// A grammar could not be constructed from its description.
#[cfg(feature = "regex")]
#[derive(Debug, Error)]
pub enum GrammarError {
    /// The regular expression is malformed or too big.
    #[error("invalid regular expression /{pattern}/: {source}")]
    Regex {
        /// The pattern as given.
        pattern: String,
        /// What the regular expression compiler reported.
        source: regex_automata::dfa::dense::BuildError,
    },
    /// The compiled regular expression cannot begin an anchored match.
    #[error("regular expression /{pattern}/ cannot start a match: {source}")]
    Start {
        /// The pattern as given.
        pattern: String,
        /// What the automaton reported.
        source: regex_automata::MatchError,
    },
}

#[cfg(feature = "regex")]
impl GrammarError {
    /// The pattern that could not be used.
    pub fn pattern(&self) -> &str {
        match self {
            Self::Regex { pattern, .. } | Self::Start { pattern, .. } => pattern,
        }
    }
}


/// Any error from the conveniences of this crate that do everything from
/// reading to parsing.
#[derive(Debug, Error)]
pub enum Error {
    /// The input did not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The input could not be read.
    #[error(transparent)]
    Read(#[from] ReadError),
    /// The grammar could not be built.
    #[cfg(feature = "regex")]
    #[error(transparent)]
    Grammar(#[from] GrammarError),
}
