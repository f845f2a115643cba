//! Matching regular expressions against character input.
//!
//! A pattern is compiled once, into a deterministic automaton over UTF-8
//! bytes, which is then fed the input one character at a time.  So matching
//! is linear in the length of what is inspected, and a streamed source is
//! never read further than one character past where the automaton dies.

use std::sync::Arc;

use regex_automata::{
    Anchored, Input as Haystack, MatchKind,
    dfa::{Automaton, StartKind, dense},
    util::primitives::StateID,
};
use tracing::debug;

use crate::{
    Input, Parse, Parser, Predicate, SymbolSet,
    error::GrammarError,
    result::{Failure, ParseResult, Success},
};


type Dfa = dense::DFA<Vec<u32>>;

struct Regex {
    pattern: Arc<str>,
    dfa: Arc<Dfa>,
    start: StateID,
    set: SymbolSet<char>,
}

/// What feeding one character to the automaton led to.
enum Step {
    /// The automaton can go on.
    Live(StateID),
    /// No longer prefix can match.
    Dead,
    /// The automaton gave up on this input.
    Quit,
}

fn feed(dfa: &Dfa, mut state: StateID, c: char, mut on_first_byte: impl FnMut(StateID)) -> Step {
    let mut buf = [0_u8; 4];
    for (i, &byte) in c.encode_utf8(&mut buf).as_bytes().iter().enumerate() {
        state = dfa.next_state(state, byte);
        if i == 0 {
            // Matches are reported one byte late, so this says whether all the
            // characters before `c` matched.
            on_first_byte(state);
        }
        if dfa.is_dead_state(state) {
            return Step::Dead;
        }
        if dfa.is_quit_state(state) {
            return Step::Quit;
        }
    }
    Step::Live(state)
}

impl Regex {
    fn failure(&self, start: Input<'_, char>) -> Failure<char> {
        Failure::message(start.position(),
                         format!("expected a match of /{}/", self.pattern))
    }
}

impl Parse<char, String> for Regex {
    fn apply<'s>(&self, input: Input<'s, char>) -> ParseResult<'s, char, String> {
        let dfa = &*self.dfa;
        let mut state = self.start;
        let mut text = String::new();
        let mut at = input;
        // The length in bytes of the longest matching prefix, and where it ends.
        let mut longest: Option<(usize, Input<'s, char>)> = None;

        loop {
            let c = match at.current() {
                Ok(c) => c,
                Err(_) => {
                    if dfa.is_match_state(dfa.next_eoi_state(state)) {
                        longest = Some((text.len(), at));
                    }
                    break;
                }
            };
            let matched_before = text.len();
            let step = feed(dfa, state, c, |s| if dfa.is_match_state(s) {
                longest = Some((matched_before, at));
            });
            match step {
                Step::Live(next) => {
                    state = next;
                    text.push(c);
                    at = at.advance().map_err(|_| self.failure(input))?;
                }
                Step::Dead => break,
                Step::Quit => {
                    debug!(pattern = %self.pattern, position = %at.position(),
                           "regular expression gave up");
                    return Err(Failure::message(
                        at.position(),
                        format!("/{}/ cannot be matched against this input", self.pattern)));
                }
            }
        }

        match longest {
            Some((len, next)) => {
                text.truncate(len);
                Ok(Success::new(text, next))
            }
            None => Err(self.failure(input)),
        }
    }

    fn accepts_empty(&self) -> bool {
        self.dfa.is_match_state(self.dfa.next_eoi_state(self.start))
    }

    fn first_set(&self) -> SymbolSet<char> {
        self.set.clone()
    }
}

/// The longest prefix of the input that fully matches the regular expression
/// `pattern`, as a string.  The pattern is implicitly anchored at the
/// current position.  Fails, where it began, if no prefix matches, which for
/// patterns that match the empty string only happens at a position where
/// look-around assertions do not hold.
///
/// The first set of the parser is the characters that the automaton does not
/// immediately reject.
///
/// ```
/// use pcomb::{common::inmem::parse_str, regex::regex};
///
/// let ident = regex("[a-z_][a-z0-9_]*")?;
/// assert_eq!(parse_str(&ident, "snake_case_2").ok(), Some("snake_case_2".to_owned()));
/// assert!(parse_str(&ident, "2nd").is_err());
/// # Ok::<(), pcomb::GrammarError>(())
/// ```
pub fn regex(pattern: &str) -> Result<Parser<char, String>, GrammarError> {
    let dfa = dense::Builder::new()
        .configure(dense::Config::new()
                   .match_kind(MatchKind::All)
                   .start_kind(StartKind::Anchored))
        .build(pattern)
        .map_err(|source| GrammarError::Regex { pattern: pattern.to_owned(), source })?;
    let start = dfa.start_state_forward(&Haystack::new("").anchored(Anchored::Yes))
        .map_err(|source| GrammarError::Start { pattern: pattern.to_owned(), source })?;
    debug!(pattern, memory = dfa.memory_usage(), "compiled regular expression");

    let pattern: Arc<str> = pattern.into();
    let dfa = Arc::new(dfa);
    let set = {
        let dfa = Arc::clone(&dfa);
        SymbolSet::Predicate(Predicate::new(
            format!("/{}/", pattern),
            move |&c: &char| matches!(feed(&dfa, start, c, |_| ()), Step::Live(_))))
    };
    Ok(Parser::new(Regex { pattern, dfa, start, set }))
}
