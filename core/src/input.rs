//! The input cursor that parsers are applied to, and the sources of symbols
//! that back it.

use std::{cell::RefCell, fmt};

use thiserror::Error;

use crate::{result::Failure, symbol_set::Symbol};


/// Where a cursor is within its source, as the index of the symbol it is at.
///
/// Positions only ever increase as input is consumed, and they are compared to
/// tell whether a parser consumed anything and which of two failures reached
/// further.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Position(pub usize);

impl Position {
    /// The index of the symbol at this position.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}


/// Returned when a symbol is requested from a cursor that is at the end of its
/// input.  Combinators check [`Input::is_eof`] first, so seeing this means the
/// cursor was used directly in a way that assumed more input.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Error)]
#[error("end of input at position {position}")]
pub struct EndOfInput {
    /// Where the end was reached.
    pub position: Position,
}


/// A backing for [`Input`]s whose symbols are not all in memory up front.
///
/// Implementations must be consistent: once `symbol_at(i)` returned a symbol,
/// every later call with the same `i` returns an equal symbol, and once it
/// returned `None`, every later call with the same or a greater `i` returns
/// `None`.
pub trait SymbolSource<T> {
    /// The symbol at `index`, or `None` if the source ends before it.
    fn symbol_at(&self, index: usize) -> Option<T>;
}


/// Anything that can give an [`Input`] cursor positioned at its start.
pub trait Source<T> {
    /// A new cursor at the first symbol.
    fn input(&self) -> Input<'_, T>;
}

impl<T> Source<T> for [T] {
    #[inline]
    fn input(&self) -> Input<'_, T> {
        Input::new(self)
    }
}

impl<T> Source<T> for Vec<T> {
    #[inline]
    fn input(&self) -> Input<'_, T> {
        Input::new(self)
    }
}


enum Backing<'s, T> {
    Slice(&'s [T]),
    Source(&'s dyn SymbolSource<T>),
}

// Note: Must implement `Copy` and `Clone` manually instead of using `derive`
// because `derive` would place additional bounds on the `T` type parameter
// which must be avoided.

impl<'s, T> Copy for Backing<'s, T> {}

impl<'s, T> Clone for Backing<'s, T> {
    #[inline]
    fn clone(&self) -> Self { *self }
}


/// An immutable cursor into a sequence of symbols.
///
/// Advancing gives a new cursor and leaves this one where it was, so any number
/// of cursors into the same source can be held at once, which is how
/// alternatives are retried from the same position and how lookahead rewinds.
/// A cursor is `Copy` and as cheap as a couple of references plus an index.
///
/// During a top-level [`parse`](crate::Parser::parse), cursors also carry a
/// record of the furthest failure that the parse recovered from, see
/// [`recovered`](Self::recovered).
pub struct Input<'s, T> {
    backing: Backing<'s, T>,
    index: usize,
    furthest: Option<&'s Furthest<T>>,
}

/// The furthest failure recovered from, so far, by a parse.
pub(crate) type Furthest<T> = RefCell<Option<Failure<T>>>;

impl<'s, T> Copy for Input<'s, T> {}

impl<'s, T> Clone for Input<'s, T> {
    #[inline]
    fn clone(&self) -> Self { *self }
}

impl<'s, T> fmt::Debug for Input<'s, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.backing {
            Backing::Slice(_) => "slice",
            Backing::Source(_) => "source",
        };
        f.debug_struct("Input")
         .field("backing", &kind)
         .field("position", &self.index)
         .finish()
    }
}

impl<'s, T> Input<'s, T> {
    /// A cursor at the start of a fully materialized sequence.
    #[inline]
    pub fn new(symbols: &'s [T]) -> Self {
        Self { backing: Backing::Slice(symbols), index: 0, furthest: None }
    }

    /// A cursor at the start of a source that produces its symbols on demand.
    #[inline]
    pub fn from_source(source: &'s dyn SymbolSource<T>) -> Self {
        Self { backing: Backing::Source(source), index: 0, furthest: None }
    }

    /// The position of this cursor.
    #[inline]
    pub fn position(&self) -> Position {
        Position(self.index)
    }

    /// The same cursor, also recording recovered failures into `furthest`.
    pub(crate) fn tracking<'t>(self, furthest: &'t Furthest<T>) -> Input<'t, T>
        where 's: 't,
    {
        Input { backing: self.backing, index: self.index, furthest: Some(furthest) }
    }

    /// The same cursor, not recording recovered failures.
    pub(crate) fn untracked(self) -> Self {
        Self { furthest: None, ..self }
    }

    /// This cursor moved to `position` of the same input.
    pub(crate) fn moved_to(self, position: Position) -> Self {
        Self { index: position.index(), ..self }
    }
}

impl<'s, T> Input<'s, T>
    where T: Symbol,
{
    /// Record that a parser recovered from `failure`, by taking an alternative
    /// or ending a repetition, when applied to this cursor.
    ///
    /// If the whole parse fails at an earlier position than this failure
    /// reached, this failure is what the parse reports, since it says how far
    /// the input was understood.  Outside of a top-level parse this does
    /// nothing.
    pub fn recovered(&self, failure: Failure<T>) {
        if let Some(furthest) = self.furthest {
            let mut furthest = furthest.borrow_mut();
            *furthest = Some(match furthest.take() {
                Some(prev) => prev.merge(failure),
                None => failure,
            });
        }
    }
}

impl<'s, T> Input<'s, T>
    where T: Clone,
{
    fn peek(&self) -> Option<T> {
        match self.backing {
            Backing::Slice(slice) => slice.get(self.index).cloned(),
            Backing::Source(source) => source.symbol_at(self.index),
        }
    }

    /// Is this cursor at the end of the input?
    #[inline]
    pub fn is_eof(&self) -> bool {
        match self.backing {
            Backing::Slice(slice) => self.index >= slice.len(),
            Backing::Source(source) => source.symbol_at(self.index).is_none(),
        }
    }

    /// The symbol at this cursor.
    pub fn current(&self) -> Result<T, EndOfInput> {
        self.peek().ok_or(EndOfInput { position: self.position() })
    }

    /// A cursor at the next symbol.
    pub fn advance(&self) -> Result<Self, EndOfInput> {
        if self.is_eof() {
            Err(EndOfInput { position: self.position() })
        } else {
            Ok(Self { index: self.index + 1, ..*self })
        }
    }
}

impl<'s, T> From<&'s [T]> for Input<'s, T> {
    #[inline]
    fn from(symbols: &'s [T]) -> Self {
        Self::new(symbols)
    }
}

impl<'s, T> From<&'s Vec<T>> for Input<'s, T> {
    #[inline]
    fn from(symbols: &'s Vec<T>) -> Self {
        Self::new(symbols)
    }
}


/// A [`SymbolSource`] that pulls its symbols lazily from any `Iterator`.
///
/// The underlying iterator is never asked for the same symbol twice: each
/// pulled symbol is cached, and a symbol is pulled only when a cursor first
/// looks at its position, so at most one symbol beyond the furthest inspected
/// position is ever read.  Pulled symbols are retained for as long as this
/// source lives because cursors at earlier positions remain valid (ordered
/// choice and lookahead rewind to them).  The end of the iterator is latched
/// the first time it is seen and the iterator is not polled again.
///
/// This uses interior mutability without synchronization and so is not `Sync`:
/// a stream source is for a single parse at a time.
pub struct StreamSource<S>
    where S: Iterator,
{
    state: RefCell<StreamState<S>>,
}

struct StreamState<S>
    where S: Iterator,
{
    iter: S,
    buffer: Vec<S::Item>,
    ended: bool,
}

impl<S> StreamSource<S>
    where S: Iterator,
{
    /// Given anything that can convert into an `Iterator`, make a new source
    /// that yields its items as symbols.
    pub fn new<I>(iter: I) -> Self
        where I: IntoIterator<IntoIter = S, Item = S::Item>,
    {
        Self {
            state: RefCell::new(StreamState {
                iter: iter.into_iter(),
                buffer: Vec::new(),
                ended: false,
            }),
        }
    }

    /// How many symbols have been pulled from the underlying iterator so far.
    pub fn pulled(&self) -> usize {
        self.state.borrow().buffer.len()
    }

    /// Has the underlying iterator been seen to end?
    pub fn is_exhausted(&self) -> bool {
        self.state.borrow().ended
    }

    /// Inspect the underlying iterator, e.g. to ask it for any error it
    /// recorded while producing symbols.
    pub fn with_iter<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.state.borrow().iter)
    }

    /// Take back the underlying iterator.  Symbols already pulled are dropped.
    pub fn into_inner(self) -> S {
        self.state.into_inner().iter
    }
}

impl<S> SymbolSource<S::Item> for StreamSource<S>
    where S: Iterator,
          S::Item: Clone,
{
    fn symbol_at(&self, index: usize) -> Option<S::Item> {
        let mut state = self.state.borrow_mut();
        while state.buffer.len() <= index && !state.ended {
            match state.iter.next() {
                Some(symbol) => state.buffer.push(symbol),
                None => state.ended = true,
            }
        }
        state.buffer.get(index).cloned()
    }
}

impl<S> Source<S::Item> for StreamSource<S>
    where S: Iterator,
          S::Item: Clone,
{
    #[inline]
    fn input(&self) -> Input<'_, S::Item> {
        Input::from_source(self)
    }
}

impl<S> fmt::Debug for StreamSource<S>
    where S: Iterator,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("StreamSource")
         .field("pulled", &state.buffer.len())
         .field("ended", &state.ended)
         .finish()
    }
}


#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn slice_cursor() {
        let data = ['a', 'b'];
        let i0 = Input::new(&data[..]);
        assert_eq!(i0.position(), Position(0));
        assert!(!i0.is_eof());
        assert_eq!(i0.current(), Ok('a'));
        let i1 = i0.advance().unwrap();
        assert_eq!(i1.current(), Ok('b'));
        let i2 = i1.advance().unwrap();
        assert!(i2.is_eof());
        assert_eq!(i2.current(), Err(EndOfInput { position: Position(2) }));
        assert_eq!(i2.advance().unwrap_err(), EndOfInput { position: Position(2) });
        // The earlier cursors did not move.
        assert_eq!(i0.current(), Ok('a'));
        assert_eq!(i1.position(), Position(1));
    }

    #[test]
    fn empty_slice() {
        let data: [u8; 0] = [];
        let i = Input::new(&data[..]);
        assert!(i.is_eof());
        assert!(i.current().is_err());
    }

    /// Counts how many times the underlying iterator is polled.
    struct Counting<'c> {
        items: std::vec::IntoIter<char>,
        polls: &'c Cell<usize>,
    }

    impl<'c> Iterator for Counting<'c> {
        type Item = char;

        fn next(&mut self) -> Option<char> {
            self.polls.set(self.polls.get() + 1);
            self.items.next()
        }
    }

    #[test]
    fn stream_never_double_pulls() {
        let polls = Cell::new(0);
        let src = StreamSource::new(Counting { items: vec!['x', 'y'].into_iter(),
                                               polls: &polls });
        let i0 = src.input();
        assert_eq!(polls.get(), 0);
        for _ in 0 .. 3 {
            assert!(!i0.is_eof());
            assert_eq!(i0.current(), Ok('x'));
        }
        assert_eq!(polls.get(), 1);
        let i1 = i0.advance().unwrap();
        assert_eq!(i1.current(), Ok('y'));
        assert_eq!(polls.get(), 2);
        let i2 = i1.advance().unwrap();
        assert!(i2.is_eof());
        assert!(i2.is_eof());
        assert_eq!(polls.get(), 3);
        assert!(src.is_exhausted());
        // Rewinding to an earlier cursor reads from the cache.
        assert_eq!(i0.current(), Ok('x'));
        assert_eq!(polls.get(), 3);
        assert_eq!(src.pulled(), 2);
    }

    #[test]
    fn stream_matches_slice() {
        let text = "héllo";
        let chars: Vec<char> = text.chars().collect();
        let src = StreamSource::new(text.chars());
        let (mut a, mut b) = (chars.input(), src.input());
        loop {
            assert_eq!(a.is_eof(), b.is_eof());
            assert_eq!(a.current(), b.current());
            assert_eq!(a.position(), b.position());
            match (a.advance(), b.advance()) {
                (Ok(a2), Ok(b2)) => { a = a2; b = b2; },
                (Err(e1), Err(e2)) => { assert_eq!(e1, e2); break },
                _ => panic!("backings disagree"),
            }
        }
    }

    #[test]
    fn recovered_failures() {
        let data = ['a'];
        let furthest = RefCell::new(None);
        let i = Input::new(&data[..]).tracking(&furthest);
        i.recovered(Failure::message(Position(1), "far"));
        i.recovered(Failure::message(Position(0), "near"));
        assert_eq!(furthest.borrow().as_ref().map(Failure::position), Some(Position(1)));

        // Without tracking, nothing is recorded anywhere.
        Input::new(&data[..]).recovered(Failure::message(Position(5), "lost"));
        i.untracked().recovered(Failure::message(Position(5), "lost"));
        assert_eq!(furthest.borrow().as_ref().map(Failure::position), Some(Position(1)));
    }

    #[test]
    fn position_display() {
        assert_eq!(Position(42).to_string(), "42");
        assert!(Position(1) < Position(2));
    }
}
