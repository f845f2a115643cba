//! The `Parser` type, the `Parse` trait that gives parsers their behavior, and
//! the premade primitives and combinators that grammars are built from.

use std::{cell::RefCell, fmt, sync::Arc};

use tracing::{debug, trace};

use crate::{
    input::Input,
    result::{Failure, ParseResult, Success},
    symbol_set::{Symbol, SymbolSet},
};

use memo::Memo;


/// Implementations provided for ready use.
pub mod premade
{
    mod primitive;
    pub use primitive::{pure, fail, fail_with, eof, any, satisfy, value, value_as};

    mod combinator;
    pub use combinator::{ap, ap_fn, lift2, choice, sequence, traverse, lookahead, not,
                         optional, between};

    mod repeat;
    pub use repeat::{many, many1, skip_many, sep_by, sep_by1};

    mod reference;
    pub use reference::Ref;
}

pub use premade::*;

mod memo;


/// The behavior of a parser.
///
/// Implement this to make custom parsers, and wrap them with [`Parser::new`]
/// so they compose with everything else.  Implementations must be consistent
/// with the properties they report:
///
/// * If [`accepts_empty`](Self::accepts_empty) is `false`, then `apply` must
/// never succeed without consuming input, and must fail when given a cursor at
/// the end of input.
///
/// * Every symbol that `apply` can begin a successful match on must be in the
/// [`first_set`](Self::first_set).  (A superset is allowed, at the cost of
/// prediction being less precise.)
pub trait Parse<T, A>: Send + Sync {
    /// Try to parse a value from the input at the given cursor.
    fn apply<'s>(&self, input: Input<'s, T>) -> ParseResult<'s, T, A>;

    /// Can this succeed without consuming any input?
    fn accepts_empty(&self) -> bool;

    /// The set of symbols that this can begin a match on.
    fn first_set(&self) -> SymbolSet<T>;
}


struct Node<T, A> {
    imp: Box<dyn Parse<T, A>>,
    accepts_empty: Memo<bool>,
    first_set: Memo<SymbolSet<T>>,
}


/// A parser of values of type `A` from sequences of symbols of type `T`.
///
/// This is a cheap handle (an `Arc`) to an immutable node of a combinator
/// tree, so cloning one to use it in several places of a grammar shares it.
/// The node's [`accepts_empty`](Self::accepts_empty) and
/// [`first_set`](Self::first_set) properties are computed on first request and
/// then remembered, because recursive grammars can only know them after all
/// their [`Ref`]s are assigned.
pub struct Parser<T, A> {
    node: Arc<Node<T, A>>,
}

impl<T, A> Clone for Parser<T, A> {
    #[inline]
    fn clone(&self) -> Self {
        Self { node: Arc::clone(&self.node) }
    }
}

impl<T, A> fmt::Debug for Parser<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
         .field("accepts_empty", &self.node.accepts_empty.peek())
         .finish_non_exhaustive()
    }
}

impl<T, A> Parser<T, A>
    where T: Symbol,
          A: 'static,
{
    /// Wrap a [`Parse`] implementation as a composable parser.
    pub fn new<P>(imp: P) -> Self
        where P: Parse<T, A> + 'static,
    {
        Self {
            node: Arc::new(Node {
                imp: Box::new(imp),
                accepts_empty: Memo::new(),
                first_set: Memo::new(),
            }),
        }
    }

    /// Try to parse a value from the input at the given cursor.  Input after
    /// the parsed value is left for the continuation, see [`parse`](Self::parse)
    /// for requiring all of it to be consumed.
    #[inline]
    pub fn apply<'s>(&self, input: Input<'s, T>) -> ParseResult<'s, T, A> {
        self.node.imp.apply(input)
    }

    /// Can this succeed without consuming any input?
    ///
    /// # Panics
    ///
    /// If the grammar is left-recursive or contains an unassigned [`Ref`].
    pub fn accepts_empty(&self) -> bool {
        self.node.accepts_empty.get_or_compute("accepts_empty",
                                               || self.node.imp.accepts_empty())
    }

    /// The set of symbols that this can begin a match on.
    ///
    /// # Panics
    ///
    /// If the grammar is left-recursive or contains an unassigned [`Ref`].
    pub fn first_set(&self) -> SymbolSet<T> {
        self.node.first_set.get_or_compute("first_set", || self.node.imp.first_set())
    }

    /// Parse the entire input: like [`apply`](Self::apply) but it is a failure
    /// if input remains after the parsed value.
    ///
    /// Before touching any symbol, empty input is checked for: if this cannot
    /// accept empty input, that fails immediately at the start with the set of
    /// symbols this could have begun with.
    ///
    /// A failure is reported at the furthest position that the parse reached.
    /// That can be a failure that was [recovered](Input::recovered) from, when
    /// the parse went on to fail at an earlier position.
    ///
    /// # Panics
    ///
    /// If the grammar is left-recursive or contains an unassigned [`Ref`],
    /// whatever the input.
    pub fn parse<'s>(&self, input: Input<'s, T>) -> ParseResult<'s, T, A> {
        trace!(position = %input.position(), "parse");
        // Computed for all inputs, so that a left-recursive grammar is refused
        // instead of recursing without bound.
        let accepts_empty = self.accepts_empty();
        let first_set = self.first_set();
        if input.is_eof() && !accepts_empty {
            let failure = Failure::end_of_input(input.position(), first_set);
            debug!(%failure, "parse of empty input");
            return Err(failure);
        }
        let furthest = RefCell::new(None);
        let result = self.apply(input.tracking(&furthest)).and_then(|success| {
            if success.next.is_eof() {
                Ok(Success::new(success.value, input.moved_to(success.next.position())))
            } else {
                Err(Failure::message(success.position(), "expected end of input"))
            }
        });
        let result = result.map_err(|failure| match furthest.into_inner() {
            Some(recovered) if recovered.position() > failure.position() => {
                debug!(%failure, %recovered, "reporting the furthest recovered failure");
                recovered
            }
            _ => failure,
        });
        match &result {
            Ok(success) => trace!(consumed = success.position().index(), "parse succeeded"),
            Err(failure) => debug!(%failure, "parse failed"),
        }
        result
    }
}
