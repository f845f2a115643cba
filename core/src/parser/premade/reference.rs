//! Forward references, for recursive grammars.

use std::{fmt, sync::{Arc, OnceLock}};

use tracing::debug;

use crate::{
    input::Input,
    parser::{Parse, Parser},
    result::ParseResult,
    symbol_set::{Symbol, SymbolSet},
};


type Slot<T, A> = Arc<OnceLock<Parser<T, A>>>;

struct Deferred<T, A> {
    slot: Slot<T, A>,
}

impl<T, A> Deferred<T, A> {
    fn target(&self) -> &Parser<T, A> {
        match self.slot.get() {
            Some(parser) => parser,
            None => panic!("uninitialized parser: a `Ref` was used before being assigned"),
        }
    }
}

impl<T, A> Parse<T, A> for Deferred<T, A>
    where T: Symbol,
          A: 'static,
{
    fn apply<'s>(&self, input: Input<'s, T>) -> ParseResult<'s, T, A> {
        self.target().apply(input)
    }

    fn accepts_empty(&self) -> bool { self.target().accepts_empty() }

    fn first_set(&self) -> SymbolSet<T> { self.target().first_set() }
}


/// A placeholder parser that is assigned its definition later, so that a
/// grammar can refer to a rule before the rule is constructed, including from
/// within its own definition.
///
/// ```
/// use pcomb_core::{Input, ParseResultExt, Ref, parser::{between, value}};
///
/// // nested := '(' nested* ')'
/// let nested: Ref<char, u32> = Ref::new();
/// nested.assign(between(value('('), value(')'), nested.parser().many())
///                   .map(|inner| 1 + inner.into_iter().max().unwrap_or(0)));
///
/// let text: Vec<char> = "(()(()))".chars().collect();
/// assert_eq!(nested.parser().parse(Input::new(&text)).into_value(), Ok(3)); // depth
/// ```
///
/// Assignment happens once.  Using the parser before assignment, or assigning
/// twice, is a defect in how the grammar is assembled, and panics.
///
/// A grammar that refers to itself through a `Ref` holds a reference cycle of
/// `Arc`s, so its nodes are not freed.  Grammars are typically built once and
/// live for as long as the program.
pub struct Ref<T, A> {
    slot: Slot<T, A>,
    parser: Parser<T, A>,
}

impl<T, A> Ref<T, A>
    where T: Symbol,
          A: 'static,
{
    /// Make a new unassigned one.
    pub fn new() -> Self {
        let slot = Arc::new(OnceLock::new());
        let parser = Parser::new(Deferred { slot: Arc::clone(&slot) });
        Self { slot, parser }
    }

    /// The parser that forwards to the assigned definition.
    pub fn parser(&self) -> Parser<T, A> {
        self.parser.clone()
    }

    /// Assign the definition.
    ///
    /// # Panics
    ///
    /// If already assigned.
    pub fn assign(&self, definition: Parser<T, A>) {
        if self.slot.set(definition).is_err() {
            panic!("a `Ref` can only be assigned once");
        }
        debug!(symbol = std::any::type_name::<T>(),
               value = std::any::type_name::<A>(),
               "assigned parser reference");
    }

    /// Has the definition been assigned?
    pub fn is_assigned(&self) -> bool {
        self.slot.get().is_some()
    }
}

impl<T, A> Default for Ref<T, A>
    where T: Symbol,
          A: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A> fmt::Debug for Ref<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ref").field("assigned", &self.slot.get().is_some()).finish()
    }
}
