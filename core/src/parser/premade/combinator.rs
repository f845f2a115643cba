//! Combinators that sequence, choose between, transform, and look ahead with
//! other parsers.

use std::{borrow::Cow, marker::PhantomData};

use crate::{
    input::Input,
    parser::{Parse, Parser},
    result::{Failure, FailureKind, ParseResult, Success},
    symbol_set::{Predicate, Symbol, SymbolSet},
};

use super::primitive::fail;


struct Map<T, A, F> {
    parser: Parser<T, A>,
    f: F,
}

impl<T, A, B, F> Parse<T, B> for Map<T, A, F>
    where T: Symbol,
          A: 'static,
          F: Fn(A) -> B + Send + Sync,
{
    fn apply<'s>(&self, input: Input<'s, T>) -> ParseResult<'s, T, B> {
        self.parser.apply(input).map(|success| success.map(&self.f))
    }

    fn accepts_empty(&self) -> bool { self.parser.accepts_empty() }

    fn first_set(&self) -> SymbolSet<T> { self.parser.first_set() }
}


struct TryMap<T, A, F, M> {
    parser: Parser<T, A>,
    f: F,
    message: PhantomData<fn() -> M>,
}

impl<T, A, B, F, M> Parse<T, B> for TryMap<T, A, F, M>
    where T: Symbol,
          A: 'static,
          F: Fn(A) -> Result<B, M> + Send + Sync,
          M: Into<Cow<'static, str>>,
{
    fn apply<'s>(&self, input: Input<'s, T>) -> ParseResult<'s, T, B> {
        let Success { value, next } = self.parser.apply(input)?;
        match (self.f)(value) {
            Ok(value) => Ok(Success::new(value, next)),
            Err(message) => Err(Failure::message(input.position(), message)),
        }
    }

    fn accepts_empty(&self) -> bool { self.parser.accepts_empty() }

    fn first_set(&self) -> SymbolSet<T> { self.parser.first_set() }
}


struct And<T, A, B> {
    left: Parser<T, A>,
    right: Parser<T, B>,
}

impl<T, A, B> Parse<T, (A, B)> for And<T, A, B>
    where T: Symbol,
          A: 'static,
          B: 'static,
{
    fn apply<'s>(&self, input: Input<'s, T>) -> ParseResult<'s, T, (A, B)> {
        let Success { value: a, next } = self.left.apply(input)?;
        if next.is_eof() && !self.right.accepts_empty() {
            return Err(Failure::end_of_input(next.position(), self.right.first_set()));
        }
        let Success { value: b, next } = self.right.apply(next)?;
        Ok(Success::new((a, b), next))
    }

    fn accepts_empty(&self) -> bool {
        self.left.accepts_empty() && self.right.accepts_empty()
    }

    fn first_set(&self) -> SymbolSet<T> {
        if self.left.accepts_empty() {
            self.left.first_set().union(self.right.first_set())
        } else {
            self.left.first_set()
        }
    }
}


/// The outcome of the right alternative, after the left one failed.
fn or_else<'s, T, A>(input: Input<'s, T>,
                     left_failure: Failure<T>,
                     right: ParseResult<'s, T, A>)
                     -> ParseResult<'s, T, A>
    where T: Symbol,
{
    match right {
        Ok(success) => {
            input.recovered(left_failure);
            Ok(success)
        }
        Err(right_failure) => Err(left_failure.merge(right_failure)),
    }
}

struct Or<T, A> {
    left: Parser<T, A>,
    right: Parser<T, A>,
}

impl<T, A> Parse<T, A> for Or<T, A>
    where T: Symbol,
          A: 'static,
{
    fn apply<'s>(&self, input: Input<'s, T>) -> ParseResult<'s, T, A> {
        if input.is_eof() {
            // Only alternatives that accept empty input can succeed here.
            let right_accepts = self.right.accepts_empty();
            return if self.left.accepts_empty() {
                match self.left.apply(input) {
                    Err(left_failure) if right_accepts =>
                        or_else(input, left_failure, self.right.apply(input)),
                    result => result,
                }
            } else if right_accepts {
                self.right.apply(input)
            } else {
                Err(Failure::end_of_input(input.position(),
                                          self.left.first_set()
                                              .union(self.right.first_set())))
            };
        }
        match self.left.apply(input) {
            Ok(success) => Ok(success),
            Err(left_failure) => or_else(input, left_failure, self.right.apply(input)),
        }
    }

    fn accepts_empty(&self) -> bool {
        self.left.accepts_empty() || self.right.accepts_empty()
    }

    fn first_set(&self) -> SymbolSet<T> {
        self.left.first_set().union(self.right.first_set())
    }
}


struct FlatMap<T, A, F> {
    parser: Parser<T, A>,
    f: F,
}

impl<T, A, B, F> Parse<T, B> for FlatMap<T, A, F>
    where T: Symbol,
          A: 'static,
          B: 'static,
          F: Fn(A) -> Parser<T, B> + Send + Sync,
{
    fn apply<'s>(&self, input: Input<'s, T>) -> ParseResult<'s, T, B> {
        let Success { value, next } = self.parser.apply(input)?;
        (self.f)(value).apply(next)
    }

    // The continuation is unknown until a value exists, so when the first
    // parser accepts empty input, these must be the most permissive answers.

    fn accepts_empty(&self) -> bool { self.parser.accepts_empty() }

    fn first_set(&self) -> SymbolSet<T> {
        if self.parser.accepts_empty() { SymbolSet::All } else { self.parser.first_set() }
    }
}


struct Label<T, A> {
    parser: Parser<T, A>,
    name: Cow<'static, str>,
}

impl<T, A> Label<T, A>
    where T: Symbol,
          A: 'static,
{
    fn labelled_set(&self) -> SymbolSet<T> {
        let first = self.parser.first_set();
        SymbolSet::Predicate(Predicate::new(self.name.clone(), move |s| first.matches(s)))
    }
}

impl<T, A> Parse<T, A> for Label<T, A>
    where T: Symbol,
          A: 'static,
{
    fn apply<'s>(&self, input: Input<'s, T>) -> ParseResult<'s, T, A> {
        self.parser.apply(input).map_err(|failure| {
            // Only failures to even begin are described by the label.
            if failure.position() != input.position()
                || matches!(failure.kind(), FailureKind::Message(_))
            {
                failure
            } else if failure.is_end_of_input() {
                Failure::end_of_input(failure.position(), self.labelled_set())
            } else {
                Failure::expected(failure.position(), self.labelled_set())
            }
        })
    }

    fn accepts_empty(&self) -> bool { self.parser.accepts_empty() }

    fn first_set(&self) -> SymbolSet<T> { self.labelled_set() }
}


struct Lookahead<T, A> {
    parser: Parser<T, A>,
}

impl<T, A> Parse<T, A> for Lookahead<T, A>
    where T: Symbol,
          A: 'static,
{
    fn apply<'s>(&self, input: Input<'s, T>) -> ParseResult<'s, T, A> {
        self.parser.apply(input).map(|success| Success::new(success.value, input))
    }

    fn accepts_empty(&self) -> bool { true }

    fn first_set(&self) -> SymbolSet<T> { self.parser.first_set() }
}


struct Not<T, A> {
    parser: Parser<T, A>,
}

impl<T, A> Parse<T, ()> for Not<T, A>
    where T: Symbol,
          A: 'static,
{
    fn apply<'s>(&self, input: Input<'s, T>) -> ParseResult<'s, T, ()> {
        // The failures inside are what this expects, so they are not recorded.
        match self.parser.apply(input.untracked()) {
            Ok(_) => Err(Failure::message(input.position(), "unexpected success")),
            Err(_) => Ok(Success::new((), input)),
        }
    }

    fn accepts_empty(&self) -> bool { true }

    fn first_set(&self) -> SymbolSet<T> { SymbolSet::Empty }
}


struct Optional<T, A> {
    parser: Parser<T, A>,
}

impl<T, A> Parse<T, Option<A>> for Optional<T, A>
    where T: Symbol,
          A: 'static,
{
    fn apply<'s>(&self, input: Input<'s, T>) -> ParseResult<'s, T, Option<A>> {
        if input.is_eof() && !self.parser.accepts_empty() {
            return Ok(Success::new(None, input));
        }
        match self.parser.apply(input) {
            Ok(success) => Ok(success.map(Some)),
            Err(failure) => {
                input.recovered(failure);
                Ok(Success::new(None, input))
            }
        }
    }

    fn accepts_empty(&self) -> bool { true }

    fn first_set(&self) -> SymbolSet<T> { self.parser.first_set() }
}


struct Sequence<T, A> {
    parsers: Vec<Parser<T, A>>,
}

impl<T, A> Parse<T, Vec<A>> for Sequence<T, A>
    where T: Symbol,
          A: 'static,
{
    fn apply<'s>(&self, mut input: Input<'s, T>) -> ParseResult<'s, T, Vec<A>> {
        let mut values = Vec::with_capacity(self.parsers.len());
        for parser in &self.parsers {
            if input.is_eof() && !parser.accepts_empty() {
                return Err(Failure::end_of_input(input.position(), parser.first_set()));
            }
            let Success { value, next } = parser.apply(input)?;
            values.push(value);
            input = next;
        }
        Ok(Success::new(values, input))
    }

    fn accepts_empty(&self) -> bool {
        self.parsers.iter().all(Parser::accepts_empty)
    }

    fn first_set(&self) -> SymbolSet<T> {
        let mut set = SymbolSet::Empty;
        for parser in &self.parsers {
            set = set.union(parser.first_set());
            if !parser.accepts_empty() {
                break;
            }
        }
        set
    }
}


impl<T, A> Parser<T, A>
    where T: Symbol,
          A: 'static,
{
    /// Transform the parsed value with `f`.
    pub fn map<B, F>(self, f: F) -> Parser<T, B>
        where B: 'static,
              F: Fn(A) -> B + Send + Sync + 'static,
    {
        Parser::new(Map { parser: self, f })
    }

    /// Replace the parsed value with a clone of `value`.
    pub fn constant<B>(self, value: B) -> Parser<T, B>
        where B: Clone + Send + Sync + 'static,
    {
        self.map(move |_| value.clone())
    }

    /// Transform the parsed value with `f`, which may reject it.  A rejection
    /// is a failure, with the given message, at the position where this parser
    /// began.
    pub fn try_map<B, M, F>(self, f: F) -> Parser<T, B>
        where B: 'static,
              M: Into<Cow<'static, str>> + 'static,
              F: Fn(A) -> Result<B, M> + Send + Sync + 'static,
    {
        Parser::new(TryMap { parser: self, f, message: PhantomData })
    }

    /// This then `next`, giving both values.
    ///
    /// If this consumes all the input and `next` cannot accept empty input,
    /// that fails without applying `next`, with `next`'s first set as what was
    /// expected.
    pub fn and<B>(self, next: Parser<T, B>) -> Parser<T, (A, B)>
        where B: 'static,
    {
        Parser::new(And { left: self, right: next })
    }

    /// This then `next`, keeping only this value.
    pub fn and_l<B>(self, next: Parser<T, B>) -> Self
        where B: 'static,
    {
        self.and(next).map(|(a, _)| a)
    }

    /// This then `next`, keeping only `next`'s value.
    pub fn and_r<B>(self, next: Parser<T, B>) -> Parser<T, B>
        where B: 'static,
    {
        self.and(next).map(|(_, b)| b)
    }

    /// Ordered choice: this, or else `alt` from the same position.
    ///
    /// At the end of input, only an alternative that accepts empty input can
    /// succeed, so one is applied only if it does; when neither does, that
    /// fails without applying either.  When both alternatives are applied and
    /// fail, their failures are [merged](Failure::merge).
    pub fn or(self, alt: Self) -> Self {
        Parser::new(Or { left: self, right: alt })
    }

    /// Context-sensitive sequencing: parse a value with this, then continue
    /// with the parser that `f` makes from it.
    pub fn flat_map<B, F>(self, f: F) -> Parser<T, B>
        where B: 'static,
              F: Fn(A) -> Parser<T, B> + Send + Sync + 'static,
    {
        Parser::new(FlatMap { parser: self, f })
    }

    /// Describe this, in failures to even begin and in the first set, by
    /// `name` instead of by its first set's own description.
    pub fn label(self, name: impl Into<Cow<'static, str>>) -> Self {
        Parser::new(Label { parser: self, name: name.into() })
    }

    /// Same as [`optional`].
    pub fn optional(self) -> Parser<T, Option<A>> {
        optional(self)
    }
}


/// Apply the function that `pf` parses to the value that `pa` parses.
pub fn ap<T, A, B, F>(pf: Parser<T, F>, pa: Parser<T, A>) -> Parser<T, B>
    where T: Symbol,
          A: 'static,
          B: 'static,
          F: FnOnce(A) -> B + 'static,
{
    pf.and(pa).map(|(f, a)| f(a))
}

/// Apply `f` to the value that `pa` parses.
pub fn ap_fn<T, A, B, F>(f: F, pa: Parser<T, A>) -> Parser<T, B>
    where T: Symbol,
          A: 'static,
          B: 'static,
          F: Fn(A) -> B + Send + Sync + 'static,
{
    pa.map(f)
}

/// Apply `f` to the values that `pa` then `pb` parse.
pub fn lift2<T, A, B, C, F>(f: F, pa: Parser<T, A>, pb: Parser<T, B>) -> Parser<T, C>
    where T: Symbol,
          A: 'static,
          B: 'static,
          C: 'static,
          F: Fn(A, B) -> C + Send + Sync + 'static,
{
    pa.and(pb).map(move |(a, b)| f(a, b))
}

/// The first of the alternatives that succeeds, tried in order.  No
/// alternatives is the same as [`fail`].
pub fn choice<T, A>(alternatives: impl IntoIterator<Item = Parser<T, A>>) -> Parser<T, A>
    where T: Symbol,
          A: 'static,
{
    let mut alternatives = alternatives.into_iter();
    match alternatives.next() {
        Some(first) => alternatives.fold(first, Parser::or),
        None => fail(),
    }
}

/// Each of the parsers in order, giving all their values.
pub fn sequence<T, A>(parsers: impl IntoIterator<Item = Parser<T, A>>) -> Parser<T, Vec<A>>
    where T: Symbol,
          A: 'static,
{
    Parser::new(Sequence { parsers: parsers.into_iter().collect() })
}

/// Make a parser from each item with `f`, and apply those in order, giving all
/// their values.
pub fn traverse<T, A, I, F>(items: I, f: F) -> Parser<T, Vec<A>>
    where T: Symbol,
          A: 'static,
          I: IntoIterator,
          F: FnMut(I::Item) -> Parser<T, A>,
{
    sequence(items.into_iter().map(f))
}

/// Apply `parser` without consuming input: on success, its value is given but
/// the position is not advanced.
pub fn lookahead<T, A>(parser: Parser<T, A>) -> Parser<T, A>
    where T: Symbol,
          A: 'static,
{
    Parser::new(Lookahead { parser })
}

/// Succeed, consuming nothing, only where `parser` fails.
pub fn not<T, A>(parser: Parser<T, A>) -> Parser<T, ()>
    where T: Symbol,
          A: 'static,
{
    Parser::new(Not { parser })
}

/// `parser`'s value if it succeeds, otherwise `None` without consuming input.
pub fn optional<T, A>(parser: Parser<T, A>) -> Parser<T, Option<A>>
    where T: Symbol,
          A: 'static,
{
    Parser::new(Optional { parser })
}

/// `open` then `parser` then `close`, giving `parser`'s value.
pub fn between<T, O, C, A>(open: Parser<T, O>, close: Parser<T, C>, parser: Parser<T, A>)
                           -> Parser<T, A>
    where T: Symbol,
          O: 'static,
          C: 'static,
          A: 'static,
{
    open.and_r(parser).and_l(close)
}
