//! The smallest parsers, which the combinators compose.

use std::borrow::Cow;

use crate::{
    input::Input,
    parser::{Parse, Parser},
    result::{Failure, ParseResult, Success},
    symbol_set::{Predicate, Symbol, SymbolSet},
};


struct Pure<A> {
    value: A,
}

impl<T, A> Parse<T, A> for Pure<A>
    where T: Symbol,
          A: Clone + Send + Sync,
{
    fn apply<'s>(&self, input: Input<'s, T>) -> ParseResult<'s, T, A> {
        Ok(Success::new(self.value.clone(), input))
    }

    fn accepts_empty(&self) -> bool { true }

    fn first_set(&self) -> SymbolSet<T> { SymbolSet::Empty }
}

/// Always succeeds with a clone of `value`, consuming nothing.
pub fn pure<T, A>(value: A) -> Parser<T, A>
    where T: Symbol,
          A: Clone + Send + Sync + 'static,
{
    Parser::new(Pure { value })
}


struct Fail {
    message: Option<Cow<'static, str>>,
}

impl<T, A> Parse<T, A> for Fail
    where T: Symbol,
{
    fn apply<'s>(&self, input: Input<'s, T>) -> ParseResult<'s, T, A> {
        Err(match &self.message {
            Some(message) => Failure::message(input.position(), message.clone()),
            None => Failure::expected(input.position(), SymbolSet::Empty),
        })
    }

    // Never succeeds, so vacuously does not accept empty input, which also
    // keeps `or` from preferring this at the end of input.
    fn accepts_empty(&self) -> bool { false }

    fn first_set(&self) -> SymbolSet<T> { SymbolSet::Empty }
}

/// Always fails, expecting nothing, consuming nothing.  This is the identity
/// of [`or`](Parser::or).
pub fn fail<T, A>() -> Parser<T, A>
    where T: Symbol,
          A: 'static,
{
    Parser::new(Fail { message: None })
}

/// Always fails with the given message, consuming nothing.
pub fn fail_with<T, A>(message: impl Into<Cow<'static, str>>) -> Parser<T, A>
    where T: Symbol,
          A: 'static,
{
    Parser::new(Fail { message: Some(message.into()) })
}


struct Eof;

impl<T> Parse<T, ()> for Eof
    where T: Symbol,
{
    fn apply<'s>(&self, input: Input<'s, T>) -> ParseResult<'s, T, ()> {
        if input.is_eof() {
            Ok(Success::new((), input))
        } else {
            Err(Failure::message(input.position(), "expected end of input"))
        }
    }

    fn accepts_empty(&self) -> bool { true }

    fn first_set(&self) -> SymbolSet<T> { SymbolSet::Empty }
}

/// Succeeds, consuming nothing, only at the end of input.
pub fn eof<T>() -> Parser<T, ()>
    where T: Symbol,
{
    Parser::new(Eof)
}


struct Satisfy<T> {
    set: SymbolSet<T>,
}

impl<T> Parse<T, T> for Satisfy<T>
    where T: Symbol,
{
    fn apply<'s>(&self, input: Input<'s, T>) -> ParseResult<'s, T, T> {
        match input.current() {
            Err(_) => Err(Failure::end_of_input(input.position(), self.set.clone())),
            Ok(symbol) if self.set.matches(&symbol) => {
                let next = input.advance()
                                .map_err(|_| Failure::end_of_input(input.position(),
                                                                   self.set.clone()))?;
                Ok(Success::new(symbol, next))
            }
            Ok(_) => Err(Failure::expected(input.position(), self.set.clone())),
        }
    }

    fn accepts_empty(&self) -> bool { false }

    fn first_set(&self) -> SymbolSet<T> { self.set.clone() }
}

/// Consumes any one symbol, failing only at the end of input.
pub fn any<T>() -> Parser<T, T>
    where T: Symbol,
{
    Parser::new(Satisfy { set: SymbolSet::All })
}

/// Consumes one symbol that passes `test`.  `name` describes such symbols in
/// failures.
pub fn satisfy<T, N, F>(name: N, test: F) -> Parser<T, T>
    where T: Symbol,
          N: Into<Cow<'static, str>>,
          F: Fn(&T) -> bool + Send + Sync + 'static,
{
    Parser::new(Satisfy { set: SymbolSet::Predicate(Predicate::new(name, test)) })
}

/// Consumes one symbol that equals `symbol`.
pub fn value<T>(symbol: T) -> Parser<T, T>
    where T: Symbol,
{
    Parser::new(Satisfy { set: SymbolSet::Value(symbol) })
}

/// Consumes one symbol that equals `symbol`, and gives `result` for it.
pub fn value_as<T, A>(symbol: T, result: A) -> Parser<T, A>
    where T: Symbol,
          A: Clone + Send + Sync + 'static,
{
    value(symbol).constant(result)
}
