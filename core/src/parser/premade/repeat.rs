//! Combinators that apply parsers repeatedly.
//!
//! The open-ended ones predict, from the sub-parser's first set, whether
//! another round can begin, and they refuse sub-parsers that accept empty
//! input because those could succeed forever without consuming anything.

use tracing::debug;

use crate::{
    input::Input,
    parser::{Parse, Parser},
    result::{Failure, ParseResult, Success},
    symbol_set::{Symbol, SymbolSet},
};

use super::{combinator::optional, primitive::pure};


fn assert_consuming<T, A>(parser: &Parser<T, A>, combinator: &str)
    where T: Symbol,
          A: 'static,
{
    assert!(!parser.accepts_empty(),
            "{} of a parser that accepts empty input would never terminate", combinator);
}

/// Can `first` begin at `input`?
fn predicts<T>(first: &SymbolSet<T>, input: &Input<'_, T>) -> bool
    where T: Symbol,
{
    input.current().map_or(false, |symbol| first.matches(&symbol))
}

/// Apply `parser` for as long as its first set predicts it can, folding each
/// value into `acc`.
///
/// A failure after the round consumed input is propagated, because the input
/// was committed to that round.  A failure to even begin ends the repetition
/// normally.
fn fold_while<'s, T, A, B, F>(parser: &Parser<T, A>,
                              mut input: Input<'s, T>,
                              mut acc: B,
                              mut fold: F)
                              -> ParseResult<'s, T, B>
    where T: Symbol,
          A: 'static,
          F: FnMut(&mut B, A),
{
    let first = parser.first_set();
    while predicts(&first, &input) {
        match parser.apply(input) {
            Ok(Success { value, next }) => {
                fold(&mut acc, value);
                input = next;
            }
            Err(failure) if failure.position() > input.position() => {
                debug!(start = %input.position(), %failure, "repetition round failed part way");
                return Err(failure);
            }
            Err(failure) => {
                input.recovered(failure);
                break;
            }
        }
    }
    Ok(Success::new(acc, input))
}


struct Many<T, A> {
    parser: Parser<T, A>,
}

impl<T, A> Parse<T, Vec<A>> for Many<T, A>
    where T: Symbol,
          A: 'static,
{
    fn apply<'s>(&self, input: Input<'s, T>) -> ParseResult<'s, T, Vec<A>> {
        assert_consuming(&self.parser, "many");
        fold_while(&self.parser, input, Vec::new(), Vec::push)
    }

    fn accepts_empty(&self) -> bool { true }

    fn first_set(&self) -> SymbolSet<T> { self.parser.first_set() }
}


struct Many1<T, A> {
    parser: Parser<T, A>,
}

impl<T, A> Parse<T, Vec<A>> for Many1<T, A>
    where T: Symbol,
          A: 'static,
{
    fn apply<'s>(&self, input: Input<'s, T>) -> ParseResult<'s, T, Vec<A>> {
        assert_consuming(&self.parser, "many1");
        let Success { value, next } = self.parser.apply(input)?;
        fold_while(&self.parser, next, vec![value], Vec::push)
    }

    fn accepts_empty(&self) -> bool { self.parser.accepts_empty() }

    fn first_set(&self) -> SymbolSet<T> { self.parser.first_set() }
}


struct SkipMany<T, A> {
    parser: Parser<T, A>,
}

impl<T, A> Parse<T, ()> for SkipMany<T, A>
    where T: Symbol,
          A: 'static,
{
    fn apply<'s>(&self, input: Input<'s, T>) -> ParseResult<'s, T, ()> {
        assert_consuming(&self.parser, "skip_many");
        fold_while(&self.parser, input, (), |_, _| ())
    }

    fn accepts_empty(&self) -> bool { true }

    fn first_set(&self) -> SymbolSet<T> { self.parser.first_set() }
}


struct Repeat<T, A> {
    parser: Parser<T, A>,
    min: usize,
    max: usize,
}

impl<T, A> Parse<T, Vec<A>> for Repeat<T, A>
    where T: Symbol,
          A: 'static,
{
    fn apply<'s>(&self, mut input: Input<'s, T>) -> ParseResult<'s, T, Vec<A>> {
        if self.max > self.min {
            assert_consuming(&self.parser, "repeat_between");
        }
        // Not sized by `min`, which input can make arbitrarily large.
        let mut values = Vec::new();
        while values.len() < self.max {
            let required = values.len() < self.min;
            if input.is_eof() && !self.parser.accepts_empty() {
                if required {
                    return Err(Failure::end_of_input(input.position(),
                                                     self.parser.first_set()));
                }
                break;
            }
            match self.parser.apply(input) {
                Ok(Success { value, next }) => {
                    values.push(value);
                    input = next;
                }
                Err(failure) if required => return Err(failure),
                Err(failure) => {
                    input.recovered(failure);
                    break;
                }
            }
        }
        Ok(Success::new(values, input))
    }

    fn accepts_empty(&self) -> bool {
        self.min == 0 || self.parser.accepts_empty()
    }

    fn first_set(&self) -> SymbolSet<T> {
        if self.max == 0 { SymbolSet::Empty } else { self.parser.first_set() }
    }
}


struct ManyTill<T, A, E> {
    parser: Parser<T, A>,
    end: Parser<T, E>,
}

impl<T, A, E> Parse<T, Vec<A>> for ManyTill<T, A, E>
    where T: Symbol,
          A: 'static,
          E: 'static,
{
    fn apply<'s>(&self, mut input: Input<'s, T>) -> ParseResult<'s, T, Vec<A>> {
        assert_consuming(&self.parser, "many_till");
        let mut values = Vec::new();
        loop {
            if input.is_eof() {
                return if self.end.accepts_empty() {
                    self.end.apply(input).map(|success| Success::new(values, success.next))
                } else {
                    Err(Failure::end_of_input(input.position(), self.end.first_set()))
                };
            }
            match self.end.apply(input) {
                Ok(success) => return Ok(Success::new(values, success.next)),
                Err(end_failure) => match self.parser.apply(input) {
                    Ok(Success { value, next }) => {
                        input.recovered(end_failure);
                        values.push(value);
                        input = next;
                    }
                    Err(failure) => return Err(end_failure.merge(failure)),
                },
            }
        }
    }

    fn accepts_empty(&self) -> bool { self.end.accepts_empty() }

    fn first_set(&self) -> SymbolSet<T> {
        self.end.first_set().union(self.parser.first_set())
    }
}


/// Parse `operand (op operand)*`, giving each `op` value with the operand that
/// follows it to `on_pair`, and returning the first operand.
fn chain<'s, T, A, F, P>(operand: &Parser<T, A>,
                         op: &Parser<T, F>,
                         input: Input<'s, T>,
                         mut on_pair: P)
                         -> ParseResult<'s, T, A>
    where T: Symbol,
          A: 'static,
          F: 'static,
          P: FnMut(F, A),
{
    let Success { value: first, next: mut input } = operand.apply(input)?;
    let op_first = op.first_set();
    let op_empty = op.accepts_empty();
    assert!(!op_empty || !operand.accepts_empty(),
            "chain of an operator and an operand that both accept empty input would never \
             terminate");
    loop {
        if !op_empty && !predicts(&op_first, &input) {
            break;
        }
        let round = op.apply(input).and_then(|Success { value: f, next }| {
            operand.apply(next).map(|success| success.map(|a| (f, a)))
        });
        match round {
            Ok(Success { value: (f, a), next }) => {
                on_pair(f, a);
                input = next;
            }
            Err(failure) if failure.position() > input.position() => return Err(failure),
            Err(failure) => {
                input.recovered(failure);
                break;
            }
        }
    }
    Ok(Success::new(first, input))
}


struct ChainL1<T, A, F> {
    operand: Parser<T, A>,
    op: Parser<T, F>,
}

impl<T, A, F> Parse<T, A> for ChainL1<T, A, F>
    where T: Symbol,
          A: 'static,
          F: FnOnce(A, A) -> A + 'static,
{
    fn apply<'s>(&self, input: Input<'s, T>) -> ParseResult<'s, T, A> {
        let mut pairs = Vec::new();
        let Success { value: first, next } =
            chain(&self.operand, &self.op, input, |f, a| pairs.push((f, a)))?;
        let value = pairs.into_iter().fold(first, |acc, (f, a)| f(acc, a));
        Ok(Success::new(value, next))
    }

    fn accepts_empty(&self) -> bool { self.operand.accepts_empty() }

    fn first_set(&self) -> SymbolSet<T> { self.operand.first_set() }
}


struct ChainR1<T, A, F> {
    operand: Parser<T, A>,
    op: Parser<T, F>,
}

impl<T, A, F> Parse<T, A> for ChainR1<T, A, F>
    where T: Symbol,
          A: 'static,
          F: FnOnce(A, A) -> A + 'static,
{
    fn apply<'s>(&self, input: Input<'s, T>) -> ParseResult<'s, T, A> {
        let mut pairs = Vec::new();
        let Success { value: first, next } =
            chain(&self.operand, &self.op, input, |f, a| pairs.push((f, a)))?;
        // x0 f1 x1 f2 x2  =>  f1(x0, f2(x1, x2))
        let value = match pairs.pop() {
            None => first,
            Some((mut f, mut right)) => {
                while let Some((prev_f, left)) = pairs.pop() {
                    right = f(left, right);
                    f = prev_f;
                }
                f(first, right)
            }
        };
        Ok(Success::new(value, next))
    }

    fn accepts_empty(&self) -> bool { self.operand.accepts_empty() }

    fn first_set(&self) -> SymbolSet<T> { self.operand.first_set() }
}


impl<T, A> Parser<T, A>
    where T: Symbol,
          A: 'static,
{
    /// Same as [`many`].
    pub fn many(self) -> Parser<T, Vec<A>> {
        many(self)
    }

    /// Same as [`many1`].
    pub fn many1(self) -> Parser<T, Vec<A>> {
        many1(self)
    }

    /// Same as [`skip_many`].
    pub fn skip_many(self) -> Parser<T, ()> {
        skip_many(self)
    }

    /// Same as [`sep_by`].
    pub fn sep_by<S>(self, sep: Parser<T, S>) -> Parser<T, Vec<A>>
        where S: 'static,
    {
        sep_by(self, sep)
    }

    /// Same as [`sep_by1`].
    pub fn sep_by1<S>(self, sep: Parser<T, S>) -> Parser<T, Vec<A>>
        where S: 'static,
    {
        sep_by1(self, sep)
    }

    /// Zero or more of this, each followed by `sep`.
    pub fn terminated_by<S>(self, sep: Parser<T, S>) -> Parser<T, Vec<A>>
        where S: 'static,
    {
        self.and_l(sep).many()
    }

    /// One or more of this, each followed by `sep`.
    pub fn terminated_by1<S>(self, sep: Parser<T, S>) -> Parser<T, Vec<A>>
        where S: 'static,
    {
        self.and_l(sep).many1()
    }

    /// Exactly `n` of this.  Fails if fewer are available.
    pub fn repeat(self, n: usize) -> Parser<T, Vec<A>> {
        Parser::new(Repeat { parser: self, min: n, max: n })
    }

    /// At least `min` and at most `max` of this, as many as possible.  Once
    /// `min` are parsed, a failure of this ends the repetition normally.
    ///
    /// # Panics
    ///
    /// If `min > max`.  Applying it panics if `min < max` and this accepts
    /// empty input.
    pub fn repeat_between(self, min: usize, max: usize) -> Parser<T, Vec<A>> {
        assert!(min <= max, "repeat_between with min {} > max {}", min, max);
        Parser::new(Repeat { parser: self, min, max })
    }

    /// Zero or more of this until `end` succeeds, giving the values of this.
    /// `end` is tried first at every position.
    ///
    /// Applying it panics if this accepts empty input.
    pub fn many_till<E>(self, end: Parser<T, E>) -> Parser<T, Vec<A>>
        where E: 'static,
    {
        Parser::new(ManyTill { parser: self, end })
    }

    /// One or more of this separated by `op`, whose values are functions that
    /// combine operands left-associatively: `a - b - c` is `(a - b) - c`.
    pub fn chainl1<F>(self, op: Parser<T, F>) -> Self
        where F: FnOnce(A, A) -> A + 'static,
    {
        Parser::new(ChainL1 { operand: self, op })
    }

    /// One or more of this separated by `op`, whose values are functions that
    /// combine operands right-associatively: `a ^ b ^ c` is `a ^ (b ^ c)`.
    pub fn chainr1<F>(self, op: Parser<T, F>) -> Self
        where F: FnOnce(A, A) -> A + 'static,
    {
        Parser::new(ChainR1 { operand: self, op })
    }

    /// Like [`chainl1`](Self::chainl1), but gives `default` when there is not
    /// even one operand.
    pub fn chainl<F>(self, op: Parser<T, F>, default: A) -> Self
        where F: FnOnce(A, A) -> A + 'static,
              A: Clone + Send + Sync,
    {
        self.chainl1(op).or(pure(default))
    }

    /// Like [`chainr1`](Self::chainr1), but gives `default` when there is not
    /// even one operand.
    pub fn chainr<F>(self, op: Parser<T, F>, default: A) -> Self
        where F: FnOnce(A, A) -> A + 'static,
              A: Clone + Send + Sync,
    {
        self.chainr1(op).or(pure(default))
    }
}


/// Zero or more of `parser`, as many as possible.
///
/// Applying it panics if `parser` accepts empty input.
pub fn many<T, A>(parser: Parser<T, A>) -> Parser<T, Vec<A>>
    where T: Symbol,
          A: 'static,
{
    Parser::new(Many { parser })
}

/// One or more of `parser`, as many as possible.
///
/// Applying it panics if `parser` accepts empty input.
pub fn many1<T, A>(parser: Parser<T, A>) -> Parser<T, Vec<A>>
    where T: Symbol,
          A: 'static,
{
    Parser::new(Many1 { parser })
}

/// Zero or more of `parser`, discarding the values.
///
/// Applying it panics if `parser` accepts empty input.
pub fn skip_many<T, A>(parser: Parser<T, A>) -> Parser<T, ()>
    where T: Symbol,
          A: 'static,
{
    Parser::new(SkipMany { parser })
}

/// Zero or more of `parser`, separated by `sep`.
pub fn sep_by<T, A, S>(parser: Parser<T, A>, sep: Parser<T, S>) -> Parser<T, Vec<A>>
    where T: Symbol,
          A: 'static,
          S: 'static,
{
    optional(sep_by1(parser, sep)).map(Option::unwrap_or_default)
}

/// One or more of `parser`, separated by `sep`.
pub fn sep_by1<T, A, S>(parser: Parser<T, A>, sep: Parser<T, S>) -> Parser<T, Vec<A>>
    where T: Symbol,
          A: 'static,
          S: 'static,
{
    let rest = sep.and_r(parser.clone()).many();
    parser.and(rest).map(|(first, rest)| {
        let mut values = Vec::with_capacity(1 + rest.len());
        values.push(first);
        values.extend(rest);
        values
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        parser::{any, pure, satisfy, value, value_as},
        FailureKind, ParseResultExt, Position,
    };

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn digit() -> Parser<char, i64> {
        satisfy("digit", |c: &char| c.is_ascii_digit())
            .map(|c| c.to_digit(10).map_or(0, i64::from))
    }

    type BinOp = fn(i64, i64) -> i64;

    fn sub() -> Parser<char, BinOp> {
        value_as('-', (|a: i64, b: i64| a - b) as BinOp)
    }

    fn pow() -> Parser<char, BinOp> {
        value_as('^', (|a: i64, b: i64| a.pow(b as u32)) as BinOp)
    }

    #[test]
    fn many_stops_on_prediction() {
        let text = chars("123a");
        let s = digit().many().apply(Input::new(&text)).unwrap();
        assert_eq!(s.value, vec![1, 2, 3]);
        assert_eq!(s.position(), Position(3));

        let text = chars("");
        assert_eq!(digit().many().parse(Input::new(&text)).into_value(), Ok(vec![]));
        assert!(digit().many().accepts_empty());
        assert!(digit().many().first_set().matches(&'0'));
    }

    #[test]
    fn many_propagates_committed_failure() {
        // Each round is "a" then a digit.
        let round = value('a').and_r(digit());
        let text = chars("a1a2ax");
        let f = round.clone().many().apply(Input::new(&text)).unwrap_err();
        assert_eq!(f.position(), Position(5));
        assert_eq!(f.to_string(), "at position 5: expected digit");
        // Without commitment, the repetition just ends.
        let text = chars("a1a2b");
        let s = round.many().apply(Input::new(&text)).unwrap();
        assert_eq!((s.value, s.next.position()), (vec![1, 2], Position(4)));
    }

    #[test]
    #[should_panic(expected = "accepts empty input")]
    fn many_refuses_empty() {
        let text = chars("x");
        let _ = value('a').optional().many().apply(Input::new(&text));
    }

    #[test]
    fn many1_requires_one() {
        let text = chars("x");
        let f = digit().many1().apply(Input::new(&text)).unwrap_err();
        assert_eq!(f.position(), Position(0));
        let text = chars("42");
        assert_eq!(digit().many1().parse(Input::new(&text)).into_value(), Ok(vec![4, 2]));
        assert!(!digit().many1().accepts_empty());
    }

    #[test]
    fn skip_many_discards() {
        let text = chars("   x");
        let p = value(' ').skip_many().and_r(value('x'));
        assert_eq!(p.parse(Input::new(&text)).into_value(), Ok('x'));
    }

    #[test]
    fn separated() {
        let comma = value(',');
        let text = chars("1,2,3");
        assert_eq!(digit().sep_by(comma.clone()).parse(Input::new(&text)).into_value(),
                   Ok(vec![1, 2, 3]));
        let text = chars("");
        assert_eq!(digit().sep_by(comma.clone()).parse(Input::new(&text)).into_value(),
                   Ok(vec![]));
        assert!(digit().sep_by1(comma.clone()).parse(Input::new(&text)).is_err());
        // A trailing separator commits to another element.
        let text = chars("1,2,");
        let f = digit().sep_by1(comma).parse(Input::new(&text)).unwrap_err();
        assert!(f.is_end_of_input());
        assert_eq!(f.position(), Position(4));

        let text = chars("1;2;");
        assert_eq!(digit().terminated_by(value(';')).parse(Input::new(&text)).into_value(),
                   Ok(vec![1, 2]));
        let text = chars("");
        assert!(digit().terminated_by1(value(';')).parse(Input::new(&text)).is_err());
    }

    #[test]
    fn repeat_exactly() {
        let text = chars("abc");
        let s = any().repeat(2).apply(Input::new(&text)).unwrap();
        assert_eq!((s.value, s.next.position()), (vec!['a', 'b'], Position(2)));
        let f = any().repeat(4).apply(Input::new(&text)).unwrap_err();
        assert!(f.is_end_of_input());
        assert_eq!(f.position(), Position(3));
        let p = any::<char>().repeat(0);
        assert!(p.accepts_empty());
        assert!(p.first_set().is_empty());
        assert!(!any::<char>().repeat(1).accepts_empty());
    }

    #[test]
    fn repeat_between_bounds() {
        let text = chars("12345");
        let p = digit().repeat_between(2, 4);
        let s = p.apply(Input::new(&text)).unwrap();
        assert_eq!((s.value, s.next.position()), (vec![1, 2, 3, 4], Position(4)));
        let text = chars("12x");
        let s = p.apply(Input::new(&text)).unwrap();
        assert_eq!((s.value, s.next.position()), (vec![1, 2], Position(2)));
        let text = chars("1x");
        let f = p.apply(Input::new(&text)).unwrap_err();
        assert_eq!(f.kind(), &FailureKind::Expected(digit().first_set()));
        let text = chars("1");
        assert!(p.apply(Input::new(&text)).unwrap_err().is_end_of_input());
        assert!(digit().repeat_between(0, 1).accepts_empty());
    }

    #[test]
    #[should_panic(expected = "min 3 > max 2")]
    fn repeat_between_checks_bounds() {
        let _ = digit().repeat_between(3, 2);
    }

    #[test]
    #[should_panic(expected = "repeat_between of a parser that accepts empty input")]
    fn repeat_between_refuses_empty() {
        let text = chars("x");
        let _ = pure::<char, _>(1).repeat_between(0, usize::MAX).apply(Input::new(&text));
    }

    #[test]
    fn repeat_exactly_accepting_empty() {
        let text = chars("");
        let s = pure::<char, _>(1).repeat(3).apply(Input::new(&text)).unwrap();
        assert_eq!(s.value, vec![1, 1, 1]);
    }

    #[test]
    fn repeat_count_beyond_input() {
        // The count comes from input, so it must not size anything up front.
        let text = chars("ab");
        let f = any::<char>().repeat(usize::MAX / 2).apply(Input::new(&text)).unwrap_err();
        assert!(f.is_end_of_input());
        assert_eq!(f.position(), Position(2));
    }

    #[test]
    fn many_till_end() {
        let p = any().many_till(value('*').and(value('/')));
        let text = chars("ab*c*/");
        let s = p.apply(Input::new(&text)).unwrap();
        assert_eq!((s.value, s.next.position()), (vec!['a', 'b', '*', 'c'], Position(6)));
        let text = chars("ab");
        let f = p.apply(Input::new(&text)).unwrap_err();
        assert!(f.is_end_of_input());
        assert_eq!(f.position(), Position(2));
        assert!(f.expected_set().map_or(false, |s| s.matches(&'*')));

        let p = digit().many_till(value('.'));
        let text = chars("12x");
        let f = p.apply(Input::new(&text)).unwrap_err();
        assert_eq!(f.position(), Position(2));
        assert_eq!(f.to_string(), "at position 2: expected '.' or digit");
        assert!(!p.accepts_empty());
        let fs = p.first_set();
        assert!(fs.matches(&'.') && fs.matches(&'7'));
    }

    #[test]
    fn many_till_end_accepting_empty() {
        let p = any().many_till(crate::parser::eof());
        let text = chars("xyz");
        assert_eq!(p.parse(Input::new(&text)).into_value(), Ok(vec!['x', 'y', 'z']));
        assert!(p.accepts_empty());
    }

    #[test]
    fn chains() {
        let text = chars("9-3-2");
        assert_eq!(digit().chainl1(sub()).parse(Input::new(&text)).into_value(), Ok(4));
        assert_eq!(digit().chainr1(sub()).parse(Input::new(&text)).into_value(), Ok(8));

        let text = chars("2^3^2");
        assert_eq!(digit().chainr1(pow()).parse(Input::new(&text)).into_value(), Ok(512));
        assert_eq!(digit().chainl1(pow()).parse(Input::new(&text)).into_value(), Ok(64));

        let text = chars("7");
        assert_eq!(digit().chainl1(sub()).parse(Input::new(&text)).into_value(), Ok(7));

        // An operator commits to a following operand.
        let text = chars("7-");
        let f = digit().chainl1(sub()).parse(Input::new(&text)).unwrap_err();
        assert!(f.is_end_of_input());
        assert_eq!(f.position(), Position(2));
    }

    #[test]
    #[should_panic(expected = "chain of an operator and an operand that both accept empty")]
    fn chain_refuses_empty_operator_and_operand() {
        let text = chars("1");
        let plus = pure::<char, _>((|a: i64, b: i64| a + b) as BinOp);
        let _ = pure(1).chainl1(plus).apply(Input::new(&text));
    }

    #[test]
    fn chain_with_empty_operator() {
        // Juxtaposition as multiplication.
        let times = pure::<char, _>((|a: i64, b: i64| a * b) as BinOp);
        let text = chars("234");
        assert_eq!(digit().chainl1(times).parse(Input::new(&text)).into_value(), Ok(24));
    }

    #[test]
    fn chains_with_default() {
        let text = chars("");
        assert_eq!(digit().chainl(sub(), -1).parse(Input::new(&text)).into_value(), Ok(-1));
        assert_eq!(digit().chainr(sub(), -1).parse(Input::new(&text)).into_value(), Ok(-1));
        let text = chars("5-1");
        assert_eq!(digit().chainl(sub(), -1).parse(Input::new(&text)).into_value(), Ok(4));
    }

    #[test]
    fn long_repetition() {
        let text: Vec<char> = std::iter::repeat('a').take(100_000).collect();
        let s = value('a').many().parse(Input::new(&text)).unwrap();
        assert_eq!(s.value.len(), 100_000);
        let text: Vec<char> = "1-".repeat(50_000).chars().chain(Some('1')).collect();
        assert_eq!(digit().chainl1(sub()).parse(Input::new(&text)).into_value(),
                   Ok(1 - 50_000));
    }
}
