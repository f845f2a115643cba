//! Suites of tests applied across multiple crates and input backings


use std::convert::TryFrom;

use pcomb_core::parser::*;

use super::*;
use crate::utils::{calculator, digit, get_arg_input_size, init_tracing, letter, number};


/// Basic test suite that checks the primitives and the combinators, one
/// behavior at a time, on small inputs.
pub fn test_suite0<S, M>(make: M)
    where M: Fn(&'static str) -> S,
          S: Source<char>,
{
    init_tracing();

    macro_rules! test {
        ($parser:expr, $input:expr => $expected:expr)
            =>
        {assert_eq!(parse_text(&make, &$parser, $input), $expected,
                    "parsing {:?}", $input)};

        ($parser:expr, $input:expr =>> $expected:expr)
            =>
        {assert_eq!(apply_text(&make, &$parser, $input), $expected,
                    "applying to {:?}", $input)};
    }

    // Single symbols
    let a = value('a');
    test!(a, "a" => Ok('a'));
    test!(a, "b" => Err(expected(0, "'a'")));
    test!(a, "" => Err(end_of_input(0, "'a'")));
    test!(a, "aa" => Err(message(1, "expected end of input")));
    test!(a, "aa" =>> Ok(('a', 1)));
    test!(any(), "z" => Ok('z'));
    test!(any(), "" => Err(end_of_input(0, "any symbol")));
    test!(letter(), "Q" => Ok('Q'));
    test!(letter(), "1" => Err(expected(0, "letter")));
    test!(value_as('t', true), "t" => Ok(true));

    // Consuming nothing
    test!(pure::<char, _>(7), "" => Ok(7));
    test!(pure::<char, _>(7), "x" => Err(message(0, "expected end of input")));
    test!(pure::<char, _>(7), "x" =>> Ok((7, 0)));
    test!(eof(), "" => Ok(()));
    test!(eof(), "x" =>> Err(message(0, "expected end of input")));
    test!(fail::<char, ()>(), "" => Err(end_of_input(0, "nothing")));
    test!(fail::<char, ()>(), "x" => Err(expected(0, "nothing")));
    test!(fail_with::<char, ()>("nope"), "x" => Err(message(0, "nope")));

    // Sequencing
    let ab = value('a').and(value('b'));
    test!(ab, "ab" => Ok(('a', 'b')));
    test!(ab, "a" => Err(end_of_input(1, "'b'")));
    test!(ab, "ac" => Err(expected(1, "'b'")));
    test!(ab, "" => Err(end_of_input(0, "'a'")));
    test!(value('a').and_l(value('b')), "ab" => Ok('a'));
    test!(value('a').and_r(value('b')), "ab" => Ok('b'));
    let bracketed = between(value('['), value(']'), letter());
    test!(bracketed, "[x]" => Ok('x'));
    test!(bracketed, "[x" => Err(end_of_input(2, "']'")));
    test!(bracketed, "[1]" => Err(expected(1, "letter")));
    test!(sequence(vec![letter(), value('-'), letter()]), "a-b" => Ok(vec!['a', '-', 'b']));
    test!(traverse("let".chars(), value), "let" => Ok(vec!['l', 'e', 't']));
    test!(traverse("let".chars(), value), "lex" => Err(expected(2, "'t'")));
    test!(lift2(|x: i64, y: i64| x * 10 + y, digit(), digit()), "42" => Ok(42));

    // Choice
    let abc = value('a').or(value('b')).or(value('c'));
    test!(abc, "c" => Ok('c'));
    test!(abc, "d" => Err(expected(0, "'a', 'b' or 'c'")));
    test!(abc, "" => Err(end_of_input(0, "'a', 'b' or 'c'")));
    let alt = value('a').and_r(value('b')).or(value('a').and_r(value('c')));
    test!(alt, "ac" => Ok('c'));
    test!(alt, "ad" => Err(expected(1, "'b' or 'c'")));
    test!(choice(vec![value('x'), value('y')]), "y" => Ok('y'));
    test!(value('a').optional(), "" => Ok(None));
    test!(value('a').optional(), "a" => Ok(Some('a')));
    test!(value('a').optional().and(value('b')), "b" => Ok((None, 'b')));
    test!(value('a').label("the letter a"), "b" => Err(expected(0, "the letter a")));
    // A failure that an alternative recovered from is reported when it got
    // further than the failure that ended the parse.
    let maybe_ab = value('a').and(value('b')).optional().and(value('c'));
    test!(maybe_ab, "ax" => Err(expected(1, "'b'")));
    test!(maybe_ab, "ax" =>> Err(expected(0, "'c'")));
    test!(maybe_ab, "abc" => Ok((Some(('a', 'b')), 'c')));
    test!(maybe_ab, "c" => Ok((None, 'c')));

    // Repetition
    test!(digit().many(), "" => Ok(vec![]));
    test!(digit().many(), "123" => Ok(vec![1, 2, 3]));
    test!(digit().many(), "12x" => Err(message(2, "expected end of input")));
    test!(digit().many(), "12x" =>> Ok((vec![1, 2], 2)));
    test!(digit().many(), "x" =>> Ok((vec![], 0)));
    test!(digit().many1(), "" => Err(end_of_input(0, "digit")));
    test!(digit().many1(), "x" => Err(expected(0, "digit")));
    test!(digit().sep_by(value(',')), "1,2,3" => Ok(vec![1, 2, 3]));
    test!(digit().sep_by(value(',')), "" => Ok(vec![]));
    test!(digit().sep_by1(value(',')), "1,2," => Err(end_of_input(4, "digit")));
    test!(digit().sep_by1(value(',')), "1,x" => Err(expected(2, "digit")));
    test!(digit().repeat(3), "123" => Ok(vec![1, 2, 3]));
    test!(digit().repeat(3), "12" => Err(end_of_input(2, "digit")));
    test!(digit().repeat_between(1, 2), "12" => Ok(vec![1, 2]));
    test!(digit().repeat_between(1, 2), "123" => Err(message(2, "expected end of input")));
    test!(value(' ').skip_many().and_r(letter()), "   q" => Ok('q'));
    test!(any().many_till(value('.')), "ab." => Ok(vec!['a', 'b']));
    test!(any().many_till(value('.')), "ab" => Err(end_of_input(2, "'.'")));
    test!(letter().terminated_by(value(';')), "a;b;" => Ok(vec!['a', 'b']));
    test!(letter().terminated_by1(value(';')), "a;b" => Err(end_of_input(3, "';'")));
    test!(number(), "1234" => Ok(1234));

    // Context sensitivity
    let counted = digit().flat_map(|n| letter().repeat(usize::try_from(n).unwrap_or(0)));
    test!(counted, "2ab" => Ok(vec!['a', 'b']));
    test!(counted, "3ab" => Err(end_of_input(3, "letter")));

    // Lookahead
    test!(lookahead(letter()), "ab" =>> Ok(('a', 0)));
    test!(lookahead(letter()).and(letter()), "a" => Ok(('a', 'a')));
    test!(lookahead(letter()), "1" => Err(expected(0, "letter")));
    test!(not(digit()).and_r(any()), "x" => Ok('x'));
    test!(not(digit()).and_r(any()), "1" => Err(message(0, "unexpected success")));
}


/// Test suite that checks failure reporting and the algebraic properties that
/// combinators must have, using a recursive grammar.
pub fn test_suite1<S, M>(make: M)
    where M: Fn(&'static str) -> S,
          S: Source<char>,
{
    init_tracing();

    macro_rules! test {
        ($parser:expr, $input:expr => $expected:expr)
            =>
        {assert_eq!(parse_text(&make, &$parser, $input), $expected,
                    "parsing {:?}", $input)};
    }

    macro_rules! same {
        ($left:expr, $right:expr, [$($input:expr),*])
            =>
        {$(assert_eq!(parse_text(&make, &$left, $input),
                      parse_text(&make, &$right, $input),
                      "parsing {:?}", $input);)*};
    }

    let calc = calculator();
    test!(calc, "7" => Ok(7));
    test!(calc, "1-2+3" => Ok(2));
    test!(calc, "2*(3+4)" => Ok(14));
    test!(calc, "2^3^2" => Ok(512));
    test!(calc, "-(2-5)*2" => Ok(6));
    test!(calc, "100/7/2" => Ok(7));
    test!(calc, "((((((1))))))" => Ok(1));
    test!(calc, "" => Err(end_of_input(0, "digit, '(' or '-'")));
    test!(calc, "1+" => Err(end_of_input(2, "digit, '(' or '-'")));
    test!(calc, "2*x" => Err(expected(2, "digit, '(' or '-'")));
    test!(calc, "(1" => Err(end_of_input(2, "')'")));
    test!(calc, "1)" => Err(message(1, "expected end of input")));

    // Metadata is a function of the grammar's shape only.
    assert_eq!(calculator().first_set(), calculator().first_set());
    assert_eq!(calc.first_set(), calc.first_set());
    assert!(!calc.accepts_empty());

    let p = value('a');
    // `fail` is the identity of `or`.
    same!(p.clone().or(fail()), p, ["a", "b", ""]);
    same!(fail().or(p.clone()), p, ["a", "b", ""]);
    // `pure` is the identity of sequencing.
    same!(pure::<char, _>(()).and_r(p.clone()), p, ["a", "b", ""]);
    same!(p.clone().and_l(pure::<char, _>(())), p, ["a", "b", "aa"]);
    // Mapping the identity changes nothing.
    same!(calc.clone().map(|n| n), calc, ["1+2", "1+", "", "x"]);
    // `or` is associative.
    let (x, y, z) = (value('x'), value('y'), value('z'));
    let (left, right) = (x.clone().or(y.clone()).or(z.clone()), x.or(y.or(z)));
    same!(left, right, ["x", "y", "z", "w", ""]);
    // `ap` of a pure function is `map`.
    same!(ap(pure(|n: i64| n + 1), number()), number().map(|n| n + 1), ["12", "", "a"]);
}


/// Test suite that checks long inputs, which must not exhaust the stack since
/// repetition is iterative, and deeply nested recursive input.
pub fn test_suite2<S, M>(make: M)
    where M: Fn(&'static str) -> S,
          S: Source<char>,
{
    init_tracing();

    fn leak(s: String) -> &'static str {
        Box::leak(s.into_boxed_str())
    }

    let size = get_arg_input_size();

    let digits = leak("7".repeat(size));
    let sum = parse_text(&make, &digit().many(), digits).map(|ds| ds.iter().sum::<i64>());
    assert_eq!(sum, Ok(7 * i64::try_from(size).unwrap_or(i64::MAX)));

    let ones = leak(format!("{}1", "1+".repeat(size / 2)));
    assert_eq!(parse_text(&make, &calculator(), ones),
               Ok(i64::try_from(size / 2 + 1).unwrap_or(i64::MAX)));

    let words = leak("ab ".repeat(size / 3));
    let word = letter().many1().and_l(value(' '));
    assert_eq!(parse_text(&make, &word.many(), words).map(|ws| ws.len()), Ok(size / 3));

    let depth = 100;
    let nested = leak(format!("{}1{}", "(".repeat(depth), ")".repeat(depth)));
    assert_eq!(parse_text(&make, &calculator(), nested), Ok(1));
    let unbalanced = leak(format!("{}1{}", "(".repeat(depth), ")".repeat(depth - 1)));
    assert_eq!(parse_text(&make, &calculator(), unbalanced),
               Err(end_of_input(2 * depth, "')'")));
}
