//! Property-based tests of the laws that parsers and combinators obey,
//! whatever the input.

use proptest::prelude::*;

use pcomb_core::{
    parser::{fail, lookahead, not, pure, value},
    Input, ParseError, ParseResultExt, Parser, Position, Source, StreamSource,
};

use pcomb_shared_tests::utils::{calculator, digit, letter};


fn chars(text: &str) -> Vec<char> {
    text.chars().collect()
}

fn parse_slice<A: 'static>(parser: &Parser<char, A>, text: &str) -> Result<A, ParseError> {
    parser.parse(chars(text).input()).into_value()
}

fn parse_stream<A: 'static>(parser: &Parser<char, A>, text: &str) -> Result<A, ParseError> {
    let source = StreamSource::new(text.chars());
    parser.parse(source.input()).into_value()
}

fn grammars() -> Vec<Parser<char, String>> {
    vec![
        calculator().map(|n| n.to_string()),
        letter().many1().map(|cs| cs.into_iter().collect()),
        digit().sep_by(value(',')).map(|ds| format!("{:?}", ds)),
        letter().or(digit().map(|_| '#')).many().map(|cs| cs.into_iter().collect()),
    ]
}

/// Small arithmetic expressions with their values.
fn expression() -> impl Strategy<Value = (String, i64)> {
    let leaf = (0_i64 .. 100).prop_map(|n| (n.to_string(), n));
    leaf.prop_recursive(4, 16, 2, |inner| {
        (inner.clone(), prop::sample::select(vec!['+', '-', '*']), inner)
            .prop_map(|((l, lv), op, (r, rv))| {
                let v = match op {
                    '+' => lv.wrapping_add(rv),
                    '-' => lv.wrapping_sub(rv),
                    _ => lv.wrapping_mul(rv),
                };
                (format!("({}{}{})", l, op, r), v)
            })
    })
}

fn proptest_config() -> ProptestConfig {
    let default = ProptestConfig::default();
    ProptestConfig {
        cases: default.cases.max(512),
        ..default
    }
}

proptest! {
    #![proptest_config(proptest_config())]

    /// In-memory and streamed input give identical results.
    #[test]
    fn backings_agree(input in "[a-z0-9,+*()-]{0,40}") {
        for grammar in grammars() {
            prop_assert_eq!(parse_slice(&grammar, &input), parse_stream(&grammar, &input));
        }
    }

    /// Failures never point past the end of the input.
    #[test]
    fn failures_within_input(input in "\\PC{0,60}") {
        let len = input.chars().count();
        for grammar in grammars() {
            if let Err(error) = parse_slice(&grammar, &input) {
                prop_assert!(error.position() <= Position(len));
            }
        }
    }

    /// `many` of a non-empty parser always succeeds, consuming exactly the
    /// longest prefix that the parser matches.
    #[test]
    fn many_consumes_longest_prefix(input in "[0-9]{0,20}[a-z]{0,5}") {
        let text = chars(&input);
        let prefix = input.chars().take_while(char::is_ascii_digit).count();
        let success = digit().many().apply(Input::new(&text));
        prop_assert!(success.is_ok());
        let success = success.unwrap();
        prop_assert_eq!(success.value.len(), prefix);
        prop_assert_eq!(success.next.position(), Position(prefix));
    }

    /// A streamed source is never read further than one symbol past where
    /// the parse got to.
    #[test]
    fn stream_reads_lazily(input in "[0-9]{0,20}[a-z]{0,20}") {
        let source = StreamSource::new(input.chars());
        let success = digit().many().apply(source.input());
        prop_assert!(success.is_ok());
        let reached = success.unwrap().position().index();
        prop_assert!(source.pulled() <= reached + 1);
    }

    /// `lookahead` gives the same value as its parser but never advances.
    #[test]
    fn lookahead_never_advances(input in "[a-c0-2]{0,10}") {
        let text = chars(&input);
        let p = letter().many1();
        let direct = p.apply(Input::new(&text)).map(|s| s.value).ok();
        let ahead = lookahead(p).apply(Input::new(&text));
        prop_assert_eq!(ahead.as_ref().map(|s| s.next.position()).ok()
                            .unwrap_or(Position(0)),
                        Position(0));
        prop_assert_eq!(ahead.map(|s| s.value).ok(), direct);
    }

    /// `not` succeeds, without advancing, exactly when its parser fails, so
    /// following it with that parser never succeeds.
    #[test]
    fn not_is_exclusive(input in "[a-c0-2]{0,10}") {
        let text = chars(&input);
        let p = letter().many1();
        let negated = not(p.clone()).apply(Input::new(&text));
        match p.apply(Input::new(&text)) {
            Ok(_) => prop_assert!(negated.is_err()),
            Err(_) => prop_assert_eq!(negated.map(|s| s.next.position()).ok(),
                                      Some(Position(0))),
        }
        prop_assert!(not(p.clone()).and_r(p).apply(Input::new(&text)).is_err());
    }

    /// Mapping over `pure` is `pure` of the mapped value, consuming nothing
    /// whatever the input.
    #[test]
    fn pure_map_law(x in any::<i32>(), input in "[a-z0-9]{0,8}") {
        let text = chars(&input);
        let success = pure::<char, _>(x).map(|v| v.wrapping_mul(3)).apply(Input::new(&text));
        prop_assert!(success.is_ok());
        let success = success.unwrap();
        prop_assert_eq!(success.next.position(), Position(0));
        prop_assert_eq!(success.value, x.wrapping_mul(3));
    }

    /// `fail` is the identity of `or`, on both sides.
    #[test]
    fn fail_is_or_identity(input in "[a-z0-9]{0,8}") {
        let p = letter().many1();
        let expected = parse_slice(&p, &input);
        prop_assert_eq!(parse_slice(&p.clone().or(fail()), &input), expected.clone());
        prop_assert_eq!(parse_slice(&fail().or(p), &input), expected);
    }

    /// Arithmetic is evaluated with the expected structure.
    #[test]
    fn calculator_evaluates((text, result) in expression()) {
        prop_assert_eq!(parse_slice(&calculator(), &text), Ok(result));
    }
}
