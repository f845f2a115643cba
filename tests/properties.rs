//! Property-based tests that the ready-made parsing functions agree, whatever
//! the input and however it is backed.

use proptest::prelude::*;

use pcomb::{
    common::{inmem::parse_str, stream::{parse_chars, parse_reader}},
    diagnostic::Location,
    text::{alpha, chr, dble, int, skip_ws, string},
    Error, ParseError, Parser, Position,
};


fn grammars() -> Vec<Parser<char, String>> {
    let word = alpha().many1().map(|cs| cs.into_iter().collect::<String>());
    vec![
        int().sep_by(chr(',').and_l(skip_ws())).map(|ns| format!("{:?}", ns)),
        dble().map(|n| n.to_string()),
        skip_ws().and_r(word.and_l(skip_ws()).many()).map(|ws| ws.join(" ")),
        string("λ").or(string("ab")).many().map(|ss| ss.concat()),
    ]
}

/// Parse from a reader, with a read failure as `None`.
fn read<A: 'static>(parser: &Parser<char, A>, text: &str) -> Result<A, Option<ParseError>> {
    parse_reader(parser, text.as_bytes()).map_err(|error| match error {
        Error::Parse(error) => Some(error),
        _ => None,
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

    /// Strings, character iterators, and readers of UTF-8 give identical
    /// results.
    #[test]
    fn backings_agree(input in "[a-cλ0-9,. +-]{0,40}") {
        for grammar in grammars() {
            let in_memory = parse_str(&grammar, &input);
            prop_assert_eq!(&parse_chars(&grammar, input.chars()), &in_memory);
            prop_assert_eq!(read(&grammar, &input), in_memory.map_err(Some));
        }
    }

    /// Any text, including what is not valid for the grammars, decodes the
    /// same from a reader.
    #[test]
    fn readers_decode_any_text(input in "\\PC{0,60}") {
        for grammar in grammars() {
            prop_assert_eq!(read(&grammar, &input), parse_str(&grammar, &input).map_err(Some));
        }
    }

    /// A failure's location is on a line of the text, and never past the end.
    #[test]
    fn failures_locate_in_text(input in "[a-c0-9,\n ]{0,40}") {
        let lines = input.split('\n').count();
        for grammar in grammars() {
            if let Err(error) = parse_str(&grammar, &input) {
                prop_assert!(error.position() <= Position(input.chars().count()));
                let Location { line, column } = Location::of(error.position(), &input);
                prop_assert!((1 ..= lines).contains(&line));
                prop_assert!(column >= 1);
            }
        }
    }
}
