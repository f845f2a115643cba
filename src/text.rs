//! Parsers of characters and of text, composed from the core crate's
//! primitives.
//!
//! Character classes are named in failures the way a reader would name them,
//! e.g. `expected letter or digit`, and literal strings are matched all or
//! nothing, so a failure of [`string`] is always at the position where the
//! literal would have begun.

use crate::{
    Input, Parse, Parser, Predicate, SymbolSet,
    parser::{any, fail, satisfy, value},
    result::{Failure, ParseResult, Success},
};


/// The characters of `text`, to back an [`Input`].
pub fn chars(text: &str) -> Vec<char> {
    text.chars().collect()
}


/// Any one character.
pub fn any_char() -> Parser<char, char> {
    any().label("any character")
}

/// The character `c`.
pub fn chr(c: char) -> Parser<char, char> {
    value(c)
}

/// Any alphabetic character.
pub fn alpha() -> Parser<char, char> {
    satisfy("letter", |c: &char| c.is_alphabetic())
}

/// Any ASCII decimal digit.
pub fn digit() -> Parser<char, char> {
    satisfy("digit", char::is_ascii_digit)
}

/// Any alphabetic or numeric character.
pub fn alpha_num() -> Parser<char, char> {
    satisfy("letter or digit", |c: &char| c.is_alphanumeric())
}

/// Any whitespace character.
pub fn ws() -> Parser<char, char> {
    satisfy("whitespace", |c: &char| c.is_whitespace())
}

/// Zero or more whitespace characters, discarded.
pub fn skip_ws() -> Parser<char, ()> {
    ws().skip_many()
}


struct Literal {
    text: Vec<char>,
    set: SymbolSet<char>,
}

impl Literal {
    fn failure(&self, start: Input<'_, char>) -> Failure<char> {
        if start.is_eof() {
            Failure::end_of_input(start.position(), self.set.clone())
        } else {
            Failure::expected(start.position(), self.set.clone())
        }
    }
}

impl Parse<char, String> for Literal {
    fn apply<'s>(&self, input: Input<'s, char>) -> ParseResult<'s, char, String> {
        let mut next = input;
        for &want in &self.text {
            match next.current() {
                Ok(c) if c == want => next = next.advance().map_err(|_| self.failure(input))?,
                _ => return Err(self.failure(input)),
            }
        }
        Ok(Success::new(self.text.iter().collect(), next))
    }

    fn accepts_empty(&self) -> bool { false }

    fn first_set(&self) -> SymbolSet<char> { self.set.clone() }
}

/// The exact text `s`, matched atomically: if any character differs, this
/// fails where `s` would have begun, having consumed nothing.  Failures name
/// the whole literal.
///
/// There is no empty literal, so `string("")` always fails.
pub fn string(s: &str) -> Parser<char, String> {
    let text = chars(s);
    match text.first() {
        None => fail(),
        Some(&first) => {
            let set = SymbolSet::Predicate(Predicate::new(format!("{:?}", s),
                                                          move |c: &char| *c == first));
            Parser::new(Literal { text, set })
        }
    }
}


fn digits() -> Parser<char, String> {
    digit().many1().map(|ds| ds.into_iter().collect())
}

fn sign() -> Parser<char, Option<char>> {
    chr('+').or(chr('-')).optional()
}

/// An unsigned decimal integer.  Fails, where it began, if it is too large
/// for a `u64`.
pub fn uint() -> Parser<char, u64> {
    digits().try_map(|ds| ds.parse::<u64>().map_err(|_| "integer out of range"))
}

/// A decimal integer with an optional `+` or `-` sign.  Fails, where it
/// began, if it does not fit in an `i64`.
pub fn int() -> Parser<char, i64> {
    sign().and(digits())
          .try_map(|(sign, ds)| format!("{}{}", sign.unwrap_or('+'), ds)
                                    .parse::<i64>()
                                    .map_err(|_| "integer out of range"))
}

/// The digits of a fraction, i.e. those after a decimal point, as the value of
/// that fraction: `25` gives `0.25`.
pub fn floating() -> Parser<char, f64> {
    digits().try_map(|ds| format!("0.{}", ds).parse::<f64>().map_err(|_| "invalid fraction"))
}

/// A decimal number with an optional sign and an optional fractional part,
/// e.g. `-12.5`.
pub fn dble() -> Parser<char, f64> {
    sign().and(digits())
          .and(chr('.').and_r(digits()).optional())
          .try_map(|((sign, whole), fraction)| {
              format!("{}{}.{}", sign.unwrap_or('+'), whole,
                      fraction.as_deref().unwrap_or("0"))
                  .parse::<f64>()
                  .map_err(|_| "invalid number")
          })
}
