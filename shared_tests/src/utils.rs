//! Utilities for the suites and for the integration tests that run them.

use std::{convert::TryFrom, env, sync::Once};

use tracing_subscriber::EnvFilter;

use super::*;
use pcomb_core::parser::{between, satisfy, value, value_as};


/// Install a `tracing` subscriber that writes to the test harness's captured
/// output, filtered by `RUST_LOG`.  Only the first call has an effect.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// This allows passing an `input-size=$SIZE` command-line argument to the tests
pub fn get_arg_input_size() -> usize {
    // Enough to blow the stack, were repetition recursive.
    const DEFAULT: usize = 1 << 16;
    env::args().find_map(
        |arg|
        match *arg.splitn(2, '=').collect::<Vec<_>>() {
            ["input-size", size] => size.parse().ok(),
            _ => None
        }
    ).unwrap_or(DEFAULT)
}


/// Any ASCII decimal digit, as its value.
pub fn digit() -> Parser<char, i64> {
    satisfy("digit", |c: &char| c.is_ascii_digit())
        .map(|c| c.to_digit(10).map_or(0, i64::from))
}

/// A non-negative decimal number.
pub fn number() -> Parser<char, i64> {
    digit().many1().map(|ds| ds.into_iter().fold(0_i64, |n, d| n.wrapping_mul(10).wrapping_add(d)))
}

/// Any ASCII letter.
pub fn letter() -> Parser<char, char> {
    satisfy("letter", |c: &char| c.is_ascii_alphabetic())
}

/// A binary operation on numbers, as parsed from an operator symbol.
pub type BinOp = fn(i64, i64) -> i64;

fn op(symbol: char, f: BinOp) -> Parser<char, BinOp> {
    value_as(symbol, f)
}

/// Integer arithmetic, wrapping on overflow, with the usual precedences and
/// associativities:
///
/// ```text
/// expr   := term   (('+' | '-') term)*
/// term   := power  (('*' | '/') power)*
/// power  := factor ('^' power)?
/// factor := number | '(' expr ')' | '-' factor
/// ```
pub fn calculator() -> Parser<char, i64> {
    let expr = Ref::new();
    let factor = Ref::new();
    factor.assign(number()
                  .or(between(value('('), value(')'), expr.parser()))
                  .or(value('-').and_r(factor.parser()).map(i64::wrapping_neg)));
    let power = factor.parser()
                      .chainr1(op('^', |a, b| a.wrapping_pow(u32::try_from(b).unwrap_or(0))));
    let term = power.chainl1(op('*', i64::wrapping_mul)
                             .or(op('/', |a, b| a.checked_div(b).unwrap_or(0))));
    expr.assign(term.chainl1(op('+', i64::wrapping_add).or(op('-', i64::wrapping_sub))));
    expr.parser()
}
