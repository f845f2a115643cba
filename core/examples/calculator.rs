//! Uses only the `pcomb_core` crate, with symbols that are not characters: a
//! hand-written lexer turns the text into tokens, and the grammar is over those
//! tokens.  Failures are therefore reported at token positions.
//!
//! Run with an expression as the argument, e.g. `"2 * (3 + 4)"`.

use std::env;

use pcomb_core::{
    Input, ParseResultExt, Parser, Ref,
    parser::{between, satisfy, value, value_as},
};


#[derive(Copy, Clone, PartialEq, Debug)]
enum Token {
    Num(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Open,
    Close,
}

fn lex(text: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        let token = match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::Open,
            ')' => Token::Close,
            c if c.is_whitespace() => continue,
            c if c.is_ascii_digit() => {
                let mut end = start + 1;
                while let Some(&(i, d)) = chars.peek() {
                    if !(d.is_ascii_digit() || d == '.') {
                        break;
                    }
                    end = i + 1;
                    let _ = chars.next();
                }
                let num = text[start .. end].parse()
                                            .map_err(|e| format!("bad number at {}: {}", start, e))?;
                Token::Num(num)
            }
            c => return Err(format!("unexpected {:?} at {}", c, start)),
        };
        tokens.push(token);
    }
    Ok(tokens)
}

type BinOp = fn(f64, f64) -> f64;

fn grammar() -> Parser<Token, f64> {
    let number = satisfy("number", |t: &Token| matches!(t, Token::Num(_)))
        .map(|t| if let Token::Num(n) = t { n } else { f64::NAN });
    let expr: Ref<Token, f64> = Ref::new();
    let factor: Ref<Token, f64> = Ref::new();
    factor.assign(number
                  .or(between(value(Token::Open), value(Token::Close), expr.parser()))
                  .or(value(Token::Minus).and_r(factor.parser()).map(|n: f64| -n)));
    let term = factor.parser().chainl1(value_as(Token::Star, (|a: f64, b: f64| a * b) as BinOp)
                                       .or(value_as(Token::Slash, (|a: f64, b: f64| a / b) as BinOp)));
    expr.assign(term.chainl1(value_as(Token::Plus, (|a: f64, b: f64| a + b) as BinOp)
                             .or(value_as(Token::Minus, (|a: f64, b: f64| a - b) as BinOp))));
    expr.parser()
}

fn main() {
    let text = env::args().nth(1).unwrap_or_else(|| "2 * (3 + 4) - -1 / 4".to_owned());
    let tokens = match lex(&text) {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    match grammar().parse(Input::new(&tokens)).into_value() {
        Ok(n) => println!("{} = {}", text, n),
        Err(e) => {
            eprintln!("{} (at token {})", e, e.position());
            std::process::exit(1);
        }
    }
}
