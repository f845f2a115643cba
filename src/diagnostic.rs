//! Reporting [`ParseError`]s against the text that was parsed, for showing to
//! people.  A [`Diagnostic`] is a [`miette::Diagnostic`] whose label spans the
//! offending character, so any `miette` report handler can show it, and
//! [`render`] does that with plain text:
//!
//! ```text
//!   x 2:8: expected digit
//!    ,-[input:2:8]
//!  1 | [1, 2]
//!  2 | [1, 2, x]
//!    :        |
//!    :        `-- unexpected
//!    `----
//! ```

use std::fmt;

use miette::{GraphicalReportHandler, GraphicalTheme, LabeledSpan, NamedSource, SourceCode,
             SourceSpan};
use thiserror::Error;

use crate::{ParseError, Position};


/// A line and column in some text, both counted from 1.  Columns count
/// characters, not bytes.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Location {
    /// Which line.
    pub line: usize,
    /// Which character of the line.
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl Location {
    /// Where the character at `position` of `text` is.  A position at or past
    /// the end of `text` is just after its last character.
    pub fn of(position: Position, text: &str) -> Self {
        find(position, text).0
    }
}


/// The location of `position` in `text`, and the bytes of the character there,
/// which are none at the end.
fn find(position: Position, text: &str) -> (Location, SourceSpan) {
    let mut location = Location { line: 1, column: 1 };
    for (index, (byte, c)) in text.char_indices().enumerate() {
        if index == position.index() {
            return (location, SourceSpan::from((byte, c.len_utf8())));
        }
        if c == '\n' {
            location.line += 1;
            location.column = 1;
        } else {
            location.column += 1;
        }
    }
    (location, SourceSpan::from((text.len(), 0)))
}

fn describe(error: &ParseError) -> String {
    match error {
        ParseError::Expected { expected, .. } => format!("expected {}", expected),
        ParseError::EndOfInput { expected, .. }
            => format!("unexpected end of input, expected {}", expected),
        ParseError::Message { message, .. } => message.clone(),
    }
}


/// A [`ParseError`] located in the text that was parsed.  Its `Display` is a
/// one-line summary, `line:column: what was expected`, and its
/// [`miette::Diagnostic`] implementation gives the text with the failure's
/// character labeled.
#[derive(Debug, Error)]
#[error("{location}: {summary}")]
pub struct Diagnostic {
    error: ParseError,
    location: Location,
    summary: String,
    source_code: NamedSource<String>,
    span: SourceSpan,
}

impl Diagnostic {
    /// Locate `error` in `text`, which must be what was parsed.
    pub fn new(error: &ParseError, text: &str) -> Self {
        let (location, span) = find(error.position(), text);
        Self {
            error: error.clone(),
            location,
            summary: describe(error),
            source_code: NamedSource::new("input", text.to_owned()),
            span,
        }
    }

    /// Where the error is.
    pub fn location(&self) -> Location {
        self.location
    }

    /// The error.
    pub fn error(&self) -> &ParseError {
        &self.error
    }

    /// The report of this as plain text, without colors or Unicode drawing.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let handler = GraphicalReportHandler::new_themed(GraphicalTheme::none());
        // Writing to a `String` cannot fail.
        let _ = handler.render_report(&mut out, self);
        out
    }

    fn label(&self) -> &'static str {
        match self.error {
            ParseError::Expected { .. } => "unexpected",
            ParseError::EndOfInput { .. } => "input ends here",
            ParseError::Message { .. } => "here",
        }
    }
}

impl miette::Diagnostic for Diagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("pcomb::parse"))
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.source_code)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = LabeledSpan::new_with_span(Some(self.label().to_owned()), self.span);
        Some(Box::new(std::iter::once(label)))
    }
}

/// Render `error` against `text`, which must be what was parsed, as shown in
/// the [module documentation](self).
pub fn render(error: &ParseError, text: &str) -> String {
    Diagnostic::new(error, text).render()
}


#[cfg(test)]
mod tests {
    use miette::Diagnostic as _;

    use super::*;

    fn expected(position: usize) -> ParseError {
        ParseError::Expected { position: Position(position), expected: "digit".into() }
    }

    fn span(d: &Diagnostic) -> (usize, usize) {
        let labels: Vec<LabeledSpan> = d.labels().into_iter().flatten().collect();
        assert_eq!(labels.len(), 1);
        (labels[0].offset(), labels[0].len())
    }

    #[test]
    fn locations() {
        let text = "ab\ncλd\n\nx";
        let at = |i| Location::of(Position(i), text);
        assert_eq!(at(0), Location { line: 1, column: 1 });
        assert_eq!(at(2), Location { line: 1, column: 3 });
        assert_eq!(at(3), Location { line: 2, column: 1 });
        assert_eq!(at(5), Location { line: 2, column: 3 });
        assert_eq!(at(7), Location { line: 3, column: 1 });
        assert_eq!(at(8), Location { line: 4, column: 1 });
        assert_eq!(at(9), Location { line: 4, column: 2 });
        assert_eq!(at(99), Location { line: 4, column: 2 });
        assert_eq!(at(5).to_string(), "2:3");
        assert_eq!(Location::of(Position(0), ""), Location { line: 1, column: 1 });
    }

    #[test]
    fn summaries() {
        let text = "[1, 2]\n[1, 2, x]\n";
        let error = expected(14);
        let d = Diagnostic::new(&error, text);
        assert_eq!(d.to_string(), "2:8: expected digit");
        assert_eq!(d.location(), Location { line: 2, column: 8 });
        assert_eq!(d.error(), &error);

        let eoi = ParseError::EndOfInput { position: Position(3), expected: "']'".into() };
        assert_eq!(Diagnostic::new(&eoi, "[1,").to_string(),
                   "1:4: unexpected end of input, expected ']'");

        let message = ParseError::Message { position: Position(0), message: "nope".into() };
        assert_eq!(Diagnostic::new(&message, "λ").to_string(), "1:1: nope");
    }

    #[test]
    fn labeled_spans() {
        let error = expected(14);
        assert_eq!(span(&Diagnostic::new(&error, "[1, 2]\n[1, 2, x]\n")), (14, 1));
        // Bytes, not characters.
        let error = expected(1);
        assert_eq!(span(&Diagnostic::new(&error, "λx")), (2, 1));
        let error = expected(0);
        assert_eq!(span(&Diagnostic::new(&error, "λx")), (0, 2));
        // Nothing to label at the end.
        let eoi = ParseError::EndOfInput { position: Position(3), expected: "']'".into() };
        let d = Diagnostic::new(&eoi, "[1,");
        assert_eq!(span(&d), (3, 0));
        assert!(d.source_code().is_some());
        assert_eq!(d.code().map(|c| c.to_string()), Some("pcomb::parse".to_owned()));
    }

    #[test]
    fn rendering() {
        let rendered = render(&expected(14), "[1, 2]\n[1, 2, x]\n");
        assert!(rendered.contains("2:8: expected digit"), "{}", rendered);
        assert!(rendered.contains("[1, 2, x]"), "{}", rendered);
        assert!(rendered.contains("unexpected"), "{}", rendered);
        assert!(rendered.contains("pcomb::parse"), "{}", rendered);
    }

    #[test]
    fn tabs_and_crlf() {
        let text = "a\r\n\tb x";
        let error = expected(6);
        let d = Diagnostic::new(&error, text);
        assert_eq!(d.location(), Location { line: 2, column: 4 });
        assert_eq!(d.to_string(), "2:4: expected digit");
        assert_eq!(span(&d), (6, 1));
        assert!(d.render().contains("b x"));
    }
}
