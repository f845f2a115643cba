//! Parsing inputs that are read incrementally, from iterators or readers.

use std::io::Read;

use crate::{
    ParseError, ParseResultExt, Parser, Source, StreamSource,
    error::Error,
    source_stream::reader_source,
};


/// Parse all the characters yielded by `chars` with `parser`.  Characters are
/// only pulled as far as the parse gets.
pub fn parse_chars<I, A>(parser: &Parser<char, A>, chars: I) -> Result<A, ParseError>
    where I: IntoIterator<Item = char>,
          A: 'static,
{
    let source = StreamSource::new(chars);
    parser.parse(source.input()).into_value()
}

/// Parse all the UTF-8 text of `reader` with `parser`.
///
/// If the reader failed, or gave bytes that are not UTF-8, that is the error
/// returned, whatever the parse gave, because the parse only saw the text up
/// to where that happened.
///
/// ```
/// use pcomb::{common::stream::parse_reader, text::{chr, uint}};
///
/// let list = uint().sep_by(chr(','));
/// let result = parse_reader(&list, "1,2,3".as_bytes());
/// assert_eq!(result.ok(), Some(vec![1, 2, 3]));
/// ```
pub fn parse_reader<R, A>(parser: &Parser<char, A>, reader: R) -> Result<A, Error>
    where R: Read,
          A: 'static,
{
    let source = reader_source(reader);
    let result = parser.parse(source.input()).into_value();
    match source.into_inner().into_error() {
        Some(error) => Err(error.into()),
        None => result.map_err(Error::from),
    }
}
