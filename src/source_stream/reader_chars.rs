//! Characters decoded, as UTF-8, from any `io::Read`.

use std::{collections::VecDeque, io::{self, Read}, str};

use tracing::debug;

use crate::{StreamSource, error::ReadError};


const CHUNK_SIZE: usize = 8 * 1024;


/// An `Iterator` of the `char`s decoded from the bytes of a reader.
///
/// Bytes are read in chunks as the characters are needed, and a multi-byte
/// character split across chunks is decoded once its remaining bytes arrive.
///
/// An `Iterator` cannot yield errors in the middle of its `char`s, so if the
/// reader fails or the bytes are not valid UTF-8, the iteration simply ends
/// there and the error is kept, to be retrieved with [`error`](Self::error)
/// or [`into_error`](Self::into_error) after parsing.  The characters before
/// the error are all yielded.
#[derive(Debug)]
pub struct ReaderChars<R> {
    reader: R,
    undecoded: Vec<u8>,
    decoded: VecDeque<char>,
    offset: usize,
    state: State,
}

#[derive(Debug)]
enum State {
    Reading,
    Ended,
    Failed(ReadError),
}

impl<R> ReaderChars<R>
    where R: Read,
{
    /// Make a new one that reads from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            undecoded: Vec::new(),
            decoded: VecDeque::new(),
            offset: 0,
            state: State::Reading,
        }
    }

    /// The error that ended the iteration early, if any.
    pub fn error(&self) -> Option<&ReadError> {
        match &self.state {
            State::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// Take the error that ended the iteration early, if any.
    pub fn into_error(self) -> Option<ReadError> {
        match self.state {
            State::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// How many bytes have been decoded into characters.
    pub fn bytes_decoded(&self) -> usize {
        self.offset
    }

    fn fail(&mut self, error: ReadError) {
        debug!(%error, offset = self.offset, "reader source ended with an error");
        self.state = State::Failed(error);
    }

    fn read_chunk(&mut self) {
        let mut chunk = [0_u8; CHUNK_SIZE];
        match self.reader.read(&mut chunk) {
            Ok(0) if self.undecoded.is_empty() => self.state = State::Ended,
            // The input ends inside a multi-byte character.
            Ok(0) => self.fail(ReadError::InvalidUtf8 { offset: self.offset }),
            Ok(len) => {
                self.undecoded.extend_from_slice(&chunk[.. len]);
                self.decode();
            }
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            Err(error) => self.fail(error.into()),
        }
    }

    fn decode(&mut self) {
        let (valid, invalid) = match str::from_utf8(&self.undecoded) {
            Ok(text) => (text.len(), false),
            // `error_len` is `None` when the bytes are only incomplete.
            Err(error) => (error.valid_up_to(), error.error_len().is_some()),
        };
        let text = str::from_utf8(&self.undecoded[.. valid]).unwrap_or_default();
        self.decoded.extend(text.chars());
        drop(self.undecoded.drain(.. valid));
        self.offset += valid;
        if invalid {
            self.fail(ReadError::InvalidUtf8 { offset: self.offset });
        }
    }
}

impl<R> Iterator for ReaderChars<R>
    where R: Read,
{
    type Item = char;

    fn next(&mut self) -> Option<char> {
        loop {
            if let Some(c) = self.decoded.pop_front() {
                return Some(c);
            }
            if !matches!(self.state, State::Reading) {
                return None;
            }
            self.read_chunk();
        }
    }
}


/// A source of the characters of a reader, that can back [`Input`]s.
///
/// [`Input`]: crate::Input
pub type ReaderSource<R> = StreamSource<ReaderChars<R>>;

/// Make a [`ReaderSource`] that reads from `reader`.
pub fn reader_source<R>(reader: R) -> ReaderSource<R>
    where R: Read,
{
    StreamSource::new(ReaderChars::new(reader))
}
