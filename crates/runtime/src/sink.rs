use std::io::{self, Write};

use types::{Error, Word};

/// The shared write/flush implementation behind import slots 1 and 2.
///
/// One sink instance is injected into every box's import table at
/// registration time; boxes never carry their own copy.
pub trait StreamSink {
    /// Write `buf` to `stream`. Returns bytes written, or a negated error
    /// code.
    fn write(&mut self, stream: Word, buf: &[u8]) -> isize;

    /// Flush `stream`. Returns 0, or a negated error code.
    fn flush(&mut self, stream: Word) -> Word;
}

/// Maps stream 1 to stdout and stream 2 to stderr.
pub struct ConsoleSink;

impl StreamSink for ConsoleSink {
    fn write(&mut self, stream: Word, buf: &[u8]) -> isize {
        let res = match stream {
            1 => io::stdout().write_all(buf),
            2 => io::stderr().write_all(buf),
            _ => return Error::BadF.to_word() as isize,
        };
        match res {
            Ok(()) => buf.len() as isize,
            Err(_) => Error::Io.to_word() as isize,
        }
    }

    fn flush(&mut self, stream: Word) -> Word {
        let res = match stream {
            1 => io::stdout().flush(),
            2 => io::stderr().flush(),
            _ => return Error::BadF.to_word(),
        };
        match res {
            Ok(()) => 0,
            Err(_) => Error::Io.to_word(),
        }
    }
}

/// Accepts and discards everything: the "links but does nothing" default
/// for environments with no console.
pub struct NullSink;

impl StreamSink for NullSink {
    fn write(&mut self, _stream: Word, buf: &[u8]) -> isize {
        buf.len() as isize
    }

    fn flush(&mut self, _stream: Word) -> Word {
        0
    }
}

/// Captures writes into a per-stream buffer. Used by tests that assert on
/// box output.
#[derive(Default)]
pub struct BufferSink {
    pub streams: Vec<(Word, Vec<u8>)>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written to `stream`, concatenated.
    pub fn contents(&self, stream: Word) -> Vec<u8> {
        let mut out = Vec::new();
        for (s, chunk) in &self.streams {
            if *s == stream {
                out.extend_from_slice(chunk);
            }
        }
        out
    }
}

impl StreamSink for BufferSink {
    fn write(&mut self, stream: Word, buf: &[u8]) -> isize {
        self.streams.push((stream, buf.to_vec()));
        buf.len() as isize
    }

    fn flush(&mut self, _stream: Word) -> Word {
        0
    }
}
