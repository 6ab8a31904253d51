//! A window of decoded characters over a byte reader.
//!
//! Supports the read-mark-reset cycle the stride scan needs: `peek` decodes ahead without
//! consuming, `skip` consumes. Only the characters between the read position and the
//! furthest peek are held in memory.

use std::io::{self, Read};

use crate::encoding::{StreamDecoder, TextEncoding};

/// Bytes pulled from the underlying reader per refill (64 KB).
const READ_BUFFER_SIZE: usize = 64 * 1024;

pub struct CharStream<R: Read> {
    inner: R,
    /// `None` once the reader hit EOF and the decoder was flushed.
    decoder: Option<StreamDecoder>,
    window: Vec<char>,
    pos: usize,
    read_buf: Vec<u8>,
    decoded: String,
}

impl<R: Read> CharStream<R> {
    pub fn new(inner: R, encoding: TextEncoding) -> Self {
        Self {
            inner,
            decoder: Some(StreamDecoder::new(encoding)),
            window: Vec::new(),
            pos: 0,
            read_buf: vec![0u8; READ_BUFFER_SIZE],
            decoded: String::new(),
        }
    }

    /// Whether at least one more character can be read.
    pub fn ready(&mut self) -> io::Result<bool> {
        self.fill(1)?;
        Ok(self.available() > 0)
    }

    /// Returns up to `count` characters from the read position without consuming them.
    /// Fewer are returned only at end of stream.
    pub fn peek(&mut self, count: usize) -> io::Result<&[char]> {
        self.fill(count)?;
        let end = self.pos + count.min(self.available());
        Ok(&self.window[self.pos..end])
    }

    /// Consumes up to `count` characters and returns how many were consumed.
    pub fn skip(&mut self, count: usize) -> io::Result<usize> {
        self.fill(count)?;
        let skipped = count.min(self.available());
        self.pos += skipped;
        self.compact();
        Ok(skipped)
    }

    fn available(&self) -> usize {
        self.window.len() - self.pos
    }

    fn fill(&mut self, wanted: usize) -> io::Result<()> {
        while self.available() < wanted {
            if self.decoder.is_none() {
                break;
            }

            let bytes_read = match self.inner.read(&mut self.read_buf) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            self.decoded.clear();
            if bytes_read == 0 {
                if let Some(decoder) = self.decoder.take() {
                    decoder.finish(&mut self.decoded);
                }
            } else if let Some(decoder) = self.decoder.as_mut() {
                decoder.decode(&self.read_buf[..bytes_read], &mut self.decoded);
            }
            self.window.extend(self.decoded.chars());
        }
        Ok(())
    }

    /// Drops consumed characters once they make up at least half the window.
    fn compact(&mut self) {
        if self.pos > 0 && self.pos * 2 >= self.window.len() {
            self.window.drain(..self.pos);
            self.pos = 0;
        }
    }
}
