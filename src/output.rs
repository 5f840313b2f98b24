//! NDJSON line encoding.
//!
//! Records are serialized through `serde_json` into a reusable line buffer,
//! then written to the sink in one `write_all`. Members are separated by
//! `", "` and keys by `": "`, e.g. `{"ab": "cd", "type": "n"}`.
use std::io::{self, Write};

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};

use crate::record::Record;

/// `serde_json` formatter with a space after `,` and `:`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    #[inline]
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    #[inline]
    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    #[inline]
    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }
}

/// Writes records as NDJSON lines, reusing one buffer across lines.
pub struct LineEncoder {
    buf: Vec<u8>,
}

impl Default for LineEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LineEncoder {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(256),
        }
    }

    /// Serialize `record` plus a trailing newline into the internal buffer and
    /// return the encoded bytes.
    pub fn encode(&mut self, record: &Record) -> serde_json::Result<&[u8]> {
        self.buf.clear();
        let mut ser = Serializer::with_formatter(&mut self.buf, SpacedFormatter);
        record.serialize(&mut ser)?;
        self.buf.push(b'\n');
        Ok(&self.buf)
    }

    /// Encode and write one line. Returns the number of bytes written.
    pub fn write_line<W: Write + ?Sized>(
        &mut self,
        out: &mut W,
        record: &Record,
    ) -> io::Result<usize> {
        let line = self.encode(record).map_err(io::Error::other)?;
        out.write_all(line)?;
        Ok(line.len())
    }
}
