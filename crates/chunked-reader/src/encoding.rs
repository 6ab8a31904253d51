//! The fixed list of user-selectable encodings and the decoders behind them.
//!
//! UTF-8 and the explicit-order UTF-16 variants go through `encoding_rs`. ISO-8859-1,
//! US-ASCII and UTF-32 are fixed-width and decoded by hand. "UTF-16" and "UTF-32" without
//! an explicit order read a byte order mark if there is one and default to big-endian.
//! Malformed input never fails: it decodes to U+FFFD.

use std::fmt;
use std::str::FromStr;

use encoding_rs::CoderResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TextEncoding {
    Latin1,
    UsAscii,
    Utf16,
    Utf16Be,
    Utf16Le,
    Utf32,
    Utf32Be,
    Utf32Le,
    #[default]
    Utf8,
}

impl TextEncoding {
    /// Every selectable encoding, in the order the picker lists them.
    pub const ALL: [TextEncoding; 9] = [
        Self::Latin1,
        Self::UsAscii,
        Self::Utf16,
        Self::Utf16Be,
        Self::Utf16Le,
        Self::Utf32,
        Self::Utf32Be,
        Self::Utf32Le,
        Self::Utf8,
    ];

    /// Canonical name, also used for serialization.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Latin1 => "ISO-8859-1",
            Self::UsAscii => "US-ASCII",
            Self::Utf16 => "UTF-16",
            Self::Utf16Be => "UTF-16BE",
            Self::Utf16Le => "UTF-16LE",
            Self::Utf32 => "UTF-32",
            Self::Utf32Be => "UTF-32BE",
            Self::Utf32Le => "UTF-32LE",
            Self::Utf8 => "UTF-8",
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for names outside the fixed list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEncoding(pub String);

impl fmt::Display for UnknownEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unsupported encoding: {}", self.0)
    }
}

impl std::error::Error for UnknownEncoding {}

impl FromStr for TextEncoding {
    type Err = UnknownEncoding;

    /// Accepts canonical names case-insensitively, with or without `-`/`_` separators,
    /// plus the common aliases "Latin-1" and "ASCII".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_uppercase())
            .collect();
        match key.as_str() {
            "ISO88591" | "LATIN1" => Ok(Self::Latin1),
            "USASCII" | "ASCII" => Ok(Self::UsAscii),
            "UTF16" => Ok(Self::Utf16),
            "UTF16BE" => Ok(Self::Utf16Be),
            "UTF16LE" => Ok(Self::Utf16Le),
            "UTF32" => Ok(Self::Utf32),
            "UTF32BE" => Ok(Self::Utf32Be),
            "UTF32LE" => Ok(Self::Utf32Le),
            "UTF8" => Ok(Self::Utf8),
            _ => Err(UnknownEncoding(s.to_string())),
        }
    }
}

impl TryFrom<String> for TextEncoding {
    type Error = UnknownEncoding;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TextEncoding> for String {
    fn from(value: TextEncoding) -> Self {
        value.name().to_string()
    }
}

/// Decodes a complete byte buffer.
pub fn decode(bytes: &[u8], encoding: TextEncoding) -> String {
    let mut out = String::with_capacity(bytes.len());
    StreamDecoder::new(encoding).feed(bytes, true, &mut out);
    out
}

/// Incremental decoder: feeding a buffer in any split and then calling `finish` produces
/// the same text as `decode` on the whole buffer.
pub struct StreamDecoder {
    state: DecoderState,
}

enum DecoderState {
    Whatwg(encoding_rs::Decoder),
    Latin1,
    Ascii,
    Utf32 { big_endian: bool, carry: Vec<u8> },
    /// Holding the first bytes until the byte order mark can be read.
    Sniffing { unit: BomUnit, head: Vec<u8> },
}

#[derive(Debug, Clone, Copy)]
enum BomUnit {
    Utf16,
    Utf32,
}

impl BomUnit {
    fn bom_len(self) -> usize {
        match self {
            Self::Utf16 => 2,
            Self::Utf32 => 4,
        }
    }

    /// Picks the byte order from the head and returns the decoder plus the BOM length to drop.
    fn resolve(self, head: &[u8]) -> (DecoderState, usize) {
        match self {
            Self::Utf16 => match head {
                [0xFE, 0xFF, ..] => (whatwg(encoding_rs::UTF_16BE), 2),
                [0xFF, 0xFE, ..] => (whatwg(encoding_rs::UTF_16LE), 2),
                _ => (whatwg(encoding_rs::UTF_16BE), 0),
            },
            Self::Utf32 => match head {
                [0x00, 0x00, 0xFE, 0xFF, ..] => (utf32(true), 4),
                [0xFF, 0xFE, 0x00, 0x00, ..] => (utf32(false), 4),
                _ => (utf32(true), 0),
            },
        }
    }
}

fn whatwg(encoding: &'static encoding_rs::Encoding) -> DecoderState {
    DecoderState::Whatwg(encoding.new_decoder_without_bom_handling())
}

fn utf32(big_endian: bool) -> DecoderState {
    DecoderState::Utf32 {
        big_endian,
        carry: Vec::new(),
    }
}

impl StreamDecoder {
    pub fn new(encoding: TextEncoding) -> Self {
        let state = match encoding {
            TextEncoding::Latin1 => DecoderState::Latin1,
            TextEncoding::UsAscii => DecoderState::Ascii,
            TextEncoding::Utf8 => whatwg(encoding_rs::UTF_8),
            TextEncoding::Utf16Be => whatwg(encoding_rs::UTF_16BE),
            TextEncoding::Utf16Le => whatwg(encoding_rs::UTF_16LE),
            TextEncoding::Utf32Be => utf32(true),
            TextEncoding::Utf32Le => utf32(false),
            TextEncoding::Utf16 => DecoderState::Sniffing {
                unit: BomUnit::Utf16,
                head: Vec::new(),
            },
            TextEncoding::Utf32 => DecoderState::Sniffing {
                unit: BomUnit::Utf32,
                head: Vec::new(),
            },
        };
        Self { state }
    }

    /// Decodes the next piece of the stream, appending to `out`. Bytes of an incomplete
    /// character are kept for the next call.
    pub fn decode(&mut self, bytes: &[u8], out: &mut String) {
        self.feed(bytes, false, out);
    }

    /// Flushes whatever is still pending at end of stream.
    pub fn finish(mut self, out: &mut String) {
        self.feed(&[], true, out);
    }

    fn feed(&mut self, bytes: &[u8], last: bool, out: &mut String) {
        let (unit, head) = match &mut self.state {
            DecoderState::Whatwg(decoder) => return decode_whatwg(decoder, bytes, last, out),
            DecoderState::Latin1 => {
                out.extend(bytes.iter().map(|&b| char::from(b)));
                return;
            }
            DecoderState::Ascii => {
                out.extend(
                    bytes
                        .iter()
                        .map(|&b| if b.is_ascii() { char::from(b) } else { char::REPLACEMENT_CHARACTER }),
                );
                return;
            }
            DecoderState::Utf32 { big_endian, carry } => {
                decode_utf32(*big_endian, carry, bytes, last, out);
                return;
            }
            DecoderState::Sniffing { unit, head } => {
                head.extend_from_slice(bytes);
                if head.len() < unit.bom_len() && !last {
                    return;
                }
                (*unit, std::mem::take(head))
            }
        };

        let (resolved, bom_len) = unit.resolve(&head);
        self.state = resolved;
        self.feed(&head[bom_len.min(head.len())..], last, out);
    }
}

fn decode_whatwg(decoder: &mut encoding_rs::Decoder, bytes: &[u8], last: bool, out: &mut String) {
    let mut remaining = bytes;
    loop {
        let needed = decoder
            .max_utf8_buffer_length(remaining.len())
            .unwrap_or(remaining.len() * 3 + 4);
        out.reserve(needed);
        let (result, read, _had_replacements) = decoder.decode_to_string(remaining, out, last);
        remaining = &remaining[read..];
        match result {
            CoderResult::InputEmpty => break,
            CoderResult::OutputFull => continue,
        }
    }
}

fn decode_utf32(big_endian: bool, carry: &mut Vec<u8>, bytes: &[u8], last: bool, out: &mut String) {
    carry.extend_from_slice(bytes);
    let whole = carry.len() / 4 * 4;
    for unit in carry[..whole].chunks_exact(4) {
        let raw = [unit[0], unit[1], unit[2], unit[3]];
        let value = if big_endian {
            u32::from_be_bytes(raw)
        } else {
            u32::from_le_bytes(raw)
        };
        out.push(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER));
    }
    carry.drain(..whole);
    if last && !carry.is_empty() {
        out.push(char::REPLACEMENT_CHARACTER);
        carry.clear();
    }
}
