//! Universal-newline line splitting.
//!
//! `\r\n`, `\n` and a lone `\r` each end a line. The text after the last break is always a
//! line of its own, so `"a\nb\n"` gives `["a", "b", ""]`, `"a\nb"` gives `["a", "b"]` and
//! `""` gives `[""]`.

use memchr::memchr2;

/// Splits `text` into lines without their terminators.
pub fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut pos = 0;

    while let Some(found) = memchr2(b'\n', b'\r', &bytes[pos..]) {
        let at = pos + found;
        lines.push(&text[start..at]);
        pos = if bytes[at] == b'\r' && bytes.get(at + 1) == Some(&b'\n') {
            at + 2
        } else {
            at + 1
        };
        start = pos;
    }

    lines.push(&text[start..]);
    lines
}
