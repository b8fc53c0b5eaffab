//! Encoding detection by ordered trial decoding.
//!
//! Candidates are tried from most specific to most lenient and the first
//! clean decode wins, even when a later candidate would also succeed.
//! When all of them fail the bytes are decoded as UTF-8 with replacement.

use std::fmt;
use tracing::debug;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const UTF16_LE_BOM: &[u8] = b"\xFF\xFE";
const UTF16_BE_BOM: &[u8] = b"\xFE\xFF";

/// An encoding a transcript may be decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// UTF-8 preceded by a byte-order mark, which is stripped.
    Utf8Sig,
    /// Plain UTF-8.
    Utf8,
    /// UTF-16 with the byte order taken from a leading byte-order mark,
    /// which is stripped. Little endian when there is no mark.
    Utf16,
    /// UTF-16, little endian.
    Utf16Le,
    /// UTF-16, big endian.
    Utf16Be,
    /// Windows code page 1252.
    Windows1252,
    /// UTF-8 with invalid sequences replaced by U+FFFD.
    Utf8Lossy,
}

impl Encoding {
    /// Strict candidates in trial order.
    pub const CANDIDATES: [Encoding; 6] = [
        Encoding::Utf8Sig,
        Encoding::Utf8,
        Encoding::Utf16,
        Encoding::Utf16Le,
        Encoding::Utf16Be,
        Encoding::Windows1252,
    ];

    /// Returns the conventional label for this encoding.
    pub fn label(self) -> &'static str {
        match self {
            Encoding::Utf8Sig => "utf-8-sig",
            Encoding::Utf8 => "utf-8",
            Encoding::Utf16 => "utf-16",
            Encoding::Utf16Le => "utf-16-le",
            Encoding::Utf16Be => "utf-16-be",
            Encoding::Windows1252 => "windows-1252",
            Encoding::Utf8Lossy => "utf-8 (lossy)",
        }
    }

    /// Decodes `bytes`, returning `None` if they are not valid in this
    /// encoding. [`Encoding::Utf8Lossy`] never fails.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Encoding::Utf8Sig => bytes
                .strip_prefix(UTF8_BOM)
                .and_then(|rest| std::str::from_utf8(rest).ok())
                .map(str::to_owned),
            Encoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            Encoding::Utf16 => {
                if let Some(rest) = bytes.strip_prefix(UTF16_BE_BOM) {
                    decode_utf16(rest, u16::from_be_bytes)
                } else {
                    let rest = bytes.strip_prefix(UTF16_LE_BOM).unwrap_or(bytes);
                    decode_utf16(rest, u16::from_le_bytes)
                }
            }
            Encoding::Utf16Le => decode_utf16(bytes, u16::from_le_bytes),
            Encoding::Utf16Be => decode_utf16(bytes, u16::from_be_bytes),
            Encoding::Windows1252 => bytes.iter().map(|&b| windows_1252_char(b)).collect(),
            Encoding::Utf8Lossy => Some(String::from_utf8_lossy(bytes).into_owned()),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Decodes `bytes` with the first candidate encoding that accepts them.
///
/// A UTF-8 byte-order mark is only reported as [`Encoding::Utf8Sig`] when
/// present; otherwise valid UTF-8 is reported as [`Encoding::Utf8`]. The
/// decoded text is the same either way.
pub fn decode_text(bytes: &[u8]) -> (String, Encoding) {
    for encoding in Encoding::CANDIDATES {
        if let Some(text) = encoding.decode(bytes) {
            debug!(encoding = %encoding, len = bytes.len(), "decoded transcript");
            return (text, encoding);
        }
    }
    debug!(len = bytes.len(), "no clean decode; falling back to lossy utf-8");
    (
        String::from_utf8_lossy(bytes).into_owned(),
        Encoding::Utf8Lossy,
    )
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units).collect::<Result<String, _>>().ok()
}

/// Maps one Windows-1252 byte. The five unassigned bytes yield `None`.
fn windows_1252_char(byte: u8) -> Option<char> {
    let c = match byte {
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        0x81 | 0x8D | 0x8F | 0x90 | 0x9D => return None,
        // 0x00-0x7F and 0xA0-0xFF coincide with Latin-1.
        other => char::from(other),
    };
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16(text: &str, big_endian: bool) -> Vec<u8> {
        text.encode_utf16()
            .flat_map(|u| {
                if big_endian {
                    u.to_be_bytes()
                } else {
                    u.to_le_bytes()
                }
            })
            .collect()
    }

    #[test]
    fn test_plain_utf8() {
        assert_eq!(
            decode_text("héllo".as_bytes()),
            ("héllo".to_string(), Encoding::Utf8)
        );
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"{\"a\":1}");
        assert_eq!(
            decode_text(&bytes),
            ("{\"a\":1}".to_string(), Encoding::Utf8Sig)
        );
    }

    #[test]
    fn test_utf16_le_with_bom() {
        let bytes = utf16("\u{FEFF}[1,2]", false);
        let (text, encoding) = decode_text(&bytes);
        assert_eq!(encoding, Encoding::Utf16);
        assert_eq!(text, "[1,2]");
    }

    #[test]
    fn test_utf16_be_with_bom() {
        let bytes = utf16("\u{FEFF}answer: {\"ok\": 1}", true);
        let (text, encoding) = decode_text(&bytes);
        assert_eq!(encoding, Encoding::Utf16);
        assert_eq!(text, "answer: {\"ok\": 1}");
    }

    #[test]
    fn test_utf16_without_bom_is_little_endian() {
        let bytes = utf16("[1]", false);
        assert_eq!(Encoding::Utf16.decode(&bytes), Some("[1]".to_string()));
    }

    #[test]
    fn test_utf16_be_when_le_has_unpaired_surrogate() {
        // U+D800 as a little-endian unit is 0x00 0xD8; read big-endian
        // the same bytes are U+00D8 ('Ø').
        let bytes = [0x00, 0xD8, 0x00, 0x7B];
        assert_eq!(Encoding::Utf16Le.decode(&bytes), None);
        let (text, encoding) = decode_text(&bytes);
        assert_eq!(encoding, Encoding::Utf16Be);
        assert_eq!(text, "Ø{");
    }

    #[test]
    fn test_odd_length_falls_through_to_windows_1252() {
        let bytes = b"caf\xe9 {\"ok\":1}";
        assert_eq!(bytes.len() % 2, 1);
        let (text, encoding) = decode_text(bytes);
        assert_eq!(encoding, Encoding::Windows1252);
        assert_eq!(text, "café {\"ok\":1}");
    }

    #[test]
    fn test_windows_1252_specials() {
        assert_eq!(
            Encoding::Windows1252.decode(b"\x80\x93x\x94"),
            Some("€“x”".to_string())
        );
        assert_eq!(Encoding::Windows1252.decode(b"a\x81"), None);
    }

    #[test]
    fn test_lossy_fallback() {
        // Odd length rules out UTF-16; 0x81 rules out Windows-1252.
        let bytes = b"\x81{}";
        let (text, encoding) = decode_text(bytes);
        assert_eq!(encoding, Encoding::Utf8Lossy);
        assert_eq!(text, "\u{FFFD}{}");
    }

    #[test]
    fn test_empty_input_is_utf8() {
        assert_eq!(decode_text(b""), (String::new(), Encoding::Utf8));
    }
}
