//! Output formatting utilities.

use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter, Serializer};
use serde_json::Value;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Formats a value as compact JSON, or indented by two spaces when
/// `pretty` is set. Characters outside printable ASCII are written as
/// `\uXXXX` escapes, with surrogate pairs above U+FFFF.
pub fn format_json(value: &Value, pretty: bool) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    if pretty {
        let formatter = AsciiFormatter(PrettyFormatter::new());
        value.serialize(&mut Serializer::with_formatter(&mut buf, formatter))?;
    } else {
        let formatter = AsciiFormatter(CompactFormatter);
        value.serialize(&mut Serializer::with_formatter(&mut buf, formatter))?;
    }
    // Only ASCII is ever emitted.
    Ok(buf.into_iter().map(char::from).collect())
}

/// Writes `text` plus a trailing newline to `path`, creating parent
/// directories first.
pub fn write_with_newline(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, format!("{}\n", text))
}

/// Wraps a formatter and escapes non-ASCII string content.
struct AsciiFormatter<F>(F);

impl<F: Formatter> Formatter for AsciiFormatter<F> {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        let mut units = [0u16; 2];
        for c in fragment.chars() {
            if matches!(c, ' '..='~') {
                writer.write_all(&[c as u8])?;
            } else {
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }

    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array(writer)
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object(writer)
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.0.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_value(writer)
    }
}
