use crate::errors::PatchError;
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::Path;

/// Loads a JSON document.
///
/// A missing or whitespace-only file is an empty object. A leading UTF-8
/// byte-order mark is ignored.
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Value, PatchError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Value::Object(Map::new())),
        Err(e) => return Err(e.into()),
    };
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(&bytes);
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    Ok(serde_json::from_slice(bytes)?)
}

/// Writes `doc` to `path`, creating parent directories.
///
/// Output is compact unless `pretty` is set, in which case it is indented
/// by two spaces. A trailing newline is always written.
pub fn save_document<P: AsRef<Path>>(path: P, doc: &Value, pretty: bool) -> Result<(), PatchError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut out = if pretty {
        serde_json::to_string_pretty(doc)?
    } else {
        serde_json::to_string(doc)?
    };
    out.push('\n');
    fs::write(path, out)?;
    Ok(())
}
