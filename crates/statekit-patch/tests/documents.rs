use serde_json::json;
use statekit_patch::{apply, load_document, save_document, Assignment, PatchError};
use std::fs;
use tempfile::TempDir;

fn patch_file(path: &std::path::Path, sets: &[&str], pretty: bool) {
    let mut doc = load_document(path).unwrap();
    for raw in sets {
        apply(&mut doc, &Assignment::parse(raw).unwrap()).unwrap();
    }
    save_document(path, &doc, pretty).unwrap();
}

#[test]
fn test_missing_file_is_empty_object() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("state.json");
    assert_eq!(load_document(&path).unwrap(), json!({}));
}

#[test]
fn test_empty_file_then_overwrite() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("state.json");
    fs::write(&path, "").unwrap();

    patch_file(&path, &["a.b.c=5"], false);
    assert_eq!(fs::read_to_string(&path).unwrap(), "{\"a\":{\"b\":{\"c\":5}}}\n");

    patch_file(&path, &["a.b=7"], false);
    assert_eq!(fs::read_to_string(&path).unwrap(), "{\"a\":{\"b\":7}}\n");
}

#[test]
fn test_pretty_output_and_nested_dirs() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("deep").join("dir").join("state.json");

    patch_file(&path, &["run.status=\"done\""], true);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "{\n  \"run\": {\n    \"status\": \"done\"\n  }\n}\n"
    );
}

#[test]
fn test_bom_prefixed_document() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("state.json");
    fs::write(&path, b"\xEF\xBB\xBF{\"x\": 1}").unwrap();

    patch_file(&path, &["y=2"], false);
    assert_eq!(load_document(&path).unwrap(), json!({"x": 1, "y": 2}));
}

#[test]
fn test_invalid_document_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("state.json");
    fs::write(&path, "{ broken").unwrap();

    assert!(matches!(
        load_document(&path),
        Err(PatchError::InvalidDocument(_))
    ));
}
