// SPDX-License-Identifier: GPL-3.0-only

//! Layout parsing logic for loading JSON layout definitions.
//!
//! Layouts come from three places: a file on disk, a string already in
//! memory, or the assets embedded into the binary at build time.

use crate::app_settings;
use crate::layout::types::{Layout, ParseError, ParseResult};
use crate::layout::validation::validate_layout;
use rust_embed::RustEmbed;
use std::fs;
use std::path::Path;

/// Layout files bundled into the binary.
#[derive(RustEmbed)]
#[folder = "resources/layouts/"]
struct LayoutAssets;

/// Parses a keyboard layout from a JSON file.
///
/// Distinguishes I/O errors (file not found, permission denied) from JSON
/// errors (malformed JSON, missing `rows`), then validates the result.
///
/// # Example
///
/// ```rust,ignore
/// use tapboard::layout::parse_layout_file;
///
/// match parse_layout_file("resources/layouts/qwerty.json") {
///     Ok(result) => println!("Loaded layout: {}", result.layout.name),
///     Err(e) => eprintln!("Failed to parse layout: {}", e),
/// }
/// ```
pub fn parse_layout_file(path: impl AsRef<Path>) -> Result<ParseResult<Layout>, ParseError> {
    let path = path.as_ref();
    let display_path = path.display().to_string();

    let json_str = fs::read_to_string(path)
        .map_err(|e| ParseError::io_error_with_path(e, display_path.as_str()))?;

    let layout: Layout = serde_json::from_str(&json_str)
        .map_err(|e| ParseError::json_error_with_path(e, display_path.as_str()))?;

    validate_layout(layout).map_err(|e| match e {
        ParseError::ValidationError {
            issues,
            file_path: None,
        } => ParseError::ValidationError {
            issues,
            file_path: Some(display_path.clone()),
        },
        other => other,
    })
}

/// Parses a keyboard layout from a JSON string.
pub fn parse_layout_from_string(json: &str) -> Result<ParseResult<Layout>, ParseError> {
    let layout: Layout = serde_json::from_str(json).map_err(ParseError::json_error)?;
    validate_layout(layout)
}

/// Parses a layout embedded in the binary by file name.
pub fn parse_embedded_layout(name: &str) -> Result<ParseResult<Layout>, ParseError> {
    let file = LayoutAssets::get(name).ok_or_else(|| ParseError::MissingAsset {
        name: name.to_string(),
    })?;

    let layout: Layout = serde_json::from_slice(&file.data).map_err(ParseError::json_error)?;
    validate_layout(layout)
}

/// Returns the built-in QWERTY layout.
pub fn default_layout() -> Result<Layout, ParseError> {
    parse_embedded_layout(app_settings::DEFAULT_LAYOUT_FILE).map(ParseResult::into_layout)
}

/// Loads the layout at `path`, or the built-in layout when `path` is `None`.
pub fn load_layout(path: Option<&Path>) -> Result<Layout, ParseError> {
    match path {
        Some(path) => {
            let result = parse_layout_file(path)?;
            tracing::info!(
                "Loaded layout '{}' from {} with {} warning(s)",
                result.layout.name,
                path.display(),
                result.warning_count()
            );
            Ok(result.into_layout())
        }
        None => default_layout(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ActionKey, KeyId};
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Test 1: Parse valid JSON string
    #[test]
    fn test_parse_valid_json_string() {
        let json = r#"{
            "name": "Test Layout",
            "version": "1.0",
            "rows": [["a", "b"], ["Space"]]
        }"#;

        let result = parse_layout_from_string(json).expect("Should parse valid JSON");

        assert_eq!(result.layout.name, "Test Layout");
        assert_eq!(result.layout.rows.len(), 2);
        assert!(!result.has_warnings());
    }

    /// Test 2: Handle missing file with I/O error
    #[test]
    fn test_parse_missing_file() {
        let err = parse_layout_file("/nonexistent/path/to/layout.json").unwrap_err();
        let display_str = format!("{}", err);

        match &err {
            ParseError::IoError { file_path, suggestion, .. } => {
                assert!(file_path.is_some(), "Error should include file path");
                assert!(suggestion.is_some(), "Error should include suggestion");
                assert!(display_str.contains("I/O error"));
                assert!(display_str.contains("/nonexistent/path/to/layout.json"));
            }
            _ => panic!("Expected IoError variant"),
        }
    }

    /// Test 3: Parse layout from a file on disk
    #[test]
    fn test_parse_layout_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"name": "Disk", "version": "1.0", "rows": [["x", "Enter"]]}}"#
        )
        .unwrap();

        let result = parse_layout_file(file.path()).expect("Should parse file");

        assert_eq!(result.layout.name, "Disk");
        assert!(result.layout.contains("Enter"));
    }

    /// Test 4: Malformed JSON in a file reports the path and a line
    #[test]
    fn test_parse_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{\n  \"rows\": [[\"a\",]\n}}").unwrap();

        match parse_layout_file(file.path()) {
            Err(ParseError::JsonError { file_path, line_number, .. }) => {
                assert!(file_path.is_some());
                assert!(line_number.is_some());
            }
            other => panic!("Expected JsonError, got {:?}", other),
        }
    }

    /// Test 5: Validation failures carry the file path
    #[test]
    fn test_validation_error_gets_file_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"name": "None", "version": "1.0", "rows": []}}"#).unwrap();

        match parse_layout_file(file.path()) {
            Err(ParseError::ValidationError { file_path, .. }) => {
                assert!(file_path.is_some(), "Validation error should include path");
            }
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    /// Test 6: The embedded QWERTY layout loads with the expected shape
    #[test]
    fn test_default_layout() {
        let layout = default_layout().expect("Embedded layout should load");

        assert_eq!(layout.name, "QWERTY");
        assert_eq!(layout.rows.len(), 5);
        assert_eq!(layout.rows[0].last().map(String::as_str), Some("Backspace"));
        assert_eq!(layout.rows[4], vec!["Space".to_string()]);

        let shifts = layout
            .keys()
            .filter(|key| *key == KeyId::Action(ActionKey::Shift))
            .count();
        assert_eq!(shifts, 2, "QWERTY has two Shift keys");
        assert!(layout.keys().all(|key| !matches!(key, KeyId::Unknown(_))));
    }

    /// Test 7: Unknown embedded asset
    #[test]
    fn test_missing_embedded_layout() {
        assert!(matches!(
            parse_embedded_layout("dvorak.json"),
            Err(ParseError::MissingAsset { .. })
        ));
    }

    /// Test 8: load_layout picks the file when given a path
    #[test]
    fn test_load_layout_prefers_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"name": "Pad", "version": "1.0", "rows": [["1", "2"]]}}"#).unwrap();

        let from_file = load_layout(Some(file.path())).unwrap();
        let built_in = load_layout(None).unwrap();

        assert_eq!(from_file.name, "Pad");
        assert_eq!(built_in.name, "QWERTY");
    }
}
