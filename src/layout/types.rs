// SPDX-License-Identifier: GPL-3.0-only

//! Core data types for keyboard layouts.
//!
//! This module defines the layout data model along with the error and
//! validation types produced while loading layouts from JSON.

use crate::input::{parse_key_id, KeyId};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Error Handling Types
// ============================================================================

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal error that prevents layout from being used
    Error,
    /// Non-fatal issue that should be addressed
    Warning,
}

/// A validation issue discovered during layout parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Severity level (Error or Warning)
    pub severity: Severity,
    /// Human-readable description of the issue
    pub message: String,
    /// Path to the field that caused the issue (e.g., "rows[1][3]")
    pub field_path: String,
    /// Optional suggestion for how to fix the issue
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    /// Creates a new validation issue.
    pub fn new(
        severity: Severity,
        message: impl Into<String>,
        field_path: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            message: message.into(),
            field_path: field_path.into(),
            suggestion: None,
        }
    }

    /// Adds a suggestion to the validation issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity_str = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        };

        write!(f, "[{}] {}: {}", severity_str, self.field_path, self.message)?;

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }

        Ok(())
    }
}

/// Error type for layout loading operations.
#[derive(Debug)]
pub enum ParseError {
    /// I/O error occurred while reading layout file
    IoError {
        /// The underlying I/O error
        source: std::io::Error,
        /// Optional file path that caused the error
        file_path: Option<String>,
        /// Optional suggestion for fixing the error
        suggestion: Option<String>,
    },

    /// JSON parsing error
    JsonError {
        /// The underlying JSON parsing error
        source: serde_json::Error,
        /// Optional file path being parsed
        file_path: Option<String>,
        /// Line number where the error occurred (from serde_json)
        line_number: Option<usize>,
        /// Optional suggestion for fixing the error
        suggestion: Option<String>,
    },

    /// Fatal validation errors
    ValidationError {
        /// List of validation issues found
        issues: Vec<ValidationIssue>,
        /// Optional file path being validated
        file_path: Option<String>,
    },

    /// An embedded layout asset is missing from the binary
    MissingAsset {
        /// Name of the asset that was looked up
        name: String,
    },
}

impl ParseError {
    /// Creates an I/O error with file path.
    pub fn io_error_with_path(source: std::io::Error, file_path: impl Into<String>) -> Self {
        Self::IoError {
            source,
            file_path: Some(file_path.into()),
            suggestion: Some("Check that the file exists and you have read permissions".into()),
        }
    }

    /// Creates a JSON parsing error with context.
    pub fn json_error(source: serde_json::Error) -> Self {
        let line_number = Some(source.line());
        Self::JsonError {
            source,
            file_path: None,
            line_number,
            suggestion: Some("Check the JSON syntax at the indicated line".into()),
        }
    }

    /// Creates a JSON parsing error with file path.
    pub fn json_error_with_path(
        source: serde_json::Error,
        file_path: impl Into<String>,
    ) -> Self {
        let line_number = Some(source.line());
        Self::JsonError {
            source,
            file_path: Some(file_path.into()),
            line_number,
            suggestion: Some("Check the JSON syntax at the indicated line".into()),
        }
    }

    /// Creates a validation error from a list of issues.
    pub fn validation_error(issues: Vec<ValidationIssue>) -> Self {
        Self::ValidationError {
            issues,
            file_path: None,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::IoError {
                source,
                file_path,
                suggestion,
            } => {
                write!(f, "I/O error")?;
                if let Some(path) = file_path {
                    write!(f, " reading file '{}'", path)?;
                }
                write!(f, ": {}", source)?;
                if let Some(hint) = suggestion {
                    write!(f, "\n  Suggestion: {}", hint)?;
                }
            }
            ParseError::JsonError {
                source,
                file_path,
                line_number,
                suggestion,
            } => {
                write!(f, "JSON parsing error")?;
                if let Some(path) = file_path {
                    write!(f, " in file '{}'", path)?;
                }
                if let Some(line) = line_number {
                    write!(f, " at line {}", line)?;
                }
                write!(f, ": {}", source)?;
                if let Some(hint) = suggestion {
                    write!(f, "\n  Suggestion: {}", hint)?;
                }
            }
            ParseError::ValidationError { issues, file_path } => {
                write!(f, "Validation failed")?;
                if let Some(path) = file_path {
                    write!(f, " for file '{}'", path)?;
                }
                writeln!(f, " with {} issue(s):", issues.len())?;
                for (i, issue) in issues.iter().enumerate() {
                    write!(f, "  {}. {}", i + 1, issue)?;
                    if i + 1 < issues.len() {
                        writeln!(f)?;
                    }
                }
            }
            ParseError::MissingAsset { name } => {
                write!(f, "Embedded layout '{}' not found", name)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::IoError { source, .. } => Some(source),
            ParseError::JsonError { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ============================================================================
// ParseResult Type
// ============================================================================

/// Result of successfully parsing a layout with optional warnings.
///
/// Parsing is permissive: a usable layout is returned even when non-fatal
/// issues are found.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult<T> {
    /// The successfully parsed layout
    pub layout: T,
    /// Non-fatal validation warnings
    pub warnings: Vec<ValidationIssue>,
}

impl<T> ParseResult<T> {
    /// Creates a new parse result with warnings.
    pub fn with_warnings(layout: T, warnings: Vec<ValidationIssue>) -> Self {
        Self { layout, warnings }
    }

    /// Returns true if there are any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Consumes the result and returns the layout, discarding warnings.
    pub fn into_layout(self) -> T {
        self.layout
    }
}

// ============================================================================
// Layout Data Structures
// ============================================================================

/// A keyboard layout: ordered rows of key identifiers.
///
/// Layouts are static configuration and are never mutated once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// Human readable layout name
    #[serde(default)]
    pub name: String,

    /// Layout format version
    #[serde(default)]
    pub version: String,

    /// Rows of key identifiers, top to bottom
    pub rows: Vec<Vec<String>>,
}

impl Layout {
    /// Creates a layout from rows of identifiers.
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            version: "1.0".to_string(),
            rows,
        }
    }

    /// Iterates over all identifiers, row by row.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(String::as_str)
    }

    /// Iterates over all resolved keys, row by row.
    pub fn keys(&self) -> impl Iterator<Item = KeyId> + '_ {
        self.identifiers().map(parse_key_id)
    }

    /// Total number of keys across all rows.
    pub fn key_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Returns `true` if the layout contains the identifier.
    pub fn contains(&self, identifier: &str) -> bool {
        self.identifiers().any(|id| id == identifier)
    }
}

// ============================================================================
// Tests
// ============================================================================
