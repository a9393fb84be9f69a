// SPDX-License-Identifier: GPL-3.0-only

//! Validation rules for keyboard layout definitions.
//!
//! Validation is permissive: only a layout without any key is rejected.
//! Everything else is reported as a warning and the layout is kept as-is.

use crate::input::{parse_key_id, ActionKey, KeyId};
use crate::layout::types::{Layout, ParseError, ParseResult, Severity, ValidationIssue};

/// Validates a layout and returns it with warnings.
pub fn validate_layout(layout: Layout) -> Result<ParseResult<Layout>, ParseError> {
    let errors = validate_has_keys(&layout);
    if !errors.is_empty() {
        return Err(ParseError::validation_error(errors));
    }

    let mut warnings = Vec::new();
    validate_metadata(&layout, &mut warnings);
    validate_rows(&layout, &mut warnings);
    validate_identifiers(&layout, &mut warnings);

    for warning in &warnings {
        tracing::warn!("layout '{}': {}", layout.name, warning);
    }

    Ok(ParseResult::with_warnings(layout, warnings))
}

/// Collects fatal issues: no rows, or rows without any key.
fn validate_has_keys(layout: &Layout) -> Vec<ValidationIssue> {
    if layout.rows.is_empty() {
        return vec![ValidationIssue::new(Severity::Error, "Layout has no rows", "rows")
            .with_suggestion("Add at least one row of key identifiers")];
    }

    if layout.key_count() == 0 {
        return vec![ValidationIssue::new(Severity::Error, "Layout has no keys", "rows")
            .with_suggestion("Add key identifiers to the rows")];
    }

    Vec::new()
}

/// Warns about missing descriptive fields.
pub fn validate_metadata(layout: &Layout, warnings: &mut Vec<ValidationIssue>) {
    if layout.name.is_empty() {
        warnings.push(
            ValidationIssue::new(Severity::Warning, "Layout name is empty", "name")
                .with_suggestion("Provide a descriptive name for the layout"),
        );
    }

    if layout.version.is_empty() {
        warnings.push(
            ValidationIssue::new(Severity::Warning, "Layout version is empty", "version")
                .with_suggestion("Use semantic versioning (e.g., '1.0', '1.0.0')"),
        );
    }
}

/// Warns about empty rows.
pub fn validate_rows(layout: &Layout, warnings: &mut Vec<ValidationIssue>) {
    for (row_idx, row) in layout.rows.iter().enumerate() {
        if row.is_empty() {
            warnings.push(
                ValidationIssue::new(
                    Severity::Warning,
                    "Row is empty",
                    format!("rows[{}]", row_idx),
                )
                .with_suggestion("Remove the row or add keys to it"),
            );
        }
    }
}

/// Warns about identifiers that resolve to nothing.
///
/// Unknown keys stay in the layout; pressing them inserts nothing.
pub fn validate_identifiers(layout: &Layout, warnings: &mut Vec<ValidationIssue>) {
    for (row_idx, row) in layout.rows.iter().enumerate() {
        for (key_idx, identifier) in row.iter().enumerate() {
            if let KeyId::Unknown(name) = parse_key_id(identifier) {
                let known: Vec<&str> = ActionKey::ALL.iter().map(|key| key.name()).collect();
                warnings.push(
                    ValidationIssue::new(
                        Severity::Warning,
                        format!("Unknown key identifier '{}'", name),
                        format!("rows[{}][{}]", row_idx, key_idx),
                    )
                    .with_suggestion(format!(
                        "Use a single character, a U+XXXX codepoint, or one of: {}",
                        known.join(", ")
                    )),
                );
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
