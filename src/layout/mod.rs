// SPDX-License-Identifier: GPL-3.0-only

//! Keyboard layouts for Tapboard.
//!
//! A layout is an ordered list of rows, each an ordered list of key
//! identifiers. Layouts are read once at startup and stay read-only.
//!
//! # Layout Format
//!
//! ```json
//! {
//!     "name": "QWERTY",
//!     "version": "1.0",
//!     "rows": [
//!         ["q", "w", "e", "Backspace"],
//!         ["Shift", "a", "s", "Enter"],
//!         ["Space"]
//!     ]
//! }
//! ```
//!
//! Identifiers are single characters, `U+XXXX` codepoints, or one of the
//! action names `Backspace`, `Enter`, `Tab`, `CapsLock`, `Shift`, `Space`.
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use tapboard::layout::{default_layout, parse_layout_file};
//!
//! let layout = match parse_layout_file("my-layout.json") {
//!     Ok(result) => {
//!         for warning in &result.warnings {
//!             println!("  {}", warning);
//!         }
//!         result.into_layout()
//!     }
//!     Err(e) => {
//!         eprintln!("Falling back to QWERTY: {}", e);
//!         default_layout().expect("embedded layout")
//!     }
//! };
//! ```

pub mod parser;
pub mod types;
pub mod validation;

pub use parser::{
    default_layout, load_layout, parse_embedded_layout, parse_layout_file,
    parse_layout_from_string,
};
pub use types::{Layout, ParseError, ParseResult, Severity, ValidationIssue};
pub use validation::validate_layout;
