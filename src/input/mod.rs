// SPDX-License-Identifier: GPL-3.0-only

//! Input handling module for the Tapboard keyboard.
//!
//! This module resolves layout key identifiers and tracks the modifier state
//! that decides the case of committed characters.
//!
//! # Features
//!
//! - **Key identifier parsing**: Resolve layout strings into character keys,
//!   action keys, or unknown (no-op) keys
//! - **Modifier state management**: Caps lock, and shift with one-shot and
//!   timed auto-release
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use tapboard::input::{parse_key_id, KeyId, ModifierState};
//!
//! let mut state = ModifierState::new();
//! state.toggle_shift();
//!
//! if let KeyId::Character(c) = parse_key_id("a") {
//!     assert_eq!(state.compute_display_char(c), 'A');
//!     state.consume_shift_if_active();
//! }
//! ```

// Sub-modules
pub mod keycode;
pub mod modifier;

// Re-export public API
pub use keycode::{parse_key_id, ActionKey, KeyId};
pub use modifier::{ModifierState, ShiftToken};

// ============================================================================
// Module Tests
// ============================================================================
