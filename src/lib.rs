// SPDX-License-Identifier: GPL-3.0-only

//! Tapboard - an on-screen keyboard core
//!
//! This crate implements the state machine behind an on-screen keyboard that
//! types into whichever text element has focus, driven by pointer or touch
//! input instead of a physical keyboard.
//!
//! # Architecture
//!
//! 1. **Modifier state** (`input`): caps lock, and a shift that releases
//!    itself after one character or after a fixed delay.
//!
//! 2. **Input router** (`router`): tracks the element receiving text, shows
//!    the keyboard when an editable element gains focus, and hides it after
//!    focus is lost for good.
//!
//! 3. **Controller** (`keyboard`): dispatches key presses, focus changes and
//!    timers into edits and effects for the host.
//!
//! Drawing is left to the embedding toolkit, which consumes the view model in
//! `renderer` and reports focus and pointer events back.
//!
//! # Modules
//!
//! - `app_settings`: Centralized application constants
//! - `config`: User configuration loaded from JSON
//! - `control`: Programmatic show/hide/toggle and the session event loop
//! - `editor`: Editable surfaces and cursor-aware text editing
//! - `input`: Key identifiers and modifier state
//! - `keyboard`: The event-to-effect controller
//! - `layout`: Layout loading and validation
//! - `renderer`: Key labels, widths and highlighting for drawing
//! - `router`: Active target and visibility state machine

pub mod app_settings;
pub mod config;
pub mod control;
pub mod editor;
pub mod input;
pub mod keyboard;
pub mod layout;
pub mod renderer;
pub mod router;

pub use config::{BackspaceTarget, KeyboardConfig};
pub use control::{control_channel, run_session, ControlCommand, ControlHandle, Frontend};
pub use editor::{SurfaceHost, TargetId, TargetKind, TextBuffer, TextSurface};
pub use keyboard::{Effect, Keyboard, KeyboardEvent, Timer};

// ============================================================================
// Integration Tests
// ============================================================================
