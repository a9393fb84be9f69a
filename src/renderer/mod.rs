// SPDX-License-Identifier: GPL-3.0-only

//! View model for the keyboard surface.
//!
//! Drawing is left to the embedding toolkit. This module computes what it
//! draws: one [`KeyView`] per layout entry, grouped in rows, plus whether the
//! surface is shown at all. The view must be rebuilt after every
//! [`Effect::Render`](crate::keyboard::Effect::Render).

pub mod key;

pub use key::{key_view, KeyView, KeyWidth};

use crate::input::ModifierState;
use crate::layout::Layout;

/// A snapshot of everything the drawing layer shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardView {
    pub visible: bool,
    pub rows: Vec<Vec<KeyView>>,
}

/// Builds the rows of key views for a layout.
pub fn render_rows(layout: &Layout, modifiers: &ModifierState) -> Vec<Vec<KeyView>> {
    layout
        .rows
        .iter()
        .map(|row| row.iter().map(|id| key_view(id, modifiers)).collect())
        .collect()
}
