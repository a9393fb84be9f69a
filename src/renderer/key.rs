// SPDX-License-Identifier: GPL-3.0-only

//! Per-key view model.
//!
//! Turns a layout identifier plus the modifier state into what a key shows:
//! its label, its width class and whether it is highlighted.

use crate::input::{parse_key_id, ActionKey, KeyId, ModifierState};

/// Width class of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyWidth {
    #[default]
    Normal,
    /// Backspace, Enter, Shift, CapsLock, Tab
    Wide,
    /// Space
    ExtraWide,
}

/// Everything the drawing layer needs for one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyView {
    /// Layout identifier, sent back in `KeyPressed`
    pub identifier: String,
    /// Text shown on the key
    pub label: String,
    pub width: KeyWidth,
    /// Highlighted because its modifier is on
    pub active: bool,
}

/// Builds the view of one key.
pub fn key_view(identifier: &str, modifiers: &ModifierState) -> KeyView {
    let key = parse_key_id(identifier);
    KeyView {
        identifier: identifier.to_string(),
        label: display_label(&key, identifier, modifiers),
        width: key_width(&key),
        active: should_show_modifier_active(&key, modifiers),
    }
}

/// Returns the label of a key.
///
/// Character keys follow the modifier case; every other key shows its
/// identifier unchanged.
pub fn display_label(key: &KeyId, identifier: &str, modifiers: &ModifierState) -> String {
    match key {
        KeyId::Character(c) => modifiers.compute_display_char(*c).to_string(),
        KeyId::Action(_) | KeyId::Unknown(_) => identifier.to_string(),
    }
}

/// Returns the width class of a key.
pub fn key_width(key: &KeyId) -> KeyWidth {
    match key {
        KeyId::Action(ActionKey::Space) => KeyWidth::ExtraWide,
        KeyId::Action(_) => KeyWidth::Wide,
        KeyId::Character(_) | KeyId::Unknown(_) => KeyWidth::Normal,
    }
}

/// Caps lock keys light up while caps lock is on, shift keys while shift is.
pub fn should_show_modifier_active(key: &KeyId, modifiers: &ModifierState) -> bool {
    match key {
        KeyId::Action(ActionKey::CapsLock) => modifiers.caps_lock(),
        KeyId::Action(ActionKey::Shift) => modifiers.shift_active(),
        _ => false,
    }
}
