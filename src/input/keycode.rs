// SPDX-License-Identifier: GPL-3.0-only

//! Key identifier parsing for layout definitions.
//!
//! Every entry in a layout row is a string identifier. This module resolves
//! those strings into the keys the dispatcher understands.
//!
//! # Supported Formats
//!
//! 1. **Single characters**: `"a"`, `"1"`, `"\\"`
//! 2. **Action key names**: `"Backspace"`, `"Enter"`, `"Tab"`, `"CapsLock"`,
//!    `"Shift"`, `"Space"`
//! 3. **Unicode codepoints**: `"U+00E9"` (resolved to a single character)
//!
//! # Format Detection
//!
//! 1. A string of exactly one character is a character key
//! 2. A known action name is an action key
//! 3. A string starting with `"U+"` or `"u+"` is a codepoint
//! 4. Anything else is `KeyId::Unknown` and contributes nothing when pressed

use std::fmt;

/// Named keys that trigger an action instead of inserting their label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKey {
    /// Delete one character before the caret, or the selection.
    Backspace,
    /// Insert a newline.
    Enter,
    /// Insert a tab character.
    Tab,
    /// Toggle caps lock.
    CapsLock,
    /// Toggle shift (auto-releasing).
    Shift,
    /// Insert a space.
    Space,
}

impl ActionKey {
    /// All action keys, in declaration order.
    pub const ALL: [ActionKey; 6] = [
        ActionKey::Backspace,
        ActionKey::Enter,
        ActionKey::Tab,
        ActionKey::CapsLock,
        ActionKey::Shift,
        ActionKey::Space,
    ];

    /// Looks up an action key by its layout name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }

    /// The identifier used for this key in layout files.
    pub fn name(self) -> &'static str {
        match self {
            ActionKey::Backspace => "Backspace",
            ActionKey::Enter => "Enter",
            ActionKey::Tab => "Tab",
            ActionKey::CapsLock => "CapsLock",
            ActionKey::Shift => "Shift",
            ActionKey::Space => "Space",
        }
    }

    /// The text this key inserts, if it is an inserting key.
    pub fn inserted_text(self) -> Option<&'static str> {
        match self {
            ActionKey::Enter => Some("\n"),
            ActionKey::Tab => Some("\t"),
            ActionKey::Space => Some(" "),
            ActionKey::Backspace | ActionKey::CapsLock | ActionKey::Shift => None,
        }
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved key identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyId {
    /// A key that commits a single character (case depends on modifiers).
    Character(char),
    /// A named action key.
    Action(ActionKey),
    /// An identifier that matches nothing; pressing it is a no-op.
    Unknown(String),
}

impl KeyId {
    /// Returns `true` for keys that commit a character and consume shift.
    pub fn is_character(&self) -> bool {
        matches!(self, KeyId::Character(_))
    }
}

/// Parses a layout key identifier into a `KeyId`.
///
/// Never fails: identifiers that cannot be resolved become `KeyId::Unknown`.
///
/// # Examples
///
/// ```rust,ignore
/// use tapboard::input::{parse_key_id, ActionKey, KeyId};
///
/// assert_eq!(parse_key_id("q"), KeyId::Character('q'));
/// assert_eq!(parse_key_id("Enter"), KeyId::Action(ActionKey::Enter));
/// assert_eq!(parse_key_id("U+00E9"), KeyId::Character('é'));
/// ```
pub fn parse_key_id(identifier: &str) -> KeyId {
    let mut chars = identifier.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return KeyId::Character(c);
    }

    if let Some(action) = ActionKey::from_name(identifier) {
        return KeyId::Action(action);
    }

    let codepoint = identifier
        .strip_prefix("U+")
        .or_else(|| identifier.strip_prefix("u+"))
        .and_then(parse_unicode_codepoint);

    match codepoint {
        Some(c) => KeyId::Character(c),
        None => KeyId::Unknown(identifier.to_string()),
    }
}

/// Parses a Unicode codepoint from a hex string.
///
/// Returns `None` for empty or malformed hex, values above 0x10FFFF, and
/// surrogates.
fn parse_unicode_codepoint(hex_str: &str) -> Option<char> {
    if hex_str.is_empty() {
        return None;
    }

    let codepoint = u32::from_str_radix(hex_str, 16).ok()?;

    // char::from_u32 rejects the surrogate range and anything past 0x10FFFF
    char::from_u32(codepoint)
}

// ============================================================================
// Unit Tests
// ============================================================================
