// SPDX-License-Identifier: GPL-3.0-only

//! Modifier state management for keyboard input.
//!
//! Two modifiers decide the case of committed characters:
//!
//! - **Caps lock**: toggled by its key and stays until toggled again
//! - **Shift**: toggled by its key and released automatically, either after
//!   one character is committed or when its release timer fires
//!
//! # Release timers
//!
//! Every shift activation bumps a generation counter and hands out a
//! [`ShiftToken`] for that activation. The caller schedules a timer carrying
//! the token; when it fires, [`ModifierState::release_shift`] only clears
//! shift if the token still belongs to the latest activation. A timer from an
//! earlier activation is stale and does nothing.
//!
//! # Example
//!
//! ```rust,ignore
//! use tapboard::input::ModifierState;
//!
//! let mut state = ModifierState::new();
//!
//! let first = state.toggle_shift().expect("shift activates");
//! state.toggle_shift(); // off
//! let second = state.toggle_shift().expect("shift activates again");
//!
//! assert!(!state.release_shift(first)); // superseded
//! assert!(state.release_shift(second));
//! ```

/// Identifies one shift activation for its pending auto-release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShiftToken(u64);

impl ShiftToken {
    /// The activation generation this token belongs to.
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Tracks caps lock and shift during keyboard input.
#[derive(Debug, Clone, Default)]
pub struct ModifierState {
    caps_lock: bool,
    shift_active: bool,
    /// Incremented on every shift activation
    shift_generation: u64,
}

impl ModifierState {
    /// Creates a new `ModifierState` with no active modifiers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips caps lock.
    ///
    /// # Returns
    ///
    /// `true` if caps lock is now on
    pub fn toggle_caps_lock(&mut self) -> bool {
        self.caps_lock = !self.caps_lock;
        tracing::debug!("Caps lock toggled: {}", self.caps_lock);
        self.caps_lock
    }

    /// Flips shift.
    ///
    /// # Returns
    ///
    /// `Some(token)` when shift became active. The caller must schedule the
    /// auto-release with this token; any token handed out earlier is now
    /// stale. `None` when shift was turned off.
    pub fn toggle_shift(&mut self) -> Option<ShiftToken> {
        self.shift_active = !self.shift_active;
        if self.shift_active {
            self.shift_generation += 1;
            tracing::debug!("Shift activated (generation {})", self.shift_generation);
            Some(ShiftToken(self.shift_generation))
        } else {
            tracing::debug!("Shift released by toggle");
            None
        }
    }

    /// Handles the auto-release timer of a shift activation.
    ///
    /// # Returns
    ///
    /// `true` if shift was cleared. `false` if the token is stale or shift
    /// was already released.
    pub fn release_shift(&mut self, token: ShiftToken) -> bool {
        if token.0 != self.shift_generation {
            tracing::debug!(
                "Ignoring superseded shift release: {} (current {})",
                token.0,
                self.shift_generation
            );
            return false;
        }

        if !self.shift_active {
            return false;
        }

        self.shift_active = false;
        tracing::debug!("Shift auto-released (generation {})", token.0);
        true
    }

    /// Clears shift immediately after a character commit.
    ///
    /// # Returns
    ///
    /// `true` if shift was active and has been consumed
    pub fn consume_shift_if_active(&mut self) -> bool {
        if self.shift_active {
            self.shift_active = false;
            tracing::debug!("Shift consumed by character");
            true
        } else {
            false
        }
    }

    /// Returns the character a single-character key commits (and displays)
    /// in the current state.
    ///
    /// Shift and caps lock both produce uppercase; with neither active the
    /// character is lowercased. Characters whose case mapping is not a single
    /// character (such as `'ß'`) are returned unchanged.
    #[must_use]
    pub fn compute_display_char(&self, key: char) -> char {
        if self.is_uppercase() {
            single_char(key.to_uppercase()).unwrap_or(key)
        } else {
            single_char(key.to_lowercase()).unwrap_or(key)
        }
    }

    /// Returns `true` if caps lock is on.
    #[must_use]
    pub fn caps_lock(&self) -> bool {
        self.caps_lock
    }

    /// Returns `true` if shift is active.
    #[must_use]
    pub fn shift_active(&self) -> bool {
        self.shift_active
    }

    /// Returns `true` if character keys currently produce uppercase.
    #[must_use]
    pub fn is_uppercase(&self) -> bool {
        self.shift_active || self.caps_lock
    }

    /// Generation of the latest shift activation.
    #[must_use]
    pub fn shift_generation(&self) -> u64 {
        self.shift_generation
    }

}

fn single_char(mut mapped: impl Iterator<Item = char>) -> Option<char> {
    match (mapped.next(), mapped.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
