// SPDX-License-Identifier: GPL-3.0-only

//! Input routing: which element receives typed text, and when the keyboard
//! is shown.
//!
//! # Visibility
//!
//! The router is a two-state machine, `hidden` and `visible`, with the
//! active target as auxiliary state:
//!
//! - Focus entering an editable element shows the keyboard against it
//! - Focus leaving an element starts a short debounce. When the debounce
//!   ends, the keyboard hides unless an editable element has focus again or
//!   the user is interacting with the keyboard surface itself
//! - `show`, `hide` and `toggle` are the programmatic entry points
//!
//! # Pending interaction
//!
//! Pressing a key moves focus away from the edited element for a moment.
//! Pointer-down on the keyboard surface therefore opens an interaction that
//! suppresses hiding. Pointer-up hands back an [`InteractionToken`]; the
//! interaction ends when the caller reports that token released, unless a
//! newer pointer-down has opened another one in the meantime.

use crate::config::BackspaceTarget;
use crate::editor::{self, SurfaceHost, TargetId, TargetKind, TextSurface};

/// Identifies one focus-out debounce. Only the latest one is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FocusLossToken(u64);

/// Identifies one pointer interaction with the keyboard surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InteractionToken(u64);

/// Routes text to the active target and tracks keyboard visibility.
#[derive(Debug, Clone)]
pub struct InputRouter {
    default_target: TargetId,
    active_target: TargetId,
    /// Editable element currently holding focus, if any
    focused: Option<TargetId>,
    visible: bool,
    pending_interaction: Option<InteractionToken>,
    interaction_counter: u64,
    focus_loss_generation: u64,
}

impl InputRouter {
    /// Creates a hidden router whose active target is `default_target`.
    pub fn new(default_target: TargetId) -> Self {
        Self {
            default_target,
            active_target: default_target,
            focused: None,
            visible: false,
            pending_interaction: None,
            interaction_counter: 0,
            focus_loss_generation: 0,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Returns `true` if the keyboard is presented.
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// The element that receives inserted text.
    pub fn active_target(&self) -> TargetId {
        self.active_target
    }

    /// The fallback element.
    pub fn default_target(&self) -> TargetId {
        self.default_target
    }

    /// The editable element currently holding focus, if any.
    pub fn focused_target(&self) -> Option<TargetId> {
        self.focused
    }

    /// Returns `true` while a pointer interaction with the keyboard is open.
    pub fn has_pending_interaction(&self) -> bool {
        self.pending_interaction.is_some()
    }

    // ========================================================================
    // Programmatic control
    // ========================================================================

    /// Shows the keyboard.
    ///
    /// The active target becomes `target`, else the focused editable element,
    /// else the default target.
    pub fn show(&mut self, target: Option<TargetId>) {
        self.active_target = target.or(self.focused).unwrap_or(self.default_target);
        if !self.visible {
            tracing::info!("Showing keyboard for {}", self.active_target);
        }
        self.visible = true;
    }

    /// Hides the keyboard. The active target is kept.
    pub fn hide(&mut self) {
        if self.visible {
            tracing::info!("Hiding keyboard");
        }
        self.visible = false;
    }

    /// Hides a visible keyboard or shows a hidden one.
    ///
    /// # Returns
    ///
    /// The resulting visibility
    pub fn toggle(&mut self) -> bool {
        if self.visible {
            self.hide();
        } else {
            self.show(None);
        }
        self.visible
    }

    // ========================================================================
    // Focus tracking
    // ========================================================================

    /// Handles focus entering an element.
    pub fn focus_in(&mut self, target: TargetId, kind: TargetKind) {
        if kind.is_editable() {
            self.focused = Some(target);
            self.show(Some(target));
        } else {
            tracing::debug!("Focus moved to non-editable {}", target);
            self.focused = None;
        }
    }

    /// Handles focus leaving an element.
    ///
    /// # Returns
    ///
    /// A token the caller must hand to [`Self::focus_loss_elapsed`] after the
    /// debounce delay. Any earlier token is superseded.
    pub fn focus_out(&mut self, target: TargetId) -> FocusLossToken {
        if self.focused == Some(target) {
            self.focused = None;
        }
        self.focus_loss_generation += 1;
        FocusLossToken(self.focus_loss_generation)
    }

    /// Makes the hide decision once the focus-loss debounce has elapsed.
    ///
    /// Hiding resets the active target to the default target.
    ///
    /// # Returns
    ///
    /// `true` if the keyboard was hidden
    pub fn focus_loss_elapsed(&mut self, token: FocusLossToken) -> bool {
        if token.0 != self.focus_loss_generation {
            tracing::debug!("Ignoring superseded focus-loss check");
            return false;
        }

        if self.pending_interaction.is_some() {
            tracing::debug!("Focus left for the keyboard surface, staying visible");
            return false;
        }

        if self.focused.is_some() || !self.visible {
            return false;
        }

        self.hide();
        self.active_target = self.default_target;
        true
    }

    /// Handles the host forgetting an element.
    ///
    /// Keeps the active target valid by falling back to the default target.
    pub fn target_removed(&mut self, target: TargetId) {
        if target == self.default_target {
            tracing::warn!("Default target {} reported removed", target);
        }
        if self.focused == Some(target) {
            self.focused = None;
        }
        if self.active_target == target {
            tracing::debug!("Active target {} removed, using default", target);
            self.active_target = self.default_target;
        }
    }

    // ========================================================================
    // Keyboard surface interaction
    // ========================================================================

    /// Opens an interaction on pointer-down over the keyboard surface.
    pub fn pointer_down(&mut self) {
        self.interaction_counter += 1;
        self.pending_interaction = Some(InteractionToken(self.interaction_counter));
    }

    /// Handles pointer-up anywhere.
    ///
    /// # Returns
    ///
    /// The open interaction, which the caller releases on the next tick.
    pub fn pointer_up(&mut self) -> Option<InteractionToken> {
        self.pending_interaction
    }

    /// Ends an interaction unless a newer one has started.
    pub fn release_interaction(&mut self, token: InteractionToken) {
        if self.pending_interaction == Some(token) {
            self.pending_interaction = None;
        }
    }

    // ========================================================================
    // Text editing
    // ========================================================================

    /// Picks the surface for `preferred`, falling back to the default target.
    fn resolve_surface<'h, H: SurfaceHost + ?Sized>(
        &self,
        host: &'h mut H,
        preferred: TargetId,
    ) -> Option<&'h mut dyn TextSurface> {
        let target = if host.surface_mut(preferred).is_some() {
            preferred
        } else {
            tracing::debug!("{} unavailable, falling back to default target", preferred);
            self.default_target
        };

        let surface = host.surface_mut(target);
        if surface.is_none() {
            tracing::warn!("No editable target available, dropping edit");
        }
        surface
    }

    /// Inserts `text` into the active target at its selection.
    ///
    /// # Returns
    ///
    /// `true` if a surface was edited
    pub fn insert_text<H: SurfaceHost + ?Sized>(&self, host: &mut H, text: &str) -> bool {
        match self.resolve_surface(host, self.active_target) {
            Some(surface) => {
                editor::insert_text(surface, text);
                true
            }
            None => false,
        }
    }

    /// Deletes backward in the element chosen by `policy`.
    ///
    /// # Returns
    ///
    /// `true` if anything was removed
    pub fn delete_backward<H: SurfaceHost + ?Sized>(
        &self,
        host: &mut H,
        policy: BackspaceTarget,
    ) -> bool {
        let preferred = match policy {
            BackspaceTarget::Active => self.active_target,
            BackspaceTarget::Default => self.default_target,
        };

        self.resolve_surface(host, preferred)
            .is_some_and(editor::delete_backward)
    }
}

// ============================================================================
// Tests
// ============================================================================
