// SPDX-License-Identifier: GPL-3.0-only

//! The keyboard controller.
//!
//! [`Keyboard`] owns the modifier state, the input router and the layout. It
//! consumes [`KeyboardEvent`]s from the host and answers with [`Effect`]s:
//! redraw requests, visibility changes, focus requests and timers to
//! schedule. It never sleeps or spawns anything itself; whoever drives it
//! (see [`crate::control::run_session`]) executes the timers and feeds
//! [`KeyboardEvent::TimerFired`] back in.

use std::time::Duration;

use crate::config::{BackspaceTarget, KeyboardConfig, Timings};
use crate::control::ControlCommand;
use crate::editor::{SurfaceHost, TargetId, TargetKind};
use crate::input::{parse_key_id, ActionKey, KeyId, ModifierState, ShiftToken};
use crate::layout::Layout;
use crate::renderer::{render_rows, KeyboardView};
use crate::router::{FocusLossToken, InputRouter, InteractionToken};

/// A delayed callback requested by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    /// Auto-release of one shift activation.
    ShiftRelease(ShiftToken),
    /// Hide decision after focus left an element.
    FocusLoss(FocusLossToken),
    /// End of a pointer interaction with the keyboard surface.
    InteractionRelease(InteractionToken),
}

/// Events delivered to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyboardEvent {
    /// A key on the surface was pressed. Contains the layout identifier.
    KeyPressed(String),
    /// Focus entered an element.
    FocusIn { target: TargetId, kind: TargetKind },
    /// Focus left an element.
    FocusOut { target: TargetId },
    /// Pointer went down over the keyboard surface.
    PointerDown,
    /// Pointer went up anywhere.
    PointerUp,
    /// A timer scheduled through [`Effect::Schedule`] expired.
    TimerFired(Timer),
    /// The host destroyed an element.
    TargetRemoved(TargetId),
    /// A programmatic control request or a toggle-button press.
    Command(ControlCommand),
}

/// Work the driver must carry out after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Labels or highlighting changed; rebuild the view.
    Render,
    /// The surface was shown (`true`) or hidden (`false`).
    VisibilityChanged(bool),
    /// Call back with `TimerFired(timer)` after `delay`.
    Schedule { timer: Timer, delay: Duration },
    /// Give keyboard focus back to the element receiving text.
    Focus(TargetId),
}

/// Keyboard controller state.
#[derive(Debug, Clone)]
pub struct Keyboard {
    layout: Layout,
    modifiers: ModifierState,
    router: InputRouter,
    backspace_target: BackspaceTarget,
    timings: Timings,
    effects: Vec<Effect>,
    needs_render: bool,
}

impl Keyboard {
    /// Creates a controller typing into `default_target` when nothing else
    /// has focus.
    ///
    /// With `show_on_startup` the keyboard starts visible against the
    /// default target.
    pub fn new(layout: Layout, default_target: TargetId, config: &KeyboardConfig) -> Self {
        let mut keyboard = Self {
            layout,
            modifiers: ModifierState::new(),
            router: InputRouter::new(default_target),
            backspace_target: config.backspace_target,
            timings: config.timings(),
            effects: Vec::new(),
            needs_render: true,
        };

        if config.show_on_startup {
            keyboard.show(Some(default_target));
        }

        keyboard
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn modifiers(&self) -> &ModifierState {
        &self.modifiers
    }

    pub fn router(&self) -> &InputRouter {
        &self.router
    }

    pub fn visible(&self) -> bool {
        self.router.visible()
    }

    pub fn active_target(&self) -> TargetId {
        self.router.active_target()
    }

    /// Builds the current view for the drawing layer.
    pub fn view(&self) -> KeyboardView {
        KeyboardView {
            visible: self.router.visible(),
            rows: render_rows(&self.layout, &self.modifiers),
        }
    }

    /// Drains the effects accumulated since the last call.
    ///
    /// A pending render request is appended once, at the end.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        if std::mem::take(&mut self.needs_render) {
            self.effects.push(Effect::Render);
        }
        std::mem::take(&mut self.effects)
    }

    // ========================================================================
    // Event dispatch
    // ========================================================================

    /// Handles one event and returns the resulting effects.
    pub fn handle<H: SurfaceHost + ?Sized>(
        &mut self,
        event: KeyboardEvent,
        host: &mut H,
    ) -> Vec<Effect> {
        match event {
            KeyboardEvent::KeyPressed(identifier) => self.press_key(&identifier, host),
            KeyboardEvent::FocusIn { target, kind } => {
                self.with_visibility(|router| router.focus_in(target, kind));
            }
            KeyboardEvent::FocusOut { target } => {
                let token = self.router.focus_out(target);
                self.schedule(Timer::FocusLoss(token), self.timings.focus_debounce);
            }
            KeyboardEvent::PointerDown => self.router.pointer_down(),
            KeyboardEvent::PointerUp => {
                if let Some(token) = self.router.pointer_up() {
                    self.schedule(
                        Timer::InteractionRelease(token),
                        self.timings.interaction_release,
                    );
                }
            }
            KeyboardEvent::TimerFired(timer) => self.timer_fired(timer),
            KeyboardEvent::TargetRemoved(target) => self.router.target_removed(target),
            KeyboardEvent::Command(command) => {
                self.execute(command);
            }
        }

        self.take_effects()
    }

    /// Executes a control command.
    ///
    /// A command that leaves the keyboard visible also hands focus to the
    /// active target.
    ///
    /// # Returns
    ///
    /// The visibility after the command
    pub fn execute(&mut self, command: ControlCommand) -> bool {
        match command {
            ControlCommand::Show(target) => self.show(target),
            ControlCommand::Hide => self.hide(),
            ControlCommand::Toggle => {
                self.toggle();
            }
        }

        let visible = self.visible();
        if visible {
            self.effects.push(Effect::Focus(self.router.active_target()));
        }
        visible
    }

    /// Shows the keyboard against `target`, the focused element, or the
    /// default target.
    pub fn show(&mut self, target: Option<TargetId>) {
        self.with_visibility(|router| router.show(target));
    }

    /// Hides the keyboard.
    pub fn hide(&mut self) {
        self.with_visibility(InputRouter::hide);
    }

    /// Flips visibility.
    ///
    /// # Returns
    ///
    /// The resulting visibility
    pub fn toggle(&mut self) -> bool {
        self.with_visibility(|router| {
            router.toggle();
        });
        self.visible()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn press_key<H: SurfaceHost + ?Sized>(&mut self, identifier: &str, host: &mut H) {
        match parse_key_id(identifier) {
            KeyId::Character(c) => {
                let committed = self.modifiers.compute_display_char(c);
                let mut buf = [0u8; 4];
                self.router.insert_text(host, committed.encode_utf8(&mut buf));
                self.consume_shift();
            }
            KeyId::Action(ActionKey::Backspace) => {
                self.router.delete_backward(host, self.backspace_target);
            }
            KeyId::Action(ActionKey::CapsLock) => {
                self.modifiers.toggle_caps_lock();
                self.needs_render = true;
            }
            KeyId::Action(ActionKey::Shift) => {
                if let Some(token) = self.modifiers.toggle_shift() {
                    self.schedule(Timer::ShiftRelease(token), self.timings.shift_release);
                }
                self.needs_render = true;
            }
            KeyId::Action(action) => {
                if let Some(text) = action.inserted_text() {
                    self.router.insert_text(host, text);
                }
            }
            KeyId::Unknown(name) => {
                tracing::debug!("Unknown key '{}' contributes no text", name);
                self.router.insert_text(host, "");
                self.consume_shift();
            }
        }

        self.effects.push(Effect::Focus(self.router.active_target()));
    }

    fn consume_shift(&mut self) {
        if self.modifiers.consume_shift_if_active() {
            self.needs_render = true;
        }
    }

    fn timer_fired(&mut self, timer: Timer) {
        match timer {
            Timer::ShiftRelease(token) => {
                if self.modifiers.release_shift(token) {
                    self.needs_render = true;
                }
            }
            Timer::FocusLoss(token) => {
                self.with_visibility(|router| {
                    router.focus_loss_elapsed(token);
                });
            }
            Timer::InteractionRelease(token) => self.router.release_interaction(token),
        }
    }

    fn schedule(&mut self, timer: Timer, delay: Duration) {
        self.effects.push(Effect::Schedule { timer, delay });
    }

    /// Runs a router transition and reports a visibility change, if any.
    fn with_visibility(&mut self, transition: impl FnOnce(&mut InputRouter)) {
        let before = self.router.visible();
        transition(&mut self.router);
        let after = self.router.visible();

        if before != after {
            self.effects.push(Effect::VisibilityChanged(after));
            self.needs_render = true;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
