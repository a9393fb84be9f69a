// SPDX-License-Identifier: GPL-3.0-only

//! The event loop that drives a [`Keyboard`].
//!
//! A session serializes everything that touches keyboard state: host events,
//! control requests and expired timers are handled one at a time, in the
//! order they arrive. Timers requested through [`Effect::Schedule`] run as
//! tokio sleeps whose expiry is fed back into the same loop.

use std::time::Duration;

use futures::channel::mpsc;
use futures::StreamExt;

use crate::control::ControlRequest;
use crate::editor::{SurfaceHost, TargetId};
use crate::keyboard::{Effect, Keyboard, KeyboardEvent, Timer};
use crate::renderer::KeyboardView;

/// The drawing and focus side of the host.
///
/// All methods default to doing nothing.
pub trait Frontend {
    /// Redraw the keyboard surface.
    fn render(&mut self, _view: &KeyboardView) {}

    /// Show or hide the surface, and update any toggle-button indicator.
    fn visibility_changed(&mut self, _visible: bool) {}

    /// Move input focus back to `target`.
    fn focus(&mut self, _target: TargetId) {}
}

impl Frontend for () {}

/// A keyboard bound to its host and frontend.
pub struct Session<H, F> {
    keyboard: Keyboard,
    host: H,
    frontend: F,
    timer_tx: mpsc::UnboundedSender<Timer>,
    timer_rx: mpsc::UnboundedReceiver<Timer>,
}

impl<H, F> std::fmt::Debug for Session<H, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("keyboard", &self.keyboard)
            .finish_non_exhaustive()
    }
}

impl<H: SurfaceHost, F: Frontend> Session<H, F> {
    pub fn new(keyboard: Keyboard, host: H, frontend: F) -> Self {
        let (timer_tx, timer_rx) = mpsc::unbounded();
        Self {
            keyboard,
            host,
            frontend,
            timer_tx,
            timer_rx,
        }
    }

    /// Runs until both the event and the control channels are closed.
    ///
    /// Timers still pending at that point are abandoned.
    ///
    /// # Returns
    ///
    /// The keyboard, host and frontend, for inspection or reuse.
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<KeyboardEvent>,
        mut control: mpsc::Receiver<ControlRequest>,
    ) -> (Keyboard, H, F) {
        let startup = self.keyboard.take_effects();
        self.apply(startup);

        let mut events_open = true;
        let mut control_open = true;

        while events_open || control_open {
            tokio::select! {
                event = events.next(), if events_open => match event {
                    Some(event) => self.dispatch(event),
                    None => events_open = false,
                },
                request = control.next(), if control_open => match request {
                    Some(request) => self.serve(request),
                    None => control_open = false,
                },
                Some(timer) = self.timer_rx.next() => {
                    self.dispatch(KeyboardEvent::TimerFired(timer));
                }
            }
        }

        tracing::debug!("Keyboard session finished");
        (self.keyboard, self.host, self.frontend)
    }

    fn dispatch(&mut self, event: KeyboardEvent) {
        let effects = self.keyboard.handle(event, &mut self.host);
        self.apply(effects);
    }

    fn serve(&mut self, request: ControlRequest) {
        let visible = self.keyboard.execute(request.command);
        let effects = self.keyboard.take_effects();
        self.apply(effects);

        if request.reply.send(visible).is_err() {
            tracing::debug!("Control caller went away before the reply");
        }
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Render => self.frontend.render(&self.keyboard.view()),
                Effect::VisibilityChanged(visible) => self.frontend.visibility_changed(visible),
                Effect::Focus(target) => self.frontend.focus(target),
                Effect::Schedule { timer, delay } => self.schedule(timer, delay),
            }
        }
    }

    fn schedule(&self, timer: Timer, delay: Duration) {
        let timer_tx = self.timer_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The session may have finished in the meantime
            let _ = timer_tx.unbounded_send(timer);
        });
    }
}

/// Convenience wrapper around [`Session::new`] and [`Session::run`].
pub async fn run_session<H: SurfaceHost, F: Frontend>(
    keyboard: Keyboard,
    host: H,
    frontend: F,
    events: mpsc::UnboundedReceiver<KeyboardEvent>,
    control: mpsc::Receiver<ControlRequest>,
) -> (Keyboard, H, F) {
    Session::new(keyboard, host, frontend).run(events, control).await
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeyboardConfig;
    use crate::control::control_channel;
    use crate::editor::{TargetKind, TextBuffer, TextSurface};
    use crate::layout::default_layout;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    const DEFAULT: TargetId = TargetId(0);
    const FIELD: TargetId = TargetId(1);

    /// Frontend that records what it was asked to do.
    #[derive(Debug, Default, Clone)]
    struct Recorder {
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Recorder {
        fn entries(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }
    }

    impl Frontend for Recorder {
        fn render(&mut self, view: &KeyboardView) {
            let shift = view
                .rows
                .iter()
                .flatten()
                .any(|key| key.identifier == "Shift" && key.active);
            self.log.lock().unwrap().push(format!("render shift={}", shift));
        }

        fn visibility_changed(&mut self, visible: bool) {
            self.log.lock().unwrap().push(format!("visible={}", visible));
        }

        fn focus(&mut self, target: TargetId) {
            self.log.lock().unwrap().push(format!("focus {}", target));
        }
    }

    fn host() -> HashMap<TargetId, TextBuffer> {
        let mut host = HashMap::new();
        host.insert(DEFAULT, TextBuffer::new());
        host.insert(FIELD, TextBuffer::new());
        host
    }

    fn keyboard() -> Keyboard {
        Keyboard::new(default_layout().unwrap(), DEFAULT, &KeyboardConfig::default())
    }

    fn key(id: &str) -> KeyboardEvent {
        KeyboardEvent::KeyPressed(id.to_string())
    }

    #[tokio::test(start_paused = true)]
    async fn test_shift_auto_releases_after_window() {
        let (events_tx, events_rx) = mpsc::unbounded();
        let (handle, control_rx) = control_channel();
        let recorder = Recorder::default();
        let session = tokio::spawn(run_session(
            keyboard(),
            host(),
            recorder.clone(),
            events_rx,
            control_rx,
        ));

        events_tx.unbounded_send(key("Shift")).unwrap();
        tokio::time::sleep(Duration::from_millis(2999)).await;
        assert_eq!(recorder.entries().last().map(String::as_str), Some("render shift=true"));

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(recorder.entries().last().map(String::as_str), Some("render shift=false"));

        drop(events_tx);
        drop(handle);
        let (keyboard, _, _) = session.await.unwrap();
        assert!(!keyboard.modifiers().shift_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_shift_activation_restarts_window() {
        let (events_tx, events_rx) = mpsc::unbounded();
        let (handle, control_rx) = control_channel();
        let session = tokio::spawn(run_session(keyboard(), host(), (), events_rx, control_rx));

        events_tx.unbounded_send(key("Shift")).unwrap();
        tokio::time::sleep(Duration::from_millis(1000)).await;
        events_tx.unbounded_send(key("Shift")).unwrap();
        events_tx.unbounded_send(key("Shift")).unwrap();

        // 3500 ms after the first activation, 2500 ms after the second
        tokio::time::sleep(Duration::from_millis(2500)).await;
        events_tx.unbounded_send(key("a")).unwrap();

        drop(events_tx);
        drop(handle);
        let (keyboard, host, _) = session.await.unwrap();

        assert_eq!(host[&DEFAULT].text(), "A", "Shift from the second activation still applies");
        assert!(!keyboard.modifiers().shift_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_focus_loss_hides_after_debounce() {
        let (events_tx, events_rx) = mpsc::unbounded();
        let (handle, control_rx) = control_channel();
        let recorder = Recorder::default();
        let session = tokio::spawn(run_session(
            keyboard(),
            host(),
            recorder.clone(),
            events_rx,
            control_rx,
        ));

        events_tx
            .unbounded_send(KeyboardEvent::FocusIn { target: FIELD, kind: TargetKind::Input })
            .unwrap();
        events_tx.unbounded_send(KeyboardEvent::FocusOut { target: FIELD }).unwrap();

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!recorder.entries().contains(&"visible=false".to_string()));

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(recorder.entries().contains(&"visible=false".to_string()));

        // Control requests are served by the same loop
        assert_eq!(handle.toggle().await, Ok(true));

        drop(events_tx);
        drop(handle);
        let (keyboard, _, _) = session.await.unwrap();
        assert!(keyboard.visible());
        assert_eq!(keyboard.active_target(), DEFAULT);
    }

    #[tokio::test(start_paused = true)]
    async fn test_key_press_does_not_hide_keyboard() {
        let (events_tx, events_rx) = mpsc::unbounded();
        let (handle, control_rx) = control_channel();
        let recorder = Recorder::default();
        let session = tokio::spawn(run_session(
            keyboard(),
            host(),
            recorder.clone(),
            events_rx,
            control_rx,
        ));

        events_tx
            .unbounded_send(KeyboardEvent::FocusIn { target: FIELD, kind: TargetKind::Input })
            .unwrap();
        events_tx.unbounded_send(KeyboardEvent::PointerDown).unwrap();
        events_tx.unbounded_send(KeyboardEvent::FocusOut { target: FIELD }).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        events_tx.unbounded_send(key("k")).unwrap();
        events_tx.unbounded_send(KeyboardEvent::PointerUp).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        drop(events_tx);
        drop(handle);
        let (keyboard, host, _) = session.await.unwrap();

        assert!(keyboard.visible());
        assert!(!keyboard.router().has_pending_interaction());
        assert_eq!(host[&FIELD].text(), "k");
        assert!(recorder.entries().contains(&format!("focus {}", FIELD)));
        assert!(!recorder.entries().contains(&"visible=false".to_string()));
    }

    #[tokio::test]
    async fn test_session_reports_startup_visibility() {
        let (events_tx, events_rx) = mpsc::unbounded::<KeyboardEvent>();
        let (handle, control_rx) = control_channel();
        let recorder = Recorder::default();

        drop(events_tx);
        drop(handle);
        run_session(keyboard(), host(), recorder.clone(), events_rx, control_rx).await;

        assert_eq!(recorder.entries(), vec!["visible=true", "render shift=false"]);
    }
}
