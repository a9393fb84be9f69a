// SPDX-License-Identifier: GPL-3.0-only

//! Programmatic control of the keyboard.
//!
//! External callers (a toggle button, other parts of the application) show,
//! hide or toggle the keyboard through a [`ControlHandle`]. Requests travel
//! over a channel to the session that owns the [`Keyboard`](crate::keyboard::Keyboard),
//! which answers each one with the resulting visibility.
//!
//! # Interface
//!
//! - `show(target)`: show against `target`, the focused element, or the
//!   default target
//! - `hide()`
//! - `toggle()`: returns the visibility after the toggle

pub mod session;

pub use session::{run_session, Frontend, Session};

use crate::app_settings;
use crate::editor::TargetId;
use futures::channel::{mpsc, oneshot};
use futures::SinkExt;
use std::fmt;

/// Commands accepted by the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Show the keyboard, optionally against a specific element.
    Show(Option<TargetId>),
    /// Hide the keyboard.
    Hide,
    /// Toggle the keyboard visibility.
    Toggle,
}

/// A command plus the channel its result is sent back on.
#[derive(Debug)]
pub struct ControlRequest {
    pub command: ControlCommand,
    /// Receives the visibility after the command ran.
    pub reply: oneshot::Sender<bool>,
}

/// Result type for control operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur while controlling the keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    /// The session has stopped and no longer accepts commands.
    SessionClosed,
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlError::SessionClosed => write!(f, "Keyboard session is not running"),
        }
    }
}

impl std::error::Error for ControlError {}

/// Cloneable handle for sending control commands to a running session.
#[derive(Debug, Clone)]
pub struct ControlHandle {
    command_tx: mpsc::Sender<ControlRequest>,
}

/// Creates a control handle and the receiver a session reads from.
pub fn control_channel() -> (ControlHandle, mpsc::Receiver<ControlRequest>) {
    let (command_tx, command_rx) = mpsc::channel(app_settings::CONTROL_CHANNEL_CAPACITY);
    (ControlHandle { command_tx }, command_rx)
}

impl ControlHandle {
    /// Sends a command and waits for the resulting visibility.
    pub async fn send(&self, command: ControlCommand) -> ControlResult<bool> {
        tracing::debug!("Control: {:?}", command);
        let (reply, reply_rx) = oneshot::channel();

        let mut command_tx = self.command_tx.clone();
        command_tx
            .send(ControlRequest { command, reply })
            .await
            .map_err(|_| ControlError::SessionClosed)?;

        reply_rx.await.map_err(|_| ControlError::SessionClosed)
    }

    /// Shows the keyboard.
    pub async fn show(&self, target: Option<TargetId>) -> ControlResult<bool> {
        self.send(ControlCommand::Show(target)).await
    }

    /// Hides the keyboard.
    pub async fn hide(&self) -> ControlResult<bool> {
        self.send(ControlCommand::Hide).await
    }

    /// Toggles the keyboard and returns the new visibility.
    pub async fn toggle(&self) -> ControlResult<bool> {
        self.send(ControlCommand::Toggle).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    /// Test: error types can be displayed.
    #[test]
    fn test_control_error_display() {
        assert!(ControlError::SessionClosed.to_string().contains("not running"));
    }

    /// Test: methods send the matching command and return the reply.
    #[tokio::test]
    async fn test_handle_sends_commands() {
        let (handle, mut rx) = control_channel();

        let responder = tokio::spawn(async move {
            let mut seen = Vec::new();
            while let Some(request) = rx.next().await {
                let visible = !matches!(request.command, ControlCommand::Hide);
                seen.push(request.command);
                let _ = request.reply.send(visible);
            }
            seen
        });

        assert_eq!(handle.show(Some(TargetId(3))).await, Ok(true));
        assert_eq!(handle.hide().await, Ok(false));
        assert_eq!(handle.toggle().await, Ok(true));
        drop(handle);

        let seen = responder.await.unwrap();
        assert_eq!(
            seen,
            vec![
                ControlCommand::Show(Some(TargetId(3))),
                ControlCommand::Hide,
                ControlCommand::Toggle,
            ]
        );
    }

    /// Test: a dropped session surfaces as SessionClosed.
    #[tokio::test]
    async fn test_closed_session() {
        let (handle, rx) = control_channel();
        drop(rx);

        assert_eq!(handle.toggle().await, Err(ControlError::SessionClosed));
    }

    /// Test: a request dropped without reply surfaces as SessionClosed.
    #[tokio::test]
    async fn test_unanswered_request() {
        let (handle, mut rx) = control_channel();

        let dropper = tokio::spawn(async move {
            if let Some(request) = rx.next().await {
                drop(request);
            }
        });

        assert_eq!(handle.hide().await, Err(ControlError::SessionClosed));
        dropper.await.unwrap();
    }
}
