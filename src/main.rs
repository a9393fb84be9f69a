// SPDX-License-Identifier: GPL-3.0-only

//! Tapboard demo driver
//!
//! Runs a keyboard session against a single in-memory text buffer. Each line
//! read from stdin is pressed as one key identifier (`a`, `Shift`,
//! `Backspace`, `U+00E9`, ...). Lines starting with `:` are control commands:
//! `:show`, `:hide` and `:toggle`. The buffer contents are printed on exit.

use std::collections::HashMap;
use std::process::ExitCode;

use futures::channel::mpsc;
use tokio::io::{AsyncBufReadExt, BufReader};

use tapboard::control::ControlResult;
use tapboard::layout::load_layout;
use tapboard::renderer::KeyboardView;
use tapboard::{
    app_settings, control_channel, run_session, ControlHandle, Frontend, Keyboard, KeyboardConfig,
    KeyboardEvent, TargetId, TextBuffer, TextSurface,
};

const BUFFER: TargetId = TargetId(0);

/// Frontend that reports surface changes through the log.
struct LogFrontend;

impl Frontend for LogFrontend {
    fn render(&mut self, view: &KeyboardView) {
        let active: Vec<&str> = view
            .rows
            .iter()
            .flatten()
            .filter(|key| key.active)
            .map(|key| key.identifier.as_str())
            .collect();
        tracing::debug!("Render (active modifiers: {:?})", active);
    }

    fn visibility_changed(&mut self, visible: bool) {
        tracing::info!("Keyboard {}", if visible { "shown" } else { "hidden" });
    }
}

async fn run_command(handle: &ControlHandle, command: &str) -> ControlResult<()> {
    let visible = match command {
        "show" => handle.show(None).await?,
        "hide" => handle.hide().await?,
        "toggle" => handle.toggle().await?,
        other => {
            tracing::warn!("Unknown command ':{}'", other);
            return Ok(());
        }
    };
    tracing::info!("Visible after :{} -> {}", command, visible);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "tapboard=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting {}", app_settings::APP_ID);

    let config = KeyboardConfig::load_or_default(app_settings::CONFIG_FILE_NAME);
    let layout = match load_layout(config.layout_path.as_deref()) {
        Ok(layout) => layout,
        Err(e) => {
            tracing::error!("Failed to load layout: {}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("Loaded layout '{}' with {} keys", layout.name, layout.key_count());

    let mut host = HashMap::new();
    host.insert(BUFFER, TextBuffer::new());

    let (events_tx, events_rx) = mpsc::unbounded();
    let (handle, control_rx) = control_channel();
    let keyboard = Keyboard::new(layout, BUFFER, &config);
    let session = tokio::spawn(run_session(keyboard, host, LogFrontend, events_rx, control_rx));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Failed to read stdin: {}", e);
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix(':') {
            if let Err(e) = run_command(&handle, command).await {
                tracing::error!("{}", e);
                break;
            }
        } else if events_tx
            .unbounded_send(KeyboardEvent::KeyPressed(line.to_string()))
            .is_err()
        {
            tracing::error!("Keyboard session stopped unexpectedly");
            break;
        }
    }

    drop(events_tx);
    drop(handle);

    match session.await {
        Ok((_, host, _)) => {
            if let Some(buffer) = host.get(&BUFFER) {
                println!("{}", buffer.text());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Keyboard session failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
