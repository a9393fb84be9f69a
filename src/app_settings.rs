// SPDX-License-Identifier: GPL-3.0-only

//! Centralized application settings and constants.

/// Application ID in RDNN (reverse domain name notation) format.
pub const APP_ID: &str = "io.github.tapboard.Tapboard";

/// Default config file name, looked up in the working directory by the binary.
pub const CONFIG_FILE_NAME: &str = "tapboard.json";

/// Name of the layout embedded in the binary.
pub const DEFAULT_LAYOUT_FILE: &str = "qwerty.json";

/// Delay after the most recent shift activation before shift auto-releases.
pub const SHIFT_RELEASE_MS: u64 = 3000;

/// Delay between a raw focus-out signal and the hide decision.
pub const FOCUS_LOSS_DEBOUNCE_MS: u64 = 50;

/// Delay after pointer-up before the pending keyboard interaction is cleared.
///
/// Zero means "on the next event loop tick".
pub const INTERACTION_RELEASE_MS: u64 = 0;

/// Capacity of the control command channel.
pub const CONTROL_CHANNEL_CAPACITY: usize = 16;
