//! Application-wide constants for tuning and configuration
//!
//! Centralizes magic numbers to make them discoverable and configurable.

/// Default completion budget for a generated draft.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Default sampling temperature for draft generation.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Implicit-TLS SMTP submission port (RFC 8314).
pub const DEFAULT_SMTP_PORT: u16 = 465;

/// Error message display duration in seconds before auto-dismiss.
pub const ERROR_TTL_SECS: u64 = 8;

/// Input poll interval for the event loop in milliseconds.
pub const INPUT_POLL_MS: u64 = 150;

/// Height of the task input box in lines (including borders).
pub const TASK_BOX_HEIGHT: u16 = 7;

/// Lines scrolled per step in the preview body.
pub const BODY_SCROLL_STEP: u16 = 1;
