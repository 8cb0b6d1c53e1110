//! Input subsystem: buttons and accelerometer into HID output actions.
//!
//! Implements a four-stage processing pipeline:
//!
//! 1. [`sampler`] - Raw button acquisition (shift register + direct GPIO)
//! 2. [`debouncer`] - Stable edge detection from the noisy raw stream
//! 3. [`nudge`] - Accelerometer gesture detection (calibrate, threshold, pulse)
//! 4. [`engine`] - Arbitration of both sources into one emitted event stream
//!
//! # Architecture
//!
//! ```text
//! Shift register ──► Sampler ──► Debouncer ──┐
//!                                            ├──► Arbiter ──► OutputEmitter
//! Accelerometer  ──► Nudge detector ─────────┘
//! ```
//!
//! The whole pipeline runs sequentially on a single tokio task once per poll
//! tick. That ordering is load-bearing: the arbitration rule reads the nudge
//! active flag and the per-button debounce state in the same tick, so the
//! button/nudge/HID path must never be split across tasks.

pub mod debouncer;
pub mod engine;
pub mod nudge;
pub mod sampler;

pub use engine::{DeviceStatus, EngineEvent, EngineHandle, EngineSettings};
pub use sampler::{ButtonId, RawSample};

/// Errors from the input subsystem.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Failed to initialize input hardware: {0}")]
    InitializationError(String),

    #[error("Sensor error: {0}")]
    SensorError(String),

    #[error("Failed to report engine event: {0}")]
    EventSendError(String),
}
