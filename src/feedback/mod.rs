//! Cosmetic and tactile feedback: the WS2812 cabinet LED strip and the
//! flipper solenoids. Thin hardware wrappers only; nothing here feeds back
//! into the input path.

pub mod haptic;
pub mod led;

pub use haptic::SolenoidDriver;
pub use led::{run_led_task, LedDriver, Ws2812Strip};

/// Errors from the feedback subsystem.
#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("Failed to initialize feedback hardware: {0}")]
    InitializationError(String),

    #[error("Feedback driver error: {0}")]
    DriverError(String),
}
