//! Solenoid haptics behind the [`HapticSink`] trait.

use chrono::{DateTime, Local};
use rppal::gpio::{Gpio, OutputPin};
use tracing::{debug, info};

use super::FeedbackError;
use crate::input::engine::HapticSink;
use crate::layout::HapticChannel;

pub const LEFT_SOLENOID_PIN: u8 = 26;
pub const RIGHT_SOLENOID_PIN: u8 = 25;

/// Kick width for pulse cues. Long enough to feel, short enough that the
/// coil never sits energized.
pub const SOLENOID_PULSE_MS: i64 = 30;

struct Coil {
    pin: OutputPin,
    pulse_until: Option<DateTime<Local>>,
}

impl Coil {
    fn drive(&mut self, on: bool) {
        if on {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
        // A direct level command overrides any pulse still in flight.
        self.pulse_until = None;
    }

    fn kick(&mut self, now: DateTime<Local>) {
        self.pin.set_high();
        self.pulse_until = Some(now + chrono::Duration::milliseconds(SOLENOID_PULSE_MS));
    }

    fn service(&mut self, now: DateTime<Local>) {
        if let Some(deadline) = self.pulse_until {
            if now >= deadline {
                self.pin.set_low();
                self.pulse_until = None;
            }
        }
    }
}

/// Two-coil solenoid driver. Pulse timing is serviced from the engine's
/// poll tick instead of spawning timers, so the driver stays lock-free.
pub struct SolenoidDriver {
    left: Coil,
    right: Coil,
}

impl SolenoidDriver {
    pub fn new(gpio: &Gpio) -> Result<Self, FeedbackError> {
        let coil = |pin: u8| -> Result<Coil, FeedbackError> {
            Ok(Coil {
                pin: gpio
                    .get(pin)
                    .map_err(|e| {
                        FeedbackError::InitializationError(format!("GPIO {}: {}", pin, e))
                    })?
                    .into_output_low(),
                pulse_until: None,
            })
        };
        let driver = Self {
            left: coil(LEFT_SOLENOID_PIN)?,
            right: coil(RIGHT_SOLENOID_PIN)?,
        };
        info!(
            "Solenoid driver ready (left={}, right={})",
            LEFT_SOLENOID_PIN, RIGHT_SOLENOID_PIN
        );
        Ok(driver)
    }

    fn coil(&mut self, channel: HapticChannel) -> &mut Coil {
        match channel {
            HapticChannel::Left => &mut self.left,
            HapticChannel::Right => &mut self.right,
        }
    }
}

impl HapticSink for SolenoidDriver {
    fn set_level(&mut self, channel: HapticChannel, on: bool) {
        debug!("Solenoid {:?} level {}", channel, on);
        self.coil(channel).drive(on);
    }

    fn pulse(&mut self, channel: HapticChannel) {
        debug!("Solenoid {:?} pulse {}ms", channel, SOLENOID_PULSE_MS);
        self.coil(channel).kick(Local::now());
    }

    fn service(&mut self, now: DateTime<Local>) {
        self.left.service(now);
        self.right.service(now);
    }
}

/// No-op sink for running without solenoid hardware attached.
pub struct NullHaptics;

impl HapticSink for NullHaptics {
    fn set_level(&mut self, _channel: HapticChannel, _on: bool) {}

    fn pulse(&mut self, _channel: HapticChannel) {}
}
