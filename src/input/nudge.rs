//! Accelerometer nudge gesture detection.
//!
//! The accelerometer has no natural "release" moment, so a detected nudge is
//! modeled as an edge-triggered pulse: one Press, then an automatic Release
//! after [`NUDGE_PRESS_TIME_MS`]. A cooldown keeps a single shove of the
//! cabinet from spamming gestures.

use chrono::{DateTime, Local};
use rppal::i2c::I2c;
use tracing::{debug, info, warn};

use super::InputError;
use crate::layout::{NudgeAxes, NudgeDirection, NudgeMap, OutputAction};

/// Duration of the virtual button tap emitted per gesture.
pub const NUDGE_PRESS_TIME_MS: i64 = 50;
/// Minimum gap between gesture firings, measured from the firing timestamp.
pub const NUDGE_COOLDOWN_MS: i64 = 200;
/// Raw-unit deviation from baseline that counts as a nudge.
pub const NUDGE_THRESHOLD: i32 = 8000;
/// Samples averaged per axis during startup calibration.
pub const CALIBRATION_SAMPLES: u32 = 10;

/// Polled 3-axis acceleration source. Hardware lives behind this trait so
/// the detector can be tested with scripted readings.
pub trait Accelerometer: Send {
    /// One-time startup probe; a false result disables nudge detection for
    /// the whole session, with no retries.
    fn test_connection(&mut self) -> bool;

    fn read_acceleration(&mut self) -> Result<(i16, i16, i16), InputError>;
}

/// Press/release pulses produced by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeEvent {
    Press {
        action: OutputAction,
        direction: NudgeDirection,
    },
    Release {
        action: OutputAction,
    },
}

/// Gesture detector state: calibration baseline plus the active-pulse and
/// cooldown bookkeeping.
#[derive(Debug, Clone)]
pub struct NudgeDetector {
    enabled: bool,
    baseline_x: i32,
    baseline_y: i32,
    baseline_z: i32,
    active: Option<OutputAction>,
    nudge_start: DateTime<Local>,
    last_nudge: DateTime<Local>,
}

impl NudgeDetector {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            enabled: false,
            baseline_x: 0,
            baseline_y: 0,
            baseline_z: 0,
            active: None,
            // Back-dated so the first gesture is not stuck behind cooldown.
            nudge_start: now - chrono::Duration::milliseconds(NUDGE_COOLDOWN_MS),
            last_nudge: now - chrono::Duration::milliseconds(NUDGE_COOLDOWN_MS),
        }
    }

    /// One-time calibration: averages a burst of samples into the baseline.
    /// An unresponsive sensor leaves the detector permanently disabled.
    pub fn calibrate(&mut self, sensor: &mut dyn Accelerometer) {
        if !sensor.test_connection() {
            warn!("Accelerometer not responding, nudge detection disabled for this session");
            self.enabled = false;
            return;
        }

        let (mut sum_x, mut sum_y, mut sum_z) = (0i64, 0i64, 0i64);
        let mut collected = 0u32;
        for _ in 0..CALIBRATION_SAMPLES {
            match sensor.read_acceleration() {
                Ok((x, y, z)) => {
                    sum_x += x as i64;
                    sum_y += y as i64;
                    sum_z += z as i64;
                    collected += 1;
                }
                Err(e) => warn!("Calibration sample failed: {}", e),
            }
        }

        if collected == 0 {
            warn!("No calibration samples collected, nudge detection disabled");
            self.enabled = false;
            return;
        }

        self.baseline_x = (sum_x / collected as i64) as i32;
        self.baseline_y = (sum_y / collected as i64) as i32;
        self.baseline_z = (sum_z / collected as i64) as i32;
        self.enabled = true;
        info!(
            "Accelerometer calibrated over {} samples: baseline=({}, {}, {})",
            collected, self.baseline_x, self.baseline_y, self.baseline_z
        );
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// True while a gesture pulse is in flight; the arbitration layer uses
    /// this to suppress the physical nudge buttons.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Clears any in-flight pulse and cooldown (layout switch). The matching
    /// Release for an active pulse is the caller's responsibility.
    pub fn reset(&mut self, now: DateTime<Local>) {
        self.active = None;
        self.nudge_start = now - chrono::Duration::milliseconds(NUDGE_COOLDOWN_MS);
        self.last_nudge = now - chrono::Duration::milliseconds(NUDGE_COOLDOWN_MS);
    }

    /// One detector cycle. `allow_fire` gates new gestures (e.g. while the
    /// transport is disconnected) without stalling an in-flight release.
    pub fn tick(
        &mut self,
        now: DateTime<Local>,
        map: &NudgeMap,
        sensor: &mut dyn Accelerometer,
        allow_fire: bool,
    ) -> Option<NudgeEvent> {
        // 1. Auto-release: the pulse is what turns a continuous analog
        //    signal into a discrete keypress.
        if let Some(action) = self.active {
            if (now - self.nudge_start).num_milliseconds() >= NUDGE_PRESS_TIME_MS {
                self.active = None;
                debug!("Nudge pulse complete, releasing {:?}", action);
                return Some(NudgeEvent::Release { action });
            }
            return None;
        }

        // 2. Cooldown gate.
        if (now - self.last_nudge).num_milliseconds() < NUDGE_COOLDOWN_MS {
            return None;
        }

        if !self.enabled || !allow_fire {
            return None;
        }

        // 3. Sample, threshold, classify.
        let (ax, ay, _az) = match sensor.read_acceleration() {
            Ok(reading) => reading,
            Err(e) => {
                warn!("Accelerometer read failed: {}", e);
                return None;
            }
        };
        let delta_x = ax as i32 - self.baseline_x;
        let delta_y = ay as i32 - self.baseline_y;

        let direction = classify(delta_x, delta_y, map.axes)?;
        let action = map.action(direction)?;

        self.active = Some(action);
        self.nudge_start = now;
        self.last_nudge = now;
        info!(
            "Nudge {:?} (dx={}, dy={}) -> {:?}",
            direction, delta_x, delta_y, action
        );
        Some(NudgeEvent::Press { action, direction })
    }
}

/// Maps baseline deviations to a gesture direction under the layout's axis
/// policy; `None` when below threshold.
fn classify(delta_x: i32, delta_y: i32, axes: NudgeAxes) -> Option<NudgeDirection> {
    match axes {
        NudgeAxes::XOnly => {
            if delta_x.abs() < NUDGE_THRESHOLD {
                return None;
            }
            Some(if delta_x > 0 {
                NudgeDirection::Right
            } else {
                NudgeDirection::Left
            })
        }
        NudgeAxes::XAndY => {
            if delta_x.abs() < NUDGE_THRESHOLD && delta_y.abs() < NUDGE_THRESHOLD {
                return None;
            }
            if delta_x.abs() >= delta_y.abs() {
                Some(if delta_x > 0 {
                    NudgeDirection::Right
                } else {
                    NudgeDirection::Left
                })
            } else {
                Some(if delta_y > 0 {
                    NudgeDirection::Forward
                } else {
                    NudgeDirection::Back
                })
            }
        }
    }
}

// MPU6050 registers
const MPU6050_ADDR: u16 = 0x68;
const REG_PWR_MGMT_1: u8 = 0x6B;
const REG_WHO_AM_I: u8 = 0x75;
const REG_ACCEL_XOUT_H: u8 = 0x3B;
const WHO_AM_I_VALUE: u8 = 0x68;

/// MPU6050 over I2C. Thin register-level adapter; everything interesting
/// happens in [`NudgeDetector`].
pub struct Mpu6050 {
    i2c: I2c,
}

impl Mpu6050 {
    pub fn new(mut i2c: I2c) -> Result<Self, InputError> {
        i2c.set_slave_address(MPU6050_ADDR)
            .map_err(|e| InputError::SensorError(format!("set address: {}", e)))?;
        Ok(Self { i2c })
    }
}

impl Accelerometer for Mpu6050 {
    fn test_connection(&mut self) -> bool {
        let mut id = [0u8; 1];
        if let Err(e) = self.i2c.write_read(&[REG_WHO_AM_I], &mut id) {
            warn!("MPU6050 WHO_AM_I read failed: {}", e);
            return false;
        }
        if id[0] != WHO_AM_I_VALUE {
            warn!("Unexpected WHO_AM_I value 0x{:02X}", id[0]);
            return false;
        }
        // Out of sleep mode, internal clock.
        if let Err(e) = self.i2c.write(&[REG_PWR_MGMT_1, 0x00]) {
            warn!("MPU6050 wake failed: {}", e);
            return false;
        }
        info!("MPU6050 responding at 0x{:02X}", MPU6050_ADDR);
        true
    }

    fn read_acceleration(&mut self) -> Result<(i16, i16, i16), InputError> {
        let mut raw = [0u8; 6];
        self.i2c
            .write_read(&[REG_ACCEL_XOUT_H], &mut raw)
            .map_err(|e| InputError::SensorError(format!("accel burst read: {}", e)))?;
        Ok((
            i16::from_be_bytes([raw[0], raw[1]]),
            i16::from_be_bytes([raw[2], raw[3]]),
            i16::from_be_bytes([raw[4], raw[5]]),
        ))
    }
}

/// Stand-in for a sensor that never came up; keeps the rest of the input
/// path running with nudge detection disabled.
pub struct DisconnectedAccelerometer;

impl Accelerometer for DisconnectedAccelerometer {
    fn test_connection(&mut self) -> bool {
        false
    }

    fn read_acceleration(&mut self) -> Result<(i16, i16, i16), InputError> {
        Err(InputError::SensorError("no accelerometer".to_string()))
    }
}
