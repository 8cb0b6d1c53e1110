//! Raw button acquisition.
//!
//! Most buttons sit behind a 74HC165 parallel-in/serial-out shift register
//! that is bit-banged once per poll tick; the Start button and the mode
//! control button are wired to GPIO directly. Everything is active low on
//! the wire; the sampler normalizes polarity so a set bit in [`RawSample`]
//! always means "asserted".

use rppal::gpio::{Gpio, InputPin, OutputPin};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::InputError;

// 74HC165 shift register pins (BCM numbering)
pub const SR_LOAD_PIN: u8 = 17; // SH/LD - latch
pub const SR_CLOCK_PIN: u8 = 27; // CLK
pub const SR_DATA_PIN: u8 = 22; // QH - serial data out

// Direct GPIO buttons
pub const START_BUTTON_PIN: u8 = 23;
pub const MODE_BUTTON_PIN: u8 = 24;

/// Minimum latch/clock pulse width. The 74HC165 needs tens of nanoseconds;
/// one microsecond leaves margin without hurting the tick budget.
pub const SR_PULSE_WIDTH: Duration = Duration::from_micros(1);

// Shift register bit positions (QA..QH on the input side)
const SR_BIT_RMAGNASAVE: u8 = 0;
const SR_BIT_RFLIPPER: u8 = 1;
const SR_BIT_PLUNGER: u8 = 2;
const SR_BIT_SPECIAL: u8 = 4;
const SR_BIT_LMAGNASAVE: u8 = 6;
const SR_BIT_LFLIPPER: u8 = 7;

/// Identity of each physical input. Fixed at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonId {
    LeftFlipper,
    RightFlipper,
    Plunger,
    Special,
    Start,
    LeftNudge,
    RightNudge,
}

impl ButtonId {
    pub const ALL: [ButtonId; 7] = [
        ButtonId::LeftFlipper,
        ButtonId::RightFlipper,
        ButtonId::Plunger,
        ButtonId::Special,
        ButtonId::Start,
        ButtonId::LeftNudge,
        ButtonId::RightNudge,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Bit position of this button inside a [`RawSample`].
    pub fn index(self) -> usize {
        match self {
            ButtonId::LeftFlipper => 0,
            ButtonId::RightFlipper => 1,
            ButtonId::Plunger => 2,
            ButtonId::Special => 3,
            ButtonId::Start => 4,
            ButtonId::LeftNudge => 5,
            ButtonId::RightNudge => 6,
        }
    }
}

/// One normalized snapshot of every button line, one bit per [`ButtonId`],
/// 1 = asserted. Produced fresh every poll tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawSample(u16);

impl RawSample {
    pub fn asserted(self, button: ButtonId) -> bool {
        self.0 & (1 << button.index()) != 0
    }

    pub fn with(self, button: ButtonId) -> Self {
        RawSample(self.0 | (1 << button.index()))
    }

    /// Builds a sample from an active-low shift register byte plus the
    /// direct-GPIO Start line level.
    pub fn from_shift_register(word: u8, start_low: bool) -> Self {
        let mut sample = RawSample::default();
        let low = |bit: u8| word & (1 << bit) == 0;
        if low(SR_BIT_LFLIPPER) {
            sample = sample.with(ButtonId::LeftFlipper);
        }
        if low(SR_BIT_RFLIPPER) {
            sample = sample.with(ButtonId::RightFlipper);
        }
        if low(SR_BIT_PLUNGER) {
            sample = sample.with(ButtonId::Plunger);
        }
        if low(SR_BIT_SPECIAL) {
            sample = sample.with(ButtonId::Special);
        }
        if low(SR_BIT_LMAGNASAVE) {
            sample = sample.with(ButtonId::LeftNudge);
        }
        if low(SR_BIT_RMAGNASAVE) {
            sample = sample.with(ButtonId::RightNudge);
        }
        if start_low {
            sample = sample.with(ButtonId::Start);
        }
        sample
    }
}

/// Source of raw button snapshots. The hardware sampler implements this;
/// tests inject a scripted fake so debouncing and arbitration can be
/// exercised without pins.
pub trait RawSource: Send {
    /// Non-blocking, bounded-latency snapshot of all button lines.
    /// Always returns a full mask; a misread bit simply participates in
    /// debouncing like a real bounce.
    fn sample(&mut self) -> RawSample;
}

/// Level source for the mode-cycle control line.
pub trait ControlLine: Send {
    fn is_pressed(&mut self) -> bool;
}

/// Hardware sampler: 74HC165 bit-bang plus the direct Start line.
pub struct ShiftRegisterSampler {
    load: OutputPin,
    clock: OutputPin,
    data: InputPin,
    start: InputPin,
}

impl ShiftRegisterSampler {
    pub fn new(gpio: &Gpio) -> Result<Self, InputError> {
        let pin = |n: u8| {
            gpio.get(n)
                .map_err(|e| InputError::InitializationError(format!("GPIO {}: {}", n, e)))
        };

        let sampler = Self {
            load: pin(SR_LOAD_PIN)?.into_output_high(),
            clock: pin(SR_CLOCK_PIN)?.into_output_low(),
            data: pin(SR_DATA_PIN)?.into_input(),
            start: pin(START_BUTTON_PIN)?.into_input_pullup(),
        };
        info!(
            "Shift register sampler ready (load={}, clk={}, data={}, start={})",
            SR_LOAD_PIN, SR_CLOCK_PIN, SR_DATA_PIN, START_BUTTON_PIN
        );
        Ok(sampler)
    }

    /// Latches the parallel inputs and clocks out 8 bits MSB-first,
    /// sampling the data line before each clock pulse.
    fn read_register(&mut self) -> u8 {
        self.load.set_low();
        spin_wait(SR_PULSE_WIDTH);
        self.load.set_high();

        let mut word = 0u8;
        for _ in 0..8 {
            word <<= 1;
            if self.data.is_high() {
                word |= 1;
            }
            self.clock.set_high();
            spin_wait(SR_PULSE_WIDTH);
            self.clock.set_low();
            spin_wait(SR_PULSE_WIDTH);
        }
        word
    }
}

impl RawSource for ShiftRegisterSampler {
    fn sample(&mut self) -> RawSample {
        let word = self.read_register();
        let sample = RawSample::from_shift_register(word, self.start.is_low());
        if sample != RawSample::default() {
            debug!("Raw sample: {:?} (register 0x{:02X})", sample, word);
        }
        sample
    }
}

/// Mode-cycle control line on direct GPIO, active low with pull-up.
pub struct GpioControlLine {
    pin: InputPin,
}

impl GpioControlLine {
    pub fn new(gpio: &Gpio) -> Result<Self, InputError> {
        let pin = gpio
            .get(MODE_BUTTON_PIN)
            .map_err(|e| {
                InputError::InitializationError(format!("GPIO {}: {}", MODE_BUTTON_PIN, e))
            })?
            .into_input_pullup();
        Ok(Self { pin })
    }
}

impl ControlLine for GpioControlLine {
    fn is_pressed(&mut self) -> bool {
        self.pin.is_low()
    }
}

/// Busy-wait for sub-microsecond to low-microsecond pulse widths. Sleeping
/// would blow the tick budget; the bounded spin is the only intentional
/// blocking in the sampling path.
fn spin_wait(duration: Duration) {
    let start = Instant::now();
    while start.elapsed() < duration {
        std::hint::spin_loop();
    }
}
