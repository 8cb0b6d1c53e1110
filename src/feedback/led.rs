//! Cabinet LED strip: solid per-layout color while connected, green blink
//! while waiting for a host.
//!
//! The strip task is the second task in the firmware's two-task model. It
//! shares nothing with the input path except the read-mostly
//! [`DeviceStatus`] watch channel, so it can never perturb event ordering.

use chrono::Local;
use rppal::spi::{Bus, Mode, SlaveSelect, Spi};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::FeedbackError;
use crate::input::engine::DeviceStatus;
use crate::layout::Layout;

pub const NUM_STRIP_LEDS: usize = 50;

/// WS2812 bit stream clock: 3 SPI bits encode one WS2812 bit, giving the
/// nominal 1.25us bit period at 2.4 MHz.
const SPI_CLOCK_HZ: u32 = 2_400_000;

/// Low tail appended per frame; >=50us of idle line latches the strip.
const RESET_TAIL_BYTES: usize = 18;

const BLINK_INTERVAL_MS: i64 = 500;
const REFRESH_INTERVAL_MS: u64 = 100;

pub type Rgb = (u8, u8, u8);

/// Solid color shown for each layout while connected.
pub fn layout_color(layout: Layout) -> Rgb {
    match layout {
        Layout::QuestPinballVr => (0x00, 0x00, 0xFF),  // blue
        Layout::PcVisualPinball => (0xFF, 0x00, 0xFF), // magenta
        Layout::Gamepad => (0xFF, 0x80, 0x00),         // amber
    }
}

/// Persisted LED pattern: scales strip brightness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedPattern {
    Solid,
    Dim,
    Off,
}

impl LedPattern {
    /// Decodes the persisted pattern value, clamping anything unknown.
    pub fn from_setting(value: u8) -> Self {
        match value {
            0 => LedPattern::Solid,
            1 => LedPattern::Dim,
            2 => LedPattern::Off,
            _ => {
                tracing::warn!("Persisted LED pattern {} out of range, using solid", value);
                LedPattern::Solid
            }
        }
    }

    fn scale(self) -> u16 {
        match self {
            LedPattern::Solid => 100,
            LedPattern::Dim => 30,
            LedPattern::Off => 0,
        }
    }

    pub fn apply(self, color: Rgb) -> Rgb {
        let s = self.scale();
        (
            (color.0 as u16 * s / 100) as u8,
            (color.1 as u16 * s / 100) as u8,
            (color.2 as u16 * s / 100) as u8,
        )
    }
}

/// Whole-strip fill capability; the task only ever paints one color.
pub trait LedDriver: Send {
    fn fill(&mut self, color: Rgb) -> Result<(), FeedbackError>;
}

/// WS2812 strip on the SPI MOSI line.
pub struct Ws2812Strip {
    spi: Spi,
    pattern: LedPattern,
    frame: Vec<u8>,
}

impl Ws2812Strip {
    pub fn new(pattern: LedPattern) -> Result<Self, FeedbackError> {
        let spi = Spi::new(Bus::Spi0, SlaveSelect::Ss0, SPI_CLOCK_HZ, Mode::Mode0)
            .map_err(|e| FeedbackError::InitializationError(format!("SPI: {}", e)))?;
        info!(
            "WS2812 strip ready ({} LEDs, pattern {:?})",
            NUM_STRIP_LEDS, pattern
        );
        Ok(Self {
            spi,
            pattern,
            frame: Vec::with_capacity(NUM_STRIP_LEDS * 9 + RESET_TAIL_BYTES),
        })
    }
}

/// Expands one color byte into its 3-bits-per-bit SPI encoding
/// (1 -> 110, 0 -> 100), MSB first.
fn encode_byte(byte: u8, out: &mut Vec<u8>) {
    let mut bits: u32 = 0;
    for i in (0..8).rev() {
        bits <<= 3;
        bits |= if byte & (1 << i) != 0 { 0b110 } else { 0b100 };
    }
    out.extend_from_slice(&bits.to_be_bytes()[1..4]);
}

impl LedDriver for Ws2812Strip {
    fn fill(&mut self, color: Rgb) -> Result<(), FeedbackError> {
        let (r, g, b) = self.pattern.apply(color);
        self.frame.clear();
        for _ in 0..NUM_STRIP_LEDS {
            // WS2812 wire order is GRB.
            encode_byte(g, &mut self.frame);
            encode_byte(r, &mut self.frame);
            encode_byte(b, &mut self.frame);
        }
        self.frame.extend(std::iter::repeat(0u8).take(RESET_TAIL_BYTES));
        self.spi
            .write(&self.frame)
            .map_err(|e| FeedbackError::DriverError(format!("SPI write: {}", e)))?;
        Ok(())
    }
}

/// LED task body: follows the device status, blinking while disconnected.
pub async fn run_led_task(
    mut driver: Box<dyn LedDriver>,
    status_receiver: watch::Receiver<DeviceStatus>,
) {
    info!("LED task started");
    let mut ticker =
        tokio::time::interval(tokio::time::Duration::from_millis(REFRESH_INTERVAL_MS));
    let mut blink_on = false;
    let mut last_blink = Local::now();

    loop {
        ticker.tick().await;
        let status = *status_receiver.borrow();

        let color = if status.connected {
            layout_color(status.layout)
        } else {
            let now = Local::now();
            if (now - last_blink).num_milliseconds() >= BLINK_INTERVAL_MS {
                blink_on = !blink_on;
                last_blink = now;
                debug!("Disconnected blink {}", if blink_on { "on" } else { "off" });
            }
            if blink_on {
                (0x00, 0xFF, 0x00)
            } else {
                (0x00, 0x00, 0x00)
            }
        };

        if let Err(e) = driver.fill(color) {
            warn!("LED strip write failed: {}", e);
        }
    }
}
