//! Layout tables mapping physical buttons to emulated HID output.
//!
//! A [`Layout`] selects one static [`ActionMapping`] table plus a
//! [`NudgeMap`] describing how accelerometer nudges translate to output
//! actions. Tables are fixed at compile time; the active layout is the only
//! runtime choice and is persisted across restarts.
//!
//! # Architecture
//!
//! ```text
//! ButtonId ──► resolve(layout) ──► ActionMapping { OutputAction, HapticCue }
//! NudgeDirection ──► nudge_map(layout) ──► OutputAction
//! ```

pub mod gamepad;
pub mod pc;
pub mod quest;

use crate::input::sampler::ButtonId;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The active mapping profile. Exactly one layout is active at a time.
///
/// The integer form is what gets persisted; out-of-range values are clamped
/// back to [`Layout::QuestPinballVr`] rather than treated as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layout {
    /// Pinball FX VR on a Quest headset, emulated BLE keyboard.
    QuestPinballVr,
    /// Visual Pinball on a PC, emulated BLE keyboard.
    PcVisualPinball,
    /// Star Wars Pinball VR, emulated BLE gamepad.
    Gamepad,
}

impl Layout {
    pub const COUNT: u8 = 3;

    /// Decodes a persisted mode value, clamping anything out of range.
    pub fn from_mode(mode: u8) -> Self {
        match mode {
            0 => Layout::QuestPinballVr,
            1 => Layout::PcVisualPinball,
            2 => Layout::Gamepad,
            _ => {
                tracing::warn!("Persisted mode {} out of range, falling back to 0", mode);
                Layout::QuestPinballVr
            }
        }
    }

    pub fn mode(self) -> u8 {
        match self {
            Layout::QuestPinballVr => 0,
            Layout::PcVisualPinball => 1,
            Layout::Gamepad => 2,
        }
    }
}

impl Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layout::QuestPinballVr => write!(f, "Quest Pinball FX VR"),
            Layout::PcVisualPinball => write!(f, "PC Visual Pinball"),
            Layout::Gamepad => write!(f, "Gamepad"),
        }
    }
}

/// Analog axis identifiers for gamepad-style output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    LeftTrigger,
    RightTrigger,
}

/// Abstract emitted effect, independent of the physical input that caused it.
///
/// Key codes follow the BLE HID keyboard convention: printable ASCII maps
/// directly, modifier and control keys use the 0x80+ range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputAction {
    /// Emulated keyboard key.
    Key(u8),
    /// Emulated gamepad button (1-based HID button id).
    GamepadButton(u8),
    /// Emulated analog axis value; release resets the axis to neutral.
    AnalogAxis { axis: Axis, value: i16 },
}

/// Solenoid channel for haptic feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HapticChannel {
    Left,
    Right,
}

/// When and how a mapping drives its solenoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticCue {
    /// Solenoid level tracks the button level (flippers).
    Follow(HapticChannel),
    /// Single fixed-width kick when the button goes down.
    PulseOnPress(HapticChannel),
    /// Single fixed-width kick when the button comes up.
    ///
    /// Only the PC plunger uses this; the release-edge timing is kept as-is
    /// from the tuned behavior of the original table.
    PulseOnRelease(HapticChannel),
}

/// One row of a layout table: a physical button and what it produces.
#[derive(Debug, Clone, Copy)]
pub struct ActionMapping {
    pub button: ButtonId,
    pub action: OutputAction,
    pub haptic: Option<HapticCue>,
}

/// Direction of a classified nudge gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeDirection {
    Left,
    Right,
    Forward,
    Back,
}

/// Which accelerometer axes a layout evaluates for nudge gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeAxes {
    /// Only lateral (X) deviation counts; Y is ignored entirely.
    XOnly,
    /// X and Y both count, dominant absolute deviation wins.
    XAndY,
}

/// Per-layout nudge configuration.
///
/// `left_button`/`right_button` name the physical buttons that share the
/// nudge action space with the accelerometer; the arbitration layer uses
/// them to enforce mutual exclusion.
#[derive(Debug, Clone, Copy)]
pub struct NudgeMap {
    pub left_button: ButtonId,
    pub right_button: ButtonId,
    pub axes: NudgeAxes,
    pub left: Option<OutputAction>,
    pub right: Option<OutputAction>,
    pub forward: Option<OutputAction>,
    pub back: Option<OutputAction>,
}

impl NudgeMap {
    pub fn action(&self, direction: NudgeDirection) -> Option<OutputAction> {
        match direction {
            NudgeDirection::Left => self.left,
            NudgeDirection::Right => self.right,
            NudgeDirection::Forward => self.forward,
            NudgeDirection::Back => self.back,
        }
    }

    pub fn is_nudge_button(&self, button: ButtonId) -> bool {
        button == self.left_button || button == self.right_button
    }
}

/// Returns the full mapping table for a layout.
pub fn table(layout: Layout) -> &'static [ActionMapping] {
    match layout {
        Layout::QuestPinballVr => &quest::TABLE,
        Layout::PcVisualPinball => &pc::TABLE,
        Layout::Gamepad => &gamepad::TABLE,
    }
}

/// Returns the nudge configuration for a layout.
pub fn nudge_map(layout: Layout) -> &'static NudgeMap {
    match layout {
        Layout::QuestPinballVr => &quest::NUDGE,
        Layout::PcVisualPinball => &pc::NUDGE,
        Layout::Gamepad => &gamepad::NUDGE,
    }
}

/// Pure table lookup; buttons without an entry in the active layout no-op.
pub fn resolve(layout: Layout, button: ButtonId) -> Option<&'static ActionMapping> {
    table(layout).iter().find(|m| m.button == button)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_roundtrip() {
        for mode in 0..Layout::COUNT {
            assert_eq!(Layout::from_mode(mode).mode(), mode);
        }
    }

    #[test]
    fn out_of_range_mode_clamps_to_quest() {
        assert_eq!(Layout::from_mode(3), Layout::QuestPinballVr);
        assert_eq!(Layout::from_mode(255), Layout::QuestPinballVr);
    }

    #[test]
    fn every_layout_maps_all_buttons() {
        for layout in [
            Layout::QuestPinballVr,
            Layout::PcVisualPinball,
            Layout::Gamepad,
        ] {
            for button in ButtonId::ALL {
                assert!(
                    resolve(layout, button).is_some(),
                    "{:?} unmapped in {}",
                    button,
                    layout
                );
            }
        }
    }

    #[test]
    fn nudge_buttons_match_their_table_actions() {
        for layout in [
            Layout::QuestPinballVr,
            Layout::PcVisualPinball,
            Layout::Gamepad,
        ] {
            let nudge = nudge_map(layout);
            assert!(nudge.is_nudge_button(nudge.left_button));
            assert!(nudge.is_nudge_button(nudge.right_button));
            assert!(!nudge.is_nudge_button(ButtonId::Plunger));
            // The physical nudge buttons and the gesture share one action
            // space, which is what makes arbitration necessary.
            assert_eq!(
                nudge.left,
                resolve(layout, nudge.left_button).map(|m| m.action)
            );
            assert_eq!(
                nudge.right,
                resolve(layout, nudge.right_button).map(|m| m.action)
            );
        }
    }

    #[test]
    fn quest_nudge_uses_x_only() {
        assert_eq!(nudge_map(Layout::QuestPinballVr).axes, NudgeAxes::XOnly);
        assert_eq!(nudge_map(Layout::PcVisualPinball).axes, NudgeAxes::XAndY);
    }
}
