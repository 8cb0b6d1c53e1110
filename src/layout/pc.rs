//! PC Visual Pinball layout: standard Visual Pinball key bindings.
//!
//! Modifier keys use the BLE HID keyboard's 0x80+ code range rather than
//! ASCII, matching what the emulated keyboard expects for Shift/Ctrl.

use super::{ActionMapping, HapticChannel, HapticCue, NudgeAxes, NudgeMap, OutputAction};
use crate::input::sampler::ButtonId;

pub const KEY_LEFT_CTRL: u8 = 0x80;
pub const KEY_LEFT_SHIFT: u8 = 0x81;
pub const KEY_RIGHT_CTRL: u8 = 0x84;
pub const KEY_RIGHT_SHIFT: u8 = 0x85;
pub const KEY_RETURN: u8 = 0xB0;

pub static TABLE: [ActionMapping; 7] = [
    ActionMapping {
        button: ButtonId::LeftFlipper,
        action: OutputAction::Key(KEY_LEFT_SHIFT),
        haptic: Some(HapticCue::Follow(HapticChannel::Left)),
    },
    ActionMapping {
        button: ButtonId::RightFlipper,
        action: OutputAction::Key(KEY_RIGHT_SHIFT),
        haptic: Some(HapticCue::Follow(HapticChannel::Right)),
    },
    ActionMapping {
        button: ButtonId::Plunger,
        action: OutputAction::Key(KEY_RETURN),
        // Kicks when the plunger is let go, i.e. when the ball launches.
        haptic: Some(HapticCue::PulseOnRelease(HapticChannel::Right)),
    },
    ActionMapping {
        button: ButtonId::Special,
        action: OutputAction::Key(b'5'),
        haptic: None,
    },
    ActionMapping {
        button: ButtonId::Start,
        action: OutputAction::Key(b'1'),
        haptic: None,
    },
    ActionMapping {
        button: ButtonId::LeftNudge,
        action: OutputAction::Key(KEY_LEFT_CTRL),
        haptic: None,
    },
    ActionMapping {
        button: ButtonId::RightNudge,
        action: OutputAction::Key(KEY_RIGHT_CTRL),
        haptic: None,
    },
];

// Visual Pinball has distinct left/right/forward nudge keys, so both axes
// are evaluated and the dominant one wins.
pub static NUDGE: NudgeMap = NudgeMap {
    left_button: ButtonId::LeftNudge,
    right_button: ButtonId::RightNudge,
    axes: NudgeAxes::XAndY,
    left: Some(OutputAction::Key(KEY_LEFT_CTRL)),
    right: Some(OutputAction::Key(KEY_RIGHT_CTRL)),
    forward: Some(OutputAction::Key(b' ')),
    back: None,
};
