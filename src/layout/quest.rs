//! Quest Pinball FX VR layout: plain ASCII keys over the BLE keyboard.

use super::{ActionMapping, HapticChannel, HapticCue, NudgeAxes, NudgeMap, OutputAction};
use crate::input::sampler::ButtonId;

pub const KEY_RFLIPPER: u8 = b'6';
pub const KEY_LFLIPPER: u8 = b'u';
pub const KEY_PLUNGER: u8 = b'8';
pub const KEY_SPECIAL: u8 = b'5';
pub const KEY_START: u8 = b'1';
pub const KEY_RMAGNASAVE: u8 = b'd';
pub const KEY_LMAGNASAVE: u8 = b'f';

pub static TABLE: [ActionMapping; 7] = [
    ActionMapping {
        button: ButtonId::LeftFlipper,
        action: OutputAction::Key(KEY_LFLIPPER),
        haptic: Some(HapticCue::Follow(HapticChannel::Left)),
    },
    ActionMapping {
        button: ButtonId::RightFlipper,
        action: OutputAction::Key(KEY_RFLIPPER),
        haptic: Some(HapticCue::Follow(HapticChannel::Right)),
    },
    ActionMapping {
        button: ButtonId::Plunger,
        action: OutputAction::Key(KEY_PLUNGER),
        haptic: Some(HapticCue::PulseOnPress(HapticChannel::Right)),
    },
    ActionMapping {
        button: ButtonId::Special,
        action: OutputAction::Key(KEY_SPECIAL),
        haptic: None,
    },
    ActionMapping {
        button: ButtonId::Start,
        action: OutputAction::Key(KEY_START),
        haptic: None,
    },
    ActionMapping {
        button: ButtonId::LeftNudge,
        action: OutputAction::Key(KEY_LMAGNASAVE),
        haptic: None,
    },
    ActionMapping {
        button: ButtonId::RightNudge,
        action: OutputAction::Key(KEY_RMAGNASAVE),
        haptic: None,
    },
];

// Pinball FX VR only reacts to lateral nudges, so the Y axis is ignored.
pub static NUDGE: NudgeMap = NudgeMap {
    left_button: ButtonId::LeftNudge,
    right_button: ButtonId::RightNudge,
    axes: NudgeAxes::XOnly,
    left: Some(OutputAction::Key(KEY_LMAGNASAVE)),
    right: Some(OutputAction::Key(KEY_RMAGNASAVE)),
    forward: None,
    back: None,
};
