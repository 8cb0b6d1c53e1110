//! Gamepad layout for Star Wars Pinball VR: BLE gamepad buttons, with the
//! plunger mapped to an analog trigger pull.

use super::{
    ActionMapping, Axis, HapticChannel, HapticCue, NudgeAxes, NudgeMap, OutputAction,
};
use crate::input::sampler::ButtonId;

pub const GP_NUDGE_LEFT: u8 = 1;
pub const GP_NUDGE_RIGHT: u8 = 2;
pub const GP_SPECIAL: u8 = 3;
pub const GP_LEFT_FLIPPER: u8 = 5;
pub const GP_RIGHT_FLIPPER: u8 = 6;
pub const GP_START: u8 = 8;

pub static TABLE: [ActionMapping; 7] = [
    ActionMapping {
        button: ButtonId::LeftFlipper,
        action: OutputAction::GamepadButton(GP_LEFT_FLIPPER),
        haptic: Some(HapticCue::Follow(HapticChannel::Left)),
    },
    ActionMapping {
        button: ButtonId::RightFlipper,
        action: OutputAction::GamepadButton(GP_RIGHT_FLIPPER),
        haptic: Some(HapticCue::Follow(HapticChannel::Right)),
    },
    ActionMapping {
        button: ButtonId::Plunger,
        action: OutputAction::AnalogAxis {
            axis: Axis::RightTrigger,
            value: i16::MAX,
        },
        haptic: Some(HapticCue::PulseOnPress(HapticChannel::Right)),
    },
    ActionMapping {
        button: ButtonId::Special,
        action: OutputAction::GamepadButton(GP_SPECIAL),
        haptic: None,
    },
    ActionMapping {
        button: ButtonId::Start,
        action: OutputAction::GamepadButton(GP_START),
        haptic: None,
    },
    ActionMapping {
        button: ButtonId::LeftNudge,
        action: OutputAction::GamepadButton(GP_NUDGE_LEFT),
        haptic: None,
    },
    ActionMapping {
        button: ButtonId::RightNudge,
        action: OutputAction::GamepadButton(GP_NUDGE_RIGHT),
        haptic: None,
    },
];

pub static NUDGE: NudgeMap = NudgeMap {
    left_button: ButtonId::LeftNudge,
    right_button: ButtonId::RightNudge,
    axes: NudgeAxes::XOnly,
    left: Some(OutputAction::GamepadButton(GP_NUDGE_LEFT)),
    right: Some(OutputAction::GamepadButton(GP_NUDGE_RIGHT)),
    forward: None,
    back: None,
};
