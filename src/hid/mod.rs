//! Emulated HID output over the wireless link.
//!
//! The core only ever sees the [`OutputEmitter`] capability: press, release,
//! connected-or-not. The transport task behind it is deliberately opaque -
//! it owns the link session and reports connection state through a watch
//! channel, and the rest of the firmware neither knows nor cares how the
//! actual radio protocol works.

pub mod transport;

pub use transport::{TransportEmitter, TransportHandle, TransportProfile};

use crate::layout::OutputAction;

/// Errors from the transport subsystem.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Failed to start transport: {0}")]
    StartupError(String),

    #[error("Transport command channel error: {0}")]
    ChannelError(String),
}

/// Opaque HID press/release capability consumed by the arbitration layer.
///
/// Every press must be matched by exactly one eventual release; the
/// arbitration layer owns that invariant. Calls while disconnected are
/// tolerated as no-ops only during the startup race.
pub trait OutputEmitter: Send {
    fn press(&mut self, action: &OutputAction);
    fn release(&mut self, action: &OutputAction);
    fn is_connected(&self) -> bool;
}
