//! Hardware seam for the serial transport.

use super::LinkConfig;

/// Snapshot of the peripheral status register.
///
/// Read once at the top of every interrupt so the handler acts on a single,
/// consistent view of the hardware.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusFlags {
    /// A received byte is waiting in the data register.
    pub rx_ready: bool,
    /// The transmit data register can accept a byte.
    pub tx_ready: bool,
    /// A framing error was detected on the last received byte.
    pub framing_error: bool,
    /// A byte arrived before the previous one was read.
    pub overrun_error: bool,
}

impl StatusFlags {
    /// Returns `true` if any receive error flag is raised.
    pub fn has_error(&self) -> bool {
        self.framing_error || self.overrun_error
    }
}

/// Register-level access to a UART peripheral.
///
/// Implementations are thin wrappers over the device registers. Every method
/// is called either from the interrupt handler or from inside a critical
/// section taken by [`Transport`](super::Transport), so implementations need
/// no locking of their own and must never block.
///
/// # Examples
///
/// ```rust
/// use libcli::transport::{LinkConfig, StatusFlags, UartHardware};
///
/// struct Loopback {
///     data: Option<u8>,
/// }
///
/// impl UartHardware for Loopback {
///     fn configure(&mut self, _config: &LinkConfig) {}
///     fn status(&self) -> StatusFlags {
///         StatusFlags { rx_ready: self.data.is_some(), tx_ready: true, ..Default::default() }
///     }
///     fn read_data(&mut self) -> u8 {
///         self.data.take().unwrap_or(0)
///     }
///     fn write_data(&mut self, byte: u8) {
///         self.data = Some(byte);
///     }
///     fn set_rx_interrupt(&mut self, _enabled: bool) {}
///     fn set_tx_interrupt(&mut self, _enabled: bool) {}
///     fn clear_errors(&mut self) {}
/// }
/// ```
pub trait UartHardware {
    /// Apply the link parameters (baud rate, framing) to the peripheral.
    fn configure(&mut self, config: &LinkConfig);

    /// Read the status register.
    fn status(&self) -> StatusFlags;

    /// Read the receive data register. Reading clears the ready flag.
    fn read_data(&mut self) -> u8;

    /// Write one byte to the transmit data register.
    fn write_data(&mut self, byte: u8);

    /// Enable or disable the receive-not-empty interrupt.
    fn set_rx_interrupt(&mut self, enabled: bool);

    /// Enable or disable the transmit-empty interrupt.
    fn set_tx_interrupt(&mut self, enabled: bool);

    /// Clear framing and overrun flags.
    fn clear_errors(&mut self);
}
