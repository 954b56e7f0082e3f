//! System-level glue for running the command layer on a device.
//!
//! # Available Utilities
//!
//! - **[`shell`]**: the non-blocking shell loop that connects a
//!   [`Transport`](crate::transport::Transport) to a [`Cli`](crate::cli::Cli)
//!
//! ```rust,no_run
//! use libcli::system::shell::{Shell, ShellConfig};
//! use libcli::transport::Transport;
//! # use libcli::transport::{LinkConfig, StatusFlags, UartHardware};
//! # struct Usart;
//! # impl UartHardware for Usart {
//! #     fn configure(&mut self, _: &LinkConfig) {}
//! #     fn status(&self) -> StatusFlags { StatusFlags::default() }
//! #     fn read_data(&mut self) -> u8 { 0 }
//! #     fn write_data(&mut self, _: u8) {}
//! #     fn set_rx_interrupt(&mut self, _: bool) {}
//! #     fn set_tx_interrupt(&mut self, _: bool) {}
//! #     fn clear_errors(&mut self) {}
//! # }
//!
//! static UART: Transport<Usart> = Transport::new(Usart);
//!
//! let mut shell: Shell<'_, Usart> = Shell::new(&UART, ShellConfig::default()).unwrap();
//! shell.start().unwrap();
//! loop {
//!     shell.poll().unwrap();
//! }
//! ```

/// Non-blocking command shell over an interrupt-driven UART.
pub mod shell;
