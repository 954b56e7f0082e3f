//! # libcli - interrupt-driven UART command shell
//!
//! A line-oriented command shell for microcontrollers, driven entirely over a
//! serial byte stream. Bytes arrive one at a time from the UART interrupt and
//! are assembled into lines without blocking; lines are matched against a
//! bounded table of commands and answered over the same link. Nothing is
//! allocated: every buffer and table has a capacity fixed at build time.
//!
//! ## Layers
//!
//! - **[`transport`]**: per-direction `Idle`/`Busy`/`Error` state machines
//!   serviced from the interrupt handler, behind a [`UartHardware`] seam.
//! - **[`cli`]**: command registry, tokenizer, dispatcher, the built-in
//!   `help`, `set` and `get` commands, and a JSON entry path.
//! - **[`system::shell`]**: the polling loop connecting the two.
//!
//! ```text
//! UART ─▶ Transport (ISR) ─▶ line ─▶ Shell::poll ─▶ dispatch ─▶ handler
//!   ▲                                                              │
//!   └──────────── Transport (ISR) ◀── response ◀───────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use libcli::cli::{Arity, Cli, CommandDefinition, Completion, Request, Response};
//! use core::fmt::Write;
//!
//! fn uptime(_request: &mut Request<'_>, response: &mut Response<'_>) -> Completion {
//!     write!(response, "up {} s\r\n", 42).ok();
//!     Completion::Done
//! }
//!
//! const UPTIME: CommandDefinition =
//!     CommandDefinition::new("uptime", "uptime: Seconds since boot\r\n", uptime, Arity::Exact(0));
//!
//! let mut cli: Cli = Cli::with_builtins().unwrap();
//! cli.register(UPTIME).unwrap();
//!
//! let mut buf = [0u8; 64];
//! let mut response = Response::new(&mut buf);
//! cli.process("uptime", &mut response);
//! assert_eq!(response.as_str(), "up 42 s\r\n");
//! ```
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support (default: disabled)
//! - `defmt`: Enable defmt logging support for embedded debugging

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

#[macro_use]
mod fmt;

/// Crate-wide error type.
pub mod error;

/// Interrupt-driven serial transport.
pub mod transport;

/// Command registry, parser, dispatcher and built-in commands.
pub mod cli;

/// System utilities for embedded devices.
///
/// Contains the shell loop that drives the command layer from a transport.
pub mod system;

pub use error::Error;
pub use transport::UartHardware;
