//! Interrupt-driven serial transport.
//!
//! The transport owns the byte path between a UART peripheral and two fixed
//! buffers. Each direction runs a small state machine whose state flag is the
//! only hand-off signal between the interrupt handler and the polling loop:
//!
//! ```text
//!            arm                  terminator / last byte
//!   ┌──────┐ ───────▶ ┌──────┐ ─────────────────────────▶ ┌──────┐
//!   │ Idle │          │ Busy │                            │ Idle │
//!   └──────┘ ◀─────── └──────┘ ── overflow / framing ──▶ ┌───────┐
//!            recover()          / overrun (receive)       │ Error │
//!                                                        └───────┘
//! ```
//!
//! # Ownership rules
//!
//! - While a direction is [`State::Busy`] only [`Transport::on_interrupt`]
//!   touches its buffer and cursor.
//! - While it is [`State::Idle`] only the polling side may read or reset it.
//! - [`State::Error`] is left only through [`Transport::recover`], which
//!   discards the partial line. This is the single place input is dropped.
//!
//! State flags are atomics read with `Acquire` and written with `Release`, so
//! the polling loop never works from a stale copy. Buffers sit behind a
//! `critical_section::Mutex`; every critical section is bounded by the size
//! of one line.
//!
//! # Usage
//!
//! ```rust,ignore
//! static UART: Transport<Usart2> = Transport::new(Usart2::new());
//!
//! #[interrupt]
//! fn USART2() {
//!     UART.on_interrupt();
//! }
//! ```

#![deny(unsafe_code)]

use core::cell::RefCell;
use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};

use critical_section::Mutex;
use heapless::Vec;

use crate::error::Error;

mod hardware;

pub use hardware::{StatusFlags, UartHardware};


/// Default capacity of the receive buffer (one command line, terminator excluded).
pub const RX_BUFFER_SIZE: usize = 128;

/// Default capacity of the transmit staging buffer.
pub const TX_BUFFER_SIZE: usize = 512;

/// Default link speed.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// ASCII line feed character (0x0A).
pub const ASCII_LF: u8 = 0x0A;
/// ASCII carriage return character (0x0D).
pub const ASCII_CR: u8 = 0x0D;

/// State of one transfer direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum State {
    /// No transfer in flight; the polling side owns the buffer.
    Idle = 0,
    /// Transfer in flight; the interrupt handler owns the buffer.
    Busy = 1,
    /// Reception failed; waiting for [`Transport::recover`].
    Error = 2,
}

impl State {
    const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => State::Idle,
            1 => State::Busy,
            _ => State::Error,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for State {
    fn format(&self, f: defmt::Formatter) {
        match self {
            State::Idle => defmt::write!(f, "Idle"),
            State::Busy => defmt::write!(f, "Busy"),
            State::Error => defmt::write!(f, "Error"),
        }
    }
}

/// A state flag shared between interrupt and polling context.
struct StateCell(AtomicU8);

impl StateCell {
    const fn new(state: State) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    fn load(&self) -> State {
        State::from_raw(self.0.load(Ordering::Acquire))
    }

    fn store(&self, state: State) {
        self.0.store(state as u8, Ordering::Release);
    }
}

/// Parity setting of the serial link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    /// No parity bit.
    None,
    /// Even parity.
    Even,
    /// Odd parity.
    Odd,
}

/// Number of stop bits on the serial link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    /// One stop bit.
    One,
    /// Two stop bits.
    Two,
}

/// Fixed link parameters handed to the hardware at [`Transport::init`].
///
/// The link is not negotiated; both ends are expected to be configured alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkConfig {
    /// Baud rate in bits per second.
    pub baud_rate: u32,
    /// Data bits per frame.
    pub data_bits: u8,
    /// Parity setting.
    pub parity: Parity,
    /// Stop bits per frame.
    pub stop_bits: StopBits,
}

impl LinkConfig {
    /// 8N1 framing at the given baud rate.
    pub const fn new(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            data_bits: 8,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BAUD_RATE)
    }
}

struct Inner<H, const RX: usize, const TX: usize> {
    hw: H,
    rx: Vec<u8, RX>,
    line_ready: bool,
    // Partner terminator to swallow after a completed line (`\r\n` or `\n\r`).
    pair: Option<u8>,
    fault: Option<Error>,
    dropped: u32,
    tx: Vec<u8, TX>,
    tx_pos: usize,
}

impl<H, const RX: usize, const TX: usize> Inner<H, RX, TX> {
    // Leaves `pair` alone: the partner terminator may still be on the wire
    // when reception is re-armed.
    fn reset_rx(&mut self) {
        self.rx.clear();
        self.line_ready = false;
    }
}

/// Interrupt-driven UART transport with one receive and one transmit buffer.
///
/// `RX` bounds a received line, `TX` bounds a single transmission. The
/// constructor is `const` so the transport can be placed in a `static` and
/// shared between the interrupt vector and the main loop.
pub struct Transport<H, const RX: usize = RX_BUFFER_SIZE, const TX: usize = TX_BUFFER_SIZE> {
    rx_state: StateCell,
    tx_state: StateCell,
    inner: Mutex<RefCell<Inner<H, RX, TX>>>,
}

impl<H, const RX: usize, const TX: usize> Transport<H, RX, TX> {
    /// Create a transport around a hardware handle. Both directions start `Idle`.
    pub const fn new(hw: H) -> Self {
        Self {
            rx_state: StateCell::new(State::Idle),
            tx_state: StateCell::new(State::Idle),
            inner: Mutex::new(RefCell::new(Inner {
                hw,
                rx: Vec::new(),
                line_ready: false,
                pair: None,
                fault: None,
                dropped: 0,
                tx: Vec::new(),
                tx_pos: 0,
            })),
        }
    }

    /// Current receive state.
    pub fn rx_state(&self) -> State {
        self.rx_state.load()
    }

    /// Current transmit state.
    pub fn tx_state(&self) -> State {
        self.tx_state.load()
    }
}

impl<H: UartHardware, const RX: usize, const TX: usize> Transport<H, RX, TX> {
    /// Configure the hardware and put both state machines in `Idle`.
    ///
    /// Any buffered data and recorded fault are discarded. The receive
    /// interrupt is enabled; bytes arriving before [`receive`](Self::receive)
    /// arms the buffer are dropped.
    pub fn init(&self, config: &LinkConfig) {
        critical_section::with(|cs| {
            let mut guard = self.inner.borrow_ref_mut(cs);
            let inner = &mut *guard;
            inner.hw.set_tx_interrupt(false);
            inner.hw.configure(config);
            inner.hw.clear_errors();
            inner.reset_rx();
            inner.pair = None;
            inner.fault = None;
            inner.tx.clear();
            inner.tx_pos = 0;
            self.rx_state.store(State::Idle);
            self.tx_state.store(State::Idle);
            inner.hw.set_rx_interrupt(true);
        });
    }

    /// Start an interrupt-driven transmission of `bytes`.
    ///
    /// The bytes are staged in the transport's own buffer, so the caller's
    /// slice is free again as soon as this returns. An empty slice is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// - [`Error::Busy`] if a transmission is already in flight.
    /// - [`Error::BufferOverflow`] if `bytes` exceeds the `TX` capacity.
    pub fn transmit(&self, bytes: &[u8]) -> Result<(), Error> {
        if self.tx_state.load() != State::Idle {
            return Err(Error::Busy);
        }
        if bytes.len() > TX {
            return Err(Error::BufferOverflow);
        }
        if bytes.is_empty() {
            return Ok(());
        }

        critical_section::with(|cs| {
            let mut guard = self.inner.borrow_ref_mut(cs);
            let inner = &mut *guard;
            inner.tx.clear();
            inner
                .tx
                .extend_from_slice(bytes)
                .map_err(|_| Error::BufferOverflow)?;
            inner.tx_pos = 0;
            self.tx_state.store(State::Busy);
            inner.hw.set_tx_interrupt(true);
            Ok(())
        })
    }

    /// Arm reception of the next line.
    ///
    /// Resets the cursor (invalidating any unconsumed line) and flips the
    /// receive state to `Busy`.
    ///
    /// # Errors
    ///
    /// - [`Error::Busy`] if reception is already armed.
    /// - The recorded fault if reception is in `Error`; call
    ///   [`recover`](Self::recover) first.
    pub fn receive(&self) -> Result<(), Error> {
        critical_section::with(|cs| match self.rx_state.load() {
            State::Busy => Err(Error::Busy),
            State::Error => Err(self
                .inner
                .borrow_ref(cs)
                .fault
                .unwrap_or(Error::BufferOverflow)),
            State::Idle => {
                self.inner.borrow_ref_mut(cs).reset_rx();
                self.rx_state.store(State::Busy);
                Ok(())
            }
        })
    }

    /// Interrupt service routine body.
    ///
    /// Handles at most one received and one transmitted byte per call. Call
    /// it from the UART interrupt vector.
    pub fn on_interrupt(&self) {
        critical_section::with(|cs| {
            let mut guard = self.inner.borrow_ref_mut(cs);
            let inner = &mut *guard;
            let status = inner.hw.status();
            self.service_rx(inner, status);
            self.service_tx(inner, status);
        });
    }

    fn service_rx(&self, inner: &mut Inner<H, RX, TX>, status: StatusFlags) {
        let state = self.rx_state.load();
        if state == State::Error {
            // Parked until recover() clears the flags.
            return;
        }

        if status.has_error() {
            let fault = if status.framing_error {
                Error::Framing
            } else {
                Error::Overrun
            };
            if status.rx_ready {
                let _ = inner.hw.read_data();
            }
            inner.pair = None;
            if state == State::Busy {
                self.fail_rx(inner, fault);
            } else {
                inner.hw.clear_errors();
            }
            return;
        }

        if !status.rx_ready {
            return;
        }

        let byte = inner.hw.read_data();
        let pair = inner.pair.take();
        if state != State::Busy {
            return;
        }

        match byte {
            ASCII_CR | ASCII_LF => {
                if pair == Some(byte) {
                    return;
                }
                inner.pair = Some(if byte == ASCII_CR { ASCII_LF } else { ASCII_CR });
                inner.line_ready = true;
                self.rx_state.store(State::Idle);
            }
            0x20..=0x7E => {
                if inner.rx.push(byte).is_err() {
                    self.fail_rx(inner, Error::BufferOverflow);
                }
            }
            _ => {}
        }
    }

    fn service_tx(&self, inner: &mut Inner<H, RX, TX>, status: StatusFlags) {
        if !status.tx_ready || self.tx_state.load() != State::Busy {
            return;
        }

        if let Some(&byte) = inner.tx.get(inner.tx_pos) {
            inner.hw.write_data(byte);
            inner.tx_pos += 1;
        }

        if inner.tx_pos >= inner.tx.len() {
            inner.hw.set_tx_interrupt(false);
            self.tx_state.store(State::Idle);
        }
    }

    fn fail_rx(&self, inner: &mut Inner<H, RX, TX>, fault: Error) {
        inner.fault = Some(fault);
        inner.hw.set_rx_interrupt(false);
        self.rx_state.store(State::Error);
        warn!("rx fault: {}", fault);
    }

    /// Leave the receive `Error` state.
    ///
    /// Clears the hardware error flags, discards the partial line, bumps the
    /// dropped-line counter and re-enables the receive interrupt. Reception
    /// is left `Idle`; re-arm it with [`receive`](Self::receive).
    ///
    /// Returns the fault that was cleared, or `None` if reception was not in
    /// `Error`.
    pub fn recover(&self) -> Option<Error> {
        critical_section::with(|cs| {
            if self.rx_state.load() != State::Error {
                return None;
            }
            let mut guard = self.inner.borrow_ref_mut(cs);
            let inner = &mut *guard;
            inner.hw.clear_errors();
            if inner.hw.status().rx_ready {
                let _ = inner.hw.read_data();
            }
            inner.reset_rx();
            inner.pair = None;
            inner.dropped = inner.dropped.wrapping_add(1);
            let fault = inner.fault.take();
            inner.hw.set_rx_interrupt(true);
            self.rx_state.store(State::Idle);
            warn!("rx recovered, {} line(s) dropped so far", inner.dropped);
            fault
        })
    }

    /// Copy a completed line into `line` and mark it consumed.
    ///
    /// Returns `false` (leaving `line` untouched) unless reception is `Idle`
    /// and a terminator has completed a line since the last arm.
    pub fn take_line(&self, line: &mut Vec<u8, RX>) -> bool {
        if self.rx_state.load() != State::Idle {
            return false;
        }
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            if !inner.line_ready {
                return false;
            }
            line.clone_from(&inner.rx);
            inner.line_ready = false;
            true
        })
    }

    /// Returns `true` if a completed line is waiting to be taken.
    pub fn line_ready(&self) -> bool {
        self.rx_state.load() == State::Idle
            && critical_section::with(|cs| self.inner.borrow_ref(cs).line_ready)
    }

    /// Busy-wait until the transmitter is `Idle`.
    ///
    /// With `spin_limit` set to `None` this waits forever, so an interrupt
    /// that never fires hangs the caller. With `Some(n)` the wait gives up
    /// after `n` spins.
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`] if the bound is reached.
    pub fn flush(&self, spin_limit: Option<u32>) -> Result<(), Error> {
        let mut spins: u32 = 0;
        while self.tx_state.load() != State::Idle {
            if let Some(limit) = spin_limit {
                if spins >= limit {
                    error!("tx wait timed out after {} spins", spins);
                    return Err(Error::Timeout);
                }
                spins += 1;
            }
            core::hint::spin_loop();
        }
        Ok(())
    }

    /// The fault currently holding reception in `Error`, if any.
    pub fn fault(&self) -> Option<Error> {
        critical_section::with(|cs| self.inner.borrow_ref(cs).fault)
    }

    /// Number of partial lines discarded by [`recover`](Self::recover).
    pub fn dropped_lines(&self) -> u32 {
        critical_section::with(|cs| self.inner.borrow_ref(cs).dropped)
    }

    /// Run `f` with exclusive access to the hardware handle.
    pub fn with_hardware<R>(&self, f: impl FnOnce(&mut H) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs).hw))
    }
}

impl<H, const RX: usize, const TX: usize> fmt::Debug for Transport<H, RX, TX> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("rx_state", &self.rx_state.load())
            .field("tx_state", &self.tx_state.load())
            .finish_non_exhaustive()
    }
}
