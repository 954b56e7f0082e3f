//! Interactive command shell over an interrupt-driven UART.
//!
//! The shell ties a [`Transport`] to a [`Cli`]. It never blocks: each call
//! to [`Shell::poll`] advances a three-phase state machine by at most one
//! step and returns, so it can share a super-loop with other work. The
//! interrupt handler does the byte-level work in the background.
//!
//! ```text
//!              line taken, dispatched
//!  ┌───────────┐ ─────────────────────▶ ┌────────────┐
//!  │ Listening │                        │ Responding │◀─┐ continuation
//!  └───────────┘ ◀──┐                   └────────────┘──┘ pending
//!        │          │ prompt sent,            │
//!        │ blank    │ reception armed         │ response sent
//!        ▼ line     │                         ▼
//!  ┌───────────┐ ───┘                         │
//!  │ Prompting │ ◀────────────────────────────┘
//!  └───────────┘
//! ```
//!
//! Receive faults (overflow, framing, overrun) are recovered while listening:
//! the partial line is dropped, the count returned by
//! [`Shell::dropped_lines`] goes up and reception is re-armed without any
//! reply being sent.
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
//!
//! #[entry]
//! fn main() -> ! {
//!     let mut shell = Shell::new(&UART, ShellConfig::default()).unwrap();
//!     shell.cli_mut().register(LED_COMMAND).unwrap();
//!     shell.start().unwrap();
//!     shell.run()
//! }
//! ```

use heapless::Vec;

use crate::Error;
use crate::cli::{
    Cli, CommandDefinition, MAX_COMMANDS, MSG_NOT_RECOGNIZED, Outcome, Response, structured,
};
use crate::transport::{
    LinkConfig, RX_BUFFER_SIZE, State, TX_BUFFER_SIZE, Transport, UartHardware,
};

/// Default prompt printed before every line of input.
pub const PROMPT: &str = "> ";

/// Default greeting sent by [`Shell::start`].
pub const BANNER: &str = "\r\nCLI Ready. Type 'help' for commands.\r\n> ";

/// Shell settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellConfig {
    /// Serial framing applied by [`Shell::start`].
    pub link: LinkConfig,
    /// Text sent before each line of input.
    pub prompt: &'static str,
    /// Text sent once on start. The default ends with the prompt.
    pub banner: &'static str,
    /// Bound on the start-up wait for the transmitter, in spins.
    /// `None` waits indefinitely.
    pub tx_spin_limit: Option<u32>,
    /// Route lines starting with `{` through the structured decoder.
    pub structured_input: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            link: LinkConfig::default(),
            prompt: PROMPT,
            banner: BANNER,
            tx_spin_limit: None,
            structured_input: true,
        }
    }
}

/// Shell state machine phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for a complete line.
    Listening,
    /// A response is staged and waits for the transmitter.
    Responding,
    /// The prompt waits for the transmitter.
    Prompting,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Phase {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Phase::Listening => defmt::write!(f, "Listening"),
            Phase::Responding => defmt::write!(f, "Responding"),
            Phase::Prompting => defmt::write!(f, "Prompting"),
        }
    }
}

/// A command shell bound to one transport.
///
/// `RX` and `TX` match the transport's buffer sizes; the response buffer is
/// `TX` bytes so any response fits a single transmission. `N` is the command
/// capacity, built-ins included.
pub struct Shell<
    't,
    H,
    const RX: usize = RX_BUFFER_SIZE,
    const TX: usize = TX_BUFFER_SIZE,
    const N: usize = MAX_COMMANDS,
> {
    transport: &'t Transport<H, RX, TX>,
    cli: Cli<N>,
    config: ShellConfig,
    line: Vec<u8, RX>,
    response: [u8; TX],
    response_len: usize,
    phase: Phase,
}

impl<H, const RX: usize, const TX: usize, const N: usize> core::fmt::Debug
    for Shell<'_, H, RX, TX, N>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Shell")
            .field("transport", self.transport)
            .field("cli", &self.cli)
            .field("config", &self.config)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl<'t, H: UartHardware, const RX: usize, const TX: usize, const N: usize>
    Shell<'t, H, RX, TX, N>
{
    /// Create a shell with the built-in commands registered.
    ///
    /// The transport is not touched until [`start`](Self::start). Fails with
    /// [`Error::RegistryFull`] if `N` cannot hold the built-ins.
    pub fn new(transport: &'t Transport<H, RX, TX>, config: ShellConfig) -> Result<Self, Error> {
        Ok(Self {
            transport,
            cli: Cli::with_builtins()?,
            config,
            line: Vec::new(),
            response: [0; TX],
            response_len: 0,
            phase: Phase::Listening,
        })
    }

    /// Register an application command.
    pub fn register_command(&mut self, command: CommandDefinition) -> Result<(), Error> {
        self.cli.register(command)
    }

    /// The command context.
    pub fn cli(&self) -> &Cli<N> {
        &self.cli
    }

    /// Mutable access to the command context.
    pub fn cli_mut(&mut self) -> &mut Cli<N> {
        &mut self.cli
    }

    /// The active configuration.
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Text of the most recent response.
    pub fn last_response(&self) -> &str {
        core::str::from_utf8(&self.response[..self.response_len]).unwrap_or("")
    }

    /// Lines discarded after receive faults since start.
    pub fn dropped_lines(&self) -> u32 {
        self.transport.dropped_lines()
    }

    /// Initialise the transport, send the banner and arm reception.
    ///
    /// # Errors
    ///
    /// - [`Error::Timeout`] if the transmitter does not go idle within
    ///   [`ShellConfig::tx_spin_limit`].
    /// - [`Error::BufferOverflow`] if the banner is longer than `TX`.
    pub fn start(&mut self) -> Result<(), Error> {
        self.transport.init(&self.config.link);
        self.transport.flush(self.config.tx_spin_limit)?;
        self.transport.transmit(self.config.banner.as_bytes())?;
        self.cli.cancel();
        self.response_len = 0;
        self.phase = Phase::Listening;
        self.transport.receive()?;
        info!(
            "shell started with {} command(s)",
            self.cli.registry().len()
        );
        Ok(())
    }

    /// Advance the shell by one step without blocking.
    pub fn poll(&mut self) -> Result<(), Error> {
        match self.phase {
            Phase::Listening => self.listen(),
            Phase::Responding => self.respond(),
            Phase::Prompting => self.prompt(),
        }
    }

    /// Poll forever. Errors are logged and the loop carries on.
    pub fn run(&mut self) -> ! {
        loop {
            if let Err(error) = self.poll() {
                error!("shell step failed: {}", error);
            }
        }
    }

    fn listen(&mut self) -> Result<(), Error> {
        match self.transport.rx_state() {
            State::Busy => Ok(()),
            State::Error => {
                if let Some(fault) = self.transport.recover() {
                    warn!("partial line dropped: {}", fault);
                }
                self.transport.receive()
            }
            State::Idle => {
                if !self.transport.take_line(&mut self.line) {
                    // Idle with no line means reception was never armed.
                    return self.transport.receive();
                }
                trace!("line received, {} byte(s)", self.line.len());

                if self.line.iter().all(|&byte| byte == b' ') {
                    self.phase = Phase::Prompting;
                    return self.prompt();
                }

                self.execute();
                self.phase = Phase::Responding;
                self.respond()
            }
        }
    }

    fn respond(&mut self) -> Result<(), Error> {
        if self.transport.tx_state() != State::Idle {
            return Ok(());
        }
        self.transport
            .transmit(&self.response[..self.response_len])?;

        if self.cli.is_pending() {
            // Stage the next chunk while this one is on the wire.
            self.execute();
        } else {
            self.phase = Phase::Prompting;
        }
        Ok(())
    }

    fn prompt(&mut self) -> Result<(), Error> {
        if self.transport.tx_state() != State::Idle {
            return Ok(());
        }
        self.transport.transmit(self.config.prompt.as_bytes())?;
        self.phase = Phase::Listening;
        self.transport.receive()
    }

    /// Dispatch the current line into the response buffer.
    fn execute(&mut self) {
        let mut response = Response::new(&mut self.response);
        let outcome = match core::str::from_utf8(&self.line) {
            Ok(text) if self.config.structured_input && structured::is_structured(text) => {
                self.cli.process_structured(text, &mut response)
            }
            Ok(text) => self.cli.process(text, &mut response),
            Err(_) => {
                response.set(MSG_NOT_RECOGNIZED);
                Outcome::NotFound
            }
        };
        if let Some(error) = outcome.error() {
            debug!("line rejected: {}", error);
        }
        self.response_len = response.len();
    }
}
