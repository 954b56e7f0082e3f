//! Common error type for shell operations

use core::fmt;

/// A common error type for the transport and command layers.
///
/// This enum is small, `Copy` and allocation-free so it can be produced from
/// interrupt context and carried through `no_std` code without cost.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The command registry is at capacity.
    RegistryFull,
    /// An absent or unusable argument was supplied (e.g. an empty command name).
    InvalidArgument,
    /// No registered command matches the input line.
    CommandNotFound,
    /// A command was invoked with the wrong number of parameters.
    ParameterCountMismatch,
    /// A required parameter is missing or exceeds its fixed storage.
    MissingParameter,
    /// A buffer filled before the operation could complete.
    BufferOverflow,
    /// The hardware flagged a framing error on reception.
    Framing,
    /// The hardware flagged a receive overrun.
    Overrun,
    /// The direction is already busy; the request was rejected, not queued.
    Busy,
    /// A bounded wait expired.
    Timeout,
    /// The key-value store has no free slot for a new key.
    StoreFull,
    /// Structured input did not match the recognised command shape.
    MalformedInput,
}

impl Error {
    /// Returns `true` for faults raised by the receive path of the transport.
    pub fn is_transport_fault(&self) -> bool {
        matches!(self, Error::BufferOverflow | Error::Framing | Error::Overrun)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Error::RegistryFull => "command registry full",
            Error::InvalidArgument => "invalid argument",
            Error::CommandNotFound => "command not found",
            Error::ParameterCountMismatch => "incorrect parameter count",
            Error::MissingParameter => "missing or oversized parameter",
            Error::BufferOverflow => "buffer overflow",
            Error::Framing => "framing error",
            Error::Overrun => "overrun error",
            Error::Busy => "busy",
            Error::Timeout => "timeout",
            Error::StoreFull => "key-value store full",
            Error::MalformedInput => "malformed structured input",
        };
        f.write_str(message)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::RegistryFull => defmt::write!(f, "RegistryFull"),
            Error::InvalidArgument => defmt::write!(f, "InvalidArgument"),
            Error::CommandNotFound => defmt::write!(f, "CommandNotFound"),
            Error::ParameterCountMismatch => defmt::write!(f, "ParameterCountMismatch"),
            Error::MissingParameter => defmt::write!(f, "MissingParameter"),
            Error::BufferOverflow => defmt::write!(f, "BufferOverflow"),
            Error::Framing => defmt::write!(f, "Framing"),
            Error::Overrun => defmt::write!(f, "Overrun"),
            Error::Busy => defmt::write!(f, "Busy"),
            Error::Timeout => defmt::write!(f, "Timeout"),
            Error::StoreFull => defmt::write!(f, "StoreFull"),
            Error::MalformedInput => defmt::write!(f, "MalformedInput"),
        }
    }
}
