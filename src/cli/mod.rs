//! Command layer: registry, parsing, dispatch and the built-in commands.
//!
//! A command is a [`CommandDefinition`]: a name, a help line, a handler and
//! the number of parameters it takes. Definitions live in a bounded
//! [`Registry`]; a line of input is matched against it by [`dispatch`], which
//! checks the parameter count before the handler runs and writes a canned
//! error message when the line is rejected.
//!
//! ```text
//! "set foo bar"
//!       │
//!       ▼
//! ┌────────────┐ name  ┌────────────┐ arity ┌────────────┐
//! │  Registry  │──────▶│  Dispatch  │──────▶│  Handler   │──▶ Response
//! └────────────┘       └────────────┘       └────────────┘
//!                            │                     ▲
//!                            └──── Session ────────┘
//!                            (pending continuation)
//! ```
//!
//! Handlers that produce more output than fits in one response return
//! [`Completion::More`]. The dispatcher then remembers the command and the
//! line that started it in its [`Session`], and calls it again on the next
//! dispatch with that line instead of the new one, passing back the cursor
//! the handler left behind.
//!
//! [`Cli`] bundles a registry, the key-value [`Store`] used by `set` and
//! `get`, and the session into the single context object the shell owns.
//!
//! # Examples
//!
//! ```rust
//! use libcli::cli::{Cli, Outcome, Completion, Response, RESPONSE_BUFFER_SIZE};
//!
//! let mut cli: Cli = Cli::with_builtins().unwrap();
//! let mut buf = [0u8; RESPONSE_BUFFER_SIZE];
//! let mut response = Response::new(&mut buf);
//!
//! let outcome = cli.process("set foo bar", &mut response);
//! assert_eq!(outcome, Outcome::Handled(Completion::Done));
//! assert_eq!(response.as_str(), "Set foo = bar\r\n");
//!
//! cli.process("get foo", &mut response);
//! assert_eq!(response.as_str(), "Get foo = bar\r\n");
//! ```

use core::fmt;

mod dispatch;
pub mod handlers;
pub mod parser;
mod registry;
mod response;
mod store;
pub mod structured;

pub use dispatch::{Outcome, Session, dispatch};
pub use registry::Registry;
pub use response::Response;
pub use store::{MAX_KEYS, Store};

use crate::Error;

/// Maximum number of commands a [`Cli`] holds by default.
pub const MAX_COMMANDS: usize = 10;

/// Longest accepted key or value, in bytes.
pub const MAX_PARAM_LEN: usize = 49;

/// Longest line the dispatcher keeps for a continuation, and the longest
/// plain line a structured command may expand to.
pub const MAX_LINE_LEN: usize = crate::transport::RX_BUFFER_SIZE;

/// Size of the response buffer the shell hands to handlers.
pub const RESPONSE_BUFFER_SIZE: usize = 512;

/// Reply for a line that matches no registered command.
pub const MSG_NOT_RECOGNIZED: &str =
    "Command not recognized. Enter 'help' to view commands.\r\n\r\n";
/// Reply for a line with the wrong number of parameters.
pub const MSG_INCORRECT_PARAMETERS: &str =
    "Incorrect command parameter(s). Enter \"help\" to view commands.\r\n\r\n";
/// First line of the `help` listing.
pub const MSG_HELP_HEADER: &str = "Available commands:\r\n";
/// Reply when a parameter is absent or too long to store.
pub const MSG_MISSING_PARAMETER: &str = "Error: Missing parameter\r\n";
/// Reply when `set` finds no free slot for a new key.
pub const MSG_STORE_FULL: &str = "Error: Key-value store full\r\n";
/// Reply for structured input that does not have the expected shape.
pub const MSG_MALFORMED: &str = "Error: Malformed structured command\r\n";

/// Signature of a command handler.
///
/// The handler reads its parameters through the [`Request`] and writes its
/// reply into the [`Response`], which the dispatcher has already cleared.
pub type Handler = fn(&mut Request<'_>, &mut Response<'_>) -> Completion;

/// Whether a handler finished or has more output to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The command is complete.
    Done,
    /// Call the handler again once the current response has been sent.
    More,
}

/// Number of parameters a command accepts, excluding its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many parameters.
    Exact(u8),
    /// Any number; the handler validates for itself.
    Any,
}

impl Arity {
    /// Returns `true` if `count` parameters satisfy this arity.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(expected) => count == usize::from(expected),
            Arity::Any => true,
        }
    }
}

/// A registrable command.
#[derive(Clone, Copy)]
pub struct CommandDefinition {
    /// Name typed to invoke the command. Must not contain spaces.
    pub name: &'static str,
    /// Help text shown by `help <name>`, normally ending in `\r\n`.
    pub help: &'static str,
    /// Function invoked when the command is dispatched.
    pub handler: Handler,
    /// Parameter count checked before the handler runs.
    pub arity: Arity,
}

impl CommandDefinition {
    /// Build a definition, usable in `const` context.
    pub const fn new(
        name: &'static str,
        help: &'static str,
        handler: Handler,
        arity: Arity,
    ) -> Self {
        Self {
            name,
            help,
            handler,
            arity,
        }
    }
}

impl fmt::Debug for CommandDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDefinition")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Everything a handler can see while it runs.
#[derive(Debug)]
pub struct Request<'a> {
    /// The input line, leading spaces and terminators removed. On a
    /// continuation this is the line that started the command.
    pub line: &'a str,
    /// The definition being executed.
    pub command: &'a CommandDefinition,
    /// All registered commands, in registration order.
    pub commands: &'a [CommandDefinition],
    /// Shared key-value store.
    pub store: &'a mut Store,
    /// Handler-owned progress marker. Zero on the first call of a command;
    /// whatever the handler left on a [`Completion::More`] continuation.
    pub cursor: &'a mut usize,
}

impl<'a> Request<'a> {
    /// Parameter `index` (1-based) of the line.
    pub fn parameter(&self, index: usize) -> Option<&'a str> {
        parser::get_parameter(self.line, index)
    }

    /// Number of parameters after the command name.
    pub fn parameter_count(&self) -> usize {
        parser::count_parameters(self.line).saturating_sub(1)
    }

    /// Returns `true` if `other` is the very definition being executed.
    pub fn is_self(&self, other: &CommandDefinition) -> bool {
        core::ptr::eq(self.command, other)
    }
}

/// The command-layer context: registry, store and dispatch session.
///
/// Independent `Cli` values share no state.
#[derive(Debug)]
pub struct Cli<const N: usize = MAX_COMMANDS> {
    registry: Registry<N>,
    store: Store,
    session: Session,
}

impl<const N: usize> Default for Cli<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Cli<N> {
    /// An empty context with no commands registered.
    pub const fn new() -> Self {
        Self {
            registry: Registry::new(),
            store: Store::new(),
            session: Session::new(),
        }
    }

    /// A context with `help`, `set` and `get` registered, in that order.
    pub fn with_builtins() -> Result<Self, Error> {
        let mut cli = Self::new();
        cli.registry.register_all(&handlers::BUILTINS)?;
        Ok(cli)
    }

    /// Register an application command.
    pub fn register(&mut self, command: CommandDefinition) -> Result<(), Error> {
        self.registry.register(command)
    }

    /// The command table.
    pub fn registry(&self) -> &Registry<N> {
        &self.registry
    }

    /// The key-value store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Mutable access to the key-value store.
    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    /// The dispatch session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Returns `true` while a handler has more output pending.
    pub fn is_pending(&self) -> bool {
        self.session.is_pending()
    }

    /// Abandon a pending continuation.
    pub fn cancel(&mut self) {
        self.session.reset();
    }

    /// Dispatch one plain-text line.
    pub fn process(&mut self, line: &str, response: &mut Response<'_>) -> Outcome {
        dispatch(
            &self.registry,
            &mut self.session,
            &mut self.store,
            line,
            response,
        )
    }

    /// Dispatch one structured (JSON) command line.
    pub fn process_structured(&mut self, text: &str, response: &mut Response<'_>) -> Outcome {
        structured::dispatch_structured(
            &self.registry,
            &mut self.session,
            &mut self.store,
            text,
            response,
        )
    }
}
