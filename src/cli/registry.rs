//! Bounded table of registered commands.

use heapless::Vec;

use super::{CommandDefinition, parser};
use crate::Error;

/// Insertion-ordered command table with a fixed capacity of `N` entries.
///
/// The registry keeps its own copy of every definition. Entries are never
/// removed, and a failed registration leaves the table untouched.
#[derive(Debug, Clone)]
pub struct Registry<const N: usize> {
    commands: Vec<CommandDefinition, N>,
}

impl<const N: usize> Default for Registry<N> {
    fn default() -> Self {
        Self::new()
    }
}

fn validate(command: &CommandDefinition) -> Result<(), Error> {
    let name = command.name;
    if name.is_empty() || name.bytes().any(|b| matches!(b, b' ' | b'\r' | b'\n' | 0)) {
        warn!("rejected command with unusable name");
        return Err(Error::InvalidArgument);
    }
    Ok(())
}

impl<const N: usize> Registry<N> {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Append `command` to the table.
    ///
    /// Fails with [`Error::InvalidArgument`] when the name is empty or holds
    /// a space or line terminator, and with [`Error::RegistryFull`] when all
    /// `N` slots are taken. Duplicate names are accepted; the first one
    /// registered wins at dispatch.
    pub fn register(&mut self, command: CommandDefinition) -> Result<(), Error> {
        validate(&command)?;
        self.commands.push(command).map_err(|_| {
            warn!("registry full, dropping command {=str}", command.name);
            Error::RegistryFull
        })?;
        trace!("registered command {=str}", command.name);
        Ok(())
    }

    /// Register a batch of commands, all or none.
    pub fn register_all(&mut self, commands: &[CommandDefinition]) -> Result<(), Error> {
        for command in commands {
            validate(command)?;
        }
        if commands.len() > N - self.commands.len() {
            warn!("registry cannot take {} more commands", commands.len());
            return Err(Error::RegistryFull);
        }
        for command in commands {
            self.commands
                .push(*command)
                .map_err(|_| Error::RegistryFull)?;
        }
        Ok(())
    }

    /// Index of the first command whose name prefixes `line` on a token
    /// boundary, i.e. followed by a space or the end of the line.
    pub fn find(&self, line: &str) -> Option<usize> {
        let line = parser::content(line);
        self.commands.iter().position(|command| {
            line.strip_prefix(command.name)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(' '))
        })
    }

    /// Look up a command by exact name.
    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.iter().find(|command| command.name == name)
    }

    /// Registered commands in insertion order.
    pub fn commands(&self) -> &[CommandDefinition] {
        &self.commands
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Maximum number of commands.
    pub const fn capacity(&self) -> usize {
        N
    }
}
