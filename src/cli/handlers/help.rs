//! `help [command]`

use core::fmt::Write;

use crate::cli::{
    Arity, CommandDefinition, Completion, MSG_HELP_HEADER, MSG_NOT_RECOGNIZED, Request, Response,
};

/// Definition of the `help` command.
pub const COMMAND: CommandDefinition = CommandDefinition::new(
    "help",
    "help [command]: Lists all commands, or describes one\r\n",
    run,
    Arity::Any,
);

fn run(request: &mut Request<'_>, response: &mut Response<'_>) -> Completion {
    match request.parameter(1) {
        Some(name) => describe(request, name, response),
        None => list(request, response),
    }
}

fn describe(request: &Request<'_>, name: &str, response: &mut Response<'_>) -> Completion {
    match request.commands.iter().find(|command| command.name == name) {
        Some(command) => response.set(command.help),
        None => response.set(MSG_NOT_RECOGNIZED),
    }
    Completion::Done
}

/// List every command except the one running, paging across responses.
///
/// The cursor is zero on a fresh listing; otherwise it is one past the index
/// of the next entry to print.
fn list(request: &mut Request<'_>, response: &mut Response<'_>) -> Completion {
    if *request.cursor == 0 {
        response.push_str(MSG_HELP_HEADER).ok();
    }

    let start = request.cursor.saturating_sub(1);
    let commands = request.commands;

    for (index, command) in commands.iter().enumerate().skip(start) {
        if request.is_self(command) {
            continue;
        }

        let needed = command.name.len() + 4;
        if needed > response.remaining() {
            if response.is_empty() {
                // Can never fit, even alone.
                continue;
            }
            *request.cursor = index + 1;
            return Completion::More;
        }
        write!(response, "  {}\r\n", command.name).ok();
    }

    *request.cursor = 0;
    Completion::Done
}
