//! `get <key>`

use core::fmt::Write;

use super::bounded;
use crate::cli::{Arity, CommandDefinition, Completion, MSG_MISSING_PARAMETER, Request, Response};

/// Definition of the `get` command.
pub const COMMAND: CommandDefinition = CommandDefinition::new(
    "get",
    "get <key>: Gets a value by key\r\n",
    run,
    Arity::Exact(1),
);

fn run(request: &mut Request<'_>, response: &mut Response<'_>) -> Completion {
    let Some(key) = bounded(request.parameter(1)) else {
        response.set(MSG_MISSING_PARAMETER);
        return Completion::Done;
    };

    let written = match request.store.get(key) {
        Some(value) => write!(response, "Get {} = {}\r\n", key, value),
        None => write!(response, "Unknown key: {}\r\n", key),
    };
    if written.is_err() {
        warn!("get reply truncated");
    }
    Completion::Done
}
