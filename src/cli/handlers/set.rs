//! `set <key> <value>`

use core::fmt::Write;

use super::bounded;
use crate::Error;
use crate::cli::{
    Arity, CommandDefinition, Completion, MSG_MISSING_PARAMETER, MSG_STORE_FULL, Request,
    Response,
};

/// Definition of the `set` command.
pub const COMMAND: CommandDefinition = CommandDefinition::new(
    "set",
    "set <key> <value>: Sets a key-value pair\r\n",
    run,
    Arity::Exact(2),
);

fn run(request: &mut Request<'_>, response: &mut Response<'_>) -> Completion {
    let (Some(key), Some(value)) = (
        bounded(request.parameter(1)),
        bounded(request.parameter(2)),
    ) else {
        response.set(MSG_MISSING_PARAMETER);
        return Completion::Done;
    };

    match request.store.set(key, value) {
        Ok(()) => {
            write!(response, "Set {} = {}\r\n", key, value).ok();
        }
        Err(Error::StoreFull) => response.set(MSG_STORE_FULL),
        Err(_) => response.set(MSG_MISSING_PARAMETER),
    }
    Completion::Done
}
