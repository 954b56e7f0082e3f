//! Built-in commands.
//!
//! | Command | Parameters      | Reply                          |
//! |---------|-----------------|--------------------------------|
//! | `help`  | `[command]`     | command list or one help line  |
//! | `set`   | `<key> <value>` | `Set <key> = <value>`          |
//! | `get`   | `<key>`         | `Get <key> = <value>`          |

use super::{CommandDefinition, MAX_PARAM_LEN};

pub mod get;
pub mod help;
pub mod set;

/// The built-in commands in registration order.
pub const BUILTINS: [CommandDefinition; 3] = [help::COMMAND, set::COMMAND, get::COMMAND];

/// A parameter that is present and short enough to store.
fn bounded(parameter: Option<&str>) -> Option<&str> {
    parameter.filter(|p| p.len() <= MAX_PARAM_LEN)
}
