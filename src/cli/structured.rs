//! Structured (JSON) command input.
//!
//! Host tooling can send commands as a single JSON object instead of a typed
//! line:
//!
//! ```text
//! {"command":"set","params":["foo","bar"]}
//! ```
//!
//! The object is decoded without allocation, rebuilt into the equivalent
//! plain line and sent through the same [`dispatch`] path, so arity checks,
//! replies and continuations behave identically for both input forms.

use heapless::{String, Vec};
use serde::Deserialize;

use super::{
    MAX_LINE_LEN, MSG_MALFORMED, Outcome, Registry, Response, Session, Store, dispatch, parser,
};
use crate::Error;

/// Maximum number of entries in `params`.
pub const MAX_STRUCTURED_PARAMS: usize = 8;

#[derive(Debug, Deserialize)]
struct StructuredCommand<'a> {
    command: &'a str,
    #[serde(borrow, default)]
    params: Vec<&'a str, MAX_STRUCTURED_PARAMS>,
}

/// Returns `true` if `line` looks like a structured command.
pub fn is_structured(line: &str) -> bool {
    line.trim_start_matches(' ').starts_with('{')
}

/// Decode a structured command into the equivalent plain line.
///
/// Fails with [`Error::MalformedInput`] when the JSON does not decode, or
/// when the command or a parameter is empty or contains a space or line
/// terminator (it would not survive tokenizing). Fails with
/// [`Error::BufferOverflow`] when the rebuilt line is longer than
/// [`MAX_LINE_LEN`].
///
/// ```rust
/// use libcli::cli::structured::to_line;
///
/// let line = to_line(r#"{"command":"set","params":["foo","bar"]}"#).unwrap();
/// assert_eq!(line.as_str(), "set foo bar");
/// ```
pub fn to_line(text: &str) -> Result<String<MAX_LINE_LEN>, Error> {
    let text = parser::content(text);
    let (message, _) = serde_json_core::from_str::<StructuredCommand<'_>>(text)
        .map_err(|_| Error::MalformedInput)?;

    let mut line = String::new();
    push_token(&mut line, message.command)?;
    for param in &message.params {
        line.push(' ').map_err(|_| Error::BufferOverflow)?;
        push_token(&mut line, param)?;
    }
    Ok(line)
}

fn push_token(line: &mut String<MAX_LINE_LEN>, token: &str) -> Result<(), Error> {
    if token.is_empty() || token.bytes().any(|b| matches!(b, b' ' | b'\r' | b'\n' | 0)) {
        return Err(Error::MalformedInput);
    }
    line.push_str(token).map_err(|_| Error::BufferOverflow)
}

/// Decode `text` and dispatch the resulting line.
///
/// Undecodable input is answered with [`MSG_MALFORMED`], abandons any
/// pending continuation and yields [`Outcome::Malformed`].
pub fn dispatch_structured<const N: usize>(
    registry: &Registry<N>,
    session: &mut Session,
    store: &mut Store,
    text: &str,
    response: &mut Response<'_>,
) -> Outcome {
    match to_line(text) {
        Ok(line) => dispatch(registry, session, store, &line, response),
        Err(error) => {
            debug!("structured input rejected: {}", error);
            session.reset();
            response.set(MSG_MALFORMED);
            Outcome::Malformed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Completion, MSG_INCORRECT_PARAMETERS};

    fn process(cli: &mut Cli, text: &str) -> (Outcome, std::string::String) {
        let mut buf = [0u8; 128];
        let mut response = Response::new(&mut buf);
        let outcome = cli.process_structured(text, &mut response);
        (outcome, response.as_str().into())
    }

    #[test]
    fn test_to_line() {
        assert_eq!(
            to_line(r#"{"command":"get","params":["k"]}"#).unwrap().as_str(),
            "get k"
        );
        assert_eq!(to_line(r#"{"command":"help"}"#).unwrap().as_str(), "help");
        assert_eq!(
            to_line(r#" {"params":["a"],"command":"get"}"#).unwrap().as_str(),
            "get a"
        );
    }

    #[test]
    fn test_to_line_rejects_bad_shapes() {
        assert_eq!(to_line("{"), Err(Error::MalformedInput));
        assert_eq!(to_line(r#"{"params":["a"]}"#), Err(Error::MalformedInput));
        assert_eq!(
            to_line(r#"{"command":"set","params":["a b","c"]}"#),
            Err(Error::MalformedInput)
        );
        assert_eq!(
            to_line(r#"{"command":"set","params":["","c"]}"#),
            Err(Error::MalformedInput)
        );
        assert_eq!(to_line(r#"{"command":42}"#), Err(Error::MalformedInput));
    }

    #[test]
    fn test_structured_set_and_get() {
        let mut cli: Cli = Cli::with_builtins().unwrap();
        let (outcome, text) = process(&mut cli, r#"{"command":"set","params":["foo","bar"]}"#);
        assert_eq!(outcome, Outcome::Handled(Completion::Done));
        assert_eq!(text, "Set foo = bar\r\n");

        let (_, text) = process(&mut cli, r#"{"command":"get","params":["foo"]}"#);
        assert_eq!(text, "Get foo = bar\r\n");
    }

    #[test]
    fn test_structured_shares_arity_checks() {
        let mut cli: Cli = Cli::with_builtins().unwrap();
        let (outcome, text) = process(&mut cli, r#"{"command":"get"}"#);
        assert_eq!(outcome.error(), Some(Error::ParameterCountMismatch));
        assert_eq!(text, MSG_INCORRECT_PARAMETERS);
    }

    #[test]
    fn test_malformed_reply() {
        let mut cli: Cli = Cli::with_builtins().unwrap();
        let (outcome, text) = process(&mut cli, r#"{"command":}"#);
        assert_eq!(outcome, Outcome::Malformed);
        assert_eq!(text, MSG_MALFORMED);
    }

    #[test]
    fn test_is_structured() {
        assert!(is_structured("{\"command\":\"help\"}"));
        assert!(is_structured("  {"));
        assert!(!is_structured("help"));
    }
}
