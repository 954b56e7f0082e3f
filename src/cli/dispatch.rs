//! Line dispatch and continuation tracking.

use heapless::String;

use super::{
    Completion, MAX_LINE_LEN, MSG_INCORRECT_PARAMETERS, MSG_NOT_RECOGNIZED, Registry, Request,
    Response, Store, parser,
};
use crate::Error;

/// Result of dispatching one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A handler ran.
    Handled(Completion),
    /// No registered command matched.
    NotFound,
    /// The command matched but the parameter count was wrong.
    BadParameterCount {
        /// Parameters the command declares.
        expected: u8,
        /// Parameters found on the line.
        found: usize,
    },
    /// Structured input could not be turned into a command line.
    Malformed,
}

impl Outcome {
    /// The error this outcome corresponds to, if the line was rejected.
    pub fn error(&self) -> Option<Error> {
        match self {
            Outcome::Handled(_) => None,
            Outcome::NotFound => Some(Error::CommandNotFound),
            Outcome::BadParameterCount { .. } => Some(Error::ParameterCountMismatch),
            Outcome::Malformed => Some(Error::MalformedInput),
        }
    }

    /// Returns `true` if a handler asked to be called again.
    pub fn is_pending(&self) -> bool {
        matches!(self, Outcome::Handled(Completion::More))
    }
}

/// Continuation state carried between dispatches.
///
/// When a handler returns [`Completion::More`] the session records which
/// command to resume, the line that started it and the handler's cursor. The
/// next dispatch calls that command again with the stored line and ignores
/// the line it was given.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Session {
    pending: Option<usize>,
    cursor: usize,
    line: String<MAX_LINE_LEN>,
}

impl Session {
    /// A session with nothing pending.
    pub const fn new() -> Self {
        Self {
            pending: None,
            cursor: 0,
            line: String::new(),
        }
    }

    /// Returns `true` if a command will be resumed on the next dispatch.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Registry index of the command to resume.
    pub fn pending(&self) -> Option<usize> {
        self.pending
    }

    /// The handler's progress marker.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The line that started the pending command. Empty when nothing is
    /// pending.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Forget any continuation.
    pub fn reset(&mut self) {
        self.pending = None;
        self.cursor = 0;
        self.line.clear();
    }
}

/// Dispatch `line` against `registry`, writing the reply into `response`.
///
/// The response is cleared first. Leading spaces and anything from the first
/// line terminator on are ignored. The first registered command whose name
/// matches the start of the line is selected; if it declares an exact
/// [`Arity`](super::Arity) the parameter count must equal it or the handler
/// is not called. Rejected lines get [`MSG_NOT_RECOGNIZED`] or
/// [`MSG_INCORRECT_PARAMETERS`] as their reply.
pub fn dispatch<const N: usize>(
    registry: &Registry<N>,
    session: &mut Session,
    store: &mut Store,
    line: &str,
    response: &mut Response<'_>,
) -> Outcome {
    let input = parser::content(line).trim_start_matches(' ');
    response.clear();

    let (index, resumed) = match session.pending {
        Some(index) if index < registry.len() => (index, true),
        _ => {
            session.reset();

            let Some(index) = registry.find(input) else {
                debug!("no command matches input");
                response.set(MSG_NOT_RECOGNIZED);
                return Outcome::NotFound;
            };

            let command = &registry.commands()[index];
            if let super::Arity::Exact(expected) = command.arity {
                let found = parser::count_parameters(&input[command.name.len()..]);
                if found != usize::from(expected) {
                    debug!(
                        "{=str} expects {} parameter(s), got {}",
                        command.name,
                        expected,
                        found
                    );
                    response.set(MSG_INCORRECT_PARAMETERS);
                    return Outcome::BadParameterCount { expected, found };
                }
            }
            (index, false)
        }
    };

    let commands = registry.commands();
    let command = &commands[index];
    trace!("running {=str}", command.name);

    let line = if resumed { session.line.as_str() } else { input };
    let mut request = Request {
        line,
        command,
        commands,
        store,
        cursor: &mut session.cursor,
    };
    let completion = (command.handler)(&mut request, response);

    match completion {
        Completion::Done => session.reset(),
        Completion::More => {
            if !resumed {
                session.line.clear();
                if session.line.push_str(input).is_err() {
                    warn!("{=str} line too long to keep for continuation", command.name);
                }
            }
            session.pending = Some(index);
        }
    }
    Outcome::Handled(completion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Arity, CommandDefinition, handlers};
    use core::fmt::Write;

    fn echo_count(request: &mut Request<'_>, response: &mut Response<'_>) -> Completion {
        write!(response, "{}", request.parameter_count()).ok();
        Completion::Done
    }

    fn countdown(request: &mut Request<'_>, response: &mut Response<'_>) -> Completion {
        *request.cursor += 1;
        write!(response, "chunk {}", *request.cursor).ok();
        if *request.cursor < 3 {
            Completion::More
        } else {
            Completion::Done
        }
    }

    fn page(request: &mut Request<'_>, response: &mut Response<'_>) -> Completion {
        *request.cursor += 1;
        write!(response, "{} {}", request.parameter(1).unwrap_or("-"), *request.cursor).ok();
        if *request.cursor < 2 {
            Completion::More
        } else {
            Completion::Done
        }
    }

    fn registry() -> Registry<8> {
        let mut registry = Registry::new();
        registry.register_all(&handlers::BUILTINS).unwrap();
        registry
            .register(CommandDefinition::new("count", "", echo_count, Arity::Any))
            .unwrap();
        registry
            .register(CommandDefinition::new("pair", "", echo_count, Arity::Exact(2)))
            .unwrap();
        registry
            .register(CommandDefinition::new("chunks", "", countdown, Arity::Exact(0)))
            .unwrap();
        registry
            .register(CommandDefinition::new("page", "", page, Arity::Exact(1)))
            .unwrap();
        registry
    }

    fn run(
        registry: &Registry<8>,
        session: &mut Session,
        store: &mut Store,
        line: &str,
    ) -> (Outcome, std::string::String) {
        let mut buf = [0u8; 128];
        let mut response = Response::new(&mut buf);
        let outcome = dispatch(registry, session, store, line, &mut response);
        (outcome, response.as_str().into())
    }

    #[test]
    fn test_unknown_command() {
        let registry = registry();
        let (outcome, text) = run(&registry, &mut Session::new(), &mut Store::new(), "reboot");
        assert_eq!(outcome, Outcome::NotFound);
        assert_eq!(outcome.error(), Some(Error::CommandNotFound));
        assert_eq!(text, MSG_NOT_RECOGNIZED);
    }

    #[test]
    fn test_prefix_without_boundary_is_unknown() {
        let registry = registry();
        let (outcome, _) = run(&registry, &mut Session::new(), &mut Store::new(), "pairs a b");
        assert_eq!(outcome, Outcome::NotFound);
    }

    #[test]
    fn test_arity_checked_before_handler() {
        let registry = registry();
        let mut store = Store::new();
        let (outcome, text) = run(&registry, &mut Session::new(), &mut store, "pair a");
        assert_eq!(
            outcome,
            Outcome::BadParameterCount {
                expected: 2,
                found: 1
            }
        );
        assert_eq!(text, MSG_INCORRECT_PARAMETERS);

        let (outcome, text) = run(&registry, &mut Session::new(), &mut store, "pair a b");
        assert_eq!(outcome, Outcome::Handled(Completion::Done));
        assert_eq!(text, "2");
    }

    #[test]
    fn test_leading_spaces_and_terminators_ignored() {
        let registry = registry();
        let (outcome, text) = run(
            &registry,
            &mut Session::new(),
            &mut Store::new(),
            "   count a  b   c \r\n",
        );
        assert_eq!(outcome, Outcome::Handled(Completion::Done));
        assert_eq!(text, "3");
    }

    #[test]
    fn test_set_with_missing_value_rejected() {
        let registry = registry();
        let mut store = Store::new();
        let (outcome, _) = run(&registry, &mut Session::new(), &mut store, "set foo");
        assert_eq!(outcome.error(), Some(Error::ParameterCountMismatch));
        assert!(store.is_empty());
    }

    #[test]
    fn test_continuation_resumes_same_command() {
        let registry = registry();
        let mut session = Session::new();
        let mut store = Store::new();

        let (outcome, text) = run(&registry, &mut session, &mut store, "chunks");
        assert!(outcome.is_pending());
        assert_eq!(text, "chunk 1");
        assert!(session.is_pending());

        // The line is ignored while a continuation is pending.
        let (outcome, text) = run(&registry, &mut session, &mut store, "");
        assert_eq!(outcome, Outcome::Handled(Completion::More));
        assert_eq!(text, "chunk 2");

        let (outcome, text) = run(&registry, &mut session, &mut store, "get x");
        assert_eq!(outcome, Outcome::Handled(Completion::Done));
        assert_eq!(text, "chunk 3");
        assert!(!session.is_pending());
        assert_eq!(session.cursor(), 0);

        let (_, text) = run(&registry, &mut session, &mut store, "chunks");
        assert_eq!(text, "chunk 1");
    }

    #[test]
    fn test_continuation_sees_starting_line() {
        let registry = registry();
        let mut session = Session::new();
        let mut store = Store::new();

        let (outcome, text) = run(&registry, &mut session, &mut store, "  page first\r\n");
        assert!(outcome.is_pending());
        assert_eq!(text, "first 1");
        assert_eq!(session.line(), "page first");

        let (outcome, text) = run(&registry, &mut session, &mut store, "page second");
        assert_eq!(outcome, Outcome::Handled(Completion::Done));
        assert_eq!(text, "first 2");
        assert_eq!(session.line(), "");

        let (_, text) = run(&registry, &mut session, &mut store, "page second");
        assert_eq!(text, "second 1");
    }
}
