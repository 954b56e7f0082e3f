//! Allocation-free tokenizer for command lines.
//!
//! Tokens are runs of non-space characters separated by one or more ASCII
//! spaces. Scanning stops at the first carriage return, line feed or NUL, so
//! the functions accept raw receive-buffer contents as well as trimmed lines.
//! Every result is a view into the caller's line; nothing is copied and no
//! state survives between calls.
//!
//! ```text
//! "set  foo bar\r\n"
//!  ^^^  ^^^ ^^^
//!   0    1   2      <- token index (0 is the command name)
//! ```

/// ASCII space character (0x20), the only token delimiter.
pub const ASCII_SPACE: u8 = 0x20;

fn is_terminator(byte: u8) -> bool {
    matches!(byte, b'\r' | b'\n' | 0)
}

/// The part of `line` before the first terminator.
pub fn content(line: &str) -> &str {
    match line.bytes().position(is_terminator) {
        Some(end) => &line[..end],
        None => line,
    }
}

/// A zero-copy view of one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Byte offset of the token in the scanned line.
    pub start: usize,
    /// The token text.
    pub text: &'a str,
}

/// Iterator over the tokens of a line.
///
/// # Examples
///
/// ```rust
/// use libcli::cli::parser::Tokens;
///
/// let words: Vec<&str> = Tokens::new("set  foo bar\r\n").map(|t| t.text).collect();
/// assert_eq!(words, ["set", "foo", "bar"]);
/// ```
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> Tokens<'a> {
    /// Start scanning `line`.
    pub fn new(line: &'a str) -> Self {
        Self {
            line: content(line),
            pos: 0,
        }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let bytes = self.line.as_bytes();

        while self.pos < bytes.len() && bytes[self.pos] == ASCII_SPACE {
            self.pos += 1;
        }
        if self.pos >= bytes.len() {
            return None;
        }

        let start = self.pos;
        while self.pos < bytes.len() && bytes[self.pos] != ASCII_SPACE {
            self.pos += 1;
        }

        Some(Token {
            start,
            text: &self.line[start..self.pos],
        })
    }
}

/// Count the tokens in `text`.
///
/// Consecutive spaces collapse into one delimiter and trailing spaces add
/// nothing. The caller decides what the tokens are: the dispatcher passes
/// the text after the command name so the result is the parameter count.
///
/// ```rust
/// use libcli::cli::parser::count_parameters;
///
/// assert_eq!(count_parameters("a b  c"), 3);
/// assert_eq!(count_parameters("a b c   "), 3);
/// assert_eq!(count_parameters(""), 0);
/// ```
pub fn count_parameters(text: &str) -> usize {
    Tokens::new(text).count()
}

/// Locate parameter `index` (1-based) of a full command line.
///
/// The command name itself is token 0 and is never returned. Returns `None`
/// when `index` is 0 or exceeds the number of parameters.
pub fn parameter_span(line: &str, index: usize) -> Option<Token<'_>> {
    if index == 0 {
        return None;
    }
    Tokens::new(line).nth(index)
}

/// Text of parameter `index` (1-based) of a full command line.
///
/// ```rust
/// use libcli::cli::parser::get_parameter;
///
/// assert_eq!(get_parameter("set foo bar", 2), Some("bar"));
/// assert_eq!(get_parameter("set foo", 3), None);
/// ```
pub fn get_parameter(line: &str, index: usize) -> Option<&str> {
    parameter_span(line, index).map(|token| token.text)
}
