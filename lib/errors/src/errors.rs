use std::fmt::Display;

use cursor::Line;
use itertools::Itertools;

/// A user-facing message pointing at a location in the source.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("[line {line}] Error{}: {message}", if at.is_empty() { "".to_string() } else { format!(" at {at}") })]
pub struct Diagnostic {
    pub line: Line,
    /// Byte offset into the source (lexical errors) or index into the token
    /// sequence (parse errors).
    pub position: usize,
    /// Either empty, `end`, or the quoted lexeme the error was reported at.
    pub at: String,
    pub message: String,
    /// Where the parser resumed after the error, if it synchronized.
    pub synced_to: Option<String>,
}

impl Diagnostic {
    pub fn new(line: Line, position: usize, at: impl ToString, message: impl ToString) -> Self {
        Self {
            line,
            position,
            at: at.to_string(),
            message: message.to_string(),
            synced_to: None,
        }
    }

    pub fn with_synced_to(mut self, synced_to: impl ToString) -> Self {
        self.synced_to = Some(synced_to.to_string());
        self
    }
}

#[derive(thiserror::Error, Clone, Debug, Default, PartialEq, derive_more::Deref, derive_more::DerefMut)]
pub struct Diagnostics(pub Vec<Diagnostic>);

impl From<Diagnostic> for Diagnostics {
    fn from(d: Diagnostic) -> Self {
        Self(vec![d])
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<T: IntoIterator<Item = Diagnostic>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join("\n"))
    }
}
