//! What the REPL core exchanges with its host.
//!
//! The core never touches the terminal. It asks the host for the next
//! [`Event`] and hands back [`Output`]; resource-API failures travel as the
//! bridge's own [`Status`] so the host can style them by code.

use nvbridge::{Code, Status};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("terminal error: {0}")]
    Terminal(String),
}

/// One thing the user did at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Line(String),
    /// Ctrl+C: abandon the current line.
    Interrupt,
    /// Ctrl+D or end of input.
    Eof,
}

/// Something for the host to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Banner, farewells and other REPL chatter.
    Notice(String),
    /// A rendered method response, help or method list.
    Response(String),
    /// A call the bridge rejected.
    Status(Status),
    /// Input that never reached the bridge.
    Rejected(String),
}

impl Output {
    /// Plain text without styling.
    pub fn text(&self) -> String {
        match self {
            Output::Notice(text) | Output::Response(text) | Output::Rejected(text) => text.clone(),
            Output::Status(status) => status.to_string(),
        }
    }
}

/// Why the REPL stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    UserExit,
    Eof,
}

pub trait IoHost {
    /// Prompt for and return the next event. `last_failure` is the code of
    /// the most recent call if it failed.
    fn next_event(&mut self, last_failure: Option<Code>) -> Result<Event, IoError>;

    fn write(&mut self, output: Output) -> Result<(), IoError>;

    fn flush(&mut self) -> Result<(), IoError> {
        Ok(())
    }
}
