//! Error classification for the resource API.
//!
//! Every handler returns [`Status`] on failure. Naming errors become
//! invalid-argument, backend channel errors become unknown, and directory
//! misses are raised explicitly as not-found by the handlers.

use std::fmt;

use serde::{Deserialize, Serialize};

use nvbridge_naming::NameError;

/// Resource-API status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Code {
    InvalidArgument,
    NotFound,
    Unimplemented,
    Unknown,
    /// Only used when the bridge's own state lock is poisoned.
    Internal,
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Code::InvalidArgument => "InvalidArgument",
            Code::NotFound => "NotFound",
            Code::Unimplemented => "Unimplemented",
            Code::Unknown => "Unknown",
            Code::Internal => "Internal",
        };
        f.write_str(s)
    }
}

/// A failed resource-API call.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct Status {
    code: Code,
    message: String,
}

impl Status {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(Code::InvalidArgument, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Code::NotFound, message)
    }

    pub fn unimplemented(message: impl Into<String>) -> Self {
        Self::new(Code::Unimplemented, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(Code::Unknown, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(Code::Internal, message)
    }

    pub fn code(&self) -> Code {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Not-found for a name missing from the directory.
    pub(crate) fn missing_key(name: impl fmt::Display) -> Self {
        Self::not_found(format!("unable to find key {}", name))
    }

    /// Unimplemented for a whole resource-API method.
    pub(crate) fn method_not_implemented(method: &str) -> Self {
        Self::unimplemented(format!("{} method is not implemented", method))
    }
}

impl From<NameError> for Status {
    fn from(e: NameError) -> Self {
        Status::invalid_argument(e.to_string())
    }
}

impl From<nvbridge_backend::Error> for Status {
    fn from(e: nvbridge_backend::Error) -> Self {
        Status::unknown(e.to_string())
    }
}
