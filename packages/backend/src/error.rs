#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection closed before a full JSON document was read.
    #[error("EOF")]
    Eof,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("json response ID mismatch (expected {expected}, got {got})")]
    IdMismatch { expected: u64, got: u64 },

    #[error("json response error: {message}")]
    Rpc { code: i64, message: String },
}

impl Error {
    /// Whether the connection that produced this error must be discarded.
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            Error::Io(_) | Error::Eof | Error::Json(_) | Error::IdMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_mismatch_display() {
        let e = Error::IdMismatch {
            expected: 3,
            got: 4,
        };
        assert!(e.to_string().contains("json response ID mismatch"));
        assert!(e.is_transport_failure());
    }

    #[test]
    fn rpc_error_embeds_backend_message() {
        let e = Error::Rpc {
            code: -32602,
            message: "Invalid parameters".to_string(),
        };
        assert_eq!(e.to_string(), "json response error: Invalid parameters");
        assert!(!e.is_transport_failure());
    }

    #[test]
    fn eof_display() {
        assert_eq!(Error::Eof.to_string(), "EOF");
    }
}
