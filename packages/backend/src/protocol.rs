//! JSON-RPC 2.0 envelopes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Error;

pub const JSONRPC_VERSION: &str = "2.0";

/// An outbound request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Request {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl Request {
    pub fn new(id: u64, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params,
        }
    }
}

/// The `error` member of a response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RpcError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// An inbound response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Response {
    #[serde(default)]
    pub jsonrpc: String,
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl Response {
    pub fn success(id: u64, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            error: None,
            result: Some(result),
        }
    }

    pub fn failure(id: u64, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
            result: None,
        }
    }

    /// Check the response against the request it answers and extract the result.
    ///
    /// The ID is checked before the error member. A missing or null result
    /// is returned as `Value::Null`.
    pub fn into_result(self, expected_id: u64) -> Result<Value, Error> {
        if self.id != expected_id {
            return Err(Error::IdMismatch {
                expected: expected_id,
                got: self.id,
            });
        }

        if let Some(error) = self.error {
            if error.code != 0 {
                return Err(Error::Rpc {
                    code: error.code,
                    message: error.message,
                });
            }
        }

        Ok(self.result.unwrap_or(Value::Null))
    }
}
