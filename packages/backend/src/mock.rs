//! Scripted RPC channel for testing.
//!
//! Returns predefined results per method and records every call, so tests can
//! assert exactly which backend calls a handler made.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::Value;

use crate::{Error, RpcChannel};

/// A failure the mock should produce instead of a result.
#[derive(Debug, Clone, PartialEq)]
pub enum MockFailure {
    /// Connection closed mid-response.
    Eof,
    /// Response carried the wrong ID.
    IdMismatch,
    /// Response carried a non-zero `error.code`.
    Rpc { code: i64, message: String },
}

impl MockFailure {
    fn into_error(self) -> Error {
        match self {
            MockFailure::Eof => Error::Eof,
            MockFailure::IdMismatch => Error::IdMismatch {
                expected: 0,
                got: 1,
            },
            MockFailure::Rpc { code, message } => Error::Rpc { code, message },
        }
    }
}

/// A call the mock received.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: String,
    pub params: Option<Value>,
}

#[derive(Default)]
struct MockState {
    /// One-shot outcomes, consumed before `standing`.
    queued: HashMap<String, VecDeque<Result<Value, MockFailure>>>,
    /// Outcomes returned on every call.
    standing: HashMap<String, Result<Value, MockFailure>>,
    calls: Vec<RecordedCall>,
}

/// A mock channel that returns scripted results.
///
/// Clones share state, so a test can hand one clone to the bridge and keep
/// another for assertions.
#[derive(Clone, Default)]
pub struct MockChannel {
    state: Arc<Mutex<MockState>>,
}

impl MockChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `result` for every call to `method`.
    pub fn with_result(self, method: &str, result: impl Serialize) -> Self {
        self.set_result(method, result);
        self
    }

    /// Fail every call to `method`.
    pub fn with_failure(self, method: &str, failure: MockFailure) -> Self {
        self.state
            .lock()
            .unwrap()
            .standing
            .insert(method.to_string(), Err(failure));
        self
    }

    /// Replace the standing result for `method`.
    pub fn set_result(&self, method: &str, result: impl Serialize) {
        let value = serde_json::to_value(result).expect("mock result must serialize");
        self.state
            .lock()
            .unwrap()
            .standing
            .insert(method.to_string(), Ok(value));
    }

    /// Return `result` for the next call to `method` only.
    pub fn push_result(&self, method: &str, result: impl Serialize) {
        let value = serde_json::to_value(result).expect("mock result must serialize");
        self.state
            .lock()
            .unwrap()
            .queued
            .entry(method.to_string())
            .or_default()
            .push_back(Ok(value));
    }

    /// Fail the next call to `method` only.
    pub fn push_failure(&self, method: &str, failure: MockFailure) {
        self.state
            .lock()
            .unwrap()
            .queued
            .entry(method.to_string())
            .or_default()
            .push_back(Err(failure));
    }

    /// All calls received so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Number of calls received for `method`.
    pub fn call_count(&self, method: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Params of the most recent call to `method`.
    pub fn last_params(&self, method: &str) -> Option<Value> {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .rev()
            .find(|c| c.method == method)
            .and_then(|c| c.params.clone())
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }
}

impl RpcChannel for MockChannel {
    fn call(&self, method: &str, params: Option<Value>) -> Result<Value, Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RecordedCall {
            method: method.to_string(),
            params,
        });

        let queued = state
            .queued
            .get_mut(method)
            .and_then(|outcomes| outcomes.pop_front());

        let outcome = match queued {
            Some(outcome) => outcome,
            None => match state.standing.get(method) {
                Some(outcome) => outcome.clone(),
                None => {
                    return Err(Error::Rpc {
                        code: -32601,
                        message: "Method not found".to_string(),
                    })
                }
            },
        };

        outcome.map_err(MockFailure::into_error)
    }
}
