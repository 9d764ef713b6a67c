//! The RPC channel abstraction.
//!
//! The bridge only talks to the backend through [`RpcChannel`], so tests can
//! swap in a scripted channel instead of a live daemon.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::Error;

/// Executes one JSON-RPC call against the backend.
///
/// # Object Safety
///
/// This trait is object-safe: the bridge holds an `Arc<dyn RpcChannel>`.
/// Typed helpers live on [`RpcChannelExt`].
pub trait RpcChannel: Send + Sync {
    /// Call `method` with optional `params` and return the raw `result`.
    fn call(&self, method: &str, params: Option<Value>) -> Result<Value, Error>;
}

/// Typed convenience wrappers over [`RpcChannel::call`].
pub trait RpcChannelExt: RpcChannel {
    /// Serialize `params`, call `method`, and deserialize the result.
    fn invoke<P, R>(&self, method: &str, params: &P) -> Result<R, Error>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let params = serde_json::to_value(params)?;
        let result = self.call(method, Some(params))?;
        Ok(serde_json::from_value(result)?)
    }

    /// Call a method that takes no parameters.
    fn invoke_without_params<R>(&self, method: &str) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        let result = self.call(method, None)?;
        Ok(serde_json::from_value(result)?)
    }
}

impl<T: RpcChannel + ?Sized> RpcChannelExt for T {}

// Blanket implementations for references and smart pointers

impl<T: RpcChannel + ?Sized> RpcChannel for &T {
    fn call(&self, method: &str, params: Option<Value>) -> Result<Value, Error> {
        (**self).call(method, params)
    }
}

impl<T: RpcChannel + ?Sized> RpcChannel for Box<T> {
    fn call(&self, method: &str, params: Option<Value>) -> Result<Value, Error> {
        self.as_ref().call(method, params)
    }
}

impl<T: RpcChannel + ?Sized> RpcChannel for Arc<T> {
    fn call(&self, method: &str, params: Option<Value>) -> Result<Value, Error> {
        self.as_ref().call(method, params)
    }
}
