//! # nvbridge-backend
//!
//! Client side of the storage-emulation daemon's JSON-RPC 2.0 protocol.
//!
//! - [`RpcChannel`]: the object-safe seam the bridge calls through.
//! - [`UnixSocketChannel`]: production channel over a Unix domain socket.
//! - [`methods`]: the request/result schema of every backend method.
//! - `MockChannel` (feature `test-utils`): scripted channel for tests.
//!
//! ## Example
//!
//! ```ignore
//! use nvbridge_backend::{methods, RpcChannelExt, UnixSocketChannel};
//!
//! let channel = UnixSocketChannel::new("/var/tmp/spdk.sock");
//! let version: methods::VersionResult = channel.invoke_without_params(methods::GET_VERSION)?;
//! println!("{}", version.version);
//! ```

pub mod channel;
pub mod error;
pub mod methods;
pub mod protocol;
pub mod unix;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use channel::{RpcChannel, RpcChannelExt};
pub use error::Error;
pub use protocol::{Request, Response, RpcError};
pub use unix::UnixSocketChannel;

#[cfg(any(test, feature = "test-utils"))]
pub use mock::{MockChannel, MockFailure, RecordedCall};
