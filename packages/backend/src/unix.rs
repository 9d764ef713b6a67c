//! JSON-RPC over a Unix domain socket.

use std::io::{BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::protocol::{Request, Response};
use crate::{Error, RpcChannel};

/// An open connection to the daemon.
struct Connection {
    reader: BufReader<UnixStream>,
    writer: UnixStream,
}

impl Connection {
    fn open(path: &Path, read_timeout: Option<Duration>) -> Result<Self, Error> {
        let stream = UnixStream::connect(path)?;
        stream.set_read_timeout(read_timeout)?;
        let writer = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(stream),
            writer,
        })
    }

    fn send(&mut self, request: &Request) -> Result<(), Error> {
        let mut line = serde_json::to_vec(request)?;
        line.push(b'\n');
        self.writer.write_all(&line)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Read exactly one JSON document.
    ///
    /// The daemon does not always terminate responses with a newline, so the
    /// stream is parsed document-by-document rather than line-by-line.
    fn receive(&mut self) -> Result<Response, Error> {
        let mut de = serde_json::Deserializer::from_reader(&mut self.reader);
        match Response::deserialize(&mut de) {
            Ok(response) => Ok(response),
            Err(e) if e.is_eof() => Err(Error::Eof),
            Err(e) if e.is_io() => Err(Error::Io(std::io::Error::other(e))),
            Err(e) => Err(Error::Json(e)),
        }
    }
}

/// Production channel to the storage-emulation daemon.
///
/// One request is in flight at a time: the connection sits behind a mutex and
/// every response must echo the ID of the request it answers. The socket is
/// opened lazily on the first call, and discarded after any transport
/// failure so that the next call reconnects.
pub struct UnixSocketChannel {
    path: PathBuf,
    read_timeout: Option<Duration>,
    next_id: AtomicU64,
    connection: Mutex<Option<Connection>>,
}

impl UnixSocketChannel {
    /// Create a channel for the socket at `path`. No connection is made yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            read_timeout: None,
            next_id: AtomicU64::new(0),
            connection: Mutex::new(None),
        }
    }

    /// Fail reads that block longer than `timeout`.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Path of the daemon socket.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn exchange(connection: &mut Connection, request: &Request) -> Result<Value, Error> {
        connection.send(request)?;
        let response = connection.receive()?;
        response.into_result(request.id)
    }
}

impl RpcChannel for UnixSocketChannel {
    fn call(&self, method: &str, params: Option<Value>) -> Result<Value, Error> {
        let mut guard = self
            .connection
            .lock()
            .map_err(|e| Error::Io(std::io::Error::other(e.to_string())))?;

        if guard.is_none() {
            tracing::debug!(path = %self.path.display(), "connecting to backend");
            *guard = Some(Connection::open(&self.path, self.read_timeout)?);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let request = Request::new(id, method, params);
        tracing::debug!(method, id, "sending backend request");

        let connection = guard
            .as_mut()
            .ok_or_else(|| Error::Io(std::io::ErrorKind::NotConnected.into()))?;

        let outcome = Self::exchange(connection, &request);
        match &outcome {
            Err(e) if e.is_transport_failure() => {
                tracing::warn!(method, id, error = %e, "dropping backend connection");
                *guard = None;
            }
            Err(e) => tracing::debug!(method, id, error = %e, "backend returned an error"),
            Ok(_) => tracing::debug!(method, id, "backend request complete"),
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_failure_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let channel = UnixSocketChannel::new(dir.path().join("missing.sock"));
        let result = channel.call("spdk_get_version", None);
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn builder_keeps_settings() {
        let channel = UnixSocketChannel::new("/tmp/x.sock").with_read_timeout(Duration::from_secs(2));
        assert_eq!(channel.path(), Path::new("/tmp/x.sock"));
        assert_eq!(channel.read_timeout, Some(Duration::from_secs(2)));
    }
}
