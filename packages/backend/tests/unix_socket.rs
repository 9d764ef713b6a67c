use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::PathBuf;
use std::thread;

use serde_json::{json, Value};

use nvbridge_backend::methods::{self, VersionResult};
use nvbridge_backend::{Error, Request, RpcChannel, RpcChannelExt, UnixSocketChannel};

/// How the fake daemon answers one request.
type Responder = fn(&Request) -> Option<String>;

/// Serve one connection, answering each newline-delimited request with
/// `respond`. `None` closes the connection.
fn serve(respond: Responder, connections: usize) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("backend.sock");
    let listener = UnixListener::bind(&path).unwrap();

    thread::spawn(move || {
        for stream in listener.incoming().take(connections) {
            let stream = stream.unwrap();
            handle(stream, respond);
        }
    });

    (dir, path)
}

fn handle(stream: UnixStream, respond: Responder) {
    let mut writer = stream.try_clone().unwrap();
    let reader = BufReader::new(stream);
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => return,
        };
        let request: Request = serde_json::from_str(&line).unwrap();
        match respond(&request) {
            Some(reply) => {
                writer.write_all(reply.as_bytes()).unwrap();
                writer.flush().unwrap();
            }
            None => return,
        }
    }
}

fn version_reply(request: &Request) -> Option<String> {
    Some(
        json!({
            "jsonrpc": "2.0",
            "id": request.id,
            "result": {"version": "SPDK v23.01", "fields": {"major": 23, "minor": 1, "patch": 0, "suffix": ""}}
        })
        .to_string(),
    )
}

#[test]
fn typed_call_round_trip() {
    let (_dir, path) = serve(version_reply, 1);
    let channel = UnixSocketChannel::new(&path);

    let version: VersionResult = channel.invoke_without_params(methods::GET_VERSION).unwrap();
    assert_eq!(version.version, "SPDK v23.01");
    assert_eq!(version.fields.major, 23);

    // Second call reuses the same connection (the fake daemon accepts only one).
    let version: VersionResult = channel.invoke_without_params(methods::GET_VERSION).unwrap();
    assert_eq!(version.fields.minor, 1);
}

#[test]
fn request_ids_increase() {
    fn echo_id(request: &Request) -> Option<String> {
        Some(json!({"jsonrpc": "2.0", "id": request.id, "result": request.id}).to_string())
    }

    let (_dir, path) = serve(echo_id, 1);
    let channel = UnixSocketChannel::new(&path);

    let first = channel.call("any", None).unwrap();
    let second = channel.call("any", None).unwrap();
    assert_eq!(first, json!(1));
    assert_eq!(second, json!(2));
}

#[test]
fn responses_without_newline_are_read() {
    fn pretty(request: &Request) -> Option<String> {
        // Multi-line document with no trailing newline.
        Some(
            serde_json::to_string_pretty(&json!({"jsonrpc": "2.0", "id": request.id, "result": true}))
                .unwrap(),
        )
    }

    let (_dir, path) = serve(pretty, 1);
    let channel = UnixSocketChannel::new(&path);
    assert_eq!(channel.call("m", None).unwrap(), json!(true));
    assert_eq!(channel.call("m", None).unwrap(), json!(true));
}

#[test]
fn backend_error_code_is_surfaced() {
    fn failing(request: &Request) -> Option<String> {
        Some(
            json!({
                "jsonrpc": "2.0",
                "id": request.id,
                "error": {"code": -32602, "message": "Invalid parameters"}
            })
            .to_string(),
        )
    }

    let (_dir, path) = serve(failing, 1);
    let channel = UnixSocketChannel::new(&path);

    let params = methods::SubsystemCreateParams {
        nqn: "nqn.2022-09.io.spdk:opi3".to_string(),
        ..Default::default()
    };
    let result: Result<bool, Error> = channel.invoke(methods::SUBSYSTEM_NVME_CREATE, &params);
    let err = result.unwrap_err();
    assert!(matches!(err, Error::Rpc { code: -32602, .. }));
    assert!(err.to_string().contains("Invalid parameters"));
}

#[test]
fn mismatched_id_is_rejected() {
    fn wrong_id(request: &Request) -> Option<String> {
        Some(json!({"jsonrpc": "2.0", "id": request.id + 100, "result": true}).to_string())
    }

    let (_dir, path) = serve(wrong_id, 2);
    let channel = UnixSocketChannel::new(&path);

    let err = channel.call("m", None).unwrap_err();
    assert!(err.to_string().contains("json response ID mismatch"));
}

#[test]
fn closed_connection_is_eof_and_reconnects() {
    fn hang_up_first(request: &Request) -> Option<String> {
        if request.id == 1 {
            None
        } else {
            Some(json!({"jsonrpc": "2.0", "id": request.id, "result": "ok"}).to_string())
        }
    }

    let (_dir, path) = serve(hang_up_first, 2);
    let channel = UnixSocketChannel::new(&path);

    let err = channel.call("m", None).unwrap_err();
    assert!(matches!(err, Error::Eof));
    assert_eq!(err.to_string(), "EOF");

    // The broken connection was dropped; the next call opens a new one.
    let value: Value = channel.call("m", None).unwrap();
    assert_eq!(value, json!("ok"));
}

#[test]
fn malformed_json_is_json_error() {
    fn garbage(_request: &Request) -> Option<String> {
        Some("{not json}".to_string())
    }

    let (_dir, path) = serve(garbage, 1);
    let channel = UnixSocketChannel::new(&path);
    assert!(matches!(channel.call("m", None), Err(Error::Json(_))));
}
