//! # nvbridge-cli
//!
//! An interactive REPL that drives the resource-API bridge against a
//! storage-emulation daemon.
//!
//! ## Features
//!
//! - Call any resource-API method with a JSON request body
//! - Tab completion of method names
//! - Syntax highlighting for the command word and body
//! - Vi mode support (`--vi`, or detected from EDITOR, VISUAL and inputrc)
//! - Command history
//!
//! ## Usage
//!
//! ```bash
//! nvbridge --socket /var/tmp/spdk.sock
//!
//! # Inside the REPL:
//! > CreateNvmeSubsystem {"nvme_subsystem_id": "subsys0", "nvme_subsystem": {"spec": {"nqn": "nqn.2022-09.io.spdk:opi3"}}}
//! > ListNvmeSubsystems {"page_size": 10}
//! > DeleteNvmeSubsystem {"name": "nvmeSubsystems/subsys0"}
//! ```

pub mod commands;
pub mod completer;
pub mod highlighter;
pub mod host;
pub mod io;
pub mod repl;
pub mod test_host;

pub use repl::{run, ReplCore};
