//! # nvbridge
//!
//! Serves the storage resource API (NVMe subsystems, controllers, namespaces
//! and virtio-blk controllers) by translating every call into JSON-RPC calls
//! to a storage-emulation daemon.
//!
//! - [`Bridge`]: the service object, implementing [`FrontendNvmeService`] and
//!   [`FrontendVirtioBlkService`].
//! - [`model`]: request, response and resource messages.
//! - [`Status`]: how calls fail.
//!
//! The bridge remembers what it created in an in-process directory, keyed by
//! resource name. Creates are idempotent against that directory, and deletes
//! with `allow_missing` succeed for names it does not hold.
//!
//! # Example
//!
//! ```rust,ignore
//! use nvbridge::model::{CreateNvmeSubsystemRequest, NvmeSubsystem, NvmeSubsystemSpec};
//! use nvbridge::{Bridge, BridgeConfig, FrontendNvmeService};
//! use nvbridge_backend::UnixSocketChannel;
//!
//! let bridge = Bridge::new(UnixSocketChannel::new("/var/tmp/spdk.sock"), BridgeConfig::default());
//! let subsystem = bridge.create_nvme_subsystem(CreateNvmeSubsystemRequest {
//!     nvme_subsystem_id: "subsys0".to_string(),
//!     nvme_subsystem: Some(NvmeSubsystem {
//!         spec: Some(NvmeSubsystemSpec {
//!             nqn: "nqn.2022-09.io.spdk:opi3".to_string(),
//!             ..Default::default()
//!         }),
//!         ..Default::default()
//!     }),
//! })?;
//! assert_eq!(subsystem.name, "nvmeSubsystems/subsys0");
//! ```

mod bridge;
mod config;
mod controller;
mod directory;
pub mod model;
mod namespace;
mod pagination;
mod service;
mod status;
mod subsystem;
mod validation;
mod virtio_blk;

pub use bridge::Bridge;
pub use config::BridgeConfig;
pub use service::{FrontendNvmeService, FrontendVirtioBlkService};
pub use status::{Code, Status};
