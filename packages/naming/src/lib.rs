//! # nvbridge-naming
//!
//! Resource names for the bridge's resource API.
//!
//! Every resource is addressed by a slash-separated name made of a collection
//! segment followed by an ID segment. Child resources (NVMe controllers and
//! namespaces) are nested under their parent subsystem:
//!
//! ```text
//! nvmeSubsystems/{subsystem}
//! nvmeSubsystems/{subsystem}/nvmeControllers/{controller}
//! nvmeSubsystems/{subsystem}/nvmeNamespaces/{namespace}
//! virtioBlks/{virtio_blk}
//! ```
//!
//! # Example
//!
//! ```rust
//! use nvbridge_naming::{derive_name, ResourceKind, ResourceName};
//!
//! let subsystem = derive_name(ResourceKind::NvmeSubsystem, "subsys0", None).unwrap();
//! assert_eq!(subsystem.to_string(), "nvmeSubsystems/subsys0");
//!
//! let controller =
//!     derive_name(ResourceKind::NvmeController, "ctrl0", Some(&subsystem)).unwrap();
//! assert_eq!(
//!     controller,
//!     ResourceName::parse(ResourceKind::NvmeController, "nvmeSubsystems/subsys0/nvmeControllers/ctrl0")
//!         .unwrap()
//! );
//! ```

mod error;
mod id;
mod name;

pub use error::NameError;
pub use id::{generate_id, validate_segment, validate_user_settable_id, MAX_ID_LENGTH};
pub use name::{derive_name, validate_name, ResourceKind, ResourceName};
