//! Request and result schema for every backend method the bridge uses.
//!
//! Field names follow the daemon's JSON, not the resource API. Results that
//! are a bare boolean or string are deserialized directly as `bool`/`String`.
//!
//! List-style methods return the daemon's entire collection; the bridge
//! filters and pages on its side.

use serde::{Deserialize, Serialize};

pub const GET_VERSION: &str = "spdk_get_version";

pub const SUBSYSTEM_NVME_CREATE: &str = "subsystem_nvme_create";
pub const SUBSYSTEM_NVME_DELETE: &str = "subsystem_nvme_delete";
pub const SUBSYSTEM_NVME_LIST: &str = "subsystem_nvme_list";

pub const CONTROLLER_NVME_CREATE: &str = "controller_nvme_create";
pub const CONTROLLER_NVME_DELETE: &str = "controller_nvme_delete";
pub const CONTROLLER_LIST: &str = "controller_list";
pub const CONTROLLER_NVME_GET_IOSTAT: &str = "controller_nvme_get_iostat";

pub const CONTROLLER_NVME_NAMESPACE_ATTACH: &str = "controller_nvme_namespace_attach";
pub const CONTROLLER_NVME_NAMESPACE_DETACH: &str = "controller_nvme_namespace_detach";
pub const CONTROLLER_NVME_NAMESPACE_LIST: &str = "controller_nvme_namespace_list";

pub const CONTROLLER_VIRTIO_BLK_CREATE: &str = "controller_virtio_blk_create";
pub const CONTROLLER_VIRTIO_BLK_DELETE: &str = "controller_virtio_blk_delete";
pub const CONTROLLER_VIRTIO_BLK_GET_IOSTAT: &str = "controller_virtio_blk_get_iostat";

/// `type` tag of NVMe entries in [`CONTROLLER_LIST`].
pub const CONTROLLER_TYPE_NVME: &str = "nvme";
/// `type` tag of virtio-blk entries in [`CONTROLLER_LIST`].
pub const CONTROLLER_TYPE_VIRTIO_BLK: &str = "virtio_blk";

// Version

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct VersionResult {
    pub version: String,
    #[serde(default)]
    pub fields: VersionFields,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct VersionFields {
    #[serde(default)]
    pub major: i32,
    #[serde(default)]
    pub minor: i32,
    #[serde(default)]
    pub patch: i32,
    #[serde(default)]
    pub suffix: String,
}

// Subsystems

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SubsystemCreateParams {
    pub nqn: String,
    pub serial_number: String,
    pub model_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SubsystemDeleteParams {
    pub nqn: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SubsystemListEntry {
    pub nqn: String,
    #[serde(default)]
    pub subsys_id: i32,
    #[serde(default)]
    pub serial_number: String,
    #[serde(default)]
    pub model_number: String,
    #[serde(default)]
    pub controllers: Vec<SubsystemControllerEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SubsystemControllerEntry {
    pub name: String,
    pub cntlid: i32,
    #[serde(default)]
    pub pci_bdf: String,
    #[serde(default)]
    pub pci_index: i32,
}

// NVMe controllers

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ControllerNvmeCreateParams {
    pub nqn: String,
    pub emulation_manager: String,
    pub pf_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vf_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_queues: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_namespaces: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ControllerNvmeCreateResult {
    pub name: String,
    pub cntlid: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ControllerNvmeDeleteParams {
    pub subnqn: String,
    pub cntlid: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ControllerListParams {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub controller_type: Option<String>,
}

impl ControllerListParams {
    pub fn of_type(controller_type: &str) -> Self {
        Self {
            controller_type: Some(controller_type.to_string()),
        }
    }
}

/// One entry of [`CONTROLLER_LIST`]; NVMe and virtio-blk entries share it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ControllerListEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub controller_type: String,
    #[serde(default)]
    pub subnqn: String,
    #[serde(default)]
    pub cntlid: i32,
    #[serde(default)]
    pub pci_index: i32,
    #[serde(default)]
    pub pci_bdf: String,
    #[serde(default)]
    pub pf_id: i32,
    #[serde(default)]
    pub vf_id: i32,
    #[serde(default)]
    pub bdev: String,
}

// NVMe namespaces

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NamespaceAttachParams {
    pub bdev_type: String,
    pub bdev: String,
    pub nsid: i32,
    pub subnqn: String,
    pub cntlid: i32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uuid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub nguid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub eui64: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NamespaceDetachParams {
    pub nsid: i32,
    pub subnqn: String,
    pub cntlid: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NamespaceListParams {
    pub subnqn: String,
    pub cntlid: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NamespaceListResult {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cntlid: i32,
    #[serde(rename = "Namespaces", default)]
    pub namespaces: Vec<NamespaceEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NamespaceEntry {
    pub nsid: i32,
    #[serde(default)]
    pub bdev: String,
    #[serde(default)]
    pub bdev_type: String,
    #[serde(default)]
    pub qn: String,
    #[serde(default)]
    pub protocol: String,
}

// I/O statistics

/// Result of [`CONTROLLER_NVME_GET_IOSTAT`] and [`CONTROLLER_VIRTIO_BLK_GET_IOSTAT`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct IoStatResult {
    #[serde(default)]
    pub controllers: Vec<ControllerIoStat>,
}

impl IoStatResult {
    /// Find the counters for `bdev_name` in any controller.
    pub fn find_bdev(&self, bdev_name: &str) -> Option<&BdevIoStat> {
        self.controllers
            .iter()
            .flat_map(|c| c.bdevs.iter())
            .find(|b| b.bdev_name == bdev_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ControllerIoStat {
    pub name: String,
    #[serde(default)]
    pub bdevs: Vec<BdevIoStat>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BdevIoStat {
    pub bdev_name: String,
    #[serde(default)]
    pub read_ios: i64,
    #[serde(default)]
    pub completed_read_ios: i64,
    #[serde(default)]
    pub write_ios: i64,
    #[serde(default)]
    pub completed_write_ios: i64,
    #[serde(default)]
    pub read_bytes: i64,
    #[serde(default)]
    pub write_bytes: i64,
}

// Virtio-blk controllers

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct VirtioBlkCreateParams {
    pub emulation_manager: String,
    pub pf_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vf_id: Option<i32>,
    pub bdev_type: String,
    pub bdev: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_queues: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct VirtioBlkDeleteParams {
    pub name: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub force: bool,
}
