//! Resource-API messages.
//!
//! Plain serde types mirroring the resource API's schema. Every struct is
//! `#[serde(default)]` so that partial request bodies deserialize, which is
//! how the REPL front-end builds requests from JSON.

use serde::{Deserialize, Serialize};

// Shared

/// A PCIe function endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PciEndpoint {
    pub physical_function: i32,
    pub virtual_function: i32,
    pub port_id: i32,
}

/// A fabrics endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FabricsEndpoint {
    pub traddr: String,
    pub trsvcid: String,
    pub adrfam: String,
}

/// Field paths an update applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMask {
    pub paths: Vec<String>,
}

/// I/O counters for a volume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeStats {
    pub read_ops_count: i64,
    pub write_ops_count: i64,
    pub read_bytes_count: i64,
    pub write_bytes_count: i64,
}

// NVMe subsystem

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NvmeSubsystem {
    pub name: String,
    pub spec: Option<NvmeSubsystemSpec>,
    pub status: Option<NvmeSubsystemStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NvmeSubsystemSpec {
    pub nqn: String,
    pub serial_number: String,
    pub model_number: String,
    pub max_namespaces: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NvmeSubsystemStatus {
    pub firmware_revision: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateNvmeSubsystemRequest {
    pub nvme_subsystem: Option<NvmeSubsystem>,
    pub nvme_subsystem_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteNvmeSubsystemRequest {
    pub name: String,
    pub allow_missing: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateNvmeSubsystemRequest {
    pub nvme_subsystem: Option<NvmeSubsystem>,
    pub update_mask: Option<FieldMask>,
    pub allow_missing: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListNvmeSubsystemsRequest {
    pub page_size: i32,
    pub page_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListNvmeSubsystemsResponse {
    pub nvme_subsystems: Vec<NvmeSubsystem>,
    pub next_page_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetNvmeSubsystemRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsNvmeSubsystemRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsNvmeSubsystemResponse {
    pub stats: Option<VolumeStats>,
}

// NVMe controller

/// Transport an NVMe controller is exposed over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NvmeTransportType {
    #[default]
    Unspecified,
    Pcie,
    Tcp,
    Rdma,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NvmeController {
    pub name: String,
    pub spec: Option<NvmeControllerSpec>,
    pub status: Option<NvmeControllerStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NvmeControllerSpec {
    /// Assigned by the backend; ignored on create.
    pub nvme_controller_id: Option<i32>,
    pub trtype: NvmeTransportType,
    pub pcie_id: Option<PciEndpoint>,
    pub fabrics_id: Option<FabricsEndpoint>,
    pub max_nsq: i32,
    pub max_ncq: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NvmeControllerStatus {
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateNvmeControllerRequest {
    pub parent: String,
    pub nvme_controller: Option<NvmeController>,
    pub nvme_controller_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteNvmeControllerRequest {
    pub name: String,
    pub allow_missing: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateNvmeControllerRequest {
    pub nvme_controller: Option<NvmeController>,
    pub update_mask: Option<FieldMask>,
    pub allow_missing: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListNvmeControllersRequest {
    pub parent: String,
    pub page_size: i32,
    pub page_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListNvmeControllersResponse {
    pub nvme_controllers: Vec<NvmeController>,
    pub next_page_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetNvmeControllerRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsNvmeControllerRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsNvmeControllerResponse {
    pub stats: Option<VolumeStats>,
}

// NVMe namespace

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NvmeNamespacePciState {
    #[default]
    Unspecified,
    Enabled,
    Disabled,
    Deleting,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NvmeNamespacePciOperState {
    #[default]
    Unspecified,
    Online,
    Offline,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NvmeNamespace {
    pub name: String,
    pub spec: Option<NvmeNamespaceSpec>,
    pub status: Option<NvmeNamespaceStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NvmeNamespaceSpec {
    pub host_nsid: i32,
    pub volume_name_ref: String,
    pub uuid: String,
    pub nguid: String,
    pub eui64: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NvmeNamespaceStatus {
    pub pci_state: NvmeNamespacePciState,
    pub pci_oper_state: NvmeNamespacePciOperState,
}

impl NvmeNamespaceStatus {
    /// Status of a namespace attached to a live controller.
    pub fn online() -> Self {
        Self {
            pci_state: NvmeNamespacePciState::Enabled,
            pci_oper_state: NvmeNamespacePciOperState::Online,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateNvmeNamespaceRequest {
    pub parent: String,
    pub nvme_namespace: Option<NvmeNamespace>,
    pub nvme_namespace_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteNvmeNamespaceRequest {
    pub name: String,
    pub allow_missing: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateNvmeNamespaceRequest {
    pub nvme_namespace: Option<NvmeNamespace>,
    pub update_mask: Option<FieldMask>,
    pub allow_missing: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListNvmeNamespacesRequest {
    pub parent: String,
    pub page_size: i32,
    pub page_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListNvmeNamespacesResponse {
    pub nvme_namespaces: Vec<NvmeNamespace>,
    pub next_page_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetNvmeNamespaceRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsNvmeNamespaceRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsNvmeNamespaceResponse {
    pub stats: Option<VolumeStats>,
}

// Virtio-blk

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtioBlk {
    pub name: String,
    pub pcie_id: Option<PciEndpoint>,
    pub volume_name_ref: String,
    pub max_io_qps: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateVirtioBlkRequest {
    pub virtio_blk: Option<VirtioBlk>,
    pub virtio_blk_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteVirtioBlkRequest {
    pub name: String,
    pub allow_missing: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateVirtioBlkRequest {
    pub virtio_blk: Option<VirtioBlk>,
    pub update_mask: Option<FieldMask>,
    pub allow_missing: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListVirtioBlksRequest {
    pub page_size: i32,
    pub page_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListVirtioBlksResponse {
    pub virtio_blks: Vec<VirtioBlk>,
    pub next_page_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetVirtioBlkRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsVirtioBlkRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsVirtioBlkResponse {
    pub stats: Option<VolumeStats>,
}
