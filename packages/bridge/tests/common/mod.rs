#![allow(dead_code)]

use serde_json::json;

use nvbridge::model::*;
use nvbridge::{Bridge, BridgeConfig, FrontendNvmeService};
use nvbridge_backend::methods;
use nvbridge_backend::MockChannel;

pub const NQN: &str = "nqn.2022-09.io.spdk:opi3";
pub const SUBSYSTEM: &str = "nvmeSubsystems/subsys0";

/// A backend that accepts every create and delete.
pub fn backend() -> MockChannel {
    MockChannel::new()
        .with_result(
            methods::GET_VERSION,
            json!({"version": "SPDK v23.01", "fields": {"major": 23, "minor": 1, "patch": 0, "suffix": ""}}),
        )
        .with_result(methods::SUBSYSTEM_NVME_CREATE, true)
        .with_result(methods::SUBSYSTEM_NVME_DELETE, true)
        .with_result(
            methods::CONTROLLER_NVME_CREATE,
            json!({"name": "NvmeEmu0pf1", "cntlid": 1}),
        )
        .with_result(methods::CONTROLLER_NVME_DELETE, true)
        .with_result(methods::CONTROLLER_NVME_NAMESPACE_ATTACH, true)
        .with_result(methods::CONTROLLER_NVME_NAMESPACE_DETACH, true)
        .with_result(methods::CONTROLLER_VIRTIO_BLK_CREATE, "VblkEmu0pf0")
        .with_result(methods::CONTROLLER_VIRTIO_BLK_DELETE, true)
}

pub fn bridge(mock: &MockChannel) -> Bridge {
    Bridge::new(mock.clone(), BridgeConfig::default())
}

pub fn subsystem_request(id: &str, nqn: &str) -> CreateNvmeSubsystemRequest {
    CreateNvmeSubsystemRequest {
        nvme_subsystem_id: id.to_string(),
        nvme_subsystem: Some(NvmeSubsystem {
            spec: Some(NvmeSubsystemSpec {
                nqn: nqn.to_string(),
                serial_number: "OpiSerialNumber".to_string(),
                model_number: "OpiModelNumber".to_string(),
                max_namespaces: 0,
            }),
            ..Default::default()
        }),
    }
}

pub fn controller_request(id: &str, physical_function: i32) -> CreateNvmeControllerRequest {
    CreateNvmeControllerRequest {
        parent: SUBSYSTEM.to_string(),
        nvme_controller_id: id.to_string(),
        nvme_controller: Some(NvmeController {
            spec: Some(NvmeControllerSpec {
                trtype: NvmeTransportType::Pcie,
                pcie_id: Some(PciEndpoint {
                    physical_function,
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }),
    }
}

pub fn namespace_request(id: &str, host_nsid: i32, volume: &str) -> CreateNvmeNamespaceRequest {
    CreateNvmeNamespaceRequest {
        parent: SUBSYSTEM.to_string(),
        nvme_namespace_id: id.to_string(),
        nvme_namespace: Some(NvmeNamespace {
            spec: Some(NvmeNamespaceSpec {
                host_nsid,
                volume_name_ref: volume.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }),
    }
}

/// A bridge that already holds `nvmeSubsystems/subsys0`.
pub fn bridge_with_subsystem(mock: &MockChannel) -> Bridge {
    let bridge = bridge(mock);
    bridge
        .create_nvme_subsystem(subsystem_request("subsys0", NQN))
        .unwrap();
    mock.clear_calls();
    bridge
}
