mod common;

use std::sync::Arc;
use std::thread;

use serde_json::json;

use nvbridge::model::*;
use nvbridge::{Code, FrontendVirtioBlkService};
use nvbridge_backend::methods;

use common::*;

const NAME: &str = "virtioBlks/virtio-blk-42";

fn create_request(id: &str) -> CreateVirtioBlkRequest {
    CreateVirtioBlkRequest {
        virtio_blk_id: id.to_string(),
        virtio_blk: Some(VirtioBlk {
            pcie_id: Some(PciEndpoint {
                physical_function: 42,
                ..Default::default()
            }),
            volume_name_ref: "Malloc42".to_string(),
            max_io_qps: 1,
            ..Default::default()
        }),
    }
}

#[test]
fn test_create_virtio_blk() {
    let mock = backend();
    let bridge = bridge(&mock);

    let created = bridge.create_virtio_blk(create_request("virtio-blk-42")).unwrap();
    assert_eq!(created.name, NAME);
    assert_eq!(created.volume_name_ref, "Malloc42");
    assert_eq!(
        mock.last_params(methods::CONTROLLER_VIRTIO_BLK_CREATE),
        Some(json!({
            "emulation_manager": "mlx5_0",
            "pf_id": 42,
            "bdev_type": "spdk",
            "bdev": "Malloc42",
            "num_queues": 1
        }))
    );

    let again = bridge.create_virtio_blk(create_request("virtio-blk-42")).unwrap();
    assert_eq!(again, created);
    assert_eq!(mock.call_count(methods::CONTROLLER_VIRTIO_BLK_CREATE), 1);
}

#[test]
fn test_create_virtio_blk_empty_result() {
    let mock = backend().with_result(methods::CONTROLLER_VIRTIO_BLK_CREATE, "");
    let err = bridge(&mock)
        .create_virtio_blk(create_request("virtio-blk-42"))
        .unwrap_err();
    assert_eq!(err.code(), Code::InvalidArgument);
    assert_eq!(err.message(), format!("Could not create virtio-blk: {}", NAME));
}

#[test]
fn test_create_virtio_blk_requires_endpoint() {
    let mock = backend();
    let mut request = create_request("virtio-blk-42");
    request.virtio_blk.as_mut().unwrap().pcie_id = None;

    let err = bridge(&mock).create_virtio_blk(request).unwrap_err();
    assert_eq!(err.message(), "missing required field: virtio_blk.pcie_id");
    assert!(mock.calls().is_empty());
}

#[test]
fn test_delete_virtio_blk() {
    let mock = backend();
    let bridge = bridge(&mock);
    bridge.create_virtio_blk(create_request("virtio-blk-42")).unwrap();

    bridge
        .delete_virtio_blk(DeleteVirtioBlkRequest {
            name: NAME.to_string(),
            allow_missing: false,
        })
        .unwrap();
    assert_eq!(
        mock.last_params(methods::CONTROLLER_VIRTIO_BLK_DELETE),
        Some(json!({"name": "VblkEmu0pf0"}))
    );

    // Gone now.
    bridge
        .delete_virtio_blk(DeleteVirtioBlkRequest {
            name: NAME.to_string(),
            allow_missing: true,
        })
        .unwrap();
    let err = bridge
        .delete_virtio_blk(DeleteVirtioBlkRequest {
            name: NAME.to_string(),
            allow_missing: false,
        })
        .unwrap_err();
    assert_eq!(err.code(), Code::NotFound);
    assert_eq!(mock.call_count(methods::CONTROLLER_VIRTIO_BLK_DELETE), 1);
}

#[test]
fn test_list_virtio_blks() {
    let mock = backend();
    let bridge = bridge(&mock);
    bridge.create_virtio_blk(create_request("virtio-blk-42")).unwrap();
    mock.set_result(
        methods::CONTROLLER_LIST,
        json!([
            {"name": "VblkEmu0pf1", "type": "virtio_blk", "pci_index": 1, "pf_id": 1, "bdev": "Malloc1"},
            {"name": "VblkEmu0pf0", "type": "virtio_blk", "pci_index": 0, "pf_id": 42, "bdev": "Malloc42"},
            {"subnqn": NQN, "cntlid": 0, "name": "NvmeEmu0pf0", "type": "nvme", "pci_index": 2}
        ]),
    );

    let first = bridge
        .list_virtio_blks(ListVirtioBlksRequest {
            page_size: 1,
            page_token: String::new(),
        })
        .unwrap();
    assert_eq!(first.virtio_blks.len(), 1);
    assert_eq!(first.virtio_blks[0].name, NAME);
    assert_eq!(first.virtio_blks[0].volume_name_ref, "Malloc42");
    assert!(!first.next_page_token.is_empty());

    let second = bridge
        .list_virtio_blks(ListVirtioBlksRequest {
            page_size: 1,
            page_token: first.next_page_token.clone(),
        })
        .unwrap();
    assert_eq!(second.virtio_blks[0].volume_name_ref, "Malloc1");
    assert_eq!(second.virtio_blks[0].name, "");
    assert!(second.next_page_token.is_empty());

    // Tokens are single use.
    let err = bridge
        .list_virtio_blks(ListVirtioBlksRequest {
            page_size: 1,
            page_token: first.next_page_token,
        })
        .unwrap_err();
    assert_eq!(err.code(), Code::NotFound);
}

#[test]
fn test_get_virtio_blk() {
    let mock = backend();
    let bridge = bridge(&mock);
    bridge.create_virtio_blk(create_request("virtio-blk-42")).unwrap();

    mock.set_result(
        methods::CONTROLLER_LIST,
        json!([{"name": "VblkEmu0pf0", "type": "virtio_blk", "pf_id": 42, "bdev": "Malloc42"}]),
    );
    let fetched = bridge
        .get_virtio_blk(GetVirtioBlkRequest {
            name: NAME.to_string(),
        })
        .unwrap();
    assert_eq!(fetched.name, NAME);
    assert_eq!(fetched.pcie_id.unwrap().physical_function, 42);

    mock.set_result(methods::CONTROLLER_LIST, json!([]));
    let err = bridge
        .get_virtio_blk(GetVirtioBlkRequest {
            name: NAME.to_string(),
        })
        .unwrap_err();
    assert_eq!(err.code(), Code::InvalidArgument);
    assert_eq!(err.message(), "could not find virtio-blk: VblkEmu0pf0");
}

#[test]
fn test_virtio_blk_stats() {
    let mock = backend();
    let bridge = bridge(&mock);
    bridge.create_virtio_blk(create_request("virtio-blk-42")).unwrap();
    mock.set_result(
        methods::CONTROLLER_VIRTIO_BLK_GET_IOSTAT,
        json!({
            "controllers": [{
                "name": "VblkEmu0pf0",
                "bdevs": [{"bdev_name": "Malloc42", "read_ios": 3, "write_ios": 4,
                           "read_bytes": 12288, "write_bytes": 16384}]
            }]
        }),
    );

    let stats = bridge
        .stats_virtio_blk(StatsVirtioBlkRequest {
            name: NAME.to_string(),
        })
        .unwrap()
        .stats
        .unwrap();
    assert_eq!(
        stats,
        VolumeStats {
            read_ops_count: 3,
            write_ops_count: 4,
            read_bytes_count: 12288,
            write_bytes_count: 16384,
        }
    );
}

#[test]
fn test_update_virtio_blk_unimplemented() {
    let mock = backend();
    let bridge = bridge(&mock);
    bridge.create_virtio_blk(create_request("virtio-blk-42")).unwrap();

    let err = bridge
        .update_virtio_blk(UpdateVirtioBlkRequest {
            virtio_blk: Some(VirtioBlk {
                name: NAME.to_string(),
                ..Default::default()
            }),
            update_mask: None,
            allow_missing: false,
        })
        .unwrap_err();
    assert_eq!(err.code(), Code::Unimplemented);
    assert_eq!(err.message(), "UpdateVirtioBlk method is not implemented");
}

#[test]
fn test_concurrent_creates_call_backend_once() {
    let mock = backend();
    let bridge = Arc::new(bridge(&mock));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let bridge = Arc::clone(&bridge);
            thread::spawn(move || bridge.create_virtio_blk(create_request("virtio-blk-42")))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap().name, NAME);
    }

    assert_eq!(mock.call_count(methods::CONTROLLER_VIRTIO_BLK_CREATE), 1);
}
