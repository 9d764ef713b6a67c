//! Virtio-blk controller lifecycle.

use nvbridge_backend::methods::{self, ControllerListEntry, ControllerListParams, IoStatResult};
use nvbridge_backend::RpcChannelExt;
use nvbridge_naming::{derive_name, ResourceKind, ResourceName};

use crate::directory::VirtioBlkKey;
use crate::model::*;
use crate::namespace::volume_stats;
use crate::validation::{field_mask, required, required_str};
use crate::{Bridge, Status};

const UPDATABLE_FIELDS: &[&str] = &["name", "pcie_id", "volume_name_ref", "max_io_qps"];

impl Bridge {
    fn list_backend_virtio_blks(&self) -> Result<Vec<ControllerListEntry>, Status> {
        let params = ControllerListParams::of_type(methods::CONTROLLER_TYPE_VIRTIO_BLK);
        let entries: Vec<ControllerListEntry> =
            self.channel().invoke(methods::CONTROLLER_LIST, &params)?;
        Ok(entries
            .into_iter()
            .filter(|e| e.controller_type == methods::CONTROLLER_TYPE_VIRTIO_BLK)
            .collect())
    }

    pub(crate) fn virtio_blk_create(
        &self,
        request: CreateVirtioBlkRequest,
    ) -> Result<VirtioBlk, Status> {
        let virtio_blk = required(&request.virtio_blk, "virtio_blk")?;
        let pcie = required(&virtio_blk.pcie_id, "virtio_blk.pcie_id")?;
        required_str(&virtio_blk.volume_name_ref, "virtio_blk.volume_name_ref")?;

        let name = derive_name(ResourceKind::VirtioBlk, &request.virtio_blk_id, None)?;

        let mut state = self.lock()?;
        if let Some(existing) = state.directory.virtio_blks.lookup(&name) {
            tracing::info!(name = %name, "virtio-blk already exists");
            return Ok(existing);
        }

        let params = methods::VirtioBlkCreateParams {
            emulation_manager: self.config().emulation_manager.clone(),
            pf_id: pcie.physical_function,
            vf_id: (pcie.virtual_function != 0).then_some(pcie.virtual_function),
            bdev_type: self.config().bdev_type.clone(),
            bdev: virtio_blk.volume_name_ref.clone(),
            num_queues: (virtio_blk.max_io_qps > 0).then_some(virtio_blk.max_io_qps),
        };
        let backend_name: String = self
            .channel()
            .invoke(methods::CONTROLLER_VIRTIO_BLK_CREATE, &params)?;
        if backend_name.is_empty() {
            tracing::warn!(name = %name, bdev = %params.bdev, "backend refused virtio-blk create");
            return Err(Status::invalid_argument(format!(
                "Could not create virtio-blk: {}",
                name
            )));
        }

        let mut response = virtio_blk.clone();
        response.name = name.to_string();
        state.directory.virtio_blks.put(
            name.clone(),
            response.clone(),
            VirtioBlkKey {
                backend_name: backend_name.clone(),
            },
        );
        tracing::info!(name = %name, backend = %backend_name, "created virtio-blk");
        Ok(response)
    }

    pub(crate) fn virtio_blk_delete(&self, request: DeleteVirtioBlkRequest) -> Result<(), Status> {
        let name = ResourceName::parse(ResourceKind::VirtioBlk, &request.name)?;

        let mut state = self.lock()?;
        let Some(entry) = state.directory.virtio_blks.get(&name) else {
            if request.allow_missing {
                return Ok(());
            }
            return Err(Status::missing_key(&name));
        };
        let params = methods::VirtioBlkDeleteParams {
            name: entry.key.backend_name.clone(),
            force: false,
        };

        let deleted: bool = self
            .channel()
            .invoke(methods::CONTROLLER_VIRTIO_BLK_DELETE, &params)?;
        if !deleted {
            tracing::warn!(name = %name, backend = %params.name, "backend refused virtio-blk delete");
            return Err(Status::invalid_argument(format!(
                "Could not delete virtio-blk: {}",
                name
            )));
        }

        state.directory.virtio_blks.remove(&name);
        tracing::info!(name = %name, backend = %params.name, "deleted virtio-blk");
        Ok(())
    }

    pub(crate) fn virtio_blk_update(
        &self,
        request: UpdateVirtioBlkRequest,
    ) -> Result<VirtioBlk, Status> {
        let virtio_blk = required(&request.virtio_blk, "virtio_blk")?;
        field_mask(request.update_mask.as_ref(), UPDATABLE_FIELDS)?;
        let name = ResourceName::parse(ResourceKind::VirtioBlk, &virtio_blk.name)?;

        let state = self.lock()?;
        if !state.directory.virtio_blks.contains(&name) {
            return Err(Status::missing_key(&name));
        }
        Err(Status::method_not_implemented("UpdateVirtioBlk"))
    }

    pub(crate) fn virtio_blk_list(
        &self,
        request: ListVirtioBlksRequest,
    ) -> Result<ListVirtioBlksResponse, Status> {
        let mut state = self.lock()?;
        let page = state
            .cursors
            .extract(request.page_size, &request.page_token)?;

        let mut entries = self.list_backend_virtio_blks()?;
        entries.sort_by_key(|e| e.pci_index);

        let virtio_blks: Vec<VirtioBlk> = entries
            .into_iter()
            .map(|entry| {
                let name = state
                    .directory
                    .virtio_blks
                    .name_by_key(|k| k.backend_name == entry.name)
                    .map(ToString::to_string)
                    .unwrap_or_default();
                VirtioBlk {
                    name,
                    pcie_id: Some(PciEndpoint {
                        physical_function: entry.pf_id,
                        virtual_function: entry.vf_id,
                        port_id: 0,
                    }),
                    volume_name_ref: entry.bdev,
                    max_io_qps: 0,
                }
            })
            .collect();

        let (virtio_blks, next_page_token) = state.cursors.paginate(virtio_blks, page);
        Ok(ListVirtioBlksResponse {
            virtio_blks,
            next_page_token,
        })
    }

    pub(crate) fn virtio_blk_get(&self, request: GetVirtioBlkRequest) -> Result<VirtioBlk, Status> {
        let name = ResourceName::parse(ResourceKind::VirtioBlk, &request.name)?;

        let state = self.lock()?;
        let Some(entry) = state.directory.virtio_blks.get(&name) else {
            return Err(Status::missing_key(&name));
        };

        let Some(found) = self
            .list_backend_virtio_blks()?
            .into_iter()
            .find(|e| e.name == entry.key.backend_name)
        else {
            return Err(Status::invalid_argument(format!(
                "could not find virtio-blk: {}",
                entry.key.backend_name
            )));
        };

        let mut response = entry.resource.clone();
        if !found.bdev.is_empty() {
            response.volume_name_ref = found.bdev;
        }
        Ok(response)
    }

    pub(crate) fn virtio_blk_stats(
        &self,
        request: StatsVirtioBlkRequest,
    ) -> Result<StatsVirtioBlkResponse, Status> {
        let name = ResourceName::parse(ResourceKind::VirtioBlk, &request.name)?;

        let state = self.lock()?;
        let Some(virtio_blk) = state.directory.virtio_blks.lookup(&name) else {
            return Err(Status::missing_key(&name));
        };

        let iostat: IoStatResult = self
            .channel()
            .invoke_without_params(methods::CONTROLLER_VIRTIO_BLK_GET_IOSTAT)?;
        volume_stats(&iostat, &virtio_blk.volume_name_ref).map(|stats| StatsVirtioBlkResponse {
            stats: Some(stats),
        })
    }
}
