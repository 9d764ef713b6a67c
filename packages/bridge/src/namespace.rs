//! NVMe namespace lifecycle.
//!
//! The daemon attaches namespaces through a controller. The bridge uses the
//! subsystem's lowest-cntlid controller it knows of, or controller 0 when it
//! knows none.

use nvbridge_backend::methods::{self, IoStatResult, NamespaceListResult};
use nvbridge_backend::RpcChannelExt;
use nvbridge_naming::{derive_name, ResourceKind, ResourceName};

use crate::directory::NamespaceKey;
use crate::model::*;
use crate::validation::{field_mask, required, required_str};
use crate::{Bridge, Status};

const UPDATABLE_FIELDS: &[&str] = &[
    "name",
    "spec",
    "spec.host_nsid",
    "spec.volume_name_ref",
    "spec.uuid",
    "spec.nguid",
    "spec.eui64",
];

/// EUI-64 as the daemon expects it: 16 hex digits, omitted when zero.
fn format_eui64(eui64: i64) -> String {
    if eui64 == 0 {
        String::new()
    } else {
        format!("{:016x}", eui64)
    }
}

impl Bridge {
    pub(crate) fn namespace_create(
        &self,
        request: CreateNvmeNamespaceRequest,
    ) -> Result<NvmeNamespace, Status> {
        required_str(&request.parent, "parent")?;
        let namespace = required(&request.nvme_namespace, "nvme_namespace")?;
        let spec = required(&namespace.spec, "nvme_namespace.spec")?;
        required_str(&spec.volume_name_ref, "nvme_namespace.spec.volume_name_ref")?;

        let parent = ResourceName::parse(ResourceKind::NvmeSubsystem, &request.parent)?;
        let name = derive_name(
            ResourceKind::NvmeNamespace,
            &request.nvme_namespace_id,
            Some(&parent),
        )?;

        let mut state = self.lock()?;
        if let Some(existing) = state.directory.namespaces.lookup(&name) {
            tracing::info!(name = %name, "NVMe namespace already exists");
            return Ok(existing);
        }
        let Some(subsystem) = state.directory.subsystems.get(&parent) else {
            return Err(Status::missing_key(&parent));
        };
        let subnqn = subsystem.key.nqn.clone();
        let cntlid = state.directory.primary_cntlid(&parent).unwrap_or(0);

        let params = methods::NamespaceAttachParams {
            bdev_type: self.config().bdev_type.clone(),
            bdev: spec.volume_name_ref.clone(),
            nsid: spec.host_nsid,
            subnqn: subnqn.clone(),
            cntlid,
            uuid: spec.uuid.clone(),
            nguid: spec.nguid.clone(),
            eui64: format_eui64(spec.eui64),
        };
        let attached: bool = self
            .channel()
            .invoke(methods::CONTROLLER_NVME_NAMESPACE_ATTACH, &params)?;
        if !attached {
            tracing::warn!(name = %name, nsid = spec.host_nsid, "backend refused namespace attach");
            return Err(Status::invalid_argument(format!(
                "Could not create NS: {}",
                name
            )));
        }

        let mut response = namespace.clone();
        response.name = name.to_string();
        response.status = Some(NvmeNamespaceStatus::online());

        state.directory.namespaces.put(
            name.clone(),
            response.clone(),
            NamespaceKey {
                subnqn,
                cntlid,
                nsid: spec.host_nsid,
            },
        );
        tracing::info!(name = %name, nsid = spec.host_nsid, cntlid, "created NVMe namespace");
        Ok(response)
    }

    pub(crate) fn namespace_delete(
        &self,
        request: DeleteNvmeNamespaceRequest,
    ) -> Result<(), Status> {
        let name = ResourceName::parse(ResourceKind::NvmeNamespace, &request.name)?;

        let mut state = self.lock()?;
        let Some(entry) = state.directory.namespaces.get(&name) else {
            if request.allow_missing {
                return Ok(());
            }
            return Err(Status::not_found(format!(
                "error finding namespace {}",
                name
            )));
        };
        let params = methods::NamespaceDetachParams {
            nsid: entry.key.nsid,
            subnqn: entry.key.subnqn.clone(),
            cntlid: entry.key.cntlid,
        };

        let detached: bool = self
            .channel()
            .invoke(methods::CONTROLLER_NVME_NAMESPACE_DETACH, &params)?;
        if !detached {
            tracing::warn!(name = %name, nsid = params.nsid, "backend refused namespace detach");
            return Err(Status::invalid_argument(format!(
                "Could not delete NS: {}",
                name
            )));
        }

        state.directory.namespaces.remove(&name);
        tracing::info!(name = %name, nsid = params.nsid, "deleted NVMe namespace");
        Ok(())
    }

    pub(crate) fn namespace_update(
        &self,
        request: UpdateNvmeNamespaceRequest,
    ) -> Result<NvmeNamespace, Status> {
        let namespace = required(&request.nvme_namespace, "nvme_namespace")?;
        field_mask(request.update_mask.as_ref(), UPDATABLE_FIELDS)?;
        let name = ResourceName::parse(ResourceKind::NvmeNamespace, &namespace.name)?;

        let state = self.lock()?;
        if !state.directory.namespaces.contains(&name) {
            return Err(Status::missing_key(&name));
        }
        Err(Status::method_not_implemented("UpdateNvmeNamespace"))
    }

    pub(crate) fn namespace_list(
        &self,
        request: ListNvmeNamespacesRequest,
    ) -> Result<ListNvmeNamespacesResponse, Status> {
        required_str(&request.parent, "parent")?;
        let parent = ResourceName::parse(ResourceKind::NvmeSubsystem, &request.parent)?;

        let mut state = self.lock()?;
        let page = state
            .cursors
            .extract(request.page_size, &request.page_token)?;
        let Some(subsystem) = state.directory.subsystems.get(&parent) else {
            return Err(Status::missing_key(&parent));
        };
        let params = methods::NamespaceListParams {
            subnqn: subsystem.key.nqn.clone(),
            cntlid: state.directory.primary_cntlid(&parent).unwrap_or(0),
        };

        let mut result: NamespaceListResult = self
            .channel()
            .invoke(methods::CONTROLLER_NVME_NAMESPACE_LIST, &params)?;
        result.namespaces.sort_by_key(|ns| ns.nsid);

        let namespaces: Vec<NvmeNamespace> = result
            .namespaces
            .into_iter()
            .map(|ns| {
                let name = state
                    .directory
                    .namespaces
                    .name_by_key(|k| k.subnqn == params.subnqn && k.nsid == ns.nsid)
                    .map(ToString::to_string)
                    .unwrap_or_default();
                NvmeNamespace {
                    name,
                    spec: Some(NvmeNamespaceSpec {
                        host_nsid: ns.nsid,
                        volume_name_ref: ns.bdev,
                        ..Default::default()
                    }),
                    status: Some(NvmeNamespaceStatus::online()),
                }
            })
            .collect();

        let (nvme_namespaces, next_page_token) = state.cursors.paginate(namespaces, page);
        Ok(ListNvmeNamespacesResponse {
            nvme_namespaces,
            next_page_token,
        })
    }

    pub(crate) fn namespace_get(
        &self,
        request: GetNvmeNamespaceRequest,
    ) -> Result<NvmeNamespace, Status> {
        let name = ResourceName::parse(ResourceKind::NvmeNamespace, &request.name)?;

        let state = self.lock()?;
        let Some(entry) = state.directory.namespaces.get(&name) else {
            return Err(Status::missing_key(&name));
        };

        let params = methods::NamespaceListParams {
            subnqn: entry.key.subnqn.clone(),
            cntlid: entry.key.cntlid,
        };
        let result: NamespaceListResult = self
            .channel()
            .invoke(methods::CONTROLLER_NVME_NAMESPACE_LIST, &params)?;
        let Some(found) = result
            .namespaces
            .into_iter()
            .find(|ns| ns.nsid == entry.key.nsid)
        else {
            return Err(Status::invalid_argument(format!(
                "could not find NSID: {}",
                entry.key.nsid
            )));
        };

        let mut response = entry.resource.clone();
        let spec = response.spec.get_or_insert_with(Default::default);
        spec.host_nsid = found.nsid;
        spec.volume_name_ref = found.bdev;
        response.status = Some(NvmeNamespaceStatus::online());
        Ok(response)
    }

    pub(crate) fn namespace_stats(
        &self,
        request: StatsNvmeNamespaceRequest,
    ) -> Result<StatsNvmeNamespaceResponse, Status> {
        let name = ResourceName::parse(ResourceKind::NvmeNamespace, &request.name)?;

        let state = self.lock()?;
        let Some(namespace) = state.directory.namespaces.lookup(&name) else {
            return Err(Status::missing_key(&name));
        };
        let volume = namespace.spec.unwrap_or_default().volume_name_ref;

        let iostat: IoStatResult = self
            .channel()
            .invoke_without_params(methods::CONTROLLER_NVME_GET_IOSTAT)?;
        volume_stats(&iostat, &volume).map(|stats| StatsNvmeNamespaceResponse {
            stats: Some(stats),
        })
    }
}

/// Counters for `volume` out of an iostat result.
pub(crate) fn volume_stats(iostat: &IoStatResult, volume: &str) -> Result<VolumeStats, Status> {
    let Some(bdev) = iostat.find_bdev(volume) else {
        return Err(Status::invalid_argument(format!(
            "could not find BDEV: {}",
            volume
        )));
    };
    Ok(VolumeStats {
        read_ops_count: bdev.read_ios,
        write_ops_count: bdev.write_ios,
        read_bytes_count: bdev.read_bytes,
        write_bytes_count: bdev.write_bytes,
    })
}
