//! NVMe subsystem lifecycle.

use nvbridge_backend::methods::{self, SubsystemListEntry, VersionResult};
use nvbridge_backend::RpcChannelExt;
use nvbridge_naming::{derive_name, ResourceKind, ResourceName};

use crate::directory::SubsystemKey;
use crate::model::*;
use crate::validation::{field_mask, max_len, required, required_str};
use crate::{Bridge, Status};

const MAX_NQN_LEN: usize = 223;
const MAX_SERIAL_NUMBER_LEN: usize = 20;
const MAX_MODEL_NUMBER_LEN: usize = 40;

const UPDATABLE_FIELDS: &[&str] = &[
    "name",
    "spec",
    "spec.nqn",
    "spec.serial_number",
    "spec.model_number",
    "spec.max_namespaces",
];

impl Bridge {
    pub(crate) fn subsystem_create(
        &self,
        request: CreateNvmeSubsystemRequest,
    ) -> Result<NvmeSubsystem, Status> {
        let subsystem = required(&request.nvme_subsystem, "nvme_subsystem")?;
        let spec = required(&subsystem.spec, "nvme_subsystem.spec")?;
        required_str(&spec.nqn, "nvme_subsystem.spec.nqn")?;
        max_len("nqn", &spec.nqn, MAX_NQN_LEN)?;
        max_len("serial_number", &spec.serial_number, MAX_SERIAL_NUMBER_LEN)?;
        max_len("model_number", &spec.model_number, MAX_MODEL_NUMBER_LEN)?;

        let name = derive_name(ResourceKind::NvmeSubsystem, &request.nvme_subsystem_id, None)?;

        let mut state = self.lock()?;
        if let Some(existing) = state.directory.subsystems.lookup(&name) {
            tracing::info!(name = %name, "NVMe subsystem already exists");
            return Ok(existing);
        }

        let params = methods::SubsystemCreateParams {
            nqn: spec.nqn.clone(),
            serial_number: spec.serial_number.clone(),
            model_number: spec.model_number.clone(),
        };
        let created: bool = self
            .channel()
            .invoke(methods::SUBSYSTEM_NVME_CREATE, &params)?;
        if !created {
            tracing::warn!(nqn = %spec.nqn, "backend refused subsystem create");
            return Err(Status::invalid_argument(format!(
                "Could not create NQN: {}",
                spec.nqn
            )));
        }

        let version: VersionResult = self.channel().invoke_without_params(methods::GET_VERSION)?;

        let response = NvmeSubsystem {
            name: name.to_string(),
            spec: Some(spec.clone()),
            status: Some(NvmeSubsystemStatus {
                firmware_revision: version.version,
            }),
        };
        state.directory.subsystems.put(
            name.clone(),
            response.clone(),
            SubsystemKey {
                nqn: spec.nqn.clone(),
            },
        );
        tracing::info!(name = %name, nqn = %spec.nqn, "created NVMe subsystem");
        Ok(response)
    }

    pub(crate) fn subsystem_delete(&self, request: DeleteNvmeSubsystemRequest) -> Result<(), Status> {
        let name = ResourceName::parse(ResourceKind::NvmeSubsystem, &request.name)?;

        let mut state = self.lock()?;
        let Some(entry) = state.directory.subsystems.get(&name) else {
            if request.allow_missing {
                return Ok(());
            }
            return Err(Status::missing_key(&name));
        };
        let nqn = entry.key.nqn.clone();

        let params = methods::SubsystemDeleteParams { nqn: nqn.clone() };
        let deleted: bool = self
            .channel()
            .invoke(methods::SUBSYSTEM_NVME_DELETE, &params)?;
        if !deleted {
            tracing::warn!(nqn = %nqn, "backend refused subsystem delete");
            return Err(Status::invalid_argument(format!(
                "Could not delete NQN: {}",
                nqn
            )));
        }

        state.directory.subsystems.remove(&name);
        tracing::info!(name = %name, nqn = %nqn, "deleted NVMe subsystem");
        Ok(())
    }

    pub(crate) fn subsystem_update(
        &self,
        request: UpdateNvmeSubsystemRequest,
    ) -> Result<NvmeSubsystem, Status> {
        let subsystem = required(&request.nvme_subsystem, "nvme_subsystem")?;
        field_mask(request.update_mask.as_ref(), UPDATABLE_FIELDS)?;
        let name = ResourceName::parse(ResourceKind::NvmeSubsystem, &subsystem.name)?;

        let state = self.lock()?;
        if !state.directory.subsystems.contains(&name) {
            return Err(Status::missing_key(&name));
        }
        Err(Status::method_not_implemented("UpdateNvmeSubsystem"))
    }

    pub(crate) fn subsystem_list(
        &self,
        request: ListNvmeSubsystemsRequest,
    ) -> Result<ListNvmeSubsystemsResponse, Status> {
        let mut state = self.lock()?;
        let page = state
            .cursors
            .extract(request.page_size, &request.page_token)?;

        let mut entries: Vec<SubsystemListEntry> = self
            .channel()
            .invoke_without_params(methods::SUBSYSTEM_NVME_LIST)?;
        entries.sort_by_key(|e| e.subsys_id);

        let subsystems: Vec<NvmeSubsystem> = entries
            .into_iter()
            .map(|entry| {
                let name = state
                    .directory
                    .subsystems
                    .name_by_key(|k| k.nqn == entry.nqn)
                    .map(ToString::to_string)
                    .unwrap_or_default();
                NvmeSubsystem {
                    name,
                    spec: Some(NvmeSubsystemSpec {
                        nqn: entry.nqn,
                        serial_number: entry.serial_number,
                        model_number: entry.model_number,
                        max_namespaces: 0,
                    }),
                    status: None,
                }
            })
            .collect();

        let (nvme_subsystems, next_page_token) = state.cursors.paginate(subsystems, page);
        Ok(ListNvmeSubsystemsResponse {
            nvme_subsystems,
            next_page_token,
        })
    }

    pub(crate) fn subsystem_get(
        &self,
        request: GetNvmeSubsystemRequest,
    ) -> Result<NvmeSubsystem, Status> {
        let name = ResourceName::parse(ResourceKind::NvmeSubsystem, &request.name)?;

        let state = self.lock()?;
        let Some(entry) = state.directory.subsystems.get(&name) else {
            return Err(Status::missing_key(&name));
        };

        let entries: Vec<SubsystemListEntry> = self
            .channel()
            .invoke_without_params(methods::SUBSYSTEM_NVME_LIST)?;
        let Some(found) = entries.into_iter().find(|e| e.nqn == entry.key.nqn) else {
            return Err(Status::invalid_argument(format!(
                "could not find NQN: {}",
                entry.key.nqn
            )));
        };

        let max_namespaces = entry
            .resource
            .spec
            .as_ref()
            .map_or(0, |spec| spec.max_namespaces);
        Ok(NvmeSubsystem {
            name: name.to_string(),
            spec: Some(NvmeSubsystemSpec {
                nqn: found.nqn,
                serial_number: found.serial_number,
                model_number: found.model_number,
                max_namespaces,
            }),
            status: entry.resource.status.clone(),
        })
    }

    pub(crate) fn subsystem_stats(
        &self,
        request: StatsNvmeSubsystemRequest,
    ) -> Result<StatsNvmeSubsystemResponse, Status> {
        let name = ResourceName::parse(ResourceKind::NvmeSubsystem, &request.name)?;

        let state = self.lock()?;
        if !state.directory.subsystems.contains(&name) {
            return Err(Status::missing_key(&name));
        }
        Err(Status::method_not_implemented("StatsNvmeSubsystem"))
    }
}
