//! NVMe controller lifecycle.
//!
//! Only PCIe controllers reach the backend. Fabrics transports pass endpoint
//! validation and are then rejected.

use nvbridge_backend::methods::{self, ControllerListEntry, ControllerListParams};
use nvbridge_backend::RpcChannelExt;
use nvbridge_naming::{derive_name, ResourceKind, ResourceName};

use crate::directory::{ControllerKey, Directory};
use crate::model::*;
use crate::validation::{field_mask, required, required_str};
use crate::{Bridge, Status};

const UPDATABLE_FIELDS: &[&str] = &[
    "name",
    "spec",
    "spec.trtype",
    "spec.pcie_id",
    "spec.fabrics_id",
    "spec.max_nsq",
    "spec.max_ncq",
];

/// Check the endpoint matches the transport and return the PCIe endpoint.
fn pcie_endpoint(spec: &NvmeControllerSpec) -> Result<&PciEndpoint, Status> {
    match spec.trtype {
        NvmeTransportType::Unspecified => Err(Status::invalid_argument(
            "missing required field: nvme_controller.spec.trtype",
        )),
        NvmeTransportType::Pcie => {
            if spec.fabrics_id.is_some() {
                return Err(Status::invalid_argument(
                    "fabrics_id must not be set for pcie transport",
                ));
            }
            required(&spec.pcie_id, "nvme_controller.spec.pcie_id")
        }
        trtype => {
            if spec.pcie_id.is_some() {
                return Err(Status::invalid_argument(format!(
                    "pcie_id must not be set for {:?} transport",
                    trtype
                )));
            }
            required(&spec.fabrics_id, "nvme_controller.spec.fabrics_id")?;
            Err(Status::invalid_argument(format!(
                "transport type {:?} is not supported",
                trtype
            )))
        }
    }
}

fn positive(value: i64) -> Option<i32> {
    i32::try_from(value).ok().filter(|v| *v > 0)
}

/// Shape a backend listing entry as a resource.
fn from_backend(name: String, entry: &ControllerListEntry) -> NvmeController {
    NvmeController {
        name,
        spec: Some(NvmeControllerSpec {
            nvme_controller_id: Some(entry.cntlid),
            trtype: NvmeTransportType::Pcie,
            pcie_id: Some(PciEndpoint {
                physical_function: entry.pf_id,
                virtual_function: entry.vf_id,
                port_id: 0,
            }),
            ..Default::default()
        }),
        status: Some(NvmeControllerStatus { active: true }),
    }
}

fn is_nvme_of(entry: &ControllerListEntry, subnqn: &str) -> bool {
    entry.controller_type == methods::CONTROLLER_TYPE_NVME && entry.subnqn == subnqn
}

impl Bridge {
    fn list_backend_controllers(&self) -> Result<Vec<ControllerListEntry>, Status> {
        let params = ControllerListParams::of_type(methods::CONTROLLER_TYPE_NVME);
        Ok(self.channel().invoke(methods::CONTROLLER_LIST, &params)?)
    }

    pub(crate) fn controller_create(
        &self,
        request: CreateNvmeControllerRequest,
    ) -> Result<NvmeController, Status> {
        required_str(&request.parent, "parent")?;
        let controller = required(&request.nvme_controller, "nvme_controller")?;
        let spec = required(&controller.spec, "nvme_controller.spec")?;
        let pcie = pcie_endpoint(spec)?;

        let parent = ResourceName::parse(ResourceKind::NvmeSubsystem, &request.parent)?;
        let name = derive_name(
            ResourceKind::NvmeController,
            &request.nvme_controller_id,
            Some(&parent),
        )?;

        let mut state = self.lock()?;
        if let Some(existing) = state.directory.controllers.lookup(&name) {
            tracing::info!(name = %name, "NVMe controller already exists");
            return Ok(existing);
        }
        let Some(subsystem) = state.directory.subsystems.get(&parent) else {
            return Err(Status::missing_key(&parent));
        };
        let subnqn = subsystem.key.nqn.clone();
        let max_namespaces = subsystem
            .resource
            .spec
            .as_ref()
            .and_then(|s| positive(s.max_namespaces));

        let params = methods::ControllerNvmeCreateParams {
            nqn: subnqn.clone(),
            emulation_manager: self.config().emulation_manager.clone(),
            pf_id: pcie.physical_function,
            vf_id: (pcie.virtual_function != 0).then_some(pcie.virtual_function),
            num_queues: positive(i64::from(spec.max_nsq)),
            max_namespaces,
        };
        let result: methods::ControllerNvmeCreateResult = self
            .channel()
            .invoke(methods::CONTROLLER_NVME_CREATE, &params)?;
        if result.name.is_empty() || result.cntlid < 0 {
            tracing::warn!(
                nqn = %subnqn,
                cntlid = result.cntlid,
                "backend refused controller create"
            );
            return Err(Status::invalid_argument(format!(
                "Could not create CTRL: {}",
                name
            )));
        }

        let mut response = controller.clone();
        response.name = name.to_string();
        let mut stored_spec = spec.clone();
        stored_spec.nvme_controller_id = Some(result.cntlid);
        response.spec = Some(stored_spec);
        response.status = Some(NvmeControllerStatus { active: true });

        state.directory.controllers.put(
            name.clone(),
            response.clone(),
            ControllerKey {
                subnqn,
                cntlid: result.cntlid,
                backend_name: result.name.clone(),
            },
        );
        tracing::info!(name = %name, cntlid = result.cntlid, backend = %result.name, "created NVMe controller");
        Ok(response)
    }

    pub(crate) fn controller_delete(
        &self,
        request: DeleteNvmeControllerRequest,
    ) -> Result<(), Status> {
        let name = ResourceName::parse(ResourceKind::NvmeController, &request.name)?;

        let mut state = self.lock()?;
        let Some(entry) = state.directory.controllers.get(&name) else {
            if request.allow_missing {
                return Ok(());
            }
            return Err(Status::not_found(format!(
                "error finding controller {}",
                name
            )));
        };
        let params = methods::ControllerNvmeDeleteParams {
            subnqn: entry.key.subnqn.clone(),
            cntlid: entry.key.cntlid,
        };

        let deleted: bool = self
            .channel()
            .invoke(methods::CONTROLLER_NVME_DELETE, &params)?;
        if !deleted {
            tracing::warn!(name = %name, cntlid = params.cntlid, "backend refused controller delete");
            return Err(Status::invalid_argument(format!(
                "Could not delete CTRL: {}",
                name
            )));
        }

        state.directory.controllers.remove(&name);
        tracing::info!(name = %name, cntlid = params.cntlid, "deleted NVMe controller");
        Ok(())
    }

    pub(crate) fn controller_update(
        &self,
        request: UpdateNvmeControllerRequest,
    ) -> Result<NvmeController, Status> {
        let controller = required(&request.nvme_controller, "nvme_controller")?;
        field_mask(request.update_mask.as_ref(), UPDATABLE_FIELDS)?;
        let name = ResourceName::parse(ResourceKind::NvmeController, &controller.name)?;

        let state = self.lock()?;
        if !state.directory.controllers.contains(&name) {
            return Err(Status::missing_key(&name));
        }
        Err(Status::method_not_implemented("UpdateNvmeController"))
    }

    pub(crate) fn controller_list(
        &self,
        request: ListNvmeControllersRequest,
    ) -> Result<ListNvmeControllersResponse, Status> {
        required_str(&request.parent, "parent")?;
        let parent = ResourceName::parse(ResourceKind::NvmeSubsystem, &request.parent)?;

        let mut state = self.lock()?;
        let page = state
            .cursors
            .extract(request.page_size, &request.page_token)?;
        let Some(subsystem) = state.directory.subsystems.get(&parent) else {
            return Err(Status::missing_key(&parent));
        };
        let subnqn = subsystem.key.nqn.clone();

        let mut entries: Vec<ControllerListEntry> = self
            .list_backend_controllers()?
            .into_iter()
            .filter(|e| is_nvme_of(e, &subnqn))
            .collect();
        entries.sort_by_key(|e| e.cntlid);

        let controllers: Vec<NvmeController> = entries
            .iter()
            .map(|entry| from_backend(resolve_name(&state.directory, entry), entry))
            .collect();

        let (nvme_controllers, next_page_token) = state.cursors.paginate(controllers, page);
        Ok(ListNvmeControllersResponse {
            nvme_controllers,
            next_page_token,
        })
    }

    pub(crate) fn controller_get(
        &self,
        request: GetNvmeControllerRequest,
    ) -> Result<NvmeController, Status> {
        let name = ResourceName::parse(ResourceKind::NvmeController, &request.name)?;

        let state = self.lock()?;
        let Some(entry) = state.directory.controllers.get(&name) else {
            return Err(Status::missing_key(&name));
        };

        let found = self
            .list_backend_controllers()?
            .into_iter()
            .find(|e| is_nvme_of(e, &entry.key.subnqn) && e.cntlid == entry.key.cntlid);
        let Some(found) = found else {
            return Err(Status::invalid_argument(format!(
                "could not find cntlid: {}",
                entry.key.cntlid
            )));
        };

        let mut response = entry.resource.clone();
        let live = from_backend(name.to_string(), &found);
        let spec = response.spec.get_or_insert_with(Default::default);
        spec.nvme_controller_id = Some(found.cntlid);
        if spec.trtype == NvmeTransportType::Pcie {
            spec.pcie_id = live.spec.and_then(|s| s.pcie_id);
        }
        response.status = live.status;
        Ok(response)
    }

    pub(crate) fn controller_stats(
        &self,
        request: StatsNvmeControllerRequest,
    ) -> Result<StatsNvmeControllerResponse, Status> {
        let name = ResourceName::parse(ResourceKind::NvmeController, &request.name)?;

        let state = self.lock()?;
        if !state.directory.controllers.contains(&name) {
            return Err(Status::missing_key(&name));
        }
        Err(Status::method_not_implemented("StatsNvmeController"))
    }
}

/// The directory name of a listed controller, or empty if this bridge did not
/// create it.
fn resolve_name(directory: &Directory, entry: &ControllerListEntry) -> String {
    directory
        .controllers
        .name_by_key(|k| k.subnqn == entry.subnqn && k.cntlid == entry.cntlid)
        .map(ToString::to_string)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Code;

    fn spec(trtype: NvmeTransportType) -> NvmeControllerSpec {
        NvmeControllerSpec {
            trtype,
            ..Default::default()
        }
    }

    #[test]
    fn pcie_requires_pcie_endpoint() {
        let err = pcie_endpoint(&spec(NvmeTransportType::Pcie)).unwrap_err();
        assert_eq!(err.message(), "missing required field: nvme_controller.spec.pcie_id");

        let mut ok = spec(NvmeTransportType::Pcie);
        ok.pcie_id = Some(PciEndpoint {
            physical_function: 2,
            ..Default::default()
        });
        assert_eq!(pcie_endpoint(&ok).unwrap().physical_function, 2);

        ok.fabrics_id = Some(FabricsEndpoint::default());
        assert!(pcie_endpoint(&ok).is_err());
    }

    #[test]
    fn fabrics_transports_rejected() {
        let mut tcp = spec(NvmeTransportType::Tcp);
        let err = pcie_endpoint(&tcp).unwrap_err();
        assert_eq!(err.message(), "missing required field: nvme_controller.spec.fabrics_id");

        tcp.fabrics_id = Some(FabricsEndpoint {
            traddr: "127.0.0.1".to_string(),
            trsvcid: "4420".to_string(),
            adrfam: "ipv4".to_string(),
        });
        let err = pcie_endpoint(&tcp).unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument);
        assert!(err.message().contains("not supported"));

        let mut rdma = spec(NvmeTransportType::Rdma);
        rdma.pcie_id = Some(PciEndpoint::default());
        assert!(pcie_endpoint(&rdma).unwrap_err().message().contains("pcie_id must not be set"));
    }

    #[test]
    fn unspecified_transport_is_missing_field() {
        let err = pcie_endpoint(&spec(NvmeTransportType::Unspecified)).unwrap_err();
        assert_eq!(err.message(), "missing required field: nvme_controller.spec.trtype");
    }

    #[test]
    fn positive_filters_unset_limits() {
        assert_eq!(positive(0), None);
        assert_eq!(positive(-3), None);
        assert_eq!(positive(8), Some(8));
        assert_eq!(positive(i64::MAX), None);
    }
}
