//! The inbound resource API.
//!
//! Two traits, one per service, implemented by [`Bridge`]. Each method maps
//! one resource-API call onto the backend; the bodies live in the per-kind
//! modules.

use crate::model::*;
use crate::{Bridge, Status};

/// NVMe subsystems, controllers and namespaces.
pub trait FrontendNvmeService {
    fn create_nvme_subsystem(
        &self,
        request: CreateNvmeSubsystemRequest,
    ) -> Result<NvmeSubsystem, Status>;
    fn delete_nvme_subsystem(&self, request: DeleteNvmeSubsystemRequest) -> Result<(), Status>;
    fn update_nvme_subsystem(
        &self,
        request: UpdateNvmeSubsystemRequest,
    ) -> Result<NvmeSubsystem, Status>;
    fn list_nvme_subsystems(
        &self,
        request: ListNvmeSubsystemsRequest,
    ) -> Result<ListNvmeSubsystemsResponse, Status>;
    fn get_nvme_subsystem(&self, request: GetNvmeSubsystemRequest)
        -> Result<NvmeSubsystem, Status>;
    fn stats_nvme_subsystem(
        &self,
        request: StatsNvmeSubsystemRequest,
    ) -> Result<StatsNvmeSubsystemResponse, Status>;

    fn create_nvme_controller(
        &self,
        request: CreateNvmeControllerRequest,
    ) -> Result<NvmeController, Status>;
    fn delete_nvme_controller(&self, request: DeleteNvmeControllerRequest)
        -> Result<(), Status>;
    fn update_nvme_controller(
        &self,
        request: UpdateNvmeControllerRequest,
    ) -> Result<NvmeController, Status>;
    fn list_nvme_controllers(
        &self,
        request: ListNvmeControllersRequest,
    ) -> Result<ListNvmeControllersResponse, Status>;
    fn get_nvme_controller(
        &self,
        request: GetNvmeControllerRequest,
    ) -> Result<NvmeController, Status>;
    fn stats_nvme_controller(
        &self,
        request: StatsNvmeControllerRequest,
    ) -> Result<StatsNvmeControllerResponse, Status>;

    fn create_nvme_namespace(
        &self,
        request: CreateNvmeNamespaceRequest,
    ) -> Result<NvmeNamespace, Status>;
    fn delete_nvme_namespace(&self, request: DeleteNvmeNamespaceRequest) -> Result<(), Status>;
    fn update_nvme_namespace(
        &self,
        request: UpdateNvmeNamespaceRequest,
    ) -> Result<NvmeNamespace, Status>;
    fn list_nvme_namespaces(
        &self,
        request: ListNvmeNamespacesRequest,
    ) -> Result<ListNvmeNamespacesResponse, Status>;
    fn get_nvme_namespace(&self, request: GetNvmeNamespaceRequest)
        -> Result<NvmeNamespace, Status>;
    fn stats_nvme_namespace(
        &self,
        request: StatsNvmeNamespaceRequest,
    ) -> Result<StatsNvmeNamespaceResponse, Status>;
}

/// Virtio-blk controllers.
pub trait FrontendVirtioBlkService {
    fn create_virtio_blk(&self, request: CreateVirtioBlkRequest) -> Result<VirtioBlk, Status>;
    fn delete_virtio_blk(&self, request: DeleteVirtioBlkRequest) -> Result<(), Status>;
    fn update_virtio_blk(&self, request: UpdateVirtioBlkRequest) -> Result<VirtioBlk, Status>;
    fn list_virtio_blks(
        &self,
        request: ListVirtioBlksRequest,
    ) -> Result<ListVirtioBlksResponse, Status>;
    fn get_virtio_blk(&self, request: GetVirtioBlkRequest) -> Result<VirtioBlk, Status>;
    fn stats_virtio_blk(
        &self,
        request: StatsVirtioBlkRequest,
    ) -> Result<StatsVirtioBlkResponse, Status>;
}

impl FrontendNvmeService for Bridge {
    fn create_nvme_subsystem(
        &self,
        request: CreateNvmeSubsystemRequest,
    ) -> Result<NvmeSubsystem, Status> {
        self.subsystem_create(request)
    }

    fn delete_nvme_subsystem(&self, request: DeleteNvmeSubsystemRequest) -> Result<(), Status> {
        self.subsystem_delete(request)
    }

    fn update_nvme_subsystem(
        &self,
        request: UpdateNvmeSubsystemRequest,
    ) -> Result<NvmeSubsystem, Status> {
        self.subsystem_update(request)
    }

    fn list_nvme_subsystems(
        &self,
        request: ListNvmeSubsystemsRequest,
    ) -> Result<ListNvmeSubsystemsResponse, Status> {
        self.subsystem_list(request)
    }

    fn get_nvme_subsystem(
        &self,
        request: GetNvmeSubsystemRequest,
    ) -> Result<NvmeSubsystem, Status> {
        self.subsystem_get(request)
    }

    fn stats_nvme_subsystem(
        &self,
        request: StatsNvmeSubsystemRequest,
    ) -> Result<StatsNvmeSubsystemResponse, Status> {
        self.subsystem_stats(request)
    }

    fn create_nvme_controller(
        &self,
        request: CreateNvmeControllerRequest,
    ) -> Result<NvmeController, Status> {
        self.controller_create(request)
    }

    fn delete_nvme_controller(
        &self,
        request: DeleteNvmeControllerRequest,
    ) -> Result<(), Status> {
        self.controller_delete(request)
    }

    fn update_nvme_controller(
        &self,
        request: UpdateNvmeControllerRequest,
    ) -> Result<NvmeController, Status> {
        self.controller_update(request)
    }

    fn list_nvme_controllers(
        &self,
        request: ListNvmeControllersRequest,
    ) -> Result<ListNvmeControllersResponse, Status> {
        self.controller_list(request)
    }

    fn get_nvme_controller(
        &self,
        request: GetNvmeControllerRequest,
    ) -> Result<NvmeController, Status> {
        self.controller_get(request)
    }

    fn stats_nvme_controller(
        &self,
        request: StatsNvmeControllerRequest,
    ) -> Result<StatsNvmeControllerResponse, Status> {
        self.controller_stats(request)
    }

    fn create_nvme_namespace(
        &self,
        request: CreateNvmeNamespaceRequest,
    ) -> Result<NvmeNamespace, Status> {
        self.namespace_create(request)
    }

    fn delete_nvme_namespace(&self, request: DeleteNvmeNamespaceRequest) -> Result<(), Status> {
        self.namespace_delete(request)
    }

    fn update_nvme_namespace(
        &self,
        request: UpdateNvmeNamespaceRequest,
    ) -> Result<NvmeNamespace, Status> {
        self.namespace_update(request)
    }

    fn list_nvme_namespaces(
        &self,
        request: ListNvmeNamespacesRequest,
    ) -> Result<ListNvmeNamespacesResponse, Status> {
        self.namespace_list(request)
    }

    fn get_nvme_namespace(
        &self,
        request: GetNvmeNamespaceRequest,
    ) -> Result<NvmeNamespace, Status> {
        self.namespace_get(request)
    }

    fn stats_nvme_namespace(
        &self,
        request: StatsNvmeNamespaceRequest,
    ) -> Result<StatsNvmeNamespaceResponse, Status> {
        self.namespace_stats(request)
    }
}

impl FrontendVirtioBlkService for Bridge {
    fn create_virtio_blk(&self, request: CreateVirtioBlkRequest) -> Result<VirtioBlk, Status> {
        self.virtio_blk_create(request)
    }

    fn delete_virtio_blk(&self, request: DeleteVirtioBlkRequest) -> Result<(), Status> {
        self.virtio_blk_delete(request)
    }

    fn update_virtio_blk(&self, request: UpdateVirtioBlkRequest) -> Result<VirtioBlk, Status> {
        self.virtio_blk_update(request)
    }

    fn list_virtio_blks(
        &self,
        request: ListVirtioBlksRequest,
    ) -> Result<ListVirtioBlksResponse, Status> {
        self.virtio_blk_list(request)
    }

    fn get_virtio_blk(&self, request: GetVirtioBlkRequest) -> Result<VirtioBlk, Status> {
        self.virtio_blk_get(request)
    }

    fn stats_virtio_blk(
        &self,
        request: StatsVirtioBlkRequest,
    ) -> Result<StatsVirtioBlkResponse, Status> {
        self.virtio_blk_stats(request)
    }
}
