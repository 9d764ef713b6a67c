//! The bridge's in-process record of the resources it created.
//!
//! Each kind has its own [`Table`] from canonical name to an [`Entry`]: the
//! client-facing resource as last returned, plus the backend key needed to
//! address it on the daemon. Backend keys are stored, never parsed back out
//! of names. Nothing here survives a restart.

use std::collections::BTreeMap;

use nvbridge_naming::ResourceName;

use crate::model::{NvmeController, NvmeNamespace, NvmeSubsystem, VirtioBlk};

/// How the daemon knows a subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SubsystemKey {
    pub nqn: String,
}

/// How the daemon knows an NVMe controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ControllerKey {
    pub subnqn: String,
    pub cntlid: i32,
    pub backend_name: String,
}

/// How the daemon knows an attached namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NamespaceKey {
    pub subnqn: String,
    /// Controller the namespace was attached through.
    pub cntlid: i32,
    pub nsid: i32,
}

/// How the daemon knows a virtio-blk controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct VirtioBlkKey {
    pub backend_name: String,
}

#[derive(Debug, Clone)]
pub(crate) struct Entry<R, K> {
    pub resource: R,
    pub key: K,
}

/// Name-keyed store for one resource kind.
#[derive(Debug)]
pub(crate) struct Table<R, K> {
    entries: BTreeMap<ResourceName, Entry<R, K>>,
}

impl<R, K> Default for Table<R, K> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<R: Clone, K> Table<R, K> {
    pub fn get(&self, name: &ResourceName) -> Option<&Entry<R, K>> {
        self.entries.get(name)
    }

    /// A copy of the stored resource.
    pub fn lookup(&self, name: &ResourceName) -> Option<R> {
        self.entries.get(name).map(|e| e.resource.clone())
    }

    pub fn contains(&self, name: &ResourceName) -> bool {
        self.entries.contains_key(name)
    }

    pub fn put(&mut self, name: ResourceName, resource: R, key: K) {
        self.entries.insert(name, Entry { resource, key });
    }

    pub fn remove(&mut self, name: &ResourceName) -> Option<Entry<R, K>> {
        self.entries.remove(name)
    }

    /// The name of the first entry whose backend key satisfies `matches`.
    pub fn name_by_key(&self, matches: impl Fn(&K) -> bool) -> Option<&ResourceName> {
        self.entries
            .iter()
            .find(|(_, entry)| matches(&entry.key))
            .map(|(name, _)| name)
    }

    /// Entries nested under `parent`, in name order.
    pub fn children_of<'a>(
        &'a self,
        parent: &'a ResourceName,
    ) -> impl Iterator<Item = (&'a ResourceName, &'a Entry<R, K>)> + 'a {
        self.entries
            .iter()
            .filter(move |(name, _)| name.is_child_of(parent))
    }
}

/// All four tables.
#[derive(Debug, Default)]
pub(crate) struct Directory {
    pub subsystems: Table<NvmeSubsystem, SubsystemKey>,
    pub controllers: Table<NvmeController, ControllerKey>,
    pub namespaces: Table<NvmeNamespace, NamespaceKey>,
    pub virtio_blks: Table<VirtioBlk, VirtioBlkKey>,
}

impl Directory {
    /// The lowest backend controller ID under `subsystem`, if it has any
    /// controllers. Namespaces are attached and listed through it.
    pub fn primary_cntlid(&self, subsystem: &ResourceName) -> Option<i32> {
        self.controllers
            .children_of(subsystem)
            .map(|(_, entry)| entry.key.cntlid)
            .min()
    }
}
