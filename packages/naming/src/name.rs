//! Resource kinds and canonical names.

use std::fmt;

use crate::id::{generate_id, validate_segment, validate_user_settable_id};
use crate::NameError;

/// The kinds of resources the bridge manages.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum ResourceKind {
    NvmeSubsystem,
    NvmeController,
    NvmeNamespace,
    VirtioBlk,
}

impl ResourceKind {
    /// Collection segment that precedes this kind's ID in a name.
    pub fn collection(self) -> &'static str {
        match self {
            ResourceKind::NvmeSubsystem => "nvmeSubsystems",
            ResourceKind::NvmeController => "nvmeControllers",
            ResourceKind::NvmeNamespace => "nvmeNamespaces",
            ResourceKind::VirtioBlk => "virtioBlks",
        }
    }

    /// The kind this kind is nested under, if any.
    pub fn parent(self) -> Option<ResourceKind> {
        match self {
            ResourceKind::NvmeController | ResourceKind::NvmeNamespace => {
                Some(ResourceKind::NvmeSubsystem)
            }
            ResourceKind::NvmeSubsystem | ResourceKind::VirtioBlk => None,
        }
    }

    /// Human-readable name pattern, used in error messages.
    pub fn pattern(self) -> &'static str {
        match self {
            ResourceKind::NvmeSubsystem => "nvmeSubsystems/{nvme_subsystem}",
            ResourceKind::NvmeController => {
                "nvmeSubsystems/{nvme_subsystem}/nvmeControllers/{nvme_controller}"
            }
            ResourceKind::NvmeNamespace => {
                "nvmeSubsystems/{nvme_subsystem}/nvmeNamespaces/{nvme_namespace}"
            }
            ResourceKind::VirtioBlk => "virtioBlks/{virtio_blk}",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceKind::NvmeSubsystem => "NvmeSubsystem",
            ResourceKind::NvmeController => "NvmeController",
            ResourceKind::NvmeNamespace => "NvmeNamespace",
            ResourceKind::VirtioBlk => "VirtioBlk",
        };
        f.write_str(s)
    }
}

/// A validated, canonical resource name.
///
/// The parent's short ID is held explicitly for child kinds. The name never
/// carries backend identifiers; those live next to the resource in the
/// bridge's directory.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ResourceName {
    kind: ResourceKind,
    parent_id: Option<String>,
    id: String,
}

impl ResourceName {
    /// Parse and validate a full resource name of the given kind.
    ///
    /// Every segment is checked independently first, so the error points at
    /// the segment that failed. The segment layout is checked afterwards.
    pub fn parse(kind: ResourceKind, name: &str) -> Result<Self, NameError> {
        let segments = validate_name(name)?;

        let wrong_shape = || NameError::WrongShape {
            name: name.to_string(),
            kind,
            pattern: kind.pattern(),
        };

        match (kind.parent(), segments.as_slice()) {
            (None, [collection, id]) if *collection == kind.collection() => Ok(ResourceName {
                kind,
                parent_id: None,
                id: id.to_string(),
            }),
            (Some(parent), [parent_collection, parent_id, collection, id])
                if *parent_collection == parent.collection()
                    && *collection == kind.collection() =>
            {
                Ok(ResourceName {
                    kind,
                    parent_id: Some(parent_id.to_string()),
                    id: id.to_string(),
                })
            }
            _ => Err(wrong_shape()),
        }
    }

    /// Build a name from an already-trusted ID.
    fn from_parts(
        kind: ResourceKind,
        id: String,
        parent: Option<&ResourceName>,
    ) -> Result<Self, NameError> {
        let parent_id = match (kind.parent(), parent) {
            (None, None) => None,
            (Some(expected), Some(parent)) if parent.kind == expected => Some(parent.id.clone()),
            (Some(expected), Some(parent)) => {
                return Err(NameError::WrongShape {
                    name: parent.to_string(),
                    kind: expected,
                    pattern: expected.pattern(),
                })
            }
            (Some(expected), None) => {
                return Err(NameError::MissingParent {
                    kind,
                    parent: expected,
                })
            }
            (None, Some(parent)) => {
                return Err(NameError::UnexpectedParent {
                    kind,
                    name: parent.to_string(),
                })
            }
        };

        Ok(ResourceName {
            kind,
            parent_id,
            id,
        })
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// The short ID (last segment).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The parent's short ID, for child kinds.
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    /// The parent's full name, for child kinds.
    pub fn parent(&self) -> Option<ResourceName> {
        let parent_kind = self.kind.parent()?;
        let parent_id = self.parent_id.clone()?;
        Some(ResourceName {
            kind: parent_kind,
            parent_id: None,
            id: parent_id,
        })
    }

    /// Check whether `parent` is this resource's parent.
    pub fn is_child_of(&self, parent: &ResourceName) -> bool {
        self.kind.parent() == Some(parent.kind) && self.parent_id.as_deref() == Some(&parent.id)
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(parent_kind), Some(parent_id)) = (self.kind.parent(), &self.parent_id) {
            write!(f, "{}/{}/", parent_kind.collection(), parent_id)?;
        }
        write!(f, "{}/{}", self.kind.collection(), self.id)
    }
}

/// Validate every segment of a resource name and return the segments.
pub fn validate_name(name: &str) -> Result<Vec<&str>, NameError> {
    if name.is_empty() {
        return Err(NameError::EmptyName);
    }

    let segments: Vec<&str> = name.split('/').collect();
    for (position, segment) in segments.iter().enumerate() {
        validate_segment(segment, position)?;
    }

    Ok(segments)
}

/// Derive the canonical name for a resource being created.
///
/// An empty `requested_id` means the caller left the choice to the system,
/// and a fresh UUID is used. Otherwise the ID must satisfy
/// [`validate_user_settable_id`].
pub fn derive_name(
    kind: ResourceKind,
    requested_id: &str,
    parent: Option<&ResourceName>,
) -> Result<ResourceName, NameError> {
    let id = if requested_id.is_empty() {
        generate_id()
    } else {
        validate_user_settable_id(requested_id)?;
        requested_id.to_string()
    };

    ResourceName::from_parts(kind, id, parent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subsystem(id: &str) -> ResourceName {
        derive_name(ResourceKind::NvmeSubsystem, id, None).unwrap()
    }

    #[test]
    fn derive_top_level_names() {
        assert_eq!(subsystem("subsys0").to_string(), "nvmeSubsystems/subsys0");

        let virtio = derive_name(ResourceKind::VirtioBlk, "blk0", None).unwrap();
        assert_eq!(virtio.to_string(), "virtioBlks/blk0");
        assert!(virtio.parent().is_none());
    }

    #[test]
    fn derive_child_names() {
        let parent = subsystem("subsys0");
        let ctrl = derive_name(ResourceKind::NvmeController, "ctrl0", Some(&parent)).unwrap();
        assert_eq!(
            ctrl.to_string(),
            "nvmeSubsystems/subsys0/nvmeControllers/ctrl0"
        );
        assert_eq!(ctrl.parent_id(), Some("subsys0"));
        assert_eq!(ctrl.parent(), Some(parent.clone()));
        assert!(ctrl.is_child_of(&parent));
        assert!(!ctrl.is_child_of(&subsystem("other")));

        let ns = derive_name(ResourceKind::NvmeNamespace, "ns0", Some(&parent)).unwrap();
        assert_eq!(ns.to_string(), "nvmeSubsystems/subsys0/nvmeNamespaces/ns0");
    }

    #[test]
    fn derive_generates_id_when_empty() {
        let name = derive_name(ResourceKind::NvmeSubsystem, "", None).unwrap();
        assert_eq!(name.id().len(), 36);
        // Round-trips through the parser even though it would fail the
        // user-settable grammar.
        let parsed = ResourceName::parse(ResourceKind::NvmeSubsystem, &name.to_string()).unwrap();
        assert_eq!(parsed, name);
    }

    #[test]
    fn derive_rejects_invalid_ids() {
        let err = derive_name(ResourceKind::NvmeSubsystem, "CapitalLettersNotAllowed", None)
            .unwrap_err();
        assert!(err.to_string().contains("'C' in position 0"));
    }

    #[test]
    fn derive_checks_parent_presence() {
        assert!(matches!(
            derive_name(ResourceKind::NvmeController, "c", None),
            Err(NameError::MissingParent { .. })
        ));

        let parent = subsystem("s");
        assert!(matches!(
            derive_name(ResourceKind::VirtioBlk, "v", Some(&parent)),
            Err(NameError::UnexpectedParent { .. })
        ));

        let wrong_parent = derive_name(ResourceKind::VirtioBlk, "v", None).unwrap();
        assert!(matches!(
            derive_name(ResourceKind::NvmeNamespace, "n", Some(&wrong_parent)),
            Err(NameError::WrongShape { .. })
        ));
    }

    #[test]
    fn parse_round_trips() {
        for (kind, name) in [
            (ResourceKind::NvmeSubsystem, "nvmeSubsystems/a"),
            (
                ResourceKind::NvmeController,
                "nvmeSubsystems/a/nvmeControllers/b",
            ),
            (
                ResourceKind::NvmeNamespace,
                "nvmeSubsystems/a/nvmeNamespaces/c",
            ),
            (ResourceKind::VirtioBlk, "virtioBlks/d"),
        ] {
            assert_eq!(ResourceName::parse(kind, name).unwrap().to_string(), name);
        }
    }

    #[test]
    fn parse_reports_bad_segment() {
        let err = ResourceName::parse(ResourceKind::NvmeSubsystem, "-ABC-DEF").unwrap_err();
        assert_eq!(
            err,
            NameError::InvalidSegment {
                segment: "-ABC-DEF".to_string(),
                position: 0
            }
        );

        let err =
            ResourceName::parse(ResourceKind::NvmeSubsystem, "nvmeSubsystems/bad-").unwrap_err();
        assert!(matches!(err, NameError::InvalidSegment { position: 1, .. }));
    }

    #[test]
    fn parse_rejects_wrong_layout() {
        for (kind, name) in [
            (ResourceKind::NvmeSubsystem, "virtioBlks/a"),
            (ResourceKind::NvmeSubsystem, "nvmeSubsystems"),
            (ResourceKind::NvmeController, "nvmeSubsystems/a"),
            (
                ResourceKind::NvmeController,
                "nvmeSubsystems/a/nvmeNamespaces/b",
            ),
            (ResourceKind::VirtioBlk, "virtioBlks/a/extra"),
        ] {
            assert!(
                matches!(
                    ResourceName::parse(kind, name),
                    Err(NameError::WrongShape { .. })
                ),
                "{name}"
            );
        }
    }

    #[test]
    fn parse_rejects_empty_and_double_slash() {
        assert_eq!(
            ResourceName::parse(ResourceKind::VirtioBlk, "").unwrap_err(),
            NameError::EmptyName
        );
        assert!(matches!(
            ResourceName::parse(ResourceKind::VirtioBlk, "virtioBlks//a"),
            Err(NameError::InvalidSegment { position: 1, .. })
        ));
    }
}
