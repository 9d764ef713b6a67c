//! Naming errors.

use crate::name::ResourceKind;

/// Errors raised while validating IDs or parsing resource names.
///
/// All of these are caller mistakes; the bridge reports them as
/// invalid-argument failures.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("user-settable ID must be between 1 and {max} characters")]
    IdLength { max: usize },

    #[error("user-settable ID must begin with a letter")]
    IdStart,

    #[error("user-settable ID must end with a letter or number")]
    IdEnd,

    #[error(
        "user-settable ID must only contain lowercase, numbers and hyphens (got: '{character}' in position {position})"
    )]
    IdCharacter { character: char, position: usize },

    #[error("user-settable ID must not be a valid UUIDv4")]
    IdIsUuid,

    #[error("resource name must not be empty")]
    EmptyName,

    #[error("segment '{segment}' at position {position}: not a valid DNS-like name")]
    InvalidSegment { segment: String, position: usize },

    #[error("resource name '{name}' is not a valid {kind} name (expected {pattern})")]
    WrongShape {
        name: String,
        kind: ResourceKind,
        pattern: &'static str,
    },

    #[error("{kind} requires a parent {parent} name")]
    MissingParent {
        kind: ResourceKind,
        parent: ResourceKind,
    },

    #[error("{kind} does not take a parent, got '{name}'")]
    UnexpectedParent { kind: ResourceKind, name: String },
}
