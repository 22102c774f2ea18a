//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::DepartmentId;

/// Domain errors represent structurally invalid department data.
/// They are deterministic functions of the input and never worth retrying.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("cannot build a tree from an empty department list")]
    EmptyInput,

    #[error("duplicate department id: {id}")]
    DuplicateId { id: DepartmentId },

    #[error("no root department: every parent id refers to an existing department")]
    NoRoot,

    #[error("multiple root departments: {}", join_ids(.ids))]
    MultipleRoots { ids: Vec<DepartmentId> },

    #[error(
        "departments do not form a valid tree: reached {actual} of {expected}, unreachable: {}",
        join_ids(.unreachable)
    )]
    MalformedTree {
        expected: usize,
        actual: usize,
        unreachable: Vec<DepartmentId>,
    },
}

impl DomainError {
    /// True when records exist but do not compose a single connected tree.
    ///
    /// `MultipleRoots` is the forest-shaped case: orphaned records whose parent
    /// is missing surface here before the completeness check runs.
    pub fn is_malformed_tree(&self) -> bool {
        matches!(
            self,
            DomainError::MalformedTree { .. } | DomainError::MultipleRoots { .. }
        )
    }
}

fn join_ids(ids: &[DepartmentId]) -> String {
    use itertools::Itertools;
    ids.iter().join(", ")
}
