//! Tree builder: reconstructs the department hierarchy from flat records.

use std::collections::HashMap;

use tracing::{debug, instrument, warn};

use crate::domain::arena::DepartmentTree;
use crate::domain::entities::{Department, DepartmentId};
use crate::domain::error::DomainError;

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;

/// Build a department tree from a flat list of records.
///
/// Shorthand for `TreeBuilder::new().build(departments)`.
pub fn build_tree(departments: &[Department]) -> TreeResult<DepartmentTree> {
    TreeBuilder::new().build(departments)
}

/// Constructs the single-rooted hierarchy implied by `parent_id` links.
///
/// The input is never modified; each record is copied into the tree.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    /// id -> position in the input
    by_id: HashMap<DepartmentId, usize>,
    /// parent id -> positions of its children, in input order
    relationship_cache: HashMap<DepartmentId, Vec<usize>>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(level = "debug", skip(self, departments), fields(records = departments.len()))]
    pub fn build(&mut self, departments: &[Department]) -> TreeResult<DepartmentTree> {
        if departments.is_empty() {
            warn!("refusing to build tree from empty input");
            return Err(DomainError::EmptyInput);
        }

        // Reset state for a fresh build
        self.by_id.clear();
        self.relationship_cache.clear();

        self.index(departments)?;
        let root = self.find_root(departments)?;
        let tree = self.build_from_root(root, departments);

        let actual = tree.iter().count();
        if actual != departments.len() {
            let unreachable: Vec<DepartmentId> = departments
                .iter()
                .map(|d| d.id)
                .filter(|id| tree.index_of(*id).is_none())
                .collect();
            warn!(
                expected = departments.len(),
                actual,
                ?unreachable,
                "departments not reachable from root"
            );
            return Err(DomainError::MalformedTree {
                expected: departments.len(),
                actual,
                unreachable,
            });
        }

        debug!(nodes = actual, depth = tree.depth(), "built department tree");
        Ok(tree)
    }

    fn index(&mut self, departments: &[Department]) -> TreeResult<()> {
        for (pos, department) in departments.iter().enumerate() {
            if self.by_id.insert(department.id, pos).is_some() {
                warn!(id = department.id, "duplicate department id");
                return Err(DomainError::DuplicateId { id: department.id });
            }
            self.relationship_cache
                .entry(department.parent_id)
                .or_default()
                .push(pos);
        }
        Ok(())
    }

    /// The root is the one record whose parent is not part of the input.
    fn find_root(&self, departments: &[Department]) -> TreeResult<usize> {
        let candidates: Vec<usize> = departments
            .iter()
            .enumerate()
            .filter(|(_, d)| !self.by_id.contains_key(&d.parent_id))
            .map(|(pos, _)| pos)
            .collect();

        match candidates.as_slice() {
            [] => {
                warn!("no department has an unknown parent id");
                Err(DomainError::NoRoot)
            }
            [root] => {
                debug!(id = departments[*root].id, "found root department");
                Ok(*root)
            }
            many => {
                let ids: Vec<DepartmentId> = many.iter().map(|&pos| departments[pos].id).collect();
                warn!(?ids, "more than one root department");
                Err(DomainError::MultipleRoots { ids })
            }
        }
    }

    fn build_from_root(&self, root: usize, departments: &[Department]) -> DepartmentTree {
        let mut tree = DepartmentTree::with_root(departments[root].clone());
        let mut stack = vec![(departments[root].id, tree.root())];

        while let Some((current_id, current_idx)) = stack.pop() {
            let Some(children) = self.relationship_cache.get(&current_id) else {
                continue;
            };
            for &pos in children {
                let child = &departments[pos];
                let child_idx = tree.insert_child(current_idx, child.clone());
                stack.push((child.id, child_idx));
            }
        }

        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_builder_when_reused_then_previous_build_does_not_leak() {
        let mut builder = TreeBuilder::new();
        let first = vec![Department::new(1, "A", 0), Department::new(2, "B", 1)];
        let second = vec![Department::new(2, "B", 0)];

        assert_eq!(builder.build(&first).unwrap().len(), 2);
        let tree = builder.build(&second).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root_node().department.id, 2);
    }

    #[test]
    fn given_closed_cycle_beside_root_when_building_then_reports_cycle_members() {
        let departments = vec![
            Department::new(1, "HQ", 0),
            Department::new(2, "Loop A", 3),
            Department::new(3, "Loop B", 2),
        ];
        let err = build_tree(&departments).unwrap_err();
        assert_eq!(
            err,
            DomainError::MalformedTree {
                expected: 3,
                actual: 1,
                unreachable: vec![2, 3],
            }
        );
    }
}
