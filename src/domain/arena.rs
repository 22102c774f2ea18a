//! Arena-backed department tree and its traversals.

use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::{Department, DepartmentId};

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Copy of the input record
    pub department: Department,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes, in input order
    pub children: Vec<Index>,
}

/// A single-rooted department hierarchy.
///
/// Only the builder creates trees; once returned a tree is never mutated, so it
/// can be shared across threads without synchronization.
#[derive(Debug, Clone)]
pub struct DepartmentTree {
    arena: Arena<TreeNode>,
    root: Index,
    by_id: HashMap<DepartmentId, Index>,
}

#[allow(clippy::len_without_is_empty)]
impl DepartmentTree {
    pub(crate) fn with_root(department: Department) -> Self {
        let mut arena = Arena::new();
        let id = department.id;
        let root = arena.insert(TreeNode {
            department,
            parent: None,
            children: Vec::new(),
        });
        let mut by_id = HashMap::new();
        by_id.insert(id, root);
        Self { arena, root, by_id }
    }

    /// Append `department` as the last child of `parent`.
    #[instrument(level = "trace", skip(self, department), fields(id = department.id))]
    pub(crate) fn insert_child(&mut self, parent: Index, department: Department) -> Index {
        let id = department.id;
        let node_idx = self.arena.insert(TreeNode {
            department,
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(parent) = self.arena.get_mut(parent) {
            parent.children.push(node_idx);
        }
        self.by_id.insert(id, node_idx);
        node_idx
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn root_node(&self) -> &TreeNode {
        &self.arena[self.root]
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    /// Number of departments in the tree.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn index_of(&self, id: DepartmentId) -> Option<Index> {
        self.by_id.get(&id).copied()
    }

    pub fn find(&self, id: DepartmentId) -> Option<&TreeNode> {
        self.index_of(id).and_then(|idx| self.get_node(idx))
    }

    /// Direct children of `node`, in sibling order.
    pub fn children<'a>(&'a self, node: &'a TreeNode) -> impl Iterator<Item = &'a TreeNode> + 'a {
        node.children.iter().filter_map(|&idx| self.arena.get(idx))
    }

    /// Pre-order traversal: each department before its sub-departments.
    pub fn iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self, self.root)
    }

    /// Pre-order traversal paired with the depth of each node (root is 0).
    pub fn iter_with_depth(&self) -> DepthIter<'_> {
        DepthIter::new(self, self.root)
    }

    /// Pre-order traversal of the subtree rooted at department `id`.
    pub fn subtree(&self, id: DepartmentId) -> Option<PreOrderIter<'_>> {
        self.index_of(id).map(|idx| PreOrderIter::new(self, idx))
    }

    /// Number of levels in the tree; a lone root has depth 1.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.iter_with_depth()
            .map(|(depth, _)| depth + 1)
            .max()
            .unwrap_or(0)
    }

    /// Departments without sub-departments, in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<&Department> {
        self.iter()
            .filter(|node| node.children.is_empty())
            .map(|node| &node.department)
            .collect()
    }

    /// Path from the root down to department `id`, both ends included.
    pub fn branch(&self, id: DepartmentId) -> Option<Vec<&Department>> {
        let mut path: Vec<&Department> = self.ancestors(id)?.collect();
        path.reverse();
        Some(path)
    }

    /// Department `id` followed by its parent, grandparent, up to the root.
    pub fn ancestors(&self, id: DepartmentId) -> Option<Ancestors<'_>> {
        self.index_of(id).map(|idx| Ancestors {
            tree: self,
            next: Some(idx),
        })
    }
}

/// Lazy pre-order iterator over a [`DepartmentTree`].
pub struct PreOrderIter<'a> {
    tree: &'a DepartmentTree,
    stack: Vec<Index>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a DepartmentTree, start: Index) -> Self {
        Self {
            tree,
            stack: vec![start],
        }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev());
                return Some(node);
            }
        }
        None
    }
}

/// Pre-order iterator yielding `(depth, node)`.
pub struct DepthIter<'a> {
    tree: &'a DepartmentTree,
    stack: Vec<(usize, Index)>,
}

impl<'a> DepthIter<'a> {
    fn new(tree: &'a DepartmentTree, start: Index) -> Self {
        Self {
            tree,
            stack: vec![(0, start)],
        }
    }
}

impl<'a> Iterator for DepthIter<'a> {
    type Item = (usize, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((depth, current_idx)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                for &child in node.children.iter().rev() {
                    self.stack.push((depth + 1, child));
                }
                return Some((depth, node));
            }
        }
        None
    }
}

/// Walks parent links towards the root.
pub struct Ancestors<'a> {
    tree: &'a DepartmentTree,
    next: Option<Index>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Department;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.tree.get_node(self.next?)?;
        self.next = node.parent;
        Some(&node.department)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // HQ(1)
    // ├── Sales(2)
    // │   └── Export(4)
    // └── Ops(3)
    fn sample_tree() -> DepartmentTree {
        let mut tree = DepartmentTree::with_root(Department::new(1, "HQ", 0));
        let root = tree.root();
        let sales = tree.insert_child(root, Department::new(2, "Sales", 1));
        tree.insert_child(root, Department::new(3, "Ops", 1));
        tree.insert_child(sales, Department::new(4, "Export", 2));
        tree
    }

    fn ids<'a>(nodes: impl Iterator<Item = &'a TreeNode>) -> Vec<DepartmentId> {
        nodes.map(|n| n.department.id).collect()
    }

    #[test]
    fn given_tree_when_iterating_then_visits_self_before_children() {
        let tree = sample_tree();
        assert_eq!(ids(tree.iter()), vec![1, 2, 4, 3]);
    }

    #[test]
    fn given_tree_when_iterating_twice_then_sequences_match() {
        let tree = sample_tree();
        assert_eq!(ids(tree.iter()), ids(tree.iter()));
    }

    #[test]
    fn given_tree_when_iterating_with_depth_then_reports_levels() {
        let tree = sample_tree();
        let levels: Vec<_> = tree
            .iter_with_depth()
            .map(|(d, n)| (d, n.department.id))
            .collect();
        assert_eq!(levels, vec![(0, 1), (1, 2), (2, 4), (1, 3)]);
    }

    #[test]
    fn given_tree_when_querying_shape_then_returns_depth_and_leaves() {
        let tree = sample_tree();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.depth(), 3);
        let leaves: Vec<_> = tree.leaf_nodes().iter().map(|d| d.id).collect();
        assert_eq!(leaves, vec![4, 3]);
    }

    #[test]
    fn given_nested_department_when_getting_branch_then_returns_root_first() {
        let tree = sample_tree();
        let branch: Vec<_> = tree.branch(4).unwrap().iter().map(|d| d.id).collect();
        assert_eq!(branch, vec![1, 2, 4]);
        assert!(tree.branch(42).is_none());
    }

    #[test]
    fn given_department_when_iterating_subtree_then_stays_below_it() {
        let tree = sample_tree();
        assert_eq!(ids(tree.subtree(2).unwrap()), vec![2, 4]);
        assert!(tree.subtree(42).is_none());
    }

    #[test]
    fn given_node_when_listing_children_then_keeps_insertion_order() {
        let tree = sample_tree();
        let names: Vec<_> = tree
            .children(tree.root_node())
            .map(|n| n.department.name.as_str())
            .collect();
        assert_eq!(names, vec!["Sales", "Ops"]);
    }
}
