//! Conversion of department trees into printable `termtree` trees.

use std::collections::HashMap;

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::DepartmentTree;
use crate::domain::entities::Department;

pub trait TreeRender {
    fn to_tree_string(&self, show_ids: bool) -> Tree<String>;
}

fn label(department: &Department, show_ids: bool) -> String {
    if show_ids {
        department.to_string()
    } else {
        department.name.clone()
    }
}

impl TreeRender for DepartmentTree {
    /// Leaves are assembled bottom-up from a pre-order walk, so deep chains
    /// do not grow the call stack.
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self, show_ids: bool) -> Tree<String> {
        let mut order = Vec::with_capacity(self.len());
        let mut stack = vec![self.root()];
        while let Some(idx) = stack.pop() {
            if let Some(node) = self.get_node(idx) {
                stack.extend(node.children.iter().rev());
                order.push((idx, node));
            }
        }

        // reverse pre-order visits every child before its parent
        let mut built: HashMap<Index, Tree<String>> = HashMap::with_capacity(order.len());
        for (idx, node) in order.into_iter().rev() {
            let leaves: Vec<Tree<String>> = node
                .children
                .iter()
                .filter_map(|child| built.remove(child))
                .collect();
            built.insert(
                idx,
                Tree::new(label(&node.department, show_ids)).with_leaves(leaves),
            );
        }

        built
            .remove(&self.root())
            .unwrap_or_else(|| Tree::new(label(&self.root_node().department, show_ids)))
    }
}
