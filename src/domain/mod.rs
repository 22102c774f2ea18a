//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod render;

pub use arena::{Ancestors, DepartmentTree, DepthIter, PreOrderIter, TreeNode};
pub use builder::{build_tree, TreeBuilder, TreeResult};
pub use entities::*;
pub use error::DomainError;
pub use render::TreeRender;

/// Expand environment variables and `~` in a path string.
///
/// Unexpandable input is returned unchanged.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
