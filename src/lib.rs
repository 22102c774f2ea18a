//! Rebuild organizational department hierarchies from the flat record lists
//! returned by a directory service.
//!
//! ```
//! use deptree::domain::{build_tree, Department};
//!
//! let records = vec![
//!     Department::new(2, "Sales", 1),
//!     Department::new(1, "HQ", 0),
//! ];
//! let tree = build_tree(&records).unwrap();
//! let ids: Vec<_> = tree.iter().map(|n| n.department.id).collect();
//! assert_eq!(ids, vec![1, 2]);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{build_tree, Department, DepartmentId, DepartmentTree, DomainError, TreeNode};
