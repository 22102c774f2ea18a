//! Directory record service
//!
//! Loads department records exported from the directory service and turns
//! them into a department tree.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{build_tree, Department, DepartmentId, DepartmentTree, TreeNode};
use crate::infrastructure::traits::FileSystem;

/// Encoding of a records file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// JSON array of department objects
    Json,
    /// TOML file with `[[department]]` tables
    Toml,
}

impl InputFormat {
    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Toml => write!(f, "toml"),
        }
    }
}

/// TOML layout: a top-level array of `[[department]]` tables.
#[derive(Debug, Deserialize)]
struct TomlRecords {
    #[serde(default)]
    department: Vec<Department>,
}

/// Service for loading department records and building trees.
pub struct DirectoryService {
    fs: Arc<dyn FileSystem>,
    default_format: Option<InputFormat>,
}

impl DirectoryService {
    /// Create a new directory service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            default_format: None,
        }
    }

    /// Format used when neither the caller nor the file extension decides.
    pub fn with_default_format(mut self, format: Option<InputFormat>) -> Self {
        self.default_format = format;
        self
    }

    /// Pick the record format: explicit choice, then extension, then default.
    pub fn resolve_format(
        &self,
        path: &Path,
        explicit: Option<InputFormat>,
    ) -> ApplicationResult<InputFormat> {
        explicit
            .or_else(|| InputFormat::from_path(path))
            .or(self.default_format)
            .ok_or_else(|| ApplicationError::UnsupportedFormat(path.to_path_buf()))
    }

    /// Read and decode all records from `path`.
    #[instrument(level = "debug", skip(self))]
    pub fn load_records(
        &self,
        path: &Path,
        format: Option<InputFormat>,
    ) -> ApplicationResult<Vec<Department>> {
        if !self.fs.exists(path) || !self.fs.is_file(path) {
            return Err(ApplicationError::FileNotFound(path.to_path_buf()));
        }
        let format = self.resolve_format(path, format)?;
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read records", path)?;

        let records = Self::decode(&content, format, path)?;
        debug!("load_records: {} records from {}", records.len(), path.display());
        Ok(records)
    }

    /// Load records from `path` and build the department tree.
    pub fn load_tree(
        &self,
        path: &Path,
        format: Option<InputFormat>,
    ) -> ApplicationResult<DepartmentTree> {
        let records = self.load_records(path, format)?;
        Ok(build_tree(&records)?)
    }

    /// Look up a department in a built tree.
    pub fn department<'a>(
        &self,
        tree: &'a DepartmentTree,
        id: DepartmentId,
    ) -> ApplicationResult<&'a TreeNode> {
        tree.find(id)
            .ok_or(ApplicationError::DepartmentNotFound(id))
    }

    fn decode(content: &str, format: InputFormat, path: &Path) -> ApplicationResult<Vec<Department>> {
        let decode_err = |message: String| ApplicationError::Decode {
            path: path.to_path_buf(),
            message,
        };
        match format {
            InputFormat::Json => {
                serde_json::from_str(content).map_err(|e| decode_err(e.to_string()))
            }
            InputFormat::Toml => toml::from_str::<TomlRecords>(content)
                .map(|r| r.department)
                .map_err(|e| decode_err(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("depts.json", Some(InputFormat::Json))]
    #[case("depts.JSON", Some(InputFormat::Json))]
    #[case("depts.toml", Some(InputFormat::Toml))]
    #[case("depts.csv", None)]
    #[case("depts", None)]
    fn given_extension_when_inferring_format_then_matches(
        #[case] path: &str,
        #[case] expected: Option<InputFormat>,
    ) {
        assert_eq!(InputFormat::from_path(Path::new(path)), expected);
    }

    #[test]
    fn given_toml_records_when_decoding_then_reads_department_tables() {
        let content = r#"
[[department]]
id = 1
name = "HQ"

[[department]]
id = 2
name = "Sales"
parentid = 1
deptManagerUseridList = "u1|u2"
"#;
        let records =
            DirectoryService::decode(content, InputFormat::Toml, Path::new("x.toml")).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].parent_id, 1);
        assert_eq!(records[1].manager_user_ids(), vec!["u1", "u2"]);
    }

    #[test]
    fn given_invalid_json_when_decoding_then_returns_decode_error() {
        let err = DirectoryService::decode("{not json", InputFormat::Json, Path::new("x.json"))
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Decode { .. }));
    }
}
