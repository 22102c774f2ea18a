//! Domain entities: core data structures

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a department as assigned by the directory service.
pub type DepartmentId = i64;

/// Separator used by the directory service in the raw manager list.
const MANAGER_SEPARATOR: char = '|';

/// One organizational unit as delivered by the directory service.
///
/// Records arrive as a flat list; the hierarchy is implied by `parent_id`.
/// Field names on the wire follow the directory service's conventions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    /// `0` conventionally marks the top-level department, but the root is
    /// determined by whether the id exists in the collection.
    #[serde(rename = "parentid", default)]
    pub parent_id: DepartmentId,
    #[serde(rename = "outerDept", default)]
    pub is_outer_department: bool,
    #[serde(default)]
    pub ext: String,
    /// Raw `|`-delimited manager user ids, see [`Department::manager_user_ids`].
    #[serde(rename = "deptManagerUseridList", default)]
    pub manager_user_id_list: String,
    #[serde(rename = "sourceIdentifier", default)]
    pub source_identifier: String,
}

impl Department {
    pub fn new(id: DepartmentId, name: impl Into<String>, parent_id: DepartmentId) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id,
            is_outer_department: false,
            ext: String::new(),
            manager_user_id_list: String::new(),
            source_identifier: String::new(),
        }
    }

    pub fn with_outer_department(mut self, outer: bool) -> Self {
        self.is_outer_department = outer;
        self
    }

    pub fn with_ext(mut self, ext: impl Into<String>) -> Self {
        self.ext = ext.into();
        self
    }

    pub fn with_source_identifier(mut self, source_identifier: impl Into<String>) -> Self {
        self.source_identifier = source_identifier.into();
        self
    }

    /// Set the raw manager list, e.g. `"u1|u2"`.
    pub fn with_manager_user_ids(mut self, raw: impl Into<String>) -> Self {
        self.manager_user_id_list = raw.into();
        self
    }

    /// Split the raw manager list into user ids.
    ///
    /// An empty raw value yields no ids; empty segments are skipped.
    pub fn manager_user_ids(&self) -> Vec<&str> {
        if self.manager_user_id_list.is_empty() {
            return Vec::new();
        }
        self.manager_user_id_list
            .split(MANAGER_SEPARATOR)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", vec![])]
    #[case("u1", vec!["u1"])]
    #[case("u1|u2|u3", vec!["u1", "u2", "u3"])]
    #[case("u1||u2|", vec!["u1", "u2"])]
    fn given_raw_manager_list_when_splitting_then_returns_ids_in_order(
        #[case] raw: &str,
        #[case] expected: Vec<&str>,
    ) {
        let dept = Department::new(1, "Sales", 0).with_manager_user_ids(raw);
        assert_eq!(dept.manager_user_ids(), expected);
    }

    #[test]
    fn given_minimal_fields_when_creating_then_defaults_rest() {
        let dept = Department::new(3, "Ops", 1);
        assert_eq!(dept.id, 3);
        assert_eq!(dept.name, "Ops");
        assert_eq!(dept.parent_id, 1);
        assert!(!dept.is_outer_department);
        assert!(dept.ext.is_empty());
        assert!(dept.source_identifier.is_empty());
        assert!(dept.manager_user_ids().is_empty());
    }

    #[test]
    fn given_wire_json_when_deserializing_then_maps_directory_field_names() {
        let json = r#"{
            "id": 5,
            "name": "R&D",
            "parentid": 1,
            "outerDept": true,
            "deptManagerUseridList": "m1|m2",
            "sourceIdentifier": "src-5"
        }"#;
        let dept: Department = serde_json::from_str(json).unwrap();
        assert_eq!(dept.parent_id, 1);
        assert!(dept.is_outer_department);
        assert_eq!(dept.manager_user_ids(), vec!["m1", "m2"]);
        assert_eq!(dept.source_identifier, "src-5");
        assert_eq!(dept.ext, "");
    }

    #[test]
    fn given_built_department_when_serializing_then_uses_directory_field_names() {
        let dept = Department::new(4, "Export", 2)
            .with_outer_department(true)
            .with_ext(r#"{"region":"emea"}"#)
            .with_manager_user_ids("u1|u2");

        let value = serde_json::to_value(&dept).unwrap();

        assert_eq!(value["parentid"], 2);
        assert_eq!(value["outerDept"], true);
        assert_eq!(value["ext"], r#"{"region":"emea"}"#);
        assert_eq!(value["deptManagerUseridList"], "u1|u2");
        assert_eq!(serde_json::from_value::<Department>(value).unwrap(), dept);
    }

    #[test]
    fn given_record_without_parent_when_deserializing_then_parent_defaults_to_zero() {
        let dept: Department = serde_json::from_str(r#"{"id": 1, "name": "HQ"}"#).unwrap();
        assert_eq!(dept.parent_id, 0);
    }

    #[test]
    fn given_department_when_displaying_then_shows_name_and_id() {
        assert_eq!(Department::new(9, "Finance", 1).to_string(), "Finance (9)");
    }
}
