//! Department Boundaries Loader
//! Reads the department GeoJSON into a table keyed by department code.

use crate::data::DataLoadError;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Column names of [`DepartmentTable::code_name_frame`].
pub mod columns {
    pub const CODE: &str = "code";
    pub const DEPARTMENT_NAME: &str = "dept_name";
}

/// GeoJSON geometry carried through the core untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Geometry(serde_json::Value);

impl Geometry {
    #[cfg(test)]
    pub fn from_json(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentRecord {
    pub code: String,
    pub name: String,
    pub geometry: Geometry,
}

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    properties: FeatureProperties,
    #[serde(default)]
    geometry: Geometry,
}

#[derive(Deserialize)]
struct FeatureProperties {
    code: String,
    nom: String,
}

/// Immutable department table, iterated in file order.
#[derive(Debug, Clone, Default)]
pub struct DepartmentTable {
    departments: Vec<DepartmentRecord>,
    by_code: HashMap<String, usize>,
}

impl DepartmentTable {
    /// Load a GeoJSON `FeatureCollection` of departments.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataLoadError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(DataLoadError::MissingFile(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_geojson_str(&content)?;
        log::info!("Loaded {} departments from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn from_geojson_str(content: &str) -> Result<Self, DataLoadError> {
        let collection: FeatureCollection = serde_json::from_str(content)?;
        let records = collection
            .features
            .into_iter()
            .map(|feature| DepartmentRecord {
                code: feature.properties.code,
                name: feature.properties.nom,
                geometry: feature.geometry,
            })
            .collect();
        Self::from_records(records)
    }

    /// Build the table, rejecting duplicate codes.
    pub fn from_records(departments: Vec<DepartmentRecord>) -> Result<Self, DataLoadError> {
        let mut by_code = HashMap::with_capacity(departments.len());
        for (idx, dept) in departments.iter().enumerate() {
            if by_code.insert(dept.code.clone(), idx).is_some() {
                return Err(DataLoadError::DuplicateDepartment(dept.code.clone()));
            }
        }
        Ok(Self {
            departments,
            by_code,
        })
    }

    pub fn get(&self, code: &str) -> Option<&DepartmentRecord> {
        self.by_code.get(code).map(|&idx| &self.departments[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &DepartmentRecord> {
        self.departments.iter()
    }

    pub fn len(&self) -> usize {
        self.departments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.departments.is_empty()
    }

    /// Department display names, sorted, for the department selector.
    pub fn sorted_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.departments.iter().map(|d| d.name.clone()).collect();
        names.sort();
        names.dedup();
        names
    }

    /// Two-column frame (`code`, `dept_name`) used to join names onto records.
    pub fn code_name_frame(&self) -> PolarsResult<DataFrame> {
        DataFrame::new(vec![
            Column::new(
                columns::CODE.into(),
                self.departments
                    .iter()
                    .map(|d| d.code.clone())
                    .collect::<Vec<String>>(),
            ),
            Column::new(
                columns::DEPARTMENT_NAME.into(),
                self.departments
                    .iter()
                    .map(|d| d.name.clone())
                    .collect::<Vec<String>>(),
            ),
        ])
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    pub(crate) fn department(code: &str, name: &str) -> DepartmentRecord {
        DepartmentRecord {
            code: code.to_string(),
            name: name.to_string(),
            geometry: Geometry::from_json(json!({
                "type": "Polygon",
                "coordinates": [[[2.2, 48.8], [2.4, 48.8], [2.4, 48.9], [2.2, 48.8]]]
            })),
        }
    }

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "code": "75", "nom": "Paris" },
                "geometry": { "type": "Polygon", "coordinates": [[[2.2, 48.8], [2.4, 48.8], [2.4, 48.9], [2.2, 48.8]]] }
            },
            {
                "type": "Feature",
                "properties": { "code": "2A", "nom": "Corse-du-Sud" },
                "geometry": { "type": "MultiPolygon", "coordinates": [] }
            }
        ]
    }"#;

    #[test]
    fn test_from_geojson_keeps_file_order() {
        let table = DepartmentTable::from_geojson_str(SAMPLE).unwrap();

        let codes: Vec<&str> = table.iter().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["75", "2A"]);
        assert_eq!(table.get("2A").unwrap().name, "Corse-du-Sud");
        assert_eq!(
            table.get("75").unwrap().geometry.as_json()["type"],
            json!("Polygon")
        );
        assert!(table.get("13").is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("departements.geojson");
        fs::write(&path, SAMPLE).unwrap();

        let table = DepartmentTable::load(&path).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.sorted_names(), vec!["Corse-du-Sud", "Paris"]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = DepartmentTable::load(dir.path().join("none.geojson")).unwrap_err();
        assert!(matches!(err, DataLoadError::MissingFile(_)));
    }

    #[test]
    fn test_invalid_json_is_load_error() {
        let err = DepartmentTable::from_geojson_str("{ not json").unwrap_err();
        assert!(matches!(err, DataLoadError::GeoJsonError(_)));
    }

    #[test]
    fn test_duplicate_codes_rejected() {
        let err = DepartmentTable::from_records(vec![
            department("75", "Paris"),
            department("75", "Paris bis"),
        ])
        .unwrap_err();
        assert!(matches!(err, DataLoadError::DuplicateDepartment(ref c) if c == "75"));
    }

    #[test]
    fn test_code_name_frame() {
        let table =
            DepartmentTable::from_records(vec![department("13", "Bouches-du-Rhône")]).unwrap();
        let frame = table.code_name_frame().unwrap();

        assert_eq!(frame.height(), 1);
        let names = frame.column(columns::DEPARTMENT_NAME).unwrap().str().unwrap();
        assert_eq!(names.get(0), Some("Bouches-du-Rhône"));
    }
}
