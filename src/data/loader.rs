//! Name Table Loader Module
//! Reads the department-level birth counts with Polars and exposes the
//! cleaned, immutable name table.

use crate::data::processor::{self, columns, source, FEMALE_CODE, MALE_CODE};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("Data file not found: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Failed to parse GeoJSON: {0}")]
    GeoJsonError(#[from] serde_json::Error),
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
    #[error("Duplicate department code '{0}'")]
    DuplicateDepartment(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    #[cfg(test)]
    pub fn code(self) -> i32 {
        match self {
            Gender::Male => MALE_CODE,
            Gender::Female => FEMALE_CODE,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            MALE_CODE => Some(Gender::Male),
            FEMALE_CODE => Some(Gender::Female),
            _ => None,
        }
    }
}

/// One cleaned row of the name table.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRecord {
    pub year: i32,
    pub department_code: String,
    pub name: String,
    pub gender: Gender,
    pub count: i64,
}

/// Cleaned name table backed by a Polars DataFrame.
///
/// Columns: `year` (i32), `dpt` (str), `name` (str), `gender` (i32 code),
/// `count` (i64). Never mutated after construction.
#[derive(Debug, Clone)]
pub struct NameTable {
    df: DataFrame,
}

impl NameTable {
    /// Load and clean a `;`-separated name file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataLoadError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(DataLoadError::MissingFile(path.to_path_buf()));
        }

        // Read every column as text so numeric coercion happens in one place
        let raw = LazyCsvReader::new(path)
            .with_separator(b';')
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;

        for required in source::REQUIRED {
            if raw.column(required).is_err() {
                return Err(DataLoadError::MissingColumn(required.to_string()));
            }
        }

        let raw_rows = raw.height();
        let df = processor::clean_names(raw)?;
        log::debug!(
            "Dropped {} of {} rows from {} during cleaning",
            raw_rows - df.height(),
            raw_rows,
            path.display()
        );
        log::info!("Loaded {} name records from {}", df.height(), path.display());

        Ok(Self { df })
    }

    /// Build a table from records already in memory.
    ///
    /// The same cleaning rules as [`NameTable::load`] apply, so sentinel
    /// rows are dropped here too.
    #[cfg(test)]
    pub fn from_records(records: &[NameRecord]) -> PolarsResult<Self> {
        let df = DataFrame::new(vec![
            Column::new(
                columns::YEAR.into(),
                records.iter().map(|r| r.year).collect::<Vec<i32>>(),
            ),
            Column::new(
                columns::DEPARTMENT.into(),
                records
                    .iter()
                    .map(|r| r.department_code.clone())
                    .collect::<Vec<String>>(),
            ),
            Column::new(
                columns::NAME.into(),
                records.iter().map(|r| r.name.clone()).collect::<Vec<String>>(),
            ),
            Column::new(
                columns::GENDER.into(),
                records.iter().map(|r| r.gender.code()).collect::<Vec<i32>>(),
            ),
            Column::new(
                columns::COUNT.into(),
                records.iter().map(|r| r.count).collect::<Vec<i64>>(),
            ),
        ])?;

        let df = processor::drop_invalid_rows(df.lazy()).collect()?;
        Ok(Self { df })
    }

    /// Get a reference to the cleaned DataFrame.
    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Typed rows in table order.
    #[cfg(test)]
    pub fn records(&self) -> PolarsResult<Vec<NameRecord>> {
        let years = self.df.column(columns::YEAR)?.i32()?;
        let departments = self.df.column(columns::DEPARTMENT)?.str()?;
        let names = self.df.column(columns::NAME)?.str()?;
        let genders = self.df.column(columns::GENDER)?.i32()?;
        let counts = self.df.column(columns::COUNT)?.i64()?;

        let records = years
            .into_iter()
            .zip(departments)
            .zip(names)
            .zip(genders)
            .zip(counts)
            .filter_map(|((((year, dpt), name), gender), count)| {
                Some(NameRecord {
                    year: year?,
                    department_code: dpt?.to_string(),
                    name: name?.to_string(),
                    gender: Gender::from_code(gender?)?,
                    count: count?,
                })
            })
            .collect();

        Ok(records)
    }

    /// Distinct names, sorted, for the name selector.
    pub fn distinct_names(&self) -> PolarsResult<Vec<String>> {
        let unique = self.df.column(columns::NAME)?.unique()?;
        let mut names: Vec<String> = unique
            .str()?
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect();
        names.sort();
        Ok(names)
    }

    /// Smallest and largest year present, if any.
    pub fn year_bounds(&self) -> PolarsResult<Option<(i32, i32)>> {
        let years = self.df.column(columns::YEAR)?.i32()?;
        Ok(years.min().zip(years.max()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    pub(crate) fn record(
        year: i32,
        dpt: &str,
        name: &str,
        gender: Gender,
        count: i64,
    ) -> NameRecord {
        NameRecord {
            year,
            department_code: dpt.to_string(),
            name: name.to_string(),
            gender,
            count,
        }
    }

    fn write_csv(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("dpt2020.csv");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_cleans_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "sexe;preusuel;annais;dpt;nombre\n\
             1;SACHA;2000;75;100\n\
             2;SACHA;2000;75;50\n\
             1;_PRENOMS_RARES;2000;75;999\n\
             2;LEA;XXXX;13;12\n\
             2;LEA;2001;XX;8\n",
        );

        let table = NameTable::load(&path).unwrap();

        assert_eq!(table.len(), 2);
        let records = table.records().unwrap();
        assert_eq!(records[0], record(2000, "75", "SACHA", Gender::Male, 100));
        assert_eq!(records[1], record(2000, "75", "SACHA", Gender::Female, 50));
    }

    #[test]
    fn test_load_keeps_leading_zero_department_codes() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "sexe;preusuel;annais;dpt;nombre\n1;JULES;1950;01;4\n2;ANNE;1950;2A;3\n",
        );

        let table = NameTable::load(&path).unwrap();
        let codes: Vec<String> = table
            .records()
            .unwrap()
            .into_iter()
            .map(|r| r.department_code)
            .collect();

        assert_eq!(codes, vec!["01", "2A"]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = NameTable::load(dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::MissingFile(_)));
    }

    #[test]
    fn test_load_missing_column() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "sexe;preusuel;annais;nombre\n1;PAUL;2000;3\n");

        let err = NameTable::load(&path).unwrap_err();

        assert!(matches!(err, DataLoadError::MissingColumn(ref c) if c == "dpt"));
    }

    #[test]
    fn test_from_records_applies_cleaning() {
        let table = NameTable::from_records(&[
            record(2000, "75", "PAUL", Gender::Male, 3),
            record(2000, "XX", "PAUL", Gender::Male, 3),
            record(2000, "75", "_PRENOMS_RARES", Gender::Female, 9),
        ])
        .unwrap();

        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_distinct_names_and_year_bounds() {
        let table = NameTable::from_records(&[
            record(1990, "75", "ZOE", Gender::Female, 3),
            record(2005, "13", "ADAM", Gender::Male, 8),
            record(1999, "13", "ZOE", Gender::Female, 1),
        ])
        .unwrap();

        assert_eq!(table.distinct_names().unwrap(), vec!["ADAM", "ZOE"]);
        assert_eq!(table.year_bounds().unwrap(), Some((1990, 2005)));
    }

    #[test]
    fn test_year_bounds_empty_table() {
        let table = NameTable::from_records(&[]).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.year_bounds().unwrap(), None);
    }
}
