//! Boy/girl split over time for one name.

use crate::analysis::AnalysisError;
use crate::data::{columns, geo_columns, DepartmentTable, Gender, NameTable};
use polars::prelude::*;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

/// Label of the "every department" choice in the department selector.
pub const ALL_DEPARTMENTS: &str = "All";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DepartmentFilter {
    #[default]
    All,
    /// Department display name, matched case-insensitively.
    Named(String),
}

impl DepartmentFilter {
    pub fn parse(label: &str) -> Self {
        if label == ALL_DEPARTMENTS {
            DepartmentFilter::All
        } else {
            DepartmentFilter::Named(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            DepartmentFilter::All => ALL_DEPARTMENTS,
            DepartmentFilter::Named(name) => name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenderTrendRow {
    pub year: i32,
    pub boys_count: i64,
    pub girls_count: i64,
    pub total_count: i64,
    pub pct_boys: f64,
    pub pct_girls: f64,
}

impl GenderTrendRow {
    /// Percentages are 0 when the year has no births at all.
    pub fn from_counts(year: i32, boys_count: i64, girls_count: i64) -> Self {
        let total_count = boys_count + girls_count;
        let (pct_boys, pct_girls) = if total_count > 0 {
            let total = total_count as f64;
            (
                boys_count as f64 / total * 100.0,
                girls_count as f64 / total * 100.0,
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            year,
            boys_count,
            girls_count,
            total_count,
            pct_boys,
            pct_girls,
        }
    }
}

pub struct GenderTrendAggregator;

impl GenderTrendAggregator {
    /// Per-year boy/girl counts for `name`, sorted by year.
    ///
    /// Returns an empty vector when nothing matches the name and filter.
    pub fn gender_trend(
        names: &NameTable,
        departments: &DepartmentTable,
        name: &str,
        filter: &DepartmentFilter,
    ) -> Result<Vec<GenderTrendRow>, AnalysisError> {
        // Left join keeps records whose code has no department entry
        let mut lf = names
            .frame()
            .clone()
            .lazy()
            .left_join(
                departments.code_name_frame()?.lazy(),
                col(columns::DEPARTMENT),
                col(geo_columns::CODE),
            )
            .filter(
                col(columns::NAME)
                    .str()
                    .to_uppercase()
                    .eq(lit(name.to_uppercase())),
            );

        if let DepartmentFilter::Named(department) = filter {
            lf = lf.filter(
                col(geo_columns::DEPARTMENT_NAME)
                    .str()
                    .to_uppercase()
                    .eq(lit(department.to_uppercase())),
            );
        }

        let grouped = lf
            .group_by([col(columns::YEAR), col(columns::GENDER)])
            .agg([col(columns::COUNT).sum()])
            .collect()?;

        let years = grouped.column(columns::YEAR)?.i32()?;
        let genders = grouped.column(columns::GENDER)?.i32()?;
        let counts = grouped.column(columns::COUNT)?.i64()?;

        let mut per_year: BTreeMap<i32, (i64, i64)> = BTreeMap::new();
        for ((year, gender), count) in years.into_iter().zip(genders).zip(counts) {
            let (Some(year), Some(gender), Some(count)) = (year, gender, count) else {
                continue;
            };
            let entry = per_year.entry(year).or_default();
            match Gender::from_code(gender) {
                Some(Gender::Male) => entry.0 += count,
                Some(Gender::Female) => entry.1 += count,
                None => {}
            }
        }

        let rows: Vec<GenderTrendRow> = per_year
            .into_iter()
            .map(|(year, (boys, girls))| GenderTrendRow::from_counts(year, boys, girls))
            .collect();

        log::debug!(
            "Gender trend for '{}' in {}: {} years",
            name,
            filter.label(),
            rows.len()
        );
        Ok(rows)
    }

    /// Flat display/export table, most recent year first.
    pub fn trend_table(rows: &[GenderTrendRow]) -> PolarsResult<DataFrame> {
        let mut sorted = rows.to_vec();
        sorted.sort_by(|a, b| b.year.cmp(&a.year));

        DataFrame::new(vec![
            Column::new(
                "Year".into(),
                sorted.iter().map(|r| r.year).collect::<Vec<i32>>(),
            ),
            Column::new(
                "Girls".into(),
                sorted.iter().map(|r| r.girls_count).collect::<Vec<i64>>(),
            ),
            Column::new(
                "Boys".into(),
                sorted.iter().map(|r| r.boys_count).collect::<Vec<i64>>(),
            ),
            Column::new(
                "Total".into(),
                sorted.iter().map(|r| r.total_count).collect::<Vec<i64>>(),
            ),
            Column::new(
                "% Girls".into(),
                sorted.iter().map(|r| r.pct_girls).collect::<Vec<f64>>(),
            ),
            Column::new(
                "% Boys".into(),
                sorted.iter().map(|r| r.pct_boys).collect::<Vec<f64>>(),
            ),
        ])
    }

    /// Write [`GenderTrendAggregator::trend_table`] as CSV.
    pub fn write_trend_csv(rows: &[GenderTrendRow], path: &Path) -> Result<(), AnalysisError> {
        let mut table = Self::trend_table(rows)?;
        let mut file = File::create(path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut table)?;
        log::info!("Exported {} trend rows to {}", rows.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{department, record};
    use std::fs;
    use tempfile::TempDir;

    fn departments() -> DepartmentTable {
        DepartmentTable::from_records(vec![
            department("75", "Paris"),
            department("69", "Rhône"),
        ])
        .unwrap()
    }

    #[test]
    fn test_sacha_in_france() {
        let names = NameTable::from_records(&[
            record(2000, "75", "SACHA", Gender::Male, 100),
            record(2000, "75", "SACHA", Gender::Female, 50),
        ])
        .unwrap();

        let rows = GenderTrendAggregator::gender_trend(
            &names,
            &departments(),
            "SACHA",
            &DepartmentFilter::All,
        )
        .unwrap();

        assert_eq!(rows.len(), 1);
        let row = rows[0];
        assert_eq!(row.year, 2000);
        assert_eq!((row.boys_count, row.girls_count, row.total_count), (100, 50, 150));
        assert!((row.pct_boys - 66.6667).abs() < 1e-3);
        assert!((row.pct_girls - 33.3333).abs() < 1e-3);
    }

    #[test]
    fn test_name_match_is_case_insensitive() {
        let names =
            NameTable::from_records(&[record(2001, "75", "SACHA", Gender::Male, 3)]).unwrap();

        let rows = GenderTrendAggregator::gender_trend(
            &names,
            &departments(),
            "Sacha",
            &DepartmentFilter::All,
        )
        .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].pct_boys, 100.0);
        assert_eq!(rows[0].pct_girls, 0.0);
    }

    #[test]
    fn test_unknown_name_is_empty() {
        let names =
            NameTable::from_records(&[record(2001, "75", "SACHA", Gender::Male, 3)]).unwrap();

        let rows = GenderTrendAggregator::gender_trend(
            &names,
            &departments(),
            "Zzzznotaname",
            &DepartmentFilter::All,
        )
        .unwrap();

        assert!(rows.is_empty());
    }

    #[test]
    fn test_department_filter() {
        let names = NameTable::from_records(&[
            record(2000, "75", "ALEX", Gender::Male, 10),
            record(2000, "69", "ALEX", Gender::Female, 30),
            record(2001, "69", "ALEX", Gender::Male, 5),
        ])
        .unwrap();

        let rows = GenderTrendAggregator::gender_trend(
            &names,
            &departments(),
            "ALEX",
            &DepartmentFilter::parse("rhône"),
        )
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].year, rows[0].boys_count, rows[0].girls_count), (2000, 0, 30));
        assert_eq!((rows[1].year, rows[1].boys_count, rows[1].girls_count), (2001, 5, 0));
    }

    #[test]
    fn test_all_keeps_records_without_department_entry() {
        let names = NameTable::from_records(&[
            record(2000, "971", "ALEX", Gender::Male, 10),
            record(2000, "75", "ALEX", Gender::Male, 1),
        ])
        .unwrap();

        let all = GenderTrendAggregator::gender_trend(
            &names,
            &departments(),
            "ALEX",
            &DepartmentFilter::All,
        )
        .unwrap();
        let paris = GenderTrendAggregator::gender_trend(
            &names,
            &departments(),
            "ALEX",
            &DepartmentFilter::parse("Paris"),
        )
        .unwrap();

        assert_eq!(all[0].boys_count, 11);
        assert_eq!(paris[0].boys_count, 1);
    }

    #[test]
    fn test_rows_sorted_by_year() {
        let names = NameTable::from_records(&[
            record(2010, "75", "NOE", Gender::Male, 1),
            record(1990, "75", "NOE", Gender::Female, 1),
            record(2000, "75", "NOE", Gender::Male, 1),
        ])
        .unwrap();

        let rows = GenderTrendAggregator::gender_trend(
            &names,
            &departments(),
            "NOE",
            &DepartmentFilter::All,
        )
        .unwrap();

        let years: Vec<i32> = rows.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![1990, 2000, 2010]);
    }

    #[test]
    fn test_zero_total_has_zero_percentages() {
        let row = GenderTrendRow::from_counts(1970, 0, 0);
        assert_eq!((row.pct_boys, row.pct_girls), (0.0, 0.0));
        assert!(!row.pct_boys.is_nan());
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!(DepartmentFilter::parse("All"), DepartmentFilter::All);
        assert_eq!(
            DepartmentFilter::parse("Gironde"),
            DepartmentFilter::Named("Gironde".to_string())
        );
        assert_eq!(DepartmentFilter::Named("Ain".into()).label(), "Ain");
    }

    #[test]
    fn test_trend_table_descending() {
        let rows = vec![
            GenderTrendRow::from_counts(1999, 1, 3),
            GenderTrendRow::from_counts(2003, 2, 2),
        ];

        let table = GenderTrendAggregator::trend_table(&rows).unwrap();

        let names: Vec<String> = table
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, vec!["Year", "Girls", "Boys", "Total", "% Girls", "% Boys"]);
        let years = table.column("Year").unwrap().i32().unwrap();
        assert_eq!(years.get(0), Some(2003));
        assert_eq!(years.get(1), Some(1999));
    }

    #[test]
    fn test_write_trend_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trend.csv");
        let rows = vec![GenderTrendRow::from_counts(2000, 100, 50)];

        GenderTrendAggregator::write_trend_csv(&rows, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("Year,Girls,Boys,Total,% Girls,% Boys"));
        assert!(lines.next().unwrap().starts_with("2000,50,100,150,"));
    }
}
