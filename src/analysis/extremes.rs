//! Most and least given name per department.

use crate::analysis::AnalysisError;
use crate::data::{columns, DepartmentTable, Geometry, NameTable};
use polars::prelude::*;
use std::collections::HashMap;

/// Name shown for departments without any record.
pub const NO_DATA: &str = "No data";

#[derive(Debug, Clone, PartialEq)]
pub struct ExtremesRow {
    pub department_code: String,
    pub department_name: String,
    pub geometry: Geometry,
    pub max_name: String,
    pub max_count: i64,
    pub min_name: String,
    pub min_count: i64,
}

impl ExtremesRow {
    pub fn has_data(&self) -> bool {
        self.max_name != NO_DATA
    }
}

/// Running max/min over one department's (name, gender) totals.
struct Extremes {
    max_name: String,
    max_count: i64,
    min_name: String,
    min_count: i64,
}

impl Extremes {
    fn seed(name: &str, count: i64) -> Self {
        Self {
            max_name: name.to_string(),
            max_count: count,
            min_name: name.to_string(),
            min_count: count,
        }
    }

    // Strict comparisons keep the first row on ties
    fn observe(&mut self, name: &str, count: i64) {
        if count > self.max_count {
            self.max_name = name.to_string();
            self.max_count = count;
        }
        if count < self.min_count {
            self.min_name = name.to_string();
            self.min_count = count;
        }
    }
}

pub struct RegionalExtremesAggregator;

impl RegionalExtremesAggregator {
    /// One row per department of `departments`, in table order.
    ///
    /// Births are summed per (department, name, gender) and the groups are
    /// scanned in (name, gender) order; on equal counts the first group wins.
    pub fn extremes_by_department(
        names: &NameTable,
        departments: &DepartmentTable,
    ) -> Result<Vec<ExtremesRow>, AnalysisError> {
        let grouped = names
            .frame()
            .clone()
            .lazy()
            .group_by([
                col(columns::DEPARTMENT),
                col(columns::NAME),
                col(columns::GENDER),
            ])
            .agg([col(columns::COUNT).sum()])
            .sort_by_exprs(
                vec![
                    col(columns::DEPARTMENT),
                    col(columns::NAME),
                    col(columns::GENDER),
                ],
                SortMultipleOptions::default(),
            )
            .collect()?;

        let codes = grouped.column(columns::DEPARTMENT)?.str()?;
        let group_names = grouped.column(columns::NAME)?.str()?;
        let counts = grouped.column(columns::COUNT)?.i64()?;

        let mut by_department: HashMap<String, Extremes> = HashMap::new();
        for ((code, name), count) in codes.into_iter().zip(group_names).zip(counts) {
            let (Some(code), Some(name), Some(count)) = (code, name, count) else {
                continue;
            };
            if departments.get(code).is_none() {
                continue;
            }
            match by_department.get_mut(code) {
                Some(extremes) => extremes.observe(name, count),
                None => {
                    by_department.insert(code.to_string(), Extremes::seed(name, count));
                }
            }
        }

        let rows: Vec<ExtremesRow> = departments
            .iter()
            .map(|dept| {
                let (max_name, max_count, min_name, min_count) = match by_department.remove(&dept.code)
                {
                    Some(e) => (e.max_name, e.max_count, e.min_name, e.min_count),
                    None => (NO_DATA.to_string(), 0, NO_DATA.to_string(), 0),
                };
                ExtremesRow {
                    department_code: dept.code.clone(),
                    department_name: dept.name.clone(),
                    geometry: dept.geometry.clone(),
                    max_name,
                    max_count,
                    min_name,
                    min_count,
                }
            })
            .collect();

        log::debug!(
            "Computed extremes for {} departments ({} without data)",
            rows.len(),
            rows.iter().filter(|r| !r.has_data()).count()
        );
        Ok(rows)
    }
}
