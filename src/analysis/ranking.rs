//! Top names per year.

use crate::analysis::AnalysisError;
use crate::data::{columns, NameTable};
use polars::prelude::*;
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Number of names shown on the ranking page.
pub const DEFAULT_TOP_N: usize = 15;

const TOTAL: &str = "total";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingRow {
    pub year: i32,
    pub name: String,
    pub total_count: i64,
}

/// Precomputed top-N lists, one per year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopNames {
    top_n: usize,
    by_year: BTreeMap<i32, Vec<RankingRow>>,
}

impl TopNames {
    /// Ranked rows for `year`, most given first. Empty if the year is absent.
    pub fn for_year(&self, year: i32) -> &[RankingRow] {
        self.by_year.get(&year).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Bounds for the year selector, over years with a non-empty list.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let mut years = self
            .by_year
            .iter()
            .filter(|(_, rows)| !rows.is_empty())
            .map(|(&year, _)| year);
        let first = years.next()?;
        let last = years.last().unwrap_or(first);
        Some((first, last))
    }

    #[cfg(test)]
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.by_year.keys().copied()
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }
}

pub struct RankingAggregator;

impl RankingAggregator {
    /// Sum births per (year, name) over departments and genders, then keep
    /// the `top_n` largest totals of each year.
    ///
    /// The grouped rows are ordered by (year, name) and the per-year sort is
    /// stable, so equal totals stay in ascending name order.
    pub fn top_names_by_year(table: &NameTable, top_n: usize) -> Result<TopNames, AnalysisError> {
        let grouped = table
            .frame()
            .clone()
            .lazy()
            .group_by([col(columns::YEAR), col(columns::NAME)])
            .agg([col(columns::COUNT).sum().alias(TOTAL)])
            .sort_by_exprs(
                vec![col(columns::YEAR), col(columns::NAME)],
                SortMultipleOptions::default(),
            )
            .collect()?;

        let years = grouped.column(columns::YEAR)?.i32()?;
        let names = grouped.column(columns::NAME)?.str()?;
        let totals = grouped.column(TOTAL)?.i64()?;

        let mut by_year: BTreeMap<i32, Vec<RankingRow>> = BTreeMap::new();
        for ((year, name), total) in years.into_iter().zip(names).zip(totals) {
            let (Some(year), Some(name), Some(total)) = (year, name, total) else {
                continue;
            };
            by_year.entry(year).or_default().push(RankingRow {
                year,
                name: name.to_string(),
                total_count: total,
            });
        }

        by_year.par_iter_mut().for_each(|(_, rows)| {
            rows.sort_by(|a, b| b.total_count.cmp(&a.total_count));
            rows.truncate(top_n);
        });

        log::debug!("Ranked top {} names for {} years", top_n, by_year.len());
        Ok(TopNames { top_n, by_year })
    }
}
