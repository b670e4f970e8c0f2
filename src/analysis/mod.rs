//! Analysis module - aggregations behind the three dashboard pages

mod extremes;
mod gender_trend;
mod ranking;


pub use extremes::{ExtremesRow, RegionalExtremesAggregator, NO_DATA};
pub use gender_trend::{
    DepartmentFilter, GenderTrendAggregator, GenderTrendRow, ALL_DEPARTMENTS,
};
pub use ranking::{RankingAggregator, RankingRow, TopNames, DEFAULT_TOP_N};

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}
