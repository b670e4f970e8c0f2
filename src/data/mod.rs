//! Data module - source loading, cleaning and caching

mod cache;
mod geo;
mod loader;
mod processor;

pub use cache::{BaseTables, DataCache, DataSources};
pub use geo::{columns as geo_columns, DepartmentRecord, DepartmentTable, Geometry};
pub use loader::{DataLoadError, Gender, NameTable};
#[cfg(test)]
pub use loader::NameRecord;
pub use processor::columns;

#[cfg(test)]
pub(crate) use geo::tests::department;
#[cfg(test)]
pub(crate) use loader::tests::record;
