//! Data Processor Module
//! Cleans the raw INSEE name table into typed, validated columns.

use polars::prelude::*;

/// Column names of the raw `dpt2020.csv` file.
pub mod source {
    pub const GENDER: &str = "sexe";
    pub const NAME: &str = "preusuel";
    pub const YEAR: &str = "annais";
    pub const DEPARTMENT: &str = "dpt";
    pub const COUNT: &str = "nombre";

    pub const REQUIRED: [&str; 5] = [GENDER, NAME, YEAR, DEPARTMENT, COUNT];
}

/// Column names of the cleaned name table.
pub mod columns {
    pub const YEAR: &str = "year";
    pub const DEPARTMENT: &str = "dpt";
    pub const NAME: &str = "name";
    pub const GENDER: &str = "gender";
    pub const COUNT: &str = "count";
}

/// Placeholder INSEE uses to aggregate names given fewer than 3 times.
pub const RARE_NAMES: &str = "_PRENOMS_RARES";

/// Department code for births abroad or with an unknown department.
pub const UNKNOWN_DEPARTMENT: &str = "XX";

/// Gender codes as stored in the source file.
pub const MALE_CODE: i32 = 1;
pub const FEMALE_CODE: i32 = 2;

/// Turn the all-text raw frame into the cleaned name table.
///
/// Numeric columns are cast non-strictly, so values that fail to parse
/// become null and the row is dropped along with the sentinel rows.
pub fn clean_names(raw: DataFrame) -> PolarsResult<DataFrame> {
    let typed = raw.lazy().select([
        col(source::YEAR).cast(DataType::Int32).alias(columns::YEAR),
        col(source::DEPARTMENT).alias(columns::DEPARTMENT),
        col(source::NAME).alias(columns::NAME),
        col(source::GENDER).cast(DataType::Int32).alias(columns::GENDER),
        col(source::COUNT).cast(DataType::Int64).alias(columns::COUNT),
    ]);

    drop_invalid_rows(typed).collect()
}

/// Filter out every row that would break the name table invariants.
///
/// Expects the cleaned column layout (see [`columns`]).
pub fn drop_invalid_rows(lf: LazyFrame) -> LazyFrame {
    lf.filter(col(columns::NAME).neq(lit(RARE_NAMES)))
        .filter(col(columns::DEPARTMENT).neq(lit(UNKNOWN_DEPARTMENT)))
        .filter(
            col(columns::YEAR)
                .is_not_null()
                .and(col(columns::COUNT).is_not_null()),
        )
        .filter(col(columns::COUNT).gt_eq(lit(0i64)))
        .filter(
            col(columns::GENDER)
                .eq(lit(MALE_CODE))
                .or(col(columns::GENDER).eq(lit(FEMALE_CODE))),
        )
}
