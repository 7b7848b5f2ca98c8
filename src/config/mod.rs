#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub const DEFAULT_DATASET_URL: &str =
    "https://data.lacity.org/api/views/wjz9-h9np/rows.csv?accessType=DOWNLOAD";
pub const DEFAULT_DATA_DIR: &str = ".";
pub const DEFAULT_DATASET_FILE: &str = "la_parking_citations_full.csv";
pub const DEFAULT_START_DATE: &str = "1/1/2018";
pub const DEFAULT_END_DATE: &str = "12/31/2018";
