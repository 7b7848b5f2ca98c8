use crate::config::{
    DEFAULT_DATASET_FILE, DEFAULT_DATASET_URL, DEFAULT_DATA_DIR, DEFAULT_END_DATE,
    DEFAULT_START_DATE,
};
use crate::core::top_n::DEFAULT_TOP_N;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_date_range, validate_file_extension, validate_path, validate_positive_number,
    validate_url, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "parking-citations")]
#[command(about = "Total Los Angeles parking citation fines by violation and chart the top ones")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_DATASET_URL)]
    pub dataset_url: String,

    /// Directory the dataset is cached in
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: String,

    #[arg(long, default_value = DEFAULT_DATASET_FILE)]
    pub dataset_file: String,

    /// First issue date included (month/day/year)
    #[arg(long, default_value = DEFAULT_START_DATE)]
    pub start_date: String,

    /// Last issue date included (month/day/year)
    #[arg(long, default_value = DEFAULT_END_DATE)]
    pub end_date: String,

    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top_n: usize,

    /// Write the full summary as JSON to this file (relative to --data-dir)
    #[arg(long)]
    pub summary_file: Option<String>,

    #[arg(long, help = "Do not open the chart window")]
    pub no_chart: bool,

    /// Load settings from a TOML file instead of the flags above
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("dataset_url", &self.dataset_url)?;
        validate_path("data_dir", &self.data_dir)?;
        validate_file_extension("dataset_file", &self.dataset_file, &["csv"])?;
        validate_date_range("start_date/end_date", &self.start_date, &self.end_date)?;
        validate_positive_number("top_n", self.top_n, 1)?;
        if let Some(summary_file) = &self.summary_file {
            validate_path("summary_file", summary_file)?;
        }
        Ok(())
    }
}

impl ConfigProvider for CliConfig {
    fn dataset_url(&self) -> &str {
        &self.dataset_url
    }

    fn data_dir(&self) -> &str {
        &self.data_dir
    }

    fn dataset_file(&self) -> &str {
        &self.dataset_file
    }

    fn start_date(&self) -> &str {
        &self.start_date
    }

    fn end_date(&self) -> &str {
        &self.end_date
    }

    fn top_n(&self) -> usize {
        self.top_n
    }

    fn summary_file(&self) -> Option<&str> {
        self.summary_file.as_deref()
    }

    fn show_chart(&self) -> bool {
        !self.no_chart
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_la_2018_run() {
        let config = CliConfig::parse_from(["parking-citations"]);

        assert_eq!(config.dataset_url(), DEFAULT_DATASET_URL);
        assert_eq!(config.dataset_file(), "la_parking_citations_full.csv");
        assert_eq!(config.start_date(), "1/1/2018");
        assert_eq!(config.end_date(), "12/31/2018");
        assert_eq!(config.top_n(), 5);
        assert!(config.show_chart());
        assert!(config.summary_file().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = CliConfig::parse_from([
            "parking-citations",
            "--data-dir",
            "/tmp/la",
            "--start-date",
            "6/1/2018",
            "--top-n",
            "3",
            "--summary-file",
            "summary.json",
            "--no-chart",
        ]);

        assert_eq!(config.data_dir(), "/tmp/la");
        assert_eq!(config.start_date(), "6/1/2018");
        assert_eq!(config.top_n(), 3);
        assert_eq!(config.summary_file(), Some("summary.json"));
        assert!(!config.show_chart());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let bad_dates = CliConfig::parse_from(["parking-citations", "--start-date", "2018-01-01"]);
        assert!(bad_dates.validate().is_err());

        let zero_top = CliConfig::parse_from(["parking-citations", "--top-n", "0"]);
        assert!(zero_top.validate().is_err());

        let not_csv = CliConfig::parse_from(["parking-citations", "--dataset-file", "rows.json"]);
        assert!(not_csv.validate().is_err());
    }
}
