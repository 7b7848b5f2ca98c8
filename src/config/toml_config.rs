use crate::config::{
    DEFAULT_DATASET_FILE, DEFAULT_DATASET_URL, DEFAULT_DATA_DIR, DEFAULT_END_DATE,
    DEFAULT_START_DATE,
};
use crate::core::top_n::DEFAULT_TOP_N;
use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub report: ReportConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    pub data_dir: String,
    pub file_name: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATASET_URL.to_string(),
            data_dir: DEFAULT_DATA_DIR.to_string(),
            file_name: DEFAULT_DATASET_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub start_date: String,
    pub end_date: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            start_date: DEFAULT_START_DATE.to_string(),
            end_date: DEFAULT_END_DATE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub top_n: usize,
    pub summary_file: Option<String>,
    pub show_chart: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            summary_file: None,
            show_chart: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})；未定義的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = match ENV_VAR.get() {
            Some(re) => re,
            None => {
                let compiled = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
                    message: format!("invalid placeholder pattern: {}", e),
                })?;
                ENV_VAR.get_or_init(|| compiled)
            }
        };

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        use crate::utils::validation::{
            validate_date_range, validate_file_extension, validate_path,
            validate_positive_number, validate_url,
        };

        validate_url("source.url", &self.source.url)?;
        validate_path("source.data_dir", &self.source.data_dir)?;
        validate_file_extension("source.file_name", &self.source.file_name, &["csv"])?;
        validate_date_range("filter", &self.filter.start_date, &self.filter.end_date)?;
        validate_positive_number("report.top_n", self.report.top_n, 1)?;
        if let Some(summary_file) = &self.report.summary_file {
            validate_path("report.summary_file", summary_file)?;
        }

        Ok(())
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn dataset_url(&self) -> &str {
        &self.source.url
    }

    fn data_dir(&self) -> &str {
        &self.source.data_dir
    }

    fn dataset_file(&self) -> &str {
        &self.source.file_name
    }

    fn start_date(&self) -> &str {
        &self.filter.start_date
    }

    fn end_date(&self) -> &str {
        &self.filter.end_date
    }

    fn top_n(&self) -> usize {
        self.report.top_n
    }

    fn summary_file(&self) -> Option<&str> {
        self.report.summary_file.as_deref()
    }

    fn show_chart(&self) -> bool {
        self.report.show_chart
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
