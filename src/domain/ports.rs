use crate::domain::model::CitationSummary;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// File access rooted at an explicit base directory.
pub trait Storage: Send + Sync {
    fn resolve(&self, path: &str) -> PathBuf;
    fn exists(&self, path: &str) -> bool;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Downloads a remote dataset to a local file, returning the byte count.
#[async_trait]
pub trait DatasetFetcher: Send + Sync {
    async fn fetch(&self, url: &str, destination: &Path) -> Result<u64>;
}

pub trait ConfigProvider: Send + Sync {
    fn dataset_url(&self) -> &str;
    fn data_dir(&self) -> &str;
    fn dataset_file(&self) -> &str;
    fn start_date(&self) -> &str;
    fn end_date(&self) -> &str;
    fn top_n(&self) -> usize;
    fn summary_file(&self) -> Option<&str>;
    fn show_chart(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Makes the dataset available locally and returns its path.
    async fn extract(&self) -> Result<PathBuf>;
    async fn transform(&self, dataset: PathBuf) -> Result<CitationSummary>;
    async fn load(&self, summary: &CitationSummary) -> Result<()>;
}
