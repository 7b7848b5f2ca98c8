use crate::adapters::chart;
use crate::adapters::http::HttpFetcher;
use crate::core::acquire::acquire_dataset;
use crate::core::aggregate::{aggregate, AggregationMode};
use crate::core::filter::{open_filtered, DateRange};
use crate::core::summary::summarize;
use crate::core::{AggregationTable, CitationSummary, ConfigProvider, DatasetFetcher, Pipeline, Storage};
use crate::utils::error::{EtlError, Result};
use std::path::{Path, PathBuf};

/// Download → filter → aggregate → summarize → report.
pub struct CitationPipeline<S: Storage, C: ConfigProvider, F: DatasetFetcher = HttpFetcher> {
    storage: S,
    config: C,
    fetcher: F,
}

impl<S: Storage, C: ConfigProvider> CitationPipeline<S, C, HttpFetcher> {
    pub fn new(storage: S, config: C) -> Self {
        Self::with_fetcher(storage, config, HttpFetcher::new())
    }
}

impl<S: Storage, C: ConfigProvider, F: DatasetFetcher> CitationPipeline<S, C, F> {
    pub fn with_fetcher(storage: S, config: C, fetcher: F) -> Self {
        Self {
            storage,
            config,
            fetcher,
        }
    }
}

/// One aggregation pass; reopens and re-filters the file every time.
fn aggregate_file(dataset: &Path, range: DateRange, mode: AggregationMode) -> Result<AggregationTable> {
    tracing::debug!("Aggregating {} by {}", dataset.display(), mode);
    let mut records = open_filtered(dataset, range)?;
    let table = aggregate(records.by_ref(), mode);
    records.into_inner().finish()?;
    Ok(table)
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, F: DatasetFetcher> Pipeline for CitationPipeline<S, C, F> {
    async fn extract(&self) -> Result<PathBuf> {
        acquire_dataset(
            &self.fetcher,
            &self.storage,
            self.config.dataset_url(),
            self.config.dataset_file(),
        )
        .await
    }

    async fn transform(&self, dataset: PathBuf) -> Result<CitationSummary> {
        let range = DateRange::parse(self.config.start_date(), self.config.end_date())?;
        let top_n = self.config.top_n();
        tracing::info!(
            "Aggregating citations issued {} to {}",
            range.start(),
            range.end()
        );

        tokio::task::spawn_blocking(move || -> Result<CitationSummary> {
            let fine_by_violation = aggregate_file(&dataset, range, AggregationMode::FineAmount)?;
            let count_by_violation = aggregate_file(&dataset, range, AggregationMode::NumberCount)?;
            Ok(summarize(range, fine_by_violation, count_by_violation, top_n))
        })
        .await
        .map_err(|e| EtlError::ProcessingError {
            message: format!("aggregation task failed: {}", e),
        })?
    }

    async fn load(&self, summary: &CitationSummary) -> Result<()> {
        println!("Total Fine {}", summary.total_fine);
        println!("Total Citation {}", summary.total_citations);

        if let Some(summary_file) = self.config.summary_file() {
            let json = serde_json::to_vec_pretty(summary)?;
            tracing::debug!("Writing summary ({} bytes) to {}", json.len(), summary_file);
            self.storage.write_file(summary_file, &json).await?;
            tracing::info!(
                "Summary saved to: {}",
                self.storage.resolve(summary_file).display()
            );
        }

        if self.config.show_chart() {
            let selection = summary.top_violations.clone();
            tokio::task::spawn_blocking(move || chart::show(&selection))
                .await
                .map_err(|e| EtlError::ProcessingError {
                    message: format!("chart window failed: {}", e),
                })??;
        }

        Ok(())
    }
}
