use crate::core::{CitationSummary, Pipeline};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<CitationSummary> {
        tracing::info!("Starting citation analysis...");

        // Extract
        tracing::info!("Acquiring dataset...");
        let dataset = self.pipeline.extract().await?;
        self.monitor.log_stats("Extract");

        // Transform
        tracing::info!("Filtering and aggregating {}...", dataset.display());
        let summary = self.pipeline.transform(dataset).await?;
        tracing::info!(
            "Aggregated {} citations across {} violations",
            summary.total_citations,
            summary.count_by_violation.len()
        );
        self.monitor.log_stats("Transform");

        // Load
        self.pipeline.load(&summary).await?;
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(summary)
    }
}
