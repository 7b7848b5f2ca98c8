use clap::Parser;
use parking_citations::core::ConfigProvider;
use parking_citations::utils::{logger, validation::Validate};
use parking_citations::{CitationPipeline, CliConfig, EtlEngine, EtlError, LocalStorage, TomlConfig};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting parking-citations");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let result = match cli.config.clone() {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(&path) {
                Ok(mut config) => {
                    // 命令列覆蓋設定
                    if cli.no_chart {
                        config.report.show_chart = false;
                    }
                    let monitor = cli.monitor || config.monitoring_enabled();
                    run(config, monitor).await
                }
                Err(e) => Err(e),
            }
        }
        None => {
            let monitor = cli.monitor;
            run(cli, monitor).await
        }
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ Citation analysis failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = e.exit_code();
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run<C>(config: C, monitor_enabled: bool) -> Result<(), EtlError>
where
    C: ConfigProvider + Validate,
{
    // 驗證配置
    config.validate()?;

    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.data_dir().to_string());
    let pipeline = CitationPipeline::new(storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    let summary = engine.run().await?;
    tracing::info!(
        "✅ Done: {} citations, ${} in fines, {} violations charted",
        summary.total_citations,
        summary.total_fine,
        summary.top_violations.len()
    );

    Ok(())
}
