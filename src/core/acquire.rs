use crate::core::{DatasetFetcher, Storage};
use crate::utils::error::Result;
use std::path::PathBuf;

/// Downloads `url` to `file_name` under the storage root unless the file is
/// already there. Returns the absolute path of the local dataset.
pub async fn acquire_dataset<F, S>(
    fetcher: &F,
    storage: &S,
    url: &str,
    file_name: &str,
) -> Result<PathBuf>
where
    F: DatasetFetcher + ?Sized,
    S: Storage,
{
    let target = storage.resolve(file_name);

    if storage.exists(file_name) {
        tracing::info!("File: {} present and ready to go!", target.display());
    } else {
        tracing::info!("Downloading {} -> {}", url, target.display());
        let bytes = fetcher.fetch(url, &target).await?;
        tracing::info!("File: {} downloaded ({} bytes)", target.display(), bytes);
    }

    Ok(std::fs::canonicalize(&target)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::LocalStorage;
    use crate::utils::error::EtlError;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct CountingFetcher {
        calls: AtomicUsize,
    }

    impl CountingFetcher {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DatasetFetcher for CountingFetcher {
        async fn fetch(&self, _url: &str, destination: &Path) -> Result<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let body = b"Issue Date,Violation Description,Fine amount\n";
            std::fs::write(destination, body)?;
            Ok(body.len() as u64)
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl DatasetFetcher for FailingFetcher {
        async fn fetch(&self, url: &str, _destination: &Path) -> Result<u64> {
            Err(EtlError::DownloadError {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    #[tokio::test]
    async fn test_downloads_once_then_reuses() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());
        let fetcher = CountingFetcher::new();

        let first = acquire_dataset(&fetcher, &storage, "https://example.com/rows.csv", "data.csv")
            .await
            .unwrap();
        let second = acquire_dataset(&fetcher, &storage, "https://example.com/rows.csv", "data.csv")
            .await
            .unwrap();

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
        assert!(first.is_absolute());
    }

    #[test]
    fn test_existing_file_is_never_fetched() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("cached.csv"), "Issue Date\n").unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        let path = tokio_test::block_on(acquire_dataset(
            &FailingFetcher,
            &storage,
            "https://example.com/rows.csv",
            "cached.csv",
        ))
        .unwrap();

        assert!(path.ends_with("cached.csv"));
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        let err = acquire_dataset(&FailingFetcher, &storage, "https://example.com/x.csv", "x.csv")
            .await
            .unwrap_err();

        assert!(matches!(err, EtlError::DownloadError { status: 404, .. }));
        assert!(!temp_dir.path().join("x.csv").exists());
    }
}
