use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt};

use super::super::Container;

pub struct IngestController<'a> {
    container: &'a Container,
}

impl<'a> IngestController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// Ingest a text file, or standard input when `path` is `-`.
    ///
    /// Without an explicit source the file name becomes the source label.
    pub async fn ingest(&self, path: String, source: Option<String>) -> Result<String> {
        let (text, default_source) = if path == "-" {
            let text = read_all(tokio::io::stdin())
                .await
                .context("Failed to read standard input")?;
            (text, None)
        } else {
            let text = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path))?;
            let name = std::path::Path::new(&path)
                .file_name()
                .map(|n| n.to_string_lossy().to_string());
            (text, name)
        };

        let source = source.or(default_source);

        let use_case = self.container.ingest_use_case();
        let inserted = use_case.execute(&text, source.as_deref()).await?;

        Ok(self.format_ingest_success(inserted, source.as_deref()))
    }

    fn format_ingest_success(&self, inserted: usize, source: Option<&str>) -> String {
        format!(
            "Inserted {} chunks (source: {}) into {}",
            inserted,
            source.unwrap_or(crate::DEFAULT_SOURCE),
            self.container.store_location()
        )
    }
}

async fn read_all<R: AsyncRead + Unpin>(mut reader: R) -> std::io::Result<String> {
    let mut text = String::new();
    reader.read_to_string(&mut text).await?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{ContainerConfig, InMemoryVectorRepository, MockChatClient, MockEmbedding};

    fn container() -> Container {
        Container::with_services(
            Arc::new(MockEmbedding::new()),
            Arc::new(InMemoryVectorRepository::new()),
            Arc::new(MockChatClient::new()),
            ContainerConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_read_all_collects_async_input() {
        let input: &[u8] = b"first line\nsecond line\n";

        let text = read_all(input).await.unwrap();

        assert_eq!(text, "first line\nsecond line\n");
    }

    #[tokio::test]
    async fn test_ingest_file_defaults_source_to_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        tokio::fs::write(&path, "Paris is the capital of France.").await.unwrap();

        let container = container();
        let output = IngestController::new(&container)
            .ingest(path.display().to_string(), None)
            .await
            .unwrap();

        assert!(output.starts_with("Inserted 1 chunks (source: notes.txt)"));
        let stats = container.stats_use_case().execute().await.unwrap();
        assert_eq!(stats.sources[0].source, "notes.txt");
    }
}
