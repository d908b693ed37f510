use anyhow::Result;

use crate::StoreStats;

use super::super::Container;

pub struct StatsController<'a> {
    container: &'a Container,
}

impl<'a> StatsController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn stats(&self) -> Result<String> {
        let use_case = self.container.stats_use_case();
        let stats = use_case.execute().await?;
        Ok(self.format_stats(&stats))
    }

    fn format_stats(&self, stats: &StoreStats) -> String {
        let mut output = format!(
            "MiniRAG Statistics\n==================\nChunks:   {}\nSources:  {}\nData Dir: {}\nStore:    {}\nModel:    {}",
            stats.chunks,
            stats.sources.len(),
            self.container.data_dir(),
            self.container.store_location(),
            self.container.embedding_model()
        );

        for summary in &stats.sources {
            output.push_str(&format!("\n  {} ({} chunks)", summary.source, summary.chunks));
        }

        output
    }
}
