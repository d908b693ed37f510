use anyhow::{bail, Result};

use crate::Commands;

use super::container::Container;
use super::controller::{
    AskController, DeleteController, IngestController, SearchController, StatsController,
};

pub struct Router<'a> {
    ingest_controller: IngestController<'a>,
    ask_controller: AskController<'a>,
    search_controller: SearchController<'a>,
    delete_controller: DeleteController<'a>,
    stats_controller: StatsController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            ingest_controller: IngestController::new(container),
            ask_controller: AskController::new(container),
            search_controller: SearchController::new(container),
            delete_controller: DeleteController::new(container),
            stats_controller: StatsController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Ingest { path, source } => self.ingest_controller.ingest(path, source).await,
            Commands::Ask { question, top_k } => self.ask_controller.ask(question, top_k).await,
            Commands::Search {
                query,
                top_k,
                min_score,
            } => {
                self.search_controller
                    .search(query, top_k, min_score)
                    .await
            }
            Commands::Delete { source } => self.delete_controller.delete(source).await,
            Commands::Stats => self.stats_controller.stats().await,
            Commands::Serve { .. } => bail!("serve is handled by the HTTP server, not the router"),
        }
    }
}
