//! Reconciliation sweeper
//!
//! Re-visits quarantined pages in monotonically advancing id windows and
//! retires the rows whose pages now succeed. A run terminates at the first
//! empty window; it never wraps, and it keeps no cursor of its own — every
//! invocation restarts from id 1.

use crate::analyzer::ReadingClient;
use crate::config::Config;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::pipeline::visit_page;
use crate::model::{PageOutcome, ValidationMode};
use crate::storage::{SqliteStorage, Storage};
use crate::{HarvestError, Result};
use reqwest::Client;

/// Totals reported after a completed sweep run
#[derive(Debug, Default, Clone, Copy)]
pub struct SweepSummary {
    pub pages_revisited: u64,
    pub pages_retired: u64,
    pub songs_persisted: u64,
    pub windows_scanned: u64,
}

/// Reconciliation sweep driver
pub struct Sweeper {
    config: Config,
    storage: SqliteStorage,
    client: Client,
    analyzer: Option<ReadingClient>,
}

impl Sweeper {
    /// Creates a sweeper from a validated config and an open storage handle
    pub fn new(config: Config, storage: SqliteStorage) -> Result<Self> {
        let client = build_http_client()?;

        let analyzer = config
            .crawler
            .enrichment
            .then(|| ReadingClient::new(client.clone(), &config.endpoints.analyzer_base_url));

        Ok(Self {
            config,
            storage,
            client,
            analyzer,
        })
    }

    /// Runs the one-time bootstrap collaborators
    pub async fn bootstrap(&self) -> Result<()> {
        if let Some(analyzer) = &self.analyzer {
            analyzer
                .provision_index()
                .await
                .map_err(|e| HarvestError::AnalyzerBootstrap(e.to_string()))?;
        }
        Ok(())
    }

    /// Sweeps quarantined pages until an empty id window is reached
    pub async fn run(&mut self) -> Result<SweepSummary> {
        let mode = ValidationMode::from_enrichment(self.config.crawler.enrichment);
        let width = i64::from(self.config.crawler.sweep_window);

        let mut start_id: i64 = 1;
        let mut end_id: i64 = width;

        tracing::info!(width, "starting reconciliation sweep");

        let mut summary = SweepSummary::default();

        loop {
            let failed_pages = self.storage.failed_pages_in_range(start_id, end_id)?;

            if failed_pages.is_empty() {
                tracing::info!(start_id, end_id, "empty window, sweep complete");
                break;
            }

            for failed in failed_pages {
                let visit = visit_page(
                    &self.client,
                    self.analyzer.as_ref(),
                    &mut self.storage,
                    &self.config.endpoints,
                    mode,
                    failed.page_number,
                )
                .await?;

                summary.pages_revisited += 1;
                summary.songs_persisted += visit.persisted as u64;

                match visit.outcome {
                    PageOutcome::Create => {
                        // Deleting the row is the only mutation the
                        // quarantine set ever sees
                        self.storage.retire_failed_page(failed.id)?;
                        summary.pages_retired += 1;
                        tracing::info!(
                            page_number = failed.page_number,
                            persisted = visit.persisted,
                            "quarantined page retired"
                        );
                    }
                    PageOutcome::NoneSongs | PageOutcome::NotFoundPage => {
                        tracing::info!(
                            page_number = failed.page_number,
                            "still no songs on re-visit"
                        );
                    }
                    PageOutcome::GetSongsFailed => {
                        tracing::info!(
                            page_number = failed.page_number,
                            "page still failing validation"
                        );
                    }
                }

                tokio::time::sleep(self.config.crawler.request_delay()).await;
            }

            tracing::info!(end_id, "window exhausted");
            summary.windows_scanned += 1;

            start_id = end_id;
            end_id += width;
        }

        tracing::info!(
            pages_revisited = summary.pages_revisited,
            pages_retired = summary.pages_retired,
            "reconciliation sweep complete"
        );

        Ok(summary)
    }
}
