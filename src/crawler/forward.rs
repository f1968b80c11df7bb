//! Forward crawl driver
//!
//! Advances the page cursor one page at a time from the last audited
//! position to the configured upper bound, classifying and logging every
//! visit. The cursor is read from the audit log exactly once at start.

use crate::analyzer::ReadingClient;
use crate::config::Config;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::pipeline::visit_page;
use crate::model::ValidationMode;
use crate::storage::{SqliteStorage, Storage};
use crate::{HarvestError, Result};
use reqwest::Client;

/// Totals reported after a completed forward run
#[derive(Debug, Default, Clone, Copy)]
pub struct ForwardSummary {
    pub pages_visited: u64,
    pub songs_persisted: u64,
    pub pages_quarantined: u64,
    pub last_page: u32,
}

/// Forward crawl driver
///
/// Owns its storage handle for the duration of the run; nothing else
/// touches the cursor.
pub struct ForwardCrawler {
    config: Config,
    storage: SqliteStorage,
    client: Client,
    analyzer: Option<ReadingClient>,
}

impl ForwardCrawler {
    /// Creates a driver from a validated config and an open storage handle
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
    ///
    /// Provisions the analysis index when enrichment is enabled. Must
    /// succeed before crawling begins.
    pub async fn bootstrap(&self) -> Result<()> {
        if let Some(analyzer) = &self.analyzer {
            analyzer
                .provision_index()
                .await
                .map_err(|e| HarvestError::AnalyzerBootstrap(e.to_string()))?;
        }
        Ok(())
    }

    /// Runs the forward crawl to the upper bound
    ///
    /// A fetch error aborts the run with the error; everything already
    /// logged stays logged, so a restart resumes where this run stopped.
    pub async fn run(&mut self) -> Result<ForwardSummary> {
        let mode = ValidationMode::from_enrichment(self.config.crawler.enrichment);

        // Resume on the page that produced the newest audit entry, not the
        // one after it; the dedup gate makes the re-visit idempotent.
        let mut page_number = self.storage.last_logged_page()?.unwrap_or(1).max(1);

        tracing::info!(
            page_number,
            upper_bound = self.config.crawler.upper_bound_page,
            enrichment = self.config.crawler.enrichment,
            "starting forward crawl"
        );

        let mut summary = ForwardSummary::default();

        loop {
            let visit = visit_page(
                &self.client,
                self.analyzer.as_ref(),
                &mut self.storage,
                &self.config.endpoints,
                mode,
                page_number,
            )
            .await?;

            if visit.outcome.quarantines() {
                self.storage.quarantine(page_number, visit.outcome)?;
                summary.pages_quarantined += 1;
            }

            // The audit entry is written regardless of classification; a
            // failure here is fatal because the cursor would silently drift.
            self.storage.append_log(page_number, visit.outcome)?;

            tracing::info!(
                page_number,
                outcome = %visit.outcome,
                persisted = visit.persisted,
                skipped = visit.skipped,
                "page visited"
            );

            summary.pages_visited += 1;
            summary.songs_persisted += visit.persisted as u64;
            summary.last_page = page_number;

            if page_number >= self.config.crawler.upper_bound_page {
                break;
            }

            tokio::time::sleep(self.config.crawler.request_delay()).await;
            page_number += 1;
        }

        tracing::info!(
            pages_visited = summary.pages_visited,
            songs_persisted = summary.songs_persisted,
            pages_quarantined = summary.pages_quarantined,
            "forward crawl complete"
        );

        Ok(summary)
    }
}
