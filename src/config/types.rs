use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Songweir
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    pub endpoints: EndpointsConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
///
/// The historical crawler shipped as two near-identical variants that only
/// differed in the enrichment switch and the delay constant; those knobs now
/// live here so a single driver covers both.
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Highest catalog page number to visit (inclusive terminal)
    #[serde(rename = "upper-bound-page", default = "default_upper_bound_page")]
    pub upper_bound_page: u32,

    /// Fixed delay between page requests (milliseconds)
    #[serde(rename = "request-delay-ms", default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Whether to enrich name/title fields with phonetic readings
    #[serde(default = "default_enrichment")]
    pub enrichment: bool,

    /// Width of the reconciliation sweep id window
    #[serde(rename = "sweep-window", default = "default_sweep_window")]
    pub sweep_window: u32,
}

impl CrawlerConfig {
    /// Inter-request pacing as a `Duration`
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            upper_bound_page: default_upper_bound_page(),
            request_delay_ms: default_request_delay_ms(),
            enrichment: default_enrichment(),
            sweep_window: default_sweep_window(),
        }
    }
}

fn default_upper_bound_page() -> u32 {
    600_000
}

fn default_request_delay_ms() -> u64 {
    1200
}

fn default_enrichment() -> bool {
    true
}

fn default_sweep_window() -> u32 {
    10_000
}

/// External collaborator endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointsConfig {
    /// Base URL of the remote rendering service
    #[serde(rename = "render-base-url")]
    pub render_base_url: String,

    /// Base URL of the paginated catalog; the page number is appended directly
    #[serde(rename = "catalog-base-url")]
    pub catalog_base_url: String,

    /// Base URL of the reading-analysis service
    #[serde(rename = "analyzer-base-url")]
    pub analyzer_base_url: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}
