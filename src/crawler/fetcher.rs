//! Page fetching via the remote rendering service
//!
//! Catalog pages are JavaScript-rendered, so the crawler never talks to the
//! catalog directly: it asks the render service for the finished DOM of a
//! templated catalog URL.

use crate::config::EndpointsConfig;
use crate::HarvestError;
use reqwest::Client;
use std::time::Duration;

/// Builds the HTTP client shared by the fetcher and the analyzer
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the render-service URL for one catalog page
///
/// Format: `{render}?url={catalog}{page}&images=0` — image loading is
/// disabled because only the DOM is consumed.
pub fn render_url(endpoints: &EndpointsConfig, page_number: u32) -> String {
    format!(
        "{}?url={}{}&images=0",
        endpoints.render_base_url, endpoints.catalog_base_url, page_number
    )
}

/// Fetches the rendered HTML body of one catalog page
///
/// Any transport failure or non-2xx render response is a fetch error; the
/// drivers treat that as fatal for the current run (recovery is a restart
/// or a later sweep, never a per-page retry).
pub async fn fetch_page(
    client: &Client,
    endpoints: &EndpointsConfig,
    page_number: u32,
) -> Result<String, HarvestError> {
    let url = render_url(endpoints, page_number);

    let response = client.get(&url).send().await.map_err(|source| {
        HarvestError::Fetch {
            page: page_number,
            source,
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(HarvestError::Render {
            page: page_number,
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| HarvestError::Fetch {
        page: page_number,
        source,
    })
}
