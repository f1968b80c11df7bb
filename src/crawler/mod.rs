//! Crawl engine
//!
//! Both entry modes share one per-page pipeline (fetch, extract, enrich,
//! validate, persist, classify); they differ only in how the next page
//! number is sourced and how failure state is recorded or cleared:
//! - [`ForwardCrawler`] advances the page cursor from the last audited
//!   position to the configured upper bound.
//! - [`Sweeper`] re-visits quarantined pages in ascending id windows and
//!   retires the ones that now succeed.

mod extractor;
mod fetcher;
mod forward;
mod pipeline;
mod sweeper;

pub use extractor::{extract_page, page_not_found, ExtractedPage};
pub use fetcher::{build_http_client, fetch_page, render_url};
pub use forward::{ForwardCrawler, ForwardSummary};
pub use pipeline::PageVisit;
pub use sweeper::{SweepSummary, Sweeper};
