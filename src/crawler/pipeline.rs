//! Shared per-page visit pipeline
//!
//! fetch → extract → enrich → validate each → persist valid → classify.
//! Both drivers call this; only the bookkeeping around it differs.

use crate::analyzer::{ReadingClient, ReadingMode};
use crate::config::EndpointsConfig;
use crate::crawler::extractor::extract_page;
use crate::crawler::fetcher::fetch_page;
use crate::model::{PageOutcome, Song, ValidationMode};
use crate::storage::Storage;
use crate::Result;
use reqwest::Client;
use scraper::Html;
use std::collections::HashMap;

/// Result of visiting a single page
#[derive(Debug, Clone, Copy)]
pub struct PageVisit {
    pub outcome: PageOutcome,
    /// Songs persisted during this visit
    pub persisted: usize,
    /// Songs skipped by the dedup gate
    pub skipped: usize,
}

/// Runs the full pipeline against one page number
///
/// Fetch errors propagate (the caller decides to halt); enrichment errors
/// degrade to empty readings; a candidate failing validation marks the page
/// but does not stop persistence of the remaining valid candidates.
pub(crate) async fn visit_page<S: Storage>(
    client: &Client,
    analyzer: Option<&ReadingClient>,
    storage: &mut S,
    endpoints: &EndpointsConfig,
    mode: ValidationMode,
    page_number: u32,
) -> Result<PageVisit> {
    let body = fetch_page(client, endpoints, page_number).await?;

    // The parsed document is not Send; keep it off the await boundaries
    let (mut songs, not_found) = {
        let html = Html::parse_document(&body);
        let extracted = extract_page(&html, page_number);
        (extracted.songs, extracted.not_found)
    };

    if let Some(analyzer) = analyzer {
        enrich_songs(analyzer, &mut songs).await;
    }

    let mut all_valid = true;
    let mut persisted = 0;
    let mut skipped = 0;

    for song in &songs {
        if storage.song_exists(&song.number)? {
            tracing::debug!(number = %song.number, "song already persisted, skipping");
            skipped += 1;
            continue;
        }

        if !song.can_create(mode) {
            tracing::debug!(number = %song.number, name = %song.name, "song failed validation");
            all_valid = false;
            continue;
        }

        storage.insert_song(song)?;
        persisted += 1;
    }

    let outcome = PageOutcome::classify(not_found, songs.len(), all_valid);

    Ok(PageVisit {
        outcome,
        persisted,
        skipped,
    })
}

/// Fills the reading variants of every song on the page
///
/// Page-level names repeat across items, so readings are cached per distinct
/// input text. A failed reading is logged and left empty; validation decides
/// whether that invalidates the record.
async fn enrich_songs(analyzer: &ReadingClient, songs: &mut [Song]) {
    let mut cache: HashMap<(String, ReadingMode), String> = HashMap::new();

    for song in songs.iter_mut() {
        song.artist_name_k =
            cached_reading(analyzer, &mut cache, &song.artist_name, ReadingMode::Katakana).await;
        song.artist_name_r =
            cached_reading(analyzer, &mut cache, &song.artist_name, ReadingMode::Romaji).await;

        song.lyric_writer_name_k = cached_reading(
            analyzer,
            &mut cache,
            &song.lyric_writer_name,
            ReadingMode::Katakana,
        )
        .await;
        song.lyric_writer_name_r = cached_reading(
            analyzer,
            &mut cache,
            &song.lyric_writer_name,
            ReadingMode::Romaji,
        )
        .await;

        song.song_writer_name_k = cached_reading(
            analyzer,
            &mut cache,
            &song.song_writer_name,
            ReadingMode::Katakana,
        )
        .await;
        song.song_writer_name_r = cached_reading(
            analyzer,
            &mut cache,
            &song.song_writer_name,
            ReadingMode::Romaji,
        )
        .await;

        song.name_k =
            cached_reading(analyzer, &mut cache, &song.name, ReadingMode::Katakana).await;
        song.name_r = cached_reading(analyzer, &mut cache, &song.name, ReadingMode::Romaji).await;
    }
}

async fn cached_reading(
    analyzer: &ReadingClient,
    cache: &mut HashMap<(String, ReadingMode), String>,
    text: &str,
    mode: ReadingMode,
) -> String {
    if text.is_empty() {
        return String::new();
    }

    let key = (text.to_string(), mode);
    if let Some(hit) = cache.get(&key) {
        return hit.clone();
    }

    let reading = match analyzer.reading(text, mode).await {
        Ok(reading) => reading,
        Err(e) => {
            tracing::warn!(error = %e, ?mode, "reading enrichment failed, leaving empty");
            String::new()
        }
    };

    cache.insert(key, reading.clone());
    reading
}
