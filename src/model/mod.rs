//! Song record model and page outcome classification
//!
//! The catalog assigns every song a stable `number`; that natural key, not
//! any locally generated id, drives deduplication across re-crawls.

/// One song record extracted from a catalog page
///
/// Page-level fields (artist, writers, lyric) are shared by every song on a
/// page; the remaining fields come from the per-item detail list. The `_k`
/// and `_r` suffixes hold katakana and romaji reading variants filled in by
/// the enrichment step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Song {
    pub page_number: u32,
    pub artist_name: String,
    pub artist_name_k: String,
    pub artist_name_r: String,
    pub lyric_writer_name: String,
    pub lyric_writer_name_k: String,
    pub lyric_writer_name_r: String,
    pub song_writer_name: String,
    pub song_writer_name_k: String,
    pub song_writer_name_r: String,
    /// Song title
    pub name: String,
    pub name_k: String,
    pub name_r: String,
    /// Catalog-assigned natural key
    pub number: String,
    pub original_key: String,
    pub delivery_status: String,
    pub delivery_term: String,
    /// Supported device/model list, flattened to a ", "-joined string
    pub model_names: String,
    pub lyric: String,
}

/// Which fields the validator requires to be present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Name, title, number, and owning page only
    Minimal,
    /// Minimal plus katakana/romaji readings for artist name and title
    Enriched,
}

impl ValidationMode {
    /// Derives the mode from the enrichment config flag
    pub fn from_enrichment(enabled: bool) -> Self {
        if enabled {
            Self::Enriched
        } else {
            Self::Minimal
        }
    }
}

impl Song {
    /// Returns true if every required field is present
    ///
    /// Pure predicate; persistence is gated on this.
    pub fn can_create(&self, mode: ValidationMode) -> bool {
        if self.page_number == 0 {
            return false;
        }

        if self.number.is_empty() || self.artist_name.is_empty() || self.name.is_empty() {
            return false;
        }

        if mode == ValidationMode::Enriched
            && (self.artist_name_k.is_empty()
                || self.artist_name_r.is_empty()
                || self.name_k.is_empty()
                || self.name_r.is_empty())
        {
            return false;
        }

        true
    }
}

/// Classification of a single page visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageOutcome {
    /// Page existed and every extracted song was valid
    Create,
    /// The catalog explicitly reported the page does not exist
    NotFoundPage,
    /// Page existed but listed zero songs
    NoneSongs,
    /// Page existed but at least one song failed validation
    GetSongsFailed,
}

impl PageOutcome {
    /// Classifies a page visit
    ///
    /// The explicit not-found signal overrides everything else, regardless
    /// of candidate count or validity.
    pub fn classify(not_found: bool, candidates: usize, all_valid: bool) -> Self {
        if not_found {
            Self::NotFoundPage
        } else if candidates == 0 {
            Self::NoneSongs
        } else if !all_valid {
            Self::GetSongsFailed
        } else {
            Self::Create
        }
    }

    /// Returns true if this outcome quarantines the page for a later sweep
    pub fn quarantines(&self) -> bool {
        matches!(self, Self::NoneSongs | Self::GetSongsFailed)
    }

    /// Converts the outcome to its database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::NotFoundPage => "not_found_page",
            Self::NoneSongs => "none_songs",
            Self::GetSongsFailed => "get_songs_failed",
        }
    }

    /// Parses an outcome from its database string representation
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "create" => Some(Self::Create),
            "not_found_page" => Some(Self::NotFoundPage),
            "none_songs" => Some(Self::NoneSongs),
            "get_songs_failed" => Some(Self::GetSongsFailed),
            _ => None,
        }
    }
}

impl std::fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_db_string())
    }
}
