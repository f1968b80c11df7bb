//! Song extraction from rendered catalog pages
//!
//! Extraction is pure: it reads a parsed document and produces candidate
//! records plus the page-level not-found signal. Reading enrichment happens
//! afterwards in the pipeline, so nothing here does I/O.

use crate::model::Song;
use crate::text::clean;
use scraper::{ElementRef, Html, Selector};

/// Sentinel text the catalog renders when a page genuinely does not exist
/// (distinct from "page exists but lists zero songs")
pub const NOT_FOUND_SENTINEL: &str = "このページは存在しません。";

/// Per-item detail labels mapped to field setters
///
/// Labels are matched on exact text after cleaning; anything unrecognized is
/// ignored rather than treated as an error.
const DETAIL_FIELDS: &[(&str, fn(&mut Song, String))] = &[
    ("曲番号:", |song, value| song.number = value),
    ("キー", |song, value| song.original_key = value),
    ("配信予定:", |song, value| song.delivery_status = value),
    ("配信期間:", |song, value| song.delivery_term = value),
];

/// Result of extracting one fetched page
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    /// Candidate records in page order
    pub songs: Vec<Song>,
    /// True if the catalog explicitly reported the page does not exist
    pub not_found: bool,
}

/// Extracts all candidate songs and the not-found signal from a page
pub fn extract_page(html: &Html, page_number: u32) -> ExtractedPage {
    ExtractedPage {
        not_found: page_not_found(html),
        songs: extract_songs(html, page_number),
    }
}

/// Reads the error region and compares it against the not-found sentinel
pub fn page_not_found(html: &Html) -> bool {
    let Ok(selector) =
        Selector::parse("#jp-cmp-main > .jp-cmp-box-005 > .jp-cmp-h1-error > span")
    else {
        return false;
    };

    html.select(&selector)
        .next()
        .map(|el| clean(&element_text(el)) == NOT_FOUND_SENTINEL)
        .unwrap_or(false)
}

/// Extracts the candidate songs listed on a page
///
/// Shared page-level fields are resolved once and applied to every item.
fn extract_songs(html: &Html, page_number: u32) -> Vec<Song> {
    let shared = SharedFields::resolve(html);

    let Ok(item_selector) = Selector::parse(".jp-cmp-karaoke-list-001 > ul > li") else {
        return Vec::new();
    };

    html.select(&item_selector)
        .map(|item| build_song(item, &shared, page_number))
        .collect()
}

/// Page-level fields shared by every song on the page
///
/// Absence means the page either does not exist or the remote render did
/// not finish; validation catches both.
#[derive(Debug, Default)]
struct SharedFields {
    artist_name: String,
    lyric_writer_name: String,
    song_writer_name: String,
    lyric: String,
}

impl SharedFields {
    fn resolve(html: &Html) -> Self {
        let mut shared = Self {
            lyric: extract_lyric(html),
            ..Self::default()
        };

        let Ok(row_selector) =
            Selector::parse(".jp-cmp-song-block-001 .jp-cmp-song-visual .jp-cmp-song-table-001 tr")
        else {
            return shared;
        };

        for row in html.select(&row_selector) {
            let label = select_text(row, "th");
            match label.as_str() {
                "歌手名" => shared.artist_name = select_text(row, "td a"),
                "作詞" => shared.lyric_writer_name = select_text(row, "td span"),
                "作曲" => shared.song_writer_name = select_text(row, "td span"),
                _ => {}
            }
        }

        shared
    }
}

/// Builds one song from a list item plus the shared page-level fields
fn build_song(item: ElementRef, shared: &SharedFields, page_number: u32) -> Song {
    let mut song = Song {
        page_number,
        artist_name: shared.artist_name.clone(),
        lyric_writer_name: shared.lyric_writer_name.clone(),
        song_writer_name: shared.song_writer_name.clone(),
        lyric: shared.lyric.clone(),
        name: select_text(item, ".jp-cmp-karaoke-details > h4"),
        ..Song::default()
    };

    apply_detail_fields(item, &mut song);
    song.model_names = extract_model_names(item);

    song
}

/// Scans the per-item label/value list and dispatches on exact label text
fn apply_detail_fields(item: ElementRef, song: &mut Song) {
    let Ok(dl_selector) =
        Selector::parse(".jp-cmp-karaoke-details > .jp-cmp-movie-status-001 > dl")
    else {
        return;
    };

    for dl in item.select(&dl_selector) {
        // Labels and values alternate; a matched label consumes the
        // element that follows it.
        let mut children = dl.children().filter_map(ElementRef::wrap).peekable();
        while let Some(child) = children.next() {
            let label = clean(&element_text(child));
            if let Some((_, setter)) = DETAIL_FIELDS.iter().find(|(l, _)| *l == label) {
                if let Some(value) = children.peek() {
                    setter(song, clean(&element_text(*value)));
                }
            }
        }
    }
}

/// Flattens the supported device/model list into one joined string
fn extract_model_names(item: ElementRef) -> String {
    let Ok(model_selector) = Selector::parse(".jp-cmp-karaoke-platform > ul > li") else {
        return String::new();
    };
    let Ok(img_selector) = Selector::parse("img") else {
        return String::new();
    };

    let names: Vec<String> = item
        .select(&model_selector)
        .filter_map(|li| {
            li.select(&img_selector)
                .next()
                .and_then(|img| img.value().attr("alt"))
                .map(|alt| alt.to_string())
        })
        .collect();

    names.join(", ")
}

/// Extracts the lyric body, collapsing line breaks to spaces
fn extract_lyric(html: &Html) -> String {
    let Ok(selector) =
        Selector::parse("#lyrics > .jp-cmp-song-words-contents > .jp-cmp-song-words-details p")
    else {
        return String::new();
    };

    let text: String = html
        .select(&selector)
        .flat_map(|p| p.text())
        .collect::<String>()
        .replace('\n', " ");

    clean(&text)
}

fn select_text(scope: ElementRef, css: &str) -> String {
    let Ok(selector) = Selector::parse(css) else {
        return String::new();
    };

    scope
        .select(&selector)
        .next()
        .map(|el| clean(&element_text(el)))
        .unwrap_or_default()
}

fn element_text(el: ElementRef) -> String {
    el.text().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found_page() -> String {
        r#"<html><body>
            <div id="jp-cmp-main">
              <div class="jp-cmp-box-005">
                <div class="jp-cmp-h1-error"><span>
                  このページは存在しません。
                </span></div>
              </div>
            </div>
        </body></html>"#
            .to_string()
    }

    fn song_page(items: &str) -> String {
        format!(
            r##"<html><body>
            <div class="jp-cmp-song-block-001">
              <div class="jp-cmp-song-visual">
                <table class="jp-cmp-song-table-001">
                  <tr><th>歌手名</th><td><a href="#">テスト歌手</a></td></tr>
                  <tr><th>作詞</th><td><span>作詞家A</span></td></tr>
                  <tr><th>作曲</th><td><span>作曲家B</span></td></tr>
                </table>
              </div>
            </div>
            <div class="jp-cmp-karaoke-list-001"><ul>{}</ul></div>
            <div id="lyrics">
              <div class="jp-cmp-song-words-contents">
                <div class="jp-cmp-song-words-details"><p>歌詞の
一行目</p></div>
              </div>
            </div>
        </body></html>"##,
            items
        )
    }

    fn song_item(title: &str, number: &str) -> String {
        format!(
            r#"<li>
              <div class="jp-cmp-karaoke-details">
                <h4>{}</h4>
                <div class="jp-cmp-movie-status-001">
                  <dl>
                    <dt>曲番号:</dt><dd>{}</dd>
                    <dt>キー</dt><dd>+3</dd>
                    <dt>配信予定:</dt><dd>配信中</dd>
                    <dt>未知のラベル:</dt><dd>無視される</dd>
                  </dl>
                </div>
              </div>
              <div class="jp-cmp-karaoke-platform"><ul>
                <li><img src="a.png" alt="Model A"></li>
                <li><img src="b.png" alt="Model B"></li>
              </ul></div>
            </li>"#,
            title, number
        )
    }

    #[test]
    fn test_not_found_signal() {
        let html = Html::parse_document(&not_found_page());
        assert!(page_not_found(&html));
    }

    #[test]
    fn test_not_found_signal_absent() {
        let html = Html::parse_document(&song_page(&song_item("曲A", "1111-11")));
        assert!(!page_not_found(&html));
    }

    #[test]
    fn test_extract_single_song() {
        let html = Html::parse_document(&song_page(&song_item("曲A", "1111-11")));
        let extracted = extract_page(&html, 7);

        assert!(!extracted.not_found);
        assert_eq!(extracted.songs.len(), 1);

        let song = &extracted.songs[0];
        assert_eq!(song.page_number, 7);
        assert_eq!(song.name, "曲A");
        assert_eq!(song.number, "1111-11");
        assert_eq!(song.artist_name, "テスト歌手");
        assert_eq!(song.lyric_writer_name, "作詞家A");
        assert_eq!(song.song_writer_name, "作曲家B");
        assert_eq!(song.original_key, "+3");
        assert_eq!(song.delivery_status, "配信中");
        assert_eq!(song.model_names, "Model A, Model B");
        assert_eq!(song.lyric, "歌詞の 一行目");
    }

    #[test]
    fn test_shared_fields_applied_to_every_item() {
        let items = format!(
            "{}{}",
            song_item("曲A", "1111-11"),
            song_item("曲B", "2222-22")
        );
        let html = Html::parse_document(&song_page(&items));
        let extracted = extract_page(&html, 1);

        assert_eq!(extracted.songs.len(), 2);
        assert_eq!(extracted.songs[0].artist_name, "テスト歌手");
        assert_eq!(extracted.songs[1].artist_name, "テスト歌手");
        assert_eq!(extracted.songs[0].number, "1111-11");
        assert_eq!(extracted.songs[1].number, "2222-22");
    }

    #[test]
    fn test_unrecognized_labels_ignored() {
        let html = Html::parse_document(&song_page(&song_item("曲A", "1111-11")));
        let extracted = extract_page(&html, 1);

        // The item carries an unknown label; extraction neither fails nor
        // misassigns it
        assert_eq!(extracted.songs[0].delivery_term, "");
    }

    #[test]
    fn test_empty_page_yields_no_songs() {
        let html = Html::parse_document("<html><body><p>empty</p></body></html>");
        let extracted = extract_page(&html, 1);

        assert!(!extracted.not_found);
        assert!(extracted.songs.is_empty());
    }

    #[test]
    fn test_missing_shared_fields_degrade_to_empty() {
        let html = Html::parse_document(&format!(
            r#"<html><body><div class="jp-cmp-karaoke-list-001"><ul>{}</ul></div></body></html>"#,
            song_item("曲A", "1111-11")
        ));
        let extracted = extract_page(&html, 1);

        assert_eq!(extracted.songs.len(), 1);
        assert_eq!(extracted.songs[0].artist_name, "");
        assert_eq!(extracted.songs[0].lyric, "");
    }
}
