//! Reading-enrichment client
//!
//! Wraps the morphological-analysis service that converts free text into
//! phonetic readings. Enrichment is best-effort: callers degrade a failed
//! reading to an empty string and let validation decide.

use crate::text::katakana_to_hiragana;
use serde::Deserialize;
use thiserror::Error;

/// Name of the analysis index provisioned at startup
pub const ANALYZER_INDEX: &str = "kuromoji_sample";

/// Settings document for the analysis index
const ANALYZER_SETTINGS: &str = r#"
{
  "settings": {
    "index": {
      "analysis": {
        "analyzer": {
          "romaji_analyzer": {
            "tokenizer": "kuromoji_tokenizer",
            "filter": [
              "romaji_readingform"
            ]
          },
          "katakana_analyzer": {
            "tokenizer": "kuromoji_tokenizer",
            "filter": [
              "katakana_readingform"
            ]
          }
        },
        "filter": {
          "romaji_readingform": {
            "type": "kuromoji_readingform",
            "use_romaji": true
          },
          "katakana_readingform": {
            "type": "kuromoji_readingform",
            "use_romaji": false
          }
        }
      }
    }
  }
}
"#;

/// Errors from the reading-analysis collaborator
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("analyzer request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("analyzer returned HTTP {0}")]
    Status(u16),
}

/// Which reading form to request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadingMode {
    Katakana,
    Romaji,
}

impl ReadingMode {
    fn analyzer_name(&self) -> &'static str {
        match self {
            Self::Katakana => "katakana_analyzer",
            Self::Romaji => "romaji_analyzer",
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    tokens: Vec<AnalyzeToken>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeToken {
    token: String,
}

/// HTTP client for the reading-analysis service
pub struct ReadingClient {
    client: reqwest::Client,
    base_url: String,
}

impl ReadingClient {
    /// Creates a client for the analyzer at `base_url`
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Provisions the analysis index
    ///
    /// Runs once at process start. An already-provisioned index answers with
    /// an error status, so only transport failures are reported; the caller
    /// aborts before crawling begins on `Err`.
    pub async fn provision_index(&self) -> Result<(), AnalyzerError> {
        let url = format!("{}/{}", self.base_url, ANALYZER_INDEX);
        let response = self
            .client
            .put(&url)
            .header("content-type", "application/json")
            .body(ANALYZER_SETTINGS)
            .send()
            .await?;

        tracing::debug!(status = response.status().as_u16(), "analyzer index provisioned");
        Ok(())
    }

    /// Returns the space-joined reading of `text` in the requested form
    ///
    /// Katakana tokens are converted to hiragana before joining. An empty
    /// input short-circuits to an empty reading without a request.
    pub async fn reading(&self, text: &str, mode: ReadingMode) -> Result<String, AnalyzerError> {
        if text.is_empty() {
            return Ok(String::new());
        }

        let url = format!(
            "{}/{}/_analyze?analyzer={}",
            self.base_url,
            ANALYZER_INDEX,
            mode.analyzer_name()
        );

        let response = self.client.get(&url).body(text.to_string()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalyzerError::Status(status.as_u16()));
        }

        let parsed: AnalyzeResponse = response.json().await?;
        let words: Vec<String> = parsed
            .tokens
            .iter()
            .map(|t| katakana_to_hiragana(&t.token))
            .collect();

        Ok(words.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyzer_names() {
        assert_eq!(ReadingMode::Katakana.analyzer_name(), "katakana_analyzer");
        assert_eq!(ReadingMode::Romaji.analyzer_name(), "romaji_analyzer");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ReadingClient::new(reqwest::Client::new(), "http://analyzer:9200/");
        assert_eq!(client.base_url, "http://analyzer:9200");
    }

    #[test]
    fn test_settings_document_is_valid_json() {
        let parsed: Result<serde::de::IgnoredAny, _> =
            serde_json::from_str(ANALYZER_SETTINGS);
        assert!(parsed.is_ok());
    }
}
