//! IMDb title search through the public suggestion endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{catalog::FilmCatalog, error::ProviderError, models::Movie};

const SUGGESTION_URL: &str = "https://v3.sg.media-imdb.com/suggestion";

/// Title ids start with `tt`; people and companies use other prefixes.
const TITLE_ID_PREFIX: &str = "tt";

#[derive(Debug, Deserialize)]
struct SuggestionResponse {
    #[serde(default)]
    d: Vec<Suggestion>,
}

#[derive(Debug, Deserialize)]
struct Suggestion {
    id: String,
    #[serde(rename = "l")]
    label: Option<String>,
}

pub struct ImdbClient {
    http: Client,
}

impl ImdbClient {
    pub fn new(timeout: Duration) -> Result<Self, ProviderError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    fn suggestion_url(query: &str) -> String {
        let query = query.trim().to_lowercase();
        let bucket = query
            .chars()
            .find(|c| c.is_ascii_alphanumeric())
            .unwrap_or('x');
        format!(
            "{}/{}/{}.json",
            SUGGESTION_URL,
            bucket,
            urlencoding::encode(&query)
        )
    }
}

#[async_trait]
impl FilmCatalog for ImdbClient {
    async fn search_titles(&self, query: &str, limit: usize) -> Result<Vec<Movie>, ProviderError> {
        let response = self.http.get(Self::suggestion_url(query)).send().await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let body = response.text().await?;
        movies_from_suggestions(&body, limit)
    }
}

fn movies_from_suggestions(body: &str, limit: usize) -> Result<Vec<Movie>, ProviderError> {
    let response: SuggestionResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Malformed(e.to_string()))?;

    Ok(response
        .d
        .into_iter()
        .filter(|s| s.id.starts_with(TITLE_ID_PREFIX))
        .filter_map(|s| s.label)
        .take(limit)
        .map(|title| Movie { title })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestion_url_uses_first_letter_bucket() {
        assert_eq!(
            ImdbClient::suggestion_url("Comedy"),
            "https://v3.sg.media-imdb.com/suggestion/c/comedy.json"
        );
        assert_eq!(
            ImdbClient::suggestion_url("science fiction"),
            "https://v3.sg.media-imdb.com/suggestion/s/science%20fiction.json"
        );
    }

    #[test]
    fn keeps_titles_only_up_to_limit() {
        let body = r#"{
            "d": [
                {"id": "tt0118715", "l": "The Big Lebowski", "q": "feature", "y": 1998},
                {"id": "nm0000123", "l": "George Clooney", "s": "Actor"},
                {"id": "tt0107048", "l": "Groundhog Day", "y": 1993},
                {"id": "tt9999999"},
                {"id": "tt0088763", "l": "Back to the Future"},
                {"id": "tt0109830", "l": "Forrest Gump"}
            ],
            "q": "comedy",
            "v": 1
        }"#;

        let movies = movies_from_suggestions(body, 3).unwrap();
        let titles: Vec<_> = movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["The Big Lebowski", "Groundhog Day", "Back to the Future"]);
    }

    #[test]
    fn missing_results_mean_no_titles() {
        let movies = movies_from_suggestions(r#"{"q": "zzzz", "v": 1}"#, 5).unwrap();
        assert!(movies.is_empty());
    }

    #[test]
    fn non_json_body_is_malformed() {
        let err = movies_from_suggestions("<html>rate limited</html>", 5).unwrap_err();
        assert!(matches!(err, ProviderError::Malformed(_)));
    }
}
