//! Spotify Web API track search using the client-credentials flow.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{catalog::MusicCatalog, error::ProviderError, models::Song};

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const SEARCH_URL: &str = "https://api.spotify.com/v1/search";

/// Refresh this long before the token actually expires
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn is_fresh(&self, now: Instant) -> bool {
        now + EXPIRY_MARGIN < self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: TrackPage,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    items: Vec<Track>,
}

#[derive(Debug, Deserialize)]
struct Track {
    name: String,
    artists: Vec<Artist>,
    external_urls: ExternalUrls,
}

#[derive(Debug, Deserialize)]
struct Artist {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ExternalUrls {
    spotify: String,
}

/// Spotify client. One instance is shared by all requests; the access token
/// is cached until shortly before it expires.
pub struct SpotifyClient {
    http: Client,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<AccessToken>>,
}

impl SpotifyClient {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token: Mutex::new(None),
        })
    }

    async fn access_token(&self) -> Result<String, ProviderError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(Instant::now())) {
            return Ok(token.value.clone());
        }

        debug!("Requesting Spotify access token");
        let response = self
            .http
            .post(TOKEN_URL)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Auth(format!("HTTP {}: {}", status.as_u16(), body)));
        }

        let token: TokenResponse = response.json().await?;
        let fresh = AccessToken {
            value: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        };
        let value = fresh.value.clone();
        *cached = Some(fresh);
        info!(expires_in = token.expires_in, "Spotify access token refreshed");
        Ok(value)
    }
}

#[async_trait]
impl MusicCatalog for SpotifyClient {
    async fn search_tracks(&self, query: &str, limit: usize) -> Result<Vec<Song>, ProviderError> {
        let token = self.access_token().await?;
        let limit = limit.to_string();

        let response = self
            .http
            .get(SEARCH_URL)
            .bearer_auth(token)
            .query(&[("q", query), ("type", "track"), ("limit", limit.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let body = response.text().await?;
        songs_from_search(&body)
    }
}

/// Pull name, first artist and Spotify link out of a search payload.
fn songs_from_search(body: &str) -> Result<Vec<Song>, ProviderError> {
    let search: SearchResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Malformed(e.to_string()))?;

    search
        .tracks
        .items
        .into_iter()
        .map(|track| {
            let artist = track.artists.into_iter().next().ok_or_else(|| {
                ProviderError::Malformed(format!("track {:?} has no artists", track.name))
            })?;
            Ok(Song {
                name: track.name,
                artist: artist.name,
                url: track.external_urls.spotify,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_BODY: &str = r#"{
        "tracks": {
            "href": "https://api.spotify.com/v1/search?query=happy+upbeat&type=track&limit=5",
            "items": [
                {
                    "name": "Walking on Sunshine",
                    "artists": [{"name": "Katrina & The Waves"}, {"name": "Someone Else"}],
                    "external_urls": {"spotify": "https://open.spotify.com/track/05wIrZSwuaVWhcv5FfqeH0"},
                    "popularity": 78
                },
                {
                    "name": "Happy",
                    "artists": [{"name": "Pharrell Williams"}],
                    "external_urls": {"spotify": "https://open.spotify.com/track/60nZcImufyMA1MKQY3dcCH"}
                }
            ],
            "limit": 5,
            "total": 2
        }
    }"#;

    #[test]
    fn parses_name_first_artist_and_url() {
        let songs = songs_from_search(SEARCH_BODY).unwrap();
        assert_eq!(songs.len(), 2);
        assert_eq!(songs[0].name, "Walking on Sunshine");
        assert_eq!(songs[0].artist, "Katrina & The Waves");
        assert_eq!(
            songs[0].url,
            "https://open.spotify.com/track/05wIrZSwuaVWhcv5FfqeH0"
        );
        assert_eq!(songs[1].artist, "Pharrell Williams");
    }

    #[test]
    fn empty_page_is_not_an_error() {
        let songs = songs_from_search(r#"{"tracks": {"items": []}}"#).unwrap();
        assert!(songs.is_empty());
    }

    #[test]
    fn track_without_artist_is_malformed() {
        let body = r#"{"tracks": {"items": [
            {"name": "Ghost", "artists": [], "external_urls": {"spotify": "https://x"}}
        ]}}"#;
        let err = songs_from_search(body).unwrap_err();
        assert!(matches!(err, ProviderError::Malformed(msg) if msg.contains("Ghost")));
    }

    #[test]
    fn missing_tracks_key_is_malformed() {
        let err = songs_from_search(r#"{"error": {"status": 401}}"#).unwrap_err();
        assert!(matches!(err, ProviderError::Malformed(_)));
    }

    #[test]
    fn token_freshness_respects_margin() {
        let now = Instant::now();
        let token = |ttl| AccessToken {
            value: "t".into(),
            expires_at: now + Duration::from_secs(ttl),
        };
        assert!(token(3600).is_fresh(now));
        assert!(!token(30).is_fresh(now));
    }
}
