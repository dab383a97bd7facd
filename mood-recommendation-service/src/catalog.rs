use async_trait::async_trait;
use tracing::{info, warn};

use crate::{
    error::ProviderError,
    models::{Movie, Song},
    mood::{MoodLabel, movie_genre_for, song_query_for},
};

/// Most items asked from, and kept from, each catalog
pub const RESULT_LIMIT: usize = 5;

/// Keyword search over a music catalog, best match first.
#[async_trait]
pub trait MusicCatalog: Send + Sync {
    async fn search_tracks(&self, query: &str, limit: usize) -> Result<Vec<Song>, ProviderError>;
}

/// Keyword search over a film catalog, best match first.
#[async_trait]
pub trait FilmCatalog: Send + Sync {
    async fn search_titles(&self, query: &str, limit: usize) -> Result<Vec<Movie>, ProviderError>;
}

/// A recommendation kind that can stand in for itself with a message.
pub trait CatalogItem: Sized {
    /// Plural noun used in sentinel messages
    const KIND: &'static str;

    fn sentinel(message: String) -> Self;
}

impl CatalogItem for Song {
    const KIND: &'static str = "songs";

    fn sentinel(message: String) -> Self {
        Song {
            name: message,
            artist: String::new(),
            url: String::new(),
        }
    }
}

impl CatalogItem for Movie {
    const KIND: &'static str = "movies";

    fn sentinel(message: String) -> Self {
        Movie { title: message }
    }
}

/// What a catalog lookup produced, before it is shaped for display.
#[derive(Debug)]
pub enum CatalogOutcome<T> {
    Found(Vec<T>),
    Failed(String),
}

impl<T> From<Result<Vec<T>, ProviderError>> for CatalogOutcome<T> {
    fn from(result: Result<Vec<T>, ProviderError>) -> Self {
        match result {
            Ok(items) => Self::Found(items),
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}

impl<T: CatalogItem> CatalogOutcome<T> {
    /// Never empty: no results and failures both become a single sentinel.
    pub fn into_display_list(self) -> Vec<T> {
        match self {
            Self::Found(items) if items.is_empty() => {
                vec![T::sentinel(format!("No {} found", T::KIND))]
            }
            Self::Found(mut items) => {
                items.truncate(RESULT_LIMIT);
                items
            }
            Self::Failed(reason) => {
                vec![T::sentinel(format!("Error fetching {}: {}", T::KIND, reason))]
            }
        }
    }
}

/// Songs for a mood. Catalog failures are logged and degrade to a sentinel.
pub async fn fetch_songs(catalog: &dyn MusicCatalog, mood: MoodLabel) -> Vec<Song> {
    let query = song_query_for(mood.as_str());
    let outcome = CatalogOutcome::from(catalog.search_tracks(query, RESULT_LIMIT).await);
    log_outcome(&outcome, Song::KIND, query);
    outcome.into_display_list()
}

/// Movies for a mood. Catalog failures are logged and degrade to a sentinel.
pub async fn fetch_movies(catalog: &dyn FilmCatalog, mood: MoodLabel) -> Vec<Movie> {
    let genre = movie_genre_for(mood.as_str());
    let outcome = CatalogOutcome::from(catalog.search_titles(genre, RESULT_LIMIT).await);
    log_outcome(&outcome, Movie::KIND, genre);
    outcome.into_display_list()
}

fn log_outcome<T>(outcome: &CatalogOutcome<T>, kind: &str, query: &str) {
    match outcome {
        CatalogOutcome::Found(items) => info!(kind, query, found = items.len(), "Catalog lookup done"),
        CatalogOutcome::Failed(reason) => warn!(kind, query, %reason, "Catalog lookup failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn song(name: &str) -> Song {
        Song {
            name: name.to_string(),
            artist: "Artist".to_string(),
            url: format!("https://open.spotify.com/track/{name}"),
        }
    }

    struct RecordingMusic {
        result: fn() -> Result<Vec<Song>, ProviderError>,
        queries: Mutex<Vec<(String, usize)>>,
    }

    #[async_trait]
    impl MusicCatalog for RecordingMusic {
        async fn search_tracks(&self, query: &str, limit: usize) -> Result<Vec<Song>, ProviderError> {
            self.queries.lock().unwrap().push((query.to_string(), limit));
            (self.result)()
        }
    }

    struct StaticFilms(Vec<&'static str>);

    #[async_trait]
    impl FilmCatalog for StaticFilms {
        async fn search_titles(&self, _query: &str, _limit: usize) -> Result<Vec<Movie>, ProviderError> {
            Ok(self
                .0
                .iter()
                .map(|t| Movie {
                    title: t.to_string(),
                })
                .collect())
        }
    }

    #[test]
    fn failure_becomes_single_error_sentinel() {
        let songs = CatalogOutcome::<Song>::Failed("connection reset".into()).into_display_list();
        assert_eq!(
            songs,
            vec![Song {
                name: "Error fetching songs: connection reset".into(),
                artist: String::new(),
                url: String::new(),
            }]
        );

        let movies = CatalogOutcome::<Movie>::Failed("timeout".into()).into_display_list();
        assert_eq!(movies, vec![Movie { title: "Error fetching movies: timeout".into() }]);
    }

    #[test]
    fn empty_result_becomes_not_found_sentinel() {
        let songs = CatalogOutcome::<Song>::Found(vec![]).into_display_list();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].name, "No songs found");
        assert!(songs[0].artist.is_empty() && songs[0].url.is_empty());

        let movies = CatalogOutcome::<Movie>::Found(vec![]).into_display_list();
        assert_eq!(movies, vec![Movie { title: "No movies found".into() }]);
    }

    #[test]
    fn found_items_are_capped_at_limit() {
        let items: Vec<Song> = (0..8).map(|i| song(&i.to_string())).collect();
        let songs = CatalogOutcome::Found(items).into_display_list();
        assert_eq!(songs.len(), RESULT_LIMIT);
        assert_eq!(songs[0].name, "0");
    }

    #[test]
    fn provider_errors_carry_their_reason() {
        let outcome: CatalogOutcome<Song> =
            Err(ProviderError::Malformed("missing tracks".into())).into();
        let songs = outcome.into_display_list();
        assert_eq!(songs[0].name, "Error fetching songs: malformed response: missing tracks");
    }

    #[tokio::test]
    async fn fetch_songs_uses_mood_query_and_limit() {
        let catalog = RecordingMusic {
            result: || Ok(vec![song("a"), song("b")]),
            queries: Mutex::new(Vec::new()),
        };

        let songs = fetch_songs(&catalog, MoodLabel::Angry).await;

        assert_eq!(songs, vec![song("a"), song("b")]);
        assert_eq!(
            *catalog.queries.lock().unwrap(),
            vec![("rock aggressive".to_string(), RESULT_LIMIT)]
        );
    }

    #[tokio::test]
    async fn fetch_songs_never_raises() {
        let catalog = RecordingMusic {
            result: || Err(ProviderError::Auth("invalid_client".into())),
            queries: Mutex::new(Vec::new()),
        };

        let songs = fetch_songs(&catalog, MoodLabel::Sad).await;

        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].name, "Error fetching songs: authentication failed: invalid_client");
    }

    #[tokio::test]
    async fn fetch_movies_keeps_first_five_titles() {
        let catalog = StaticFilms(vec!["A", "B", "C", "D", "E", "F"]);
        let movies = fetch_movies(&catalog, MoodLabel::Happy).await;
        let titles: Vec<_> = movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C", "D", "E"]);
    }
}
