pub mod imdb;
pub mod spotify;

pub use imdb::ImdbClient;
pub use spotify::SpotifyClient;
