pub mod assemble;
pub mod catalog_lookup;
pub mod classify_mood;
pub mod generate_reply;

pub use assemble::AssembleRecommendationTask;
pub use catalog_lookup::{FetchMoviesTask, FetchSongsTask};
pub use classify_mood::ClassifyMoodTask;
pub use generate_reply::GenerateReplyTask;

/// Keys the recommendation tasks read and write in the shared context
pub mod context_keys {
    pub const REQUEST_ID: &str = "request_id";
    pub const USER_QUERY: &str = "user_query";
    pub const CHATBOT_RESPONSE: &str = "chatbot_response";
    pub const MOOD: &str = "mood";
    pub const SONGS: &str = "songs";
    pub const MOVIES: &str = "movies";
    pub const RECOMMENDATION: &str = "recommendation";
}
