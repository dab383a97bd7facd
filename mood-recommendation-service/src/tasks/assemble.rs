use async_trait::async_trait;
use mood_flow::GraphError::ContextError;
use mood_flow::{Context, NextAction, Task, TaskResult};
use tracing::info;

use super::context_keys;
use crate::models::{Movie, RecommendationResult, Song};
use crate::mood::MoodLabel;

/// Final task: gathers the reply, mood and both lookups into one result
pub struct AssembleRecommendationTask;

#[async_trait]
impl Task for AssembleRecommendationTask {
    async fn run(&self, context: Context) -> mood_flow::Result<TaskResult> {
        let chatbot_response: String = context
            .get(context_keys::CHATBOT_RESPONSE)
            .await
            .ok_or_else(|| ContextError("chatbot_response not found in context".into()))?;

        let mood: MoodLabel = context
            .get(context_keys::MOOD)
            .await
            .ok_or_else(|| ContextError("mood not found in context".into()))?;

        let songs: Vec<Song> = context
            .get(context_keys::SONGS)
            .await
            .ok_or_else(|| ContextError("songs not found in context".into()))?;

        let movies: Vec<Movie> = context
            .get(context_keys::MOVIES)
            .await
            .ok_or_else(|| ContextError("movies not found in context".into()))?;

        info!(
            %mood,
            songs = songs.len(),
            movies = movies.len(),
            "Recommendation assembled"
        );

        let recommendation = RecommendationResult {
            chatbot_response,
            mood,
            songs,
            movies,
        };
        context
            .set(context_keys::RECOMMENDATION, &recommendation)
            .await;

        Ok(TaskResult::new(None, NextAction::End))
    }
}
