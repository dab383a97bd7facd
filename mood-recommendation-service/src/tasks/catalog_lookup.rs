use std::sync::Arc;

use async_trait::async_trait;
use mood_flow::GraphError::ContextError;
use mood_flow::{Context, NextAction, Task, TaskResult};

use super::context_keys;
use crate::{
    catalog::{FilmCatalog, MusicCatalog, fetch_movies, fetch_songs},
    mood::MoodLabel,
};

async fn detected_mood(context: &Context) -> mood_flow::Result<MoodLabel> {
    context
        .get(context_keys::MOOD)
        .await
        .ok_or_else(|| ContextError("mood not found in context".into()))
}

/// Task that looks up songs for the detected mood. Catalog failures end up
/// as a sentinel song, never as a task error.
pub struct FetchSongsTask {
    catalog: Arc<dyn MusicCatalog>,
}

impl FetchSongsTask {
    pub fn new(catalog: Arc<dyn MusicCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Task for FetchSongsTask {
    async fn run(&self, context: Context) -> mood_flow::Result<TaskResult> {
        let mood = detected_mood(&context).await?;
        let songs = fetch_songs(self.catalog.as_ref(), mood).await;
        context.set(context_keys::SONGS, songs).await;
        Ok(TaskResult::new(None, NextAction::Continue))
    }
}

/// Task that looks up movies for the detected mood. Catalog failures end up
/// as a sentinel title, never as a task error.
pub struct FetchMoviesTask {
    catalog: Arc<dyn FilmCatalog>,
}

impl FetchMoviesTask {
    pub fn new(catalog: Arc<dyn FilmCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Task for FetchMoviesTask {
    async fn run(&self, context: Context) -> mood_flow::Result<TaskResult> {
        let mood = detected_mood(&context).await?;
        let movies = fetch_movies(self.catalog.as_ref(), mood).await;
        context.set(context_keys::MOVIES, movies).await;
        Ok(TaskResult::new(None, NextAction::Continue))
    }
}
