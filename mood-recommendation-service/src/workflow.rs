use std::sync::Arc;

use mood_flow::{Context, FanOutTask, Graph, GraphBuilder, GraphError, Task};
use tracing::info;
use uuid::Uuid;

use crate::{
    catalog::{FilmCatalog, MusicCatalog},
    classifier::{EmotionBackend, MoodClassifier},
    generator::{ChatBackend, ResponseGenerator},
    models::RecommendationResult,
    tasks::{
        AssembleRecommendationTask, ClassifyMoodTask, FetchMoviesTask, FetchSongsTask,
        GenerateReplyTask, context_keys,
    },
};

pub const GRAPH_ID: &str = "mood_recommendation_flow";
const CATALOG_FAN_OUT_ID: &str = "catalog_lookups";

/// Long-lived collaborator handles, created once at start-up
#[derive(Clone)]
pub struct Backends {
    pub chat: Arc<dyn ChatBackend>,
    pub emotion: Arc<dyn EmotionBackend>,
    pub music: Arc<dyn MusicCatalog>,
    pub films: Arc<dyn FilmCatalog>,
}

/// reply -> mood -> (songs || movies) -> assemble
pub fn build_recommendation_graph(backends: &Backends) -> Graph {
    let reply_task: Arc<dyn Task> = Arc::new(GenerateReplyTask::new(ResponseGenerator::new(
        backends.chat.clone(),
    )));
    let mood_task: Arc<dyn Task> = Arc::new(ClassifyMoodTask::new(MoodClassifier::new(
        backends.emotion.clone(),
    )));
    let lookups_task: Arc<dyn Task> = Arc::new(FanOutTask::new(
        CATALOG_FAN_OUT_ID,
        vec![
            Arc::new(FetchSongsTask::new(backends.music.clone())),
            Arc::new(FetchMoviesTask::new(backends.films.clone())),
        ],
    ));
    let assemble_task: Arc<dyn Task> = Arc::new(AssembleRecommendationTask);

    let reply_id = reply_task.id().to_string();
    let mood_id = mood_task.id().to_string();
    let lookups_id = lookups_task.id().to_string();
    let assemble_id = assemble_task.id().to_string();

    GraphBuilder::new(GRAPH_ID)
        .add_task(reply_task)
        .add_task(mood_task)
        .add_task(lookups_task)
        .add_task(assemble_task)
        .add_edge(&reply_id, &mood_id)
        .add_edge(&mood_id, &lookups_id)
        .add_edge(&lookups_id, &assemble_id)
        .build()
}

/// Runs the recommendation graph for one user query at a time. Cheap to
/// clone; the graph and its handles are shared.
#[derive(Clone)]
pub struct Recommender {
    graph: Arc<Graph>,
}

impl Recommender {
    pub fn new(backends: &Backends) -> Self {
        Self {
            graph: Arc::new(build_recommendation_graph(backends)),
        }
    }

    /// Either a complete result (with sentinels where catalogs failed) or an
    /// error from the chat or classification step. Nothing partial.
    pub async fn recommend(&self, user_text: &str) -> mood_flow::Result<RecommendationResult> {
        let request_id = Uuid::new_v4().to_string();
        info!(%request_id, "Starting recommendation");

        let context = Context::new();
        context.set(context_keys::REQUEST_ID, &request_id).await;
        context.set(context_keys::USER_QUERY, user_text).await;

        self.graph.execute(context.clone()).await?;

        let recommendation = context
            .get(context_keys::RECOMMENDATION)
            .await
            .ok_or_else(|| {
                GraphError::ContextError("recommendation missing after graph run".into())
            })?;

        info!(%request_id, "Recommendation completed");
        Ok(recommendation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::error::{BackendError, ProviderError};
    use crate::models::{Movie, Song};

    struct Echo;

    #[async_trait]
    impl ChatBackend for Echo {
        async fn chat(&self, _system: &str, user: &str) -> Result<Option<String>, BackendError> {
            Ok(Some(format!("echo: {user}")))
        }
    }

    struct AlwaysAngry;

    #[async_trait]
    impl EmotionBackend for AlwaysAngry {
        async fn scores(&self, _text: &str) -> Result<Vec<f32>, BackendError> {
            Ok(vec![0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0])
        }
    }

    struct NoMusic;

    #[async_trait]
    impl MusicCatalog for NoMusic {
        async fn search_tracks(&self, _q: &str, _l: usize) -> Result<Vec<Song>, ProviderError> {
            Ok(vec![])
        }
    }

    struct OneFilm;

    #[async_trait]
    impl FilmCatalog for OneFilm {
        async fn search_titles(&self, query: &str, _l: usize) -> Result<Vec<Movie>, ProviderError> {
            Ok(vec![Movie {
                title: format!("{query} Movie"),
            }])
        }
    }

    fn backends() -> Backends {
        Backends {
            chat: Arc::new(Echo),
            emotion: Arc::new(AlwaysAngry),
            music: Arc::new(NoMusic),
            films: Arc::new(OneFilm),
        }
    }

    #[test]
    fn graph_starts_at_reply_generation_and_chains_steps() {
        let graph = build_recommendation_graph(&backends());

        let start = graph.start_task_id().unwrap().to_string();
        assert!(start.ends_with("GenerateReplyTask"));

        let mood = graph.find_next_task(&start).unwrap();
        assert!(mood.ends_with("ClassifyMoodTask"));
        assert_eq!(graph.find_next_task(&mood).as_deref(), Some(CATALOG_FAN_OUT_ID));
        let last = graph.find_next_task(CATALOG_FAN_OUT_ID).unwrap();
        assert!(last.ends_with("AssembleRecommendationTask"));
        assert!(graph.find_next_task(&last).is_none());
    }

    #[tokio::test]
    async fn recommend_assembles_all_four_fields() {
        let result = Recommender::new(&backends()).recommend("hi").await.unwrap();

        assert_eq!(result.chatbot_response, "echo: hi");
        assert_eq!(result.mood, crate::mood::MoodLabel::Angry);
        assert_eq!(result.songs.len(), 1);
        assert_eq!(result.songs[0].name, "No songs found");
        assert_eq!(result.movies, vec![Movie { title: "Action Movie".into() }]);
    }
}
