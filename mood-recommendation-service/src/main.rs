use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use mood_recommendation_service::{
    AppState, Backends, Recommender, ServiceConfig,
    backends::{BertEmotionBackend, OllamaChatBackend, bert::ModelSource},
    build_router,
    providers::{ImdbClient, SpotifyClient},
};
use tokio::net::TcpListener;
use tracing::{Level, error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    dotenvy::dotenv().ok();

    // Credentials are checked before anything slow happens
    let config = ServiceConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    info!(
        chat_model = %config.chat_model,
        emotion_model = %config.emotion_model,
        "Starting mood recommendation service"
    );

    let source = match &config.emotion_model_dir {
        Some(dir) => ModelSource::Local(PathBuf::from(dir)),
        None => ModelSource::Hub(config.emotion_model.clone()),
    };
    // Off-load the model download and weight mapping to a blocking thread
    let emotion = tokio::task::spawn_blocking(move || BertEmotionBackend::load(&source))
        .await?
        .context("loading emotion classifier")?;

    let backends = Backends {
        chat: Arc::new(OllamaChatBackend::new(&config.chat_model, config.chat_timeout)),
        emotion: Arc::new(emotion),
        music: Arc::new(SpotifyClient::new(
            &config.spotify_client_id,
            &config.spotify_client_secret,
            config.http_timeout,
        )?),
        films: Arc::new(ImdbClient::new(config.http_timeout)?),
    };

    let state = AppState {
        recommender: Recommender::new(&backends),
    };
    let app = build_router(state);

    let listener = TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    let addr = listener.local_addr()?;

    info!("Server running on http://{}", addr);
    info!("Available endpoints:");
    info!("  GET  /           - Welcome message");
    info!("  GET  /health     - Health check");
    info!("  GET  /recommend  - Reply, mood, songs and movies for a feeling");
    info!("    Example: GET /recommend?query=I%20just%20got%20a%20promotion!");

    axum::serve(listener, app).await?;

    Ok(())
}
