use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::{
    models::{ErrorResponse, RecommendParams, RecommendationResult},
    workflow::Recommender,
};

pub const WELCOME_MESSAGE: &str =
    "Welcome to the Emotion-Based Movie & Music Recommendation Chatbot!";

type ApiError = (StatusCode, Json<ErrorResponse>);

fn upstream_error(detail: String) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse { detail }),
    )
}

fn validation_error(detail: &str) -> ApiError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResponse {
            detail: detail.to_string(),
        }),
    )
}

#[derive(Clone)]
pub struct AppState {
    pub recommender: Recommender,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/recommend", get(recommend))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": WELCOME_MESSAGE }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn recommend(
    State(state): State<AppState>,
    Query(params): Query<RecommendParams>,
) -> Result<Json<RecommendationResult>, ApiError> {
    let query = params
        .query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| validation_error("query parameter is required and must not be blank"))?;

    info!("Received recommendation request: {}", query);

    let recommendation = state.recommender.recommend(&query).await.map_err(|e| {
        error!("Recommendation failed: {}", e);
        upstream_error(e.to_string())
    })?;

    Ok(Json(recommendation))
}
