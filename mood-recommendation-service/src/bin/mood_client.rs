//! Terminal front-end for the recommendation service.
//!
//! Usage: `mood_client <how you are feeling>`; set `API_URL` to target a
//! server other than the local default.

use mood_recommendation_service::{
    RecommendationResult,
    presentation::{EMPTY_INPUT_WARNING, FETCH_FAILED_MESSAGE, render},
};
use tracing::error;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/recommend";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let query = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if query.trim().is_empty() {
        eprintln!("{}", EMPTY_INPUT_WARNING);
        std::process::exit(2);
    }

    let api_url = std::env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

    match fetch(&api_url, &query).await {
        Ok(result) => print!("{}", render(&result)),
        Err(e) => {
            error!("Recommendation request failed: {}", e);
            eprintln!("{}", FETCH_FAILED_MESSAGE);
            std::process::exit(1);
        }
    }
}

async fn fetch(api_url: &str, query: &str) -> anyhow::Result<RecommendationResult> {
    let response = reqwest::Client::new()
        .get(api_url)
        .query(&[("query", query)])
        .send()
        .await?;

    if !response.status().is_success() {
        anyhow::bail!("server answered {}", response.status());
    }

    Ok(response.json().await?)
}
