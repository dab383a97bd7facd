pub mod backends;
pub mod catalog;
pub mod classifier;
pub mod config;
pub mod error;
pub mod generator;
pub mod models;
pub mod mood;
pub mod presentation;
pub mod providers;
pub mod service;
pub mod tasks;
pub mod workflow;

pub use config::ServiceConfig;
pub use service::{AppState, build_router};
pub use workflow::{Backends, Recommender};
pub use models::*;
