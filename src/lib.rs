// LetterLens - AI-powered extraction of key fields from official letters

pub mod config;
pub mod llm;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod types;
pub mod upload;

// Re-exports for convenience
pub use config::Config;
pub use models::{AppState, LetterData};

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
