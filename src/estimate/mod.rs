mod client;
pub mod dto;
pub mod handlers;
mod prompt;

use crate::state::AppState;
use axum::Router;

pub use client::CalorieEstimator;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
