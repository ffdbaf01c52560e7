pub mod daily;
pub mod dto;
pub mod handlers;
#[cfg(test)]
pub mod memory;
pub mod repo;
pub mod services;
mod validation;

use crate::state::AppState;
use axum::Router;

pub use repo::{EntryStore, PgEntryStore};

pub fn router() -> Router<AppState> {
    handlers::routes()
}
