use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use time::{Date, OffsetDateTime};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{DailySummary, DeleteParams, EntryInput},
    repo::FoodEntry,
    services,
};
use crate::{
    auth::Session,
    error::AppResult,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/entries", get(list_today).post(create_entry))
        .route("/entries/today/summary", get(today_summary))
        .route(
            "/entries/:id",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
}

/// Entries belong to the UTC calendar day they were created on.
fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

#[instrument(skip(state))]
pub async fn list_today(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<Vec<FoodEntry>>> {
    let entries = services::entries_for_day(state.entries.as_ref(), &session, today()).await?;
    Ok(Json(entries))
}

#[instrument(skip(state))]
pub async fn today_summary(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<DailySummary>> {
    let summary = services::daily_summary(
        state.entries.as_ref(),
        &session,
        today(),
        state.config.daily_goal,
    )
    .await?;
    Ok(Json(summary))
}

/// POST /entries { name, quantity, calories }
#[instrument(skip(state, payload))]
pub async fn create_entry(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<EntryInput>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let entry = services::create_entry(state.entries.as_ref(), &session, today(), input).await?;
    let location = format!("/api/v1/entries/{}", entry.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(entry)))
}

#[instrument(skip(state))]
pub async fn get_entry(
    State(state): State<AppState>,
    session: Session,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<FoodEntry>> {
    let Path(id) = path?;
    Ok(Json(
        services::get_entry(state.entries.as_ref(), &session, id).await?,
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_entry(
    State(state): State<AppState>,
    session: Session,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<EntryInput>, JsonRejection>,
) -> AppResult<Json<FoodEntry>> {
    let Path(id) = path?;
    let Json(input) = payload?;
    let entry = services::update_entry(state.entries.as_ref(), &session, id, input).await?;
    Ok(Json(entry))
}

/// DELETE /entries/:id?confirm=true
#[instrument(skip(state))]
pub async fn delete_entry(
    State(state): State<AppState>,
    session: Session,
    path: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<DeleteParams>, QueryRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = path?;
    let Query(params) = query?;
    services::delete_entry(state.entries.as_ref(), &session, id, params.confirm).await?;
    Ok(StatusCode::NO_CONTENT)
}
