use time::Date;
use tracing::info;
use uuid::Uuid;

use super::{
    daily::{self, Progress},
    dto::{DailySummary, EntryInput},
    repo::{EntryStore, FoodEntry},
    validation::validate_entry,
};
use crate::{
    auth::Session,
    error::{AppError, AppResult},
};

/// Validates before touching storage; `entry_date` is always `today`.
pub async fn create_entry(
    store: &dyn EntryStore,
    session: &Session,
    today: Date,
    input: EntryInput,
) -> AppResult<FoodEntry> {
    let fields = validate_entry(input)?;
    let entry = store.create(session.user_id, today, &fields).await?;
    info!(entry_id = %entry.id, calories = entry.calories, "entry created");
    Ok(entry)
}

pub async fn update_entry(
    store: &dyn EntryStore,
    session: &Session,
    id: Uuid,
    input: EntryInput,
) -> AppResult<FoodEntry> {
    let fields = validate_entry(input)?;
    let entry = store
        .update(session.user_id, id, &fields)
        .await?
        .ok_or(AppError::NotFound("Entry"))?;
    info!(entry_id = %entry.id, calories = entry.calories, "entry updated");
    Ok(entry)
}

/// `confirmed` is the caller's explicit go-ahead; without it nothing is deleted.
pub async fn delete_entry(
    store: &dyn EntryStore,
    session: &Session,
    id: Uuid,
    confirmed: bool,
) -> AppResult<()> {
    if !confirmed {
        return Err(AppError::validation("Deletion must be confirmed"));
    }
    if !store.delete(session.user_id, id).await? {
        return Err(AppError::NotFound("Entry"));
    }
    info!(entry_id = %id, "entry deleted");
    Ok(())
}

pub async fn get_entry(store: &dyn EntryStore, session: &Session, id: Uuid) -> AppResult<FoodEntry> {
    store
        .get(session.user_id, id)
        .await?
        .ok_or(AppError::NotFound("Entry"))
}

pub async fn entries_for_day(
    store: &dyn EntryStore,
    session: &Session,
    day: Date,
) -> AppResult<Vec<FoodEntry>> {
    Ok(store.list_for_date(session.user_id, day).await?)
}

pub async fn daily_summary(
    store: &dyn EntryStore,
    session: &Session,
    day: Date,
    goal: i64,
) -> AppResult<DailySummary> {
    let entries = entries_for_day(store, session, day).await?;
    let total = daily::total(&entries);
    Ok(DailySummary {
        date: day,
        goal,
        total,
        progress: Progress::compute(total, goal),
        entries,
    })
}
