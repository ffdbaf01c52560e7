use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FoodEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub quantity: String,
    pub calories: i32,
    pub entry_date: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The mutable part of an entry, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFields {
    pub name: String,
    pub quantity: String,
    pub calories: i32,
}

/// Food entry persistence. Every call is scoped to `owner`; rows belonging
/// to other users are invisible.
#[async_trait]
pub trait EntryStore: Send + Sync {
    async fn create(
        &self,
        owner: Uuid,
        entry_date: Date,
        fields: &EntryFields,
    ) -> anyhow::Result<FoodEntry>;

    /// Newest first.
    async fn list_for_date(&self, owner: Uuid, date: Date) -> anyhow::Result<Vec<FoodEntry>>;

    async fn get(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<FoodEntry>>;

    /// `None` when no such entry exists for `owner`.
    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        fields: &EntryFields,
    ) -> anyhow::Result<Option<FoodEntry>>;

    /// `false` when no such entry exists for `owner`.
    async fn delete(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgEntryStore {
    db: PgPool,
}

impl PgEntryStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EntryStore for PgEntryStore {
    async fn create(
        &self,
        owner: Uuid,
        entry_date: Date,
        fields: &EntryFields,
    ) -> anyhow::Result<FoodEntry> {
        sqlx::query_as::<_, FoodEntry>(
            r#"
            INSERT INTO food_entries (user_id, name, quantity, calories, entry_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, name, quantity, calories, entry_date, created_at
            "#,
        )
        .bind(owner)
        .bind(&fields.name)
        .bind(&fields.quantity)
        .bind(fields.calories)
        .bind(entry_date)
        .fetch_one(&self.db)
        .await
        .context("insert food entry")
    }

    async fn list_for_date(&self, owner: Uuid, date: Date) -> anyhow::Result<Vec<FoodEntry>> {
        sqlx::query_as::<_, FoodEntry>(
            r#"
            SELECT id, user_id, name, quantity, calories, entry_date, created_at
            FROM food_entries
            WHERE user_id = $1 AND entry_date = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner)
        .bind(date)
        .fetch_all(&self.db)
        .await
        .context("list food entries")
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<FoodEntry>> {
        sqlx::query_as::<_, FoodEntry>(
            r#"
            SELECT id, user_id, name, quantity, calories, entry_date, created_at
            FROM food_entries
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await
        .context("get food entry")
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        fields: &EntryFields,
    ) -> anyhow::Result<Option<FoodEntry>> {
        sqlx::query_as::<_, FoodEntry>(
            r#"
            UPDATE food_entries
               SET name = $3, quantity = $4, calories = $5
             WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, quantity, calories, entry_date, created_at
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(&fields.name)
        .bind(&fields.quantity)
        .bind(fields.calories)
        .fetch_optional(&self.db)
        .await
        .context("update food entry")
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM food_entries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.db)
            .await
            .context("delete food entry")?;
        Ok(res.rows_affected() > 0)
    }
}
