use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::repo::{EntryFields, EntryStore, FoodEntry};

/// In-process [`EntryStore`] for tests. Counts every call so tests can prove
/// that rejected input never reached storage.
#[derive(Default)]
pub struct MemoryEntryStore {
    rows: Mutex<Vec<FoodEntry>>,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make every subsequent call fail like an unreachable database.
    pub fn fail_all(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn enter(&self) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("connection refused");
        }
        Ok(())
    }
}

#[async_trait]
impl EntryStore for MemoryEntryStore {
    async fn create(
        &self,
        owner: Uuid,
        entry_date: Date,
        fields: &EntryFields,
    ) -> anyhow::Result<FoodEntry> {
        self.enter()?;
        let entry = FoodEntry {
            id: Uuid::new_v4(),
            user_id: owner,
            name: fields.name.clone(),
            quantity: fields.quantity.clone(),
            calories: fields.calories,
            entry_date,
            created_at: OffsetDateTime::now_utc(),
        };
        self.rows.lock().unwrap().push(entry.clone());
        Ok(entry)
    }

    async fn list_for_date(&self, owner: Uuid, date: Date) -> anyhow::Result<Vec<FoodEntry>> {
        self.enter()?;
        // Reverse insertion order first so equal timestamps still list newest first.
        let mut out: Vec<FoodEntry> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|e| e.user_id == owner && e.entry_date == date)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<FoodEntry>> {
        self.enter()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id && e.user_id == owner)
            .cloned())
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        fields: &EntryFields,
    ) -> anyhow::Result<Option<FoodEntry>> {
        self.enter()?;
        let mut rows = self.rows.lock().unwrap();
        let Some(entry) = rows.iter_mut().find(|e| e.id == id && e.user_id == owner) else {
            return Ok(None);
        };
        entry.name = fields.name.clone();
        entry.quantity = fields.quantity.clone();
        entry.calories = fields.calories;
        Ok(Some(entry.clone()))
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool> {
        self.enter()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|e| !(e.id == id && e.user_id == owner));
        Ok(rows.len() < before)
    }
}
