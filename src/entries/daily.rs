use serde::Serialize;

use super::repo::FoodEntry;

/// Sum of calories over whatever entries the caller fetched.
pub fn total(entries: &[FoodEntry]) -> i64 {
    entries.iter().map(|e| i64::from(e.calories)).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    /// 0..=100
    pub percentage: f64,
    pub remaining: i64,
    pub reached: bool,
}

impl Progress {
    /// A non-positive goal counts as already reached.
    pub fn compute(total: i64, goal: i64) -> Self {
        if goal <= 0 {
            return Self {
                percentage: 100.0,
                remaining: 0,
                reached: true,
            };
        }
        let percentage = (100.0 * total as f64 / goal as f64).clamp(0.0, 100.0);
        Self {
            percentage,
            remaining: (goal - total).max(0),
            reached: total >= goal,
        }
    }
}
