use serde_json::Value;

use super::{dto::EntryInput, repo::EntryFields};
use crate::error::{AppError, AppResult};

pub fn validate_entry(input: EntryInput) -> AppResult<EntryFields> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Food name is required"));
    }
    let quantity = input.quantity.trim();
    if quantity.is_empty() {
        return Err(AppError::validation("Quantity is required"));
    }
    let calories = parse_calories(&input.calories)?;

    Ok(EntryFields {
        name: name.to_string(),
        quantity: quantity.to_string(),
        calories,
    })
}

fn parse_calories(raw: &Value) -> AppResult<i32> {
    let value = match raw {
        Value::Null => return Err(AppError::validation("Calories are required")),
        Value::Number(n) => n.as_i64(),
        Value::String(s) if s.trim().is_empty() => {
            return Err(AppError::validation("Calories are required"))
        }
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| AppError::validation("Calories must be a whole number"))?;

    if value < 0 {
        return Err(AppError::validation("Calories cannot be negative"));
    }
    i32::try_from(value).map_err(|_| AppError::validation("Calories are out of range"))
}
