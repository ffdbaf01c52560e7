use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Quick pick that pre-fills the add form.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Suggestion {
    pub name: &'static str,
    pub quantity: &'static str,
    pub emoji: &'static str,
}

const fn dish(name: &'static str, quantity: &'static str, emoji: &'static str) -> Suggestion {
    Suggestion {
        name,
        quantity,
        emoji,
    }
}

pub const KERALA_DISHES: [Suggestion; 12] = [
    dish("Puttu", "1 cup", "🍚"),
    dish("Appam", "2 pieces", "🥞"),
    dish("Idiyappam", "1 serving", "🍜"),
    dish("Kerala Parotta", "1 piece", "🫓"),
    dish("Matta Rice", "1 cup cooked", "🍚"),
    dish("Avial", "1 katori", "🥗"),
    dish("Sambar", "1 bowl", "🍲"),
    dish("Fish Curry", "1 serving", "🐟"),
    dish("Chicken Curry", "1 serving", "🍗"),
    dish("Beef Fry", "1 serving", "🥩"),
    dish("Payasam", "1 small bowl", "🍮"),
    dish("Banana Chips", "25g", "🍌"),
];

pub fn router() -> Router<AppState> {
    Router::new().route("/suggestions", get(list_suggestions))
}

async fn list_suggestions() -> Json<&'static [Suggestion]> {
    Json(&KERALA_DISHES)
}
