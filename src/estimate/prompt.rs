use serde_json::{json, Value};

/// Function the provider is forced to call.
pub const TOOL_NAME: &str = "estimate_calories";

pub const SYSTEM_PROMPT: &str = "\
You are a nutrition expert with deep knowledge of Indian cuisine, especially Kerala dishes.
Your task is to estimate calories for foods based on their name and quantity.

For Kerala dishes, be familiar with:
- Rice dishes: Puttu, Appam, Idiyappam, Kanji, Matta rice
- Curries: Avial, Olan, Thoran, Erissery, Sambar, Rasam
- Snacks: Unniyappam, Achappam, Pazham pori, Parippu vada, Ethakka appam
- Breakfast: Idli, Dosa, Upma, Poori
- Meat dishes: Chicken curry, Fish curry, Beef fry, Prawn roast
- Side dishes: Coconut chutney, Sambar, Pachadi, Pickle
- Desserts: Payasam (various types), Ada pradhaman, Palada payasam

Provide specific portion guidance like:
- For rice: \"1 cup cooked\" instead of just \"1 serving\"
- For curry: \"1 medium katori\" or \"150ml\"
- For snacks: \"1 piece (medium size)\" or \"2 small pieces\"";

pub fn user_prompt(food: &str, quantity: &str) -> String {
    format!(
        "Estimate the calories for: {food}, quantity: {quantity}

Provide your response with:
1. The estimated calorie count
2. Your confidence level (high/medium/low)
3. A better portion description if the quantity is vague

Be precise about Kerala dishes and provide accurate calorie estimates based on typical cooking methods."
    )
}

/// JSON schema of the `estimate_calories` arguments. No extra properties.
pub fn tool_parameters() -> Value {
    json!({
        "type": "object",
        "properties": {
            "estimatedCalories": {
                "type": "number",
                "description": "Estimated calories as a number"
            },
            "confidence": {
                "type": "string",
                "enum": ["high", "medium", "low"],
                "description": "Confidence level of the estimate"
            },
            "portionSuggestion": {
                "type": "string",
                "description": "Better description of the portion size"
            }
        },
        "required": ["estimatedCalories", "confidence", "portionSuggestion"],
        "additionalProperties": false
    })
}
