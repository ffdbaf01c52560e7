use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use super::{
    dto::{CalorieEstimate, Confidence},
    prompt::{tool_parameters, user_prompt, SYSTEM_PROMPT, TOOL_NAME},
};
use crate::{
    config::EstimatorConfig,
    error::{AppError, AppResult},
};

// ---- chat-completion wire format ----

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    tools: Vec<Tool>,
    tool_choice: ToolChoice,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct Tool {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: ToolFunction,
}

#[derive(Debug, Serialize)]
struct ToolFunction {
    name: &'static str,
    description: &'static str,
    parameters: Value,
}

#[derive(Debug, Serialize)]
struct ToolChoice {
    #[serde(rename = "type")]
    choice_type: &'static str,
    function: ToolChoiceFunction,
}

#[derive(Debug, Serialize)]
struct ToolChoiceFunction {
    name: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    function: FunctionCall,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    #[serde(default)]
    name: Option<String>,
    /// A JSON string per the OpenAI format; some gateways send an object.
    arguments: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EstimateArguments {
    estimated_calories: f64,
    confidence: Confidence,
    portion_suggestion: String,
}

// ---- estimator ----

/// Calorie estimation through a chat-completion provider.
///
/// One outbound request per call. No retries and no caching.
pub struct CalorieEstimator {
    http: reqwest::Client,
    config: EstimatorConfig,
}

impl CalorieEstimator {
    pub fn new(config: EstimatorConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("build AI gateway http client")?;
        Ok(Self { http, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    #[instrument(skip(self), fields(model = %self.config.model))]
    pub async fn estimate(&self, food: &str, quantity: &str) -> AppResult<CalorieEstimate> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(AppError::Configuration("AI_GATEWAY_API_KEY"))?;

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt(food, quantity),
                },
            ],
            tools: vec![Tool {
                tool_type: "function",
                function: ToolFunction {
                    name: TOOL_NAME,
                    description: "Return calorie estimation with portion details",
                    parameters: tool_parameters(),
                },
            }],
            tool_choice: ToolChoice {
                choice_type: "function",
                function: ToolChoiceFunction { name: TOOL_NAME },
            },
        };

        info!("requesting calorie estimate");
        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "AI gateway unreachable");
                AppError::Upstream { status: None }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(error = %e, %status, "failed to read AI gateway response");
            AppError::Upstream {
                status: Some(status.as_u16()),
            }
        })?;

        if !status.is_success() {
            error!(%status, body = %truncate(&body, 500), "AI gateway error");
            return Err(match status.as_u16() {
                429 => AppError::RateLimited,
                402 => AppError::QuotaExhausted,
                code => AppError::Upstream { status: Some(code) },
            });
        }

        debug!(bytes = body.len(), "AI gateway response received");
        let args = parse_tool_arguments(&body)?;
        let estimate = into_estimate(food, quantity, args);
        info!(
            calories = estimate.estimated_calories,
            confidence = ?estimate.confidence,
            "calorie estimate ready"
        );
        Ok(estimate)
    }
}

fn parse_tool_arguments(body: &str) -> AppResult<EstimateArguments> {
    let malformed = |what: &str| {
        warn!(body = %truncate(body, 500), "{what}");
        AppError::MalformedUpstreamResponse(what.to_string())
    };

    let response: ChatResponse =
        serde_json::from_str(body).map_err(|_| malformed("response is not a chat completion"))?;

    let call = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.tool_calls)
        .and_then(|calls| calls.into_iter().next())
        .ok_or_else(|| malformed("no tool call in response"))?;

    if call.function.name.as_deref().is_some_and(|n| n != TOOL_NAME) {
        return Err(malformed("unexpected tool call"));
    }

    let parsed = match call.function.arguments {
        Value::String(raw) => serde_json::from_str::<EstimateArguments>(&raw),
        other => serde_json::from_value::<EstimateArguments>(other),
    };
    let args = parsed.map_err(|_| malformed("tool arguments do not match schema"))?;

    if !args.estimated_calories.is_finite() {
        return Err(malformed("estimatedCalories is not a number"));
    }
    Ok(args)
}

/// Rounds the calorie count and makes the suggested portion the quantity.
fn into_estimate(food: &str, quantity: &str, args: EstimateArguments) -> CalorieEstimate {
    let portion = match args.portion_suggestion.trim() {
        "" => quantity.trim().to_string(),
        p => p.to_string(),
    };
    CalorieEstimate {
        food: food.to_string(),
        quantity: portion.clone(),
        estimated_calories: args.estimated_calories.round().max(0.0) as i64,
        confidence: args.confidence,
        portion_suggestion: portion,
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
