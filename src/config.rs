use serde::Deserialize;

pub const DEFAULT_DAILY_GOAL: i64 = 2000;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// Chat-completion provider used for calorie estimates.
#[derive(Debug, Clone, Deserialize)]
pub struct EstimatorConfig {
    /// Missing key is reported per request, not at startup.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl EstimatorConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.timeout_secs > 0, "AI_TIMEOUT_SECS must be positive");
        Ok(())
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://ai.gateway.lovable.dev/v1".into(),
            model: "google/gemini-2.5-flash".into(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub estimator: EstimatorConfig,
    pub daily_goal: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "calorietrack".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "calorietrack-users".into()),
            ttl_minutes: parse_env("JWT_TTL_MINUTES").unwrap_or(60),
            refresh_ttl_minutes: parse_env("JWT_REFRESH_TTL_MINUTES").unwrap_or(60 * 24 * 14),
        };

        let defaults = EstimatorConfig::default();
        let estimator = EstimatorConfig {
            api_key: std::env::var("AI_GATEWAY_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            base_url: std::env::var("AI_GATEWAY_URL").unwrap_or(defaults.base_url),
            model: std::env::var("AI_MODEL").unwrap_or(defaults.model),
            timeout_secs: parse_env("AI_TIMEOUT_SECS").unwrap_or(defaults.timeout_secs),
        };
        estimator.validate()?;

        let daily_goal = parse_env("DAILY_CALORIE_GOAL").unwrap_or(DEFAULT_DAILY_GOAL);
        anyhow::ensure!(daily_goal > 0, "DAILY_CALORIE_GOAL must be positive");

        Ok(Self {
            database_url,
            jwt,
            estimator,
            daily_goal,
        })
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}
