use std::str::FromStr;

use serde::Deserialize;

use crate::recognition::fallback::FallbackPolicy;
use crate::user::UserIdPolicy;

pub const DEFAULT_SPOONACULAR_BASE_URL: &str = "https://api.spoonacular.com";

#[derive(Debug, Clone, Deserialize)]
pub struct RecognitionConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub fallback: FallbackPolicy,
}

/// Origins allowed by the CORS layer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum AllowedOrigins {
    Any,
    List(Vec<String>),
}

impl FromStr for AllowedOrigins {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "*" {
            return Ok(Self::Any);
        }
        let origins: Vec<String> = s
            .split(',')
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();
        if origins.iter().any(|o| o == "*") {
            anyhow::bail!("'*' cannot be combined with explicit origins");
        }
        Ok(Self::List(origins))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub recognition: RecognitionConfig,
    pub cors_origins: AllowedOrigins,
    pub user_ids: UserIdPolicy,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("APP_PORT") {
            Some(v) => v
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("invalid APP_PORT '{}': {}", v, e))?,
            None => 8080,
        };

        let fallback = match var("RECOGNITION_FALLBACK") {
            Some(v) => v.parse::<FallbackPolicy>()?,
            None => FallbackPolicy::MockPayload,
        };

        let require_user_id = var("REQUIRE_USER_ID")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        let user_ids = if require_user_id {
            UserIdPolicy::Required
        } else {
            UserIdPolicy::Default(var("DEFAULT_USER_ID").unwrap_or_else(|| "default_user".into()))
        };

        Ok(Self {
            host: var("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            database_url: var("DATABASE_URL"),
            recognition: RecognitionConfig {
                base_url: var("SPOONACULAR_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_SPOONACULAR_BASE_URL.into()),
                api_key: var("SPOONACULAR_API_KEY"),
                fallback,
            },
            cors_origins: var("CORS_ALLOWED_ORIGINS")
                .map(|v| v.parse::<AllowedOrigins>())
                .transpose()?
                .unwrap_or(AllowedOrigins::Any),
            user_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let cfg = config_from(&[]).unwrap();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 8080);
        assert!(cfg.database_url.is_none());
        assert_eq!(cfg.recognition.base_url, DEFAULT_SPOONACULAR_BASE_URL);
        assert!(cfg.recognition.api_key.is_none());
        assert_eq!(cfg.recognition.fallback, FallbackPolicy::MockPayload);
        assert_eq!(cfg.cors_origins, AllowedOrigins::Any);
        assert_eq!(cfg.user_ids, UserIdPolicy::Default("default_user".into()));
    }

    #[test]
    fn reads_overrides() {
        let cfg = config_from(&[
            ("APP_PORT", "9000"),
            ("DATABASE_URL", "postgres://localhost/nutrition"),
            ("SPOONACULAR_API_KEY", "key"),
            ("RECOGNITION_FALLBACK", "off"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test"),
            ("REQUIRE_USER_ID", "true"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/nutrition"));
        assert_eq!(cfg.recognition.api_key.as_deref(), Some("key"));
        assert_eq!(cfg.recognition.fallback, FallbackPolicy::Surface);
        assert_eq!(
            cfg.cors_origins,
            AllowedOrigins::List(vec!["http://a.test".into(), "http://b.test".into()])
        );
        assert_eq!(cfg.user_ids, UserIdPolicy::Required);
    }

    #[test]
    fn custom_sentinel_user() {
        let cfg = config_from(&[("DEFAULT_USER_ID", "kiosk")]).unwrap();
        assert_eq!(cfg.user_ids, UserIdPolicy::Default("kiosk".into()));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(config_from(&[("APP_PORT", "not-a-port")]).is_err());
        assert!(config_from(&[("RECOGNITION_FALLBACK", "sometimes")]).is_err());
        assert!(config_from(&[("CORS_ALLOWED_ORIGINS", "*,http://a.test")]).is_err());
    }
}
