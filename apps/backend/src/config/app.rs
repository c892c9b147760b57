//! Process configuration, read once from the environment at startup.

use std::fmt;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::auth::FIXED_SESSION_DURATION;
use crate::error::AppError;
use crate::gateway::client::DEFAULT_UPSTREAM_TIMEOUT;
use crate::gateway::endpoints::{DEFAULT_MODEL_REGISTRY_BASE, DEFAULT_PIPELINE_BASE};
use crate::gateway::UpstreamEndpoints;
use crate::middleware::cors::parse_origins;
use crate::state::model_selection::DEFAULT_MODEL;

/// Minimum length of `GATEWAY_TOKEN_SECRET`.
pub const MIN_SECRET_LEN: usize = 32;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;
pub const DEFAULT_PROMPT_PATH: &str = "./data/default_prompt.txt";

/// Upper bound for `GATEWAY_SESSION_TTL_SECS`: one year.
pub const MAX_SESSION_TTL_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,

    pub token_secret: String,
    pub session_ttl: Duration,

    pub endpoints: UpstreamEndpoints,
    pub upstream_timeout: Duration,
    pub default_model: String,
    pub default_prompt_path: PathBuf,

    // Seeded administrator
    pub admin_name: String,
    pub admin_email: String,
    pub admin_password: String,

    pub max_upload_bytes: usize,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let must_var = |name: &str| {
            var(name).ok_or_else(|| {
                AppError::config(format!("Required environment variable '{name}' is not set"))
            })
        };

        let token_secret = must_var("GATEWAY_TOKEN_SECRET")?;
        if token_secret.len() < MIN_SECRET_LEN {
            return Err(AppError::config(format!(
                "GATEWAY_TOKEN_SECRET is too short. It should be at least {MIN_SECRET_LEN} characters."
            )));
        }

        let endpoints = UpstreamEndpoints::parse(
            &var("PIPELINE_BASE_URL").unwrap_or_else(|| DEFAULT_PIPELINE_BASE.to_string()),
            &var("MODEL_REGISTRY_URL").unwrap_or_else(|| DEFAULT_MODEL_REGISTRY_BASE.to_string()),
        )
        .map_err(|e| AppError::config(e.to_string()))?;

        Ok(Config {
            host: var("GATEWAY_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parsed(&var, "GATEWAY_PORT", 8080)?,
            token_secret,
            session_ttl: Duration::from_secs(in_range(
                "GATEWAY_SESSION_TTL_SECS",
                parsed(&var, "GATEWAY_SESSION_TTL_SECS", FIXED_SESSION_DURATION.as_secs())?,
                1..=MAX_SESSION_TTL_SECS,
            )?),
            endpoints,
            upstream_timeout: Duration::from_secs(in_range(
                "UPSTREAM_TIMEOUT_SECS",
                parsed(&var, "UPSTREAM_TIMEOUT_SECS", DEFAULT_UPSTREAM_TIMEOUT.as_secs())?,
                1..=u64::MAX,
            )?),
            default_model: var("DEFAULT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            default_prompt_path: var("DEFAULT_PROMPT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PROMPT_PATH)),
            admin_name: var("ADMIN_NAME").unwrap_or_else(|| "Admin".to_string()),
            admin_email: must_var("ADMIN_EMAIL")?,
            admin_password: must_var("ADMIN_PASSWORD")?,
            max_upload_bytes: parsed(&var, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .unwrap_or_default(),
        })
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn parsed<T, F>(var: &F, name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("{name} must be a number, got '{raw}': {e}"))),
    }
}

fn in_range(name: &str, value: u64, range: RangeInclusive<u64>) -> Result<u64, AppError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(AppError::config(format!(
            "{name} must be between {} and {}, got {value}",
            range.start(),
            range.end()
        )))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("token_secret", &"[redacted]")
            .field("session_ttl", &self.session_ttl)
            .field("endpoints", &self.endpoints)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("default_model", &self.default_model)
            .field("default_prompt_path", &self.default_prompt_path)
            .field("admin_name", &self.admin_name)
            .field("admin_email", &self.admin_email)
            .field("admin_password", &"[redacted]")
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serial_test::serial;

    use super::*;
    use crate::errors::ErrorCode;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn minimal() -> Vec<(&'static str, &'static str)> {
        vec![
            ("GATEWAY_TOKEN_SECRET", SECRET),
            ("ADMIN_EMAIL", "admin@example.test"),
            ("ADMIN_PASSWORD", "changeme"),
        ]
    }

    #[test]
    fn defaults_from_minimal_env() {
        let config = Config::from_lookup(lookup(&minimal())).unwrap();
        assert_eq!(config.bind_addr(), ("0.0.0.0".to_string(), 8080));
        assert_eq!(config.session_ttl, Duration::from_secs(7200));
        assert_eq!(config.upstream_timeout, Duration::from_secs(1200));
        assert_eq!(config.default_model, "gemma3:12b");
        assert_eq!(config.admin_name, "Admin");
        assert_eq!(config.max_upload_bytes, 200 * 1024 * 1024);
        assert_eq!(
            config.endpoints.pipeline_base.as_str(),
            "http://ml_pipeline:3030/"
        );
        assert!(config.cors_allowed_origins.is_empty());
    }

    #[test]
    fn short_secret_is_rejected() {
        let mut vars = minimal();
        vars[0] = ("GATEWAY_TOKEN_SECRET", "short");
        let err = Config::from_lookup(lookup(&vars)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ConfigError);
    }

    #[test]
    fn missing_admin_is_rejected() {
        let err = Config::from_lookup(lookup(&[("GATEWAY_TOKEN_SECRET", SECRET)])).unwrap_err();
        assert!(err.detail().contains("ADMIN_EMAIL"));
    }

    #[test]
    fn bad_numbers_and_urls_are_rejected() {
        let mut vars = minimal();
        vars.push(("GATEWAY_PORT", "eighty"));
        assert!(Config::from_lookup(lookup(&vars)).is_err());

        let mut vars = minimal();
        vars.push(("PIPELINE_BASE_URL", "not a url"));
        assert!(Config::from_lookup(lookup(&vars)).is_err());
    }

    #[test]
    fn out_of_range_durations_are_rejected() {
        for (name, value) in [
            ("GATEWAY_SESSION_TTL_SECS", "0"),
            ("GATEWAY_SESSION_TTL_SECS", "18446744073709551615"),
            ("GATEWAY_SESSION_TTL_SECS", "31536001"),
            ("UPSTREAM_TIMEOUT_SECS", "0"),
        ] {
            let mut vars = minimal();
            vars.push((name, value));
            let err = Config::from_lookup(lookup(&vars)).unwrap_err();
            assert_eq!(err.code(), ErrorCode::ConfigError, "{name}={value}");
            assert!(err.detail().contains(name));
        }

        let mut vars = minimal();
        vars.push(("GATEWAY_SESSION_TTL_SECS", "31536000"));
        vars.push(("UPSTREAM_TIMEOUT_SECS", "1"));
        let config = Config::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.session_ttl, Duration::from_secs(MAX_SESSION_TTL_SECS));
        assert_eq!(config.upstream_timeout, Duration::from_secs(1));
    }

    #[test]
    fn debug_hides_secrets() {
        let rendered = format!("{:?}", Config::from_lookup(lookup(&minimal())).unwrap());
        assert!(!rendered.contains(SECRET));
        assert!(!rendered.contains("changeme"));
    }

    #[test]
    #[serial]
    fn from_env_reads_process_environment() {
        for (k, v) in minimal() {
            std::env::set_var(k, v);
        }
        std::env::set_var("DEFAULT_MODEL", "llama3:8b");

        let config = Config::from_env().unwrap();
        assert_eq!(config.default_model, "llama3:8b");

        std::env::remove_var("DEFAULT_MODEL");
        for (k, _) in minimal() {
            std::env::remove_var(k);
        }
    }
}
