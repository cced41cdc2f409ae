use std::time::Duration;

use anyhow::Context;

const DEFAULT_API_BASE: &str = "/api";
const DEFAULT_ORIGIN: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct Config {
    /// Fully resolved API base, e.g. `http://localhost:8000/api`. No trailing slash.
    pub api_base_url: String,
    /// Total per-request timeout.
    /// Set via TASKBOARD_REQUEST_TIMEOUT_SECS env var. Default: 30.
    pub request_timeout: Duration,
    /// Set via TASKBOARD_CONNECT_TIMEOUT_SECS env var. Default: 5.
    pub connect_timeout: Duration,
}

impl Config {
    /// Config pointing at an absolute base URL with default timeouts.
    pub fn with_base_url(base: impl Into<String>) -> Self {
        Self {
            api_base_url: base.into().trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();

    let base = std::env::var("TASKBOARD_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE.into());
    let origin = std::env::var("TASKBOARD_ORIGIN").unwrap_or_else(|_| DEFAULT_ORIGIN.into());

    Ok(Config {
        api_base_url: resolve_base(&base, &origin)?,
        request_timeout: Duration::from_secs(
            std::env::var("TASKBOARD_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        ),
        connect_timeout: Duration::from_secs(
            std::env::var("TASKBOARD_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
        ),
    })
}

/// Resolve a possibly relative API base (`/api`) against an origin.
fn resolve_base(base: &str, origin: &str) -> anyhow::Result<String> {
    let resolved = if base.starts_with("http://") || base.starts_with("https://") {
        url::Url::parse(base).with_context(|| format!("invalid TASKBOARD_API_BASE_URL: {}", base))?
    } else {
        url::Url::parse(origin)
            .with_context(|| format!("invalid TASKBOARD_ORIGIN: {}", origin))?
            .join(base)
            .with_context(|| format!("cannot resolve {} against {}", base, origin))?
    };

    if resolved.cannot_be_a_base() {
        anyhow::bail!("API base must be a hierarchical http(s) URL, got {}", resolved);
    }

    Ok(resolved.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_base_resolves_against_origin() {
        let base = resolve_base("/api", "http://localhost:8000").unwrap();
        assert_eq!(base, "http://localhost:8000/api");
    }

    #[test]
    fn test_absolute_base_is_kept() {
        let base = resolve_base("https://tasks.example.com/v2/", "http://ignored").unwrap();
        assert_eq!(base, "https://tasks.example.com/v2");
    }

    #[test]
    fn test_invalid_origin_is_rejected() {
        assert!(resolve_base("/api", "not a url").is_err());
    }

    #[test]
    fn test_with_base_url_trims_slash() {
        let cfg = Config::with_base_url("http://127.0.0.1:9999/api/");
        assert_eq!(cfg.api_base_url, "http://127.0.0.1:9999/api");
        assert_eq!(cfg.connect_timeout, Duration::from_secs(5));
    }
}
