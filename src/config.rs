// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honored for local development. Secrets (the JWT signing
//! key) are injected as environment variables by the deployment.

use std::env;
use std::str::FromStr;

/// Which profile store backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Google Cloud Firestore (or its emulator)
    Firestore,
    /// Process-local store, for local development
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firestore" => Ok(StoreBackend::Firestore),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(ConfigError::Invalid("STORE_BACKEND", other.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Profile store backend
    pub store_backend: StoreBackend,

    // --- Reward rules ---
    /// Exact decoded text of the dustbin QR code
    pub expected_qr_content: String,
    /// Points credited per accepted scan
    pub points_per_scan: u64,
    /// Points granted at registration
    pub welcome_bonus: u64,
    /// Minimum time between credited scans of the same code
    pub scan_cooldown: chrono::Duration,

    // --- Sessions ---
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Session lifetime
    pub session_ttl: chrono::Duration,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            store_backend: StoreBackend::Memory,
            expected_qr_content: "https://qrco.de/bgBWbc".to_string(),
            points_per_scan: 1000,
            welcome_bonus: 100,
            scan_cooldown: chrono::Duration::minutes(5),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            session_ttl: chrono::Duration::days(30),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from a variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cooldown_secs: u64 = parse_or(&lookup, "SCAN_COOLDOWN_SECS", 300)?;
        let ttl_hours: u64 = parse_or(&lookup, "SESSION_TTL_HOURS", 24 * 30)?;

        Ok(Self {
            frontend_url: lookup("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:5173".to_string()),
            gcp_project_id: lookup("GCP_PROJECT_ID").unwrap_or_else(|| "local-dev".to_string()),
            port: parse_or(&lookup, "PORT", 8080)?,
            store_backend: lookup("STORE_BACKEND")
                .map(|v| v.parse())
                .unwrap_or(Ok(StoreBackend::Firestore))?,

            expected_qr_content: lookup("EXPECTED_QR_CONTENT")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing("EXPECTED_QR_CONTENT"))?,
            points_per_scan: parse_points(&lookup, "POINTS_PER_SCAN", 1000)?,
            welcome_bonus: parse_points(&lookup, "WELCOME_BONUS", 100)?,
            scan_cooldown: i64::try_from(cooldown_secs)
                .ok()
                .and_then(chrono::Duration::try_seconds)
                .ok_or_else(|| {
                    ConfigError::Invalid("SCAN_COOLDOWN_SECS", cooldown_secs.to_string())
                })?,

            jwt_signing_key: lookup("JWT_SIGNING_KEY")
                .ok_or(ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            session_ttl: i64::try_from(ttl_hours)
                .ok()
                .and_then(chrono::Duration::try_hours)
                .ok_or_else(|| ConfigError::Invalid("SESSION_TTL_HOURS", ttl_hours.to_string()))?,
        })
    }
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        None => Ok(default),
    }
}

/// Point amounts are recorded as signed history deltas, so they must fit in `i64`.
fn parse_points<F>(lookup: &F, name: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let points: u64 = parse_or(lookup, name, default)?;
    if i64::try_from(points).is_err() {
        return Err(ConfigError::Invalid(name, points.to_string()));
    }
    Ok(points)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");
        env::set_var("EXPECTED_QR_CONTENT", " https://qrco.de/bgBWbc ");
        env::set_var("STORE_BACKEND", "memory");
        env::set_var("SCAN_COOLDOWN_SECS", "120");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.expected_qr_content, "https://qrco.de/bgBWbc");
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.scan_cooldown, chrono::Duration::seconds(120));
        assert_eq!(config.points_per_scan, 1000);
        assert_eq!(config.welcome_bonus, 100);
        assert_eq!(config.port, 8080);
    }

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!"),
        ("EXPECTED_QR_CONTENT", "https://qrco.de/bgBWbc"),
    ];

    fn load_with(extra: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let mut vars: Vec<(&str, &str)> = REQUIRED.to_vec();
        vars.extend_from_slice(extra);
        Config::from_lookup(lookup_from(&vars))
    }

    #[test]
    fn test_config_defaults_from_lookup() {
        let config = load_with(&[]).unwrap();
        assert_eq!(config.scan_cooldown, chrono::Duration::minutes(5));
        assert_eq!(config.session_ttl, chrono::Duration::days(30));
        assert_eq!(config.store_backend, StoreBackend::Firestore);
    }

    #[test]
    fn test_config_missing_required() {
        let err = Config::from_lookup(lookup_from(&[REQUIRED[0]])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("EXPECTED_QR_CONTENT")));

        let err = Config::from_lookup(lookup_from(&[REQUIRED[1]])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SIGNING_KEY")));
    }

    #[test]
    fn test_config_negative_cooldown_rejected() {
        let err = load_with(&[("SCAN_COOLDOWN_SECS", "-300")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("SCAN_COOLDOWN_SECS", _)));
    }

    #[test]
    fn test_config_out_of_range_durations_rejected() {
        let err = load_with(&[("SESSION_TTL_HOURS", "9223372036854775807")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("SESSION_TTL_HOURS", _)));

        let err = load_with(&[("SCAN_COOLDOWN_SECS", "18446744073709551615")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("SCAN_COOLDOWN_SECS", _)));

        let err = load_with(&[("SESSION_TTL_HOURS", "-1")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("SESSION_TTL_HOURS", _)));
    }

    #[test]
    fn test_config_points_must_fit_history_delta() {
        let err = load_with(&[("POINTS_PER_SCAN", "9223372036854775808")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("POINTS_PER_SCAN", _)));

        let err = load_with(&[("WELCOME_BONUS", "-5")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("WELCOME_BONUS", _)));

        let config = load_with(&[("POINTS_PER_SCAN", "9223372036854775807")]).unwrap();
        assert_eq!(config.points_per_scan, i64::MAX as u64);
    }

    #[test]
    fn test_config_zero_cooldown_allowed() {
        let config = load_with(&[("SCAN_COOLDOWN_SECS", "0")]).unwrap();
        assert_eq!(config.scan_cooldown, chrono::Duration::zero());
    }

    #[test]
    fn test_store_backend_parse() {
        assert_eq!(
            "Firestore".parse::<StoreBackend>().unwrap(),
            StoreBackend::Firestore
        );
        assert!(matches!(
            "redis".parse::<StoreBackend>(),
            Err(ConfigError::Invalid("STORE_BACKEND", _))
        ));
    }
}
