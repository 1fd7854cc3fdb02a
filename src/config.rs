/*
 * Responsibility
 * - Read settings from the environment (registry location, supported claims,
 *   claim map, remote probe timeout / failure mode)
 * - Validate them (startup fails on missing or unparsable values)
 */
use std::collections::BTreeMap;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::services::access::FailureMode;
use crate::services::claims::{SupportedClaims, supported::DEFAULT_SUPPORTED_CLAIMS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub service_registry_path: PathBuf,

    pub supported_claims: SupportedClaims,
    // provider-wide claim -> attribute renames
    pub claims_map: BTreeMap<String, String>,

    pub remote_access_timeout: Duration,
    pub remote_access_failure_mode: FailureMode,

    pub http_request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = match std::env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            Err(_) => 8080,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let service_registry_path = std::env::var("SERVICE_REGISTRY_PATH")
            .map(PathBuf::from)
            .map_err(|_| ConfigError::Missing("SERVICE_REGISTRY_PATH"))?;

        let supported_claims = match std::env::var("OIDC_SUPPORTED_CLAIMS") {
            Ok(raw) => parse_claim_list(&raw),
            Err(_) => DEFAULT_SUPPORTED_CLAIMS.iter().copied().collect(),
        };

        let claims_map = parse_claims_map(&std::env::var("OIDC_CLAIMS_MAP").unwrap_or_default())
            .ok_or(ConfigError::Invalid("OIDC_CLAIMS_MAP"))?;

        let remote_access_timeout = env_u64("REMOTE_ACCESS_TIMEOUT_MS")?
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(5000));

        let remote_access_failure_mode = std::env::var("REMOTE_ACCESS_FAILURE_MODE")
            .ok()
            .map(|v| {
                v.parse::<FailureMode>()
                    .map_err(|_| ConfigError::Invalid("REMOTE_ACCESS_FAILURE_MODE"))
            })
            .transpose()?
            .unwrap_or_default();

        let http_request_timeout = env_u64("HTTP_REQUEST_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        check_timeouts(http_request_timeout, remote_access_timeout)?;

        Ok(Self {
            addr,
            app_env,
            service_registry_path,
            supported_claims,
            claims_map,
            remote_access_timeout,
            remote_access_failure_mode,
            http_request_timeout,
        })
    }
}

fn env_u64(key: &'static str) -> Result<Option<u64>, ConfigError> {
    std::env::var(key)
        .ok()
        .map(|raw| parse_u64(key, &raw))
        .transpose()
}

fn parse_u64(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid(key))
}

// The inbound timeout must outlast the remote probe, or a probe fault
// surfaces as 408 instead of an access evaluation error.
fn check_timeouts(inbound: Duration, remote_access: Duration) -> Result<(), ConfigError> {
    if inbound <= remote_access {
        return Err(ConfigError::Invalid("HTTP_REQUEST_TIMEOUT_SECS"));
    }
    Ok(())
}

/// `"sub, email,,name"` -> {sub, email, name}
fn parse_claim_list(raw: &str) -> SupportedClaims {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// `"email=mail,name=displayName"`; `None` when a pair is malformed.
fn parse_claims_map(raw: &str) -> Option<BTreeMap<String, String>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|pair| {
            let (claim, attribute) = pair.split_once('=')?;
            let (claim, attribute) = (claim.trim(), attribute.trim());
            if claim.is_empty() || attribute.is_empty() {
                return None;
            }
            Some((claim.to_string(), attribute.to_string()))
        })
        .collect()
}
