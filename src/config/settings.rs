use serde::Deserialize;

use crate::utils::constants::{
    DEFAULT_ERROR_CHANCE_PERCENT, DEFAULT_HOST, DEFAULT_MAX_DELAY_MS, DEFAULT_MIN_DELAY_MS,
    DEFAULT_PAYLOAD_PF, DEFAULT_PAYLOAD_PJ, DEFAULT_PORT, DEFAULT_RATE_LIMIT_MAX_REQUESTS,
    DEFAULT_RATE_LIMIT_WINDOW_MS, DEFAULT_SECRET_KEY, DEFAULT_SWEEP_INTERVAL_SECONDS,
    DEFAULT_TOKEN_TTL_SECONDS,
};

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ServiceConfig {
    pub settings: SettingsConfig,
    pub security: SecurityConfig,
    pub simulation: SimulationConfig,
    pub rate_limit: RateLimitConfig,
    pub payloads: PayloadsConfig,
}

/// ================================
/// Global service-wide settings
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SettingsConfig {
    pub server: ServerConfig,
    pub metrics: MetricsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MetricsConfig {
    pub path: String,
    pub is_enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            path: "/metrics".to_string(),
            is_enabled: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

/// ================================
/// Token signing and lifetime
/// ================================
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SecurityConfig {
    pub secret_key: String,
    pub token_ttl_seconds: u64,
    pub sweep_interval_seconds: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
            sweep_interval_seconds: DEFAULT_SWEEP_INTERVAL_SECONDS,
        }
    }
}

/// ================================
/// Report simulation
/// ================================
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SimulationConfig {
    /// invariant: <= max_delay_ms
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    /// invariant: 0..=100
    pub error_chance_percent: u8,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: DEFAULT_MIN_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            error_chance_percent: DEFAULT_ERROR_CHANCE_PERCENT,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RateLimitConfig {
    pub window_ms: u64,
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: DEFAULT_RATE_LIMIT_WINDOW_MS,
            max_requests: DEFAULT_RATE_LIMIT_MAX_REQUESTS,
        }
    }
}

/// Template file locations
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PayloadsConfig {
    pub pf: String,
    pub pj: String,
}

impl Default for PayloadsConfig {
    fn default() -> Self {
        Self {
            pf: DEFAULT_PAYLOAD_PF.to_string(),
            pj: DEFAULT_PAYLOAD_PJ.to_string(),
        }
    }
}
