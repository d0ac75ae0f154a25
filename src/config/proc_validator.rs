//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Checks server, logging, metrics, security, simulation, rate limit
//!   and payload invariants

use anyhow::{bail, Result};
use tracing::{error, info};

use crate::config::settings::{
    PayloadsConfig, RateLimitConfig, SecurityConfig, ServiceConfig, SettingsConfig,
    SimulationConfig,
};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Returns Ok(()) or an error listing every issue found.
pub fn validate_service_config(cfg: &ServiceConfig) -> Result<()> {
    let errors = collect_errors(cfg);

    if errors.is_empty() {
        info!("config valid");
        return Ok(());
    }

    error!("configuration validation errors ({}):", errors.len());
    for e in &errors {
        error!(" - {}", e);
    }
    bail!(
        "config is not valid, total errors:{}, \n{}",
        errors.len(),
        errors.join("\n")
    )
}

pub fn collect_errors(cfg: &ServiceConfig) -> Vec<String> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_security(&cfg.security, &mut errors);
    validate_simulation(&cfg.simulation, &mut errors);
    validate_rate_limit(&cfg.rate_limit, &mut errors);
    validate_payloads(&cfg.payloads, &mut errors);

    errors
}

/// SETTINGS VALIDATION
fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if settings.server.host.trim().is_empty() {
        errors.push("settings.server.host must not be empty".to_string());
    }

    let level = settings.logging.level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(format!(
            "settings.logging.level '{}' must be one of {:?}",
            settings.logging.level, LOG_LEVELS
        ));
    }

    if settings.metrics.is_enabled && !settings.metrics.path.starts_with('/') {
        errors.push(format!(
            "settings.metrics.path '{}' must start with '/'",
            settings.metrics.path
        ));
    }
}

fn validate_security(security: &SecurityConfig, errors: &mut Vec<String>) {
    if security.secret_key.is_empty() {
        errors.push("security.secret_key must not be empty".to_string());
    }
    if security.sweep_interval_seconds == 0 {
        errors.push("security.sweep_interval_seconds must be > 0".to_string());
    }
}

fn validate_simulation(simulation: &SimulationConfig, errors: &mut Vec<String>) {
    if simulation.min_delay_ms > simulation.max_delay_ms {
        errors.push(format!(
            "simulation.min_delay_ms ({}) must be <= simulation.max_delay_ms ({})",
            simulation.min_delay_ms, simulation.max_delay_ms
        ));
    }
    if simulation.error_chance_percent > 100 {
        errors.push(format!(
            "simulation.error_chance_percent ({}) must be within 0..=100",
            simulation.error_chance_percent
        ));
    }
}

fn validate_rate_limit(rate_limit: &RateLimitConfig, errors: &mut Vec<String>) {
    if rate_limit.window_ms == 0 {
        errors.push("rate_limit.window_ms must be > 0".to_string());
    }
    if rate_limit.max_requests == 0 {
        errors.push("rate_limit.max_requests must be > 0".to_string());
    }
}

fn validate_payloads(payloads: &PayloadsConfig, errors: &mut Vec<String>) {
    if payloads.pf.trim().is_empty() {
        errors.push("payloads.pf must not be empty".to_string());
    }
    if payloads.pj.trim().is_empty() {
        errors.push("payloads.pj must not be empty".to_string());
    }
}
