use std::path::Path;

use anyhow::Result;
use regex::Regex;
use tracing::{debug, error};

use crate::config::proc_validator;
use crate::config::settings::ServiceConfig;

/// Load and validate config from YAML file
pub async fn file_to_config(path: &Path) -> Result<ServiceConfig> {
    let content = tokio::fs::read_to_string(path).await?;

    let expanded = expand_env_vars(&content);
    parse_config(expanded)
}

pub fn parse_config(content: String) -> Result<ServiceConfig> {
    let service_config: ServiceConfig = if content.trim().is_empty() {
        ServiceConfig::default()
    } else {
        serde_yaml::from_str(&content).inspect_err(|e| {
            error!("parse config error: {}", e);
        })?
    };

    debug!("validation config ...");
    proc_validator::validate_service_config(&service_config)?;

    Ok(service_config)
}

/// Replaces `${VAR}` and `${VAR:default}` with the environment value.
pub fn expand_env_vars(input: &str) -> String {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]*))?\}").unwrap();
    re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;
    use crate::config::settings::LogFormat;

    #[test]
    #[serial]
    fn expands_env_with_defaults() {
        std::env::set_var("MOCK_BUREAU_TEST_TTL", "120");
        std::env::remove_var("MOCK_BUREAU_TEST_MISSING");

        let out = expand_env_vars("a: ${MOCK_BUREAU_TEST_TTL:3600}\nb: ${MOCK_BUREAU_TEST_MISSING:15}\nc: ${MOCK_BUREAU_TEST_MISSING}");
        assert_eq!(out, "a: 120\nb: 15\nc: ");

        std::env::remove_var("MOCK_BUREAU_TEST_TTL");
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg = parse_config(
            r#"
settings:
  server:
    port: 8080
  logging:
    level: debug
    format: json
simulation:
  error_chance_percent: 0
"#
            .to_string(),
        )
        .unwrap();

        assert_eq!(cfg.settings.server.port, 8080);
        assert_eq!(cfg.settings.server.host, "0.0.0.0");
        assert_eq!(cfg.settings.logging.format, LogFormat::Json);
        assert_eq!(cfg.simulation.error_chance_percent, 0);
        assert_eq!(cfg.simulation.min_delay_ms, 2000);
        assert_eq!(cfg.simulation.max_delay_ms, 60000);
        assert_eq!(cfg.security.token_ttl_seconds, 3600);
        assert_eq!(cfg.security.secret_key, "default-secret-key");
        assert_eq!(cfg.rate_limit.max_requests, 100);
        assert_eq!(cfg.payloads.pf, "payload-pf.json");
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg = parse_config(String::new()).unwrap();
        assert_eq!(cfg.settings.server.port, 3006);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = parse_config(
            r#"
simulation:
  min_delay_ms: 5000
  max_delay_ms: 1000
"#
            .to_string(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("min_delay_ms"));
    }

    #[tokio::test]
    #[serial]
    async fn loads_file_with_env_expansion() {
        std::env::set_var("MOCK_BUREAU_TEST_CHANCE", "42");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mock-bureau.yaml");
        std::fs::write(
            &path,
            "simulation:\n  error_chance_percent: ${MOCK_BUREAU_TEST_CHANCE:15}\n",
        )
        .unwrap();

        let cfg = file_to_config(&path).await.unwrap();
        assert_eq!(cfg.simulation.error_chance_percent, 42);
        std::env::remove_var("MOCK_BUREAU_TEST_CHANCE");
    }
}
