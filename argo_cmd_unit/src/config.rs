//! TOML configuration loader with validation.
//!
//! One file holds everything resolved at startup: the board role plus the
//! two control-loop intervals. Both intervals must be non-zero — a zero
//! silence timeout would busy-spin the fail-safe path.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::role::BoardRole;

// ─── Error Type ─────────────────────────────────────────────────────

/// Configuration loading/validation error.
#[derive(Debug)]
pub enum ConfigError {
    /// File I/O error.
    IoError(String),
    /// TOML parse error.
    ParseError(String),
    /// Parameter validation error.
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "config I/O error: {e}"),
            Self::ParseError(e) => write!(f, "config parse error: {e}"),
            Self::ValidationError(e) => write!(f, "config validation: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ─── Config Struct ──────────────────────────────────────────────────

/// Command unit configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CmdUnitConfig {
    /// Which board this instance behaves as.
    pub role: BoardRole,
    /// Bus-silence timeout before the fail-safe stop [ms].
    #[serde(default = "default_silence_timeout_ms")]
    pub silence_timeout_ms: u64,
    /// Re-check interval while the disable switch is engaged [ms].
    #[serde(default = "default_disabled_poll_ms")]
    pub disabled_poll_ms: u64,
}

fn default_silence_timeout_ms() -> u64 {
    500
}

fn default_disabled_poll_ms() -> u64 {
    100
}

impl CmdUnitConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.silence_timeout_ms == 0 {
            return Err("silence_timeout_ms must be non-zero".into());
        }
        if self.disabled_poll_ms == 0 {
            return Err("disabled_poll_ms must be non-zero".into());
        }
        Ok(())
    }

    #[inline]
    pub fn silence_timeout(&self) -> Duration {
        Duration::from_millis(self.silence_timeout_ms)
    }

    #[inline]
    pub fn disabled_poll(&self) -> Duration {
        Duration::from_millis(self.disabled_poll_ms)
    }
}

// ─── Loading Functions ──────────────────────────────────────────────

/// Load and validate the command unit configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<CmdUnitConfig, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::IoError(format!("failed to read {}: {e}", path.display())))?;
    load_config_from_str(&raw)
}

/// Load config from a TOML string (for testing).
pub fn load_config_from_str(raw: &str) -> Result<CmdUnitConfig, ConfigError> {
    let config: CmdUnitConfig =
        toml::from_str(raw).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    config.validate().map_err(ConfigError::ValidationError)?;
    Ok(config)
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn minimal_config_gets_defaults() {
        let config = load_config_from_str(r#"role = "chassis""#).unwrap();
        assert_eq!(config.role, BoardRole::Chassis);
        assert_eq!(config.silence_timeout_ms, 500);
        assert_eq!(config.disabled_poll_ms, 100);
        assert_eq!(config.silence_timeout(), Duration::from_millis(500));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = load_config_from_str(
            r#"
role = "gimbal"
silence_timeout_ms = 250
disabled_poll_ms = 50
"#,
        )
        .unwrap();
        assert_eq!(config.role, BoardRole::Gimbal);
        assert_eq!(config.silence_timeout_ms, 250);
        assert_eq!(config.disabled_poll_ms, 50);
    }

    #[test]
    fn zero_timeout_rejected() {
        let err = load_config_from_str(
            r#"
role = "chassis"
silence_timeout_ms = 0
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn unknown_role_rejected() {
        let err = load_config_from_str(r#"role = "turret""#).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn missing_role_rejected() {
        let err = load_config_from_str("silence_timeout_ms = 500").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "role = \"gimbal\"").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.role, BoardRole::Gimbal);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/cmd.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
