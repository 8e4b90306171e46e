//! Configuration loading and validation for `valuecrypt`.
//!
//! Values are read from `VALUECRYPT_*` environment variables. The process
//! exits with a clear error message if any required variable is missing or
//! invalid.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::key::KeyMaterial;

/// Validated `valuecrypt` configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Standard base64 of a 16, 24 or 32 byte AES key (`VALUECRYPT_KEY`).
    /// **Required.**
    pub key: String,

    /// Tracing log level (`VALUECRYPT_LOG_LEVEL`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or invalid.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix("VALUECRYPT"))
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration (is VALUECRYPT_KEY set?)")?;

        c.validate()?;
        Ok(c)
    }

    /// Decode the configured key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not valid base64 or has the wrong length.
    pub fn key_material(&self) -> Result<KeyMaterial> {
        KeyMaterial::from_base64(&self.key)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.key.trim().is_empty() {
            anyhow::bail!("VALUECRYPT_KEY is required and must not be empty");
        }
        self.key_material()?;
        if self.log_level.trim().is_empty() {
            anyhow::bail!("VALUECRYPT_LOG_LEVEL must not be empty");
        }
        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("key", &"[REDACTED]")
            .field("log_level", &self.log_level)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_128: &str = "AAAAAAAAAAAAAAAAAAAAAA==";

    fn cfg(key: &str) -> Config {
        Config {
            key: key.into(),
            log_level: default_log_level(),
        }
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_log_level(), "warn");
    }

    #[test]
    fn validate_accepts_valid_config() {
        let c = cfg(KEY_128);
        assert!(c.validate().is_ok());
        assert_eq!(c.key_material().unwrap().as_bytes(), &[0u8; 16]);
    }

    #[test]
    fn validate_rejects_empty_key() {
        assert!(cfg("  ").validate().is_err());
    }

    #[test]
    fn validate_rejects_short_key() {
        // 8 bytes
        assert!(cfg("AAAAAAAAAAA=").validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_log_level() {
        let mut c = cfg(KEY_128);
        c.log_level = "".into();
        assert!(c.validate().is_err());
    }

    #[test]
    fn debug_redacts_key() {
        let printed = format!("{:?}", cfg(KEY_128));
        assert!(!printed.contains(KEY_128));
        assert!(printed.contains("REDACTED"));
    }
}
