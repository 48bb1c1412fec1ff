// SPDX-License-Identifier: MIT

//! Recognized configuration keys and their value validation.

use thiserror::Error;

/// The flat key/value config map only accepts these keys; everything else is
/// rejected at write time (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    MaxRetries,
    BackoffBase,
}

impl ConfigKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            ConfigKey::MaxRetries => "max_retries",
            ConfigKey::BackoffBase => "backoff_base",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw {
            "max_retries" => Ok(ConfigKey::MaxRetries),
            "backoff_base" => Ok(ConfigKey::BackoffBase),
            other => Err(ConfigError::UnknownKey(other.to_string())),
        }
    }

    /// Validate a candidate value for this key, returning the parsed integer.
    ///
    /// `max_retries` accepts any non-negative integer; `backoff_base` must be
    /// at least 1 (a base of 0 would collapse every backoff to 0 seconds).
    pub fn validate(self, raw: &str) -> Result<u32, ConfigError> {
        let value: i64 = raw
            .parse()
            .map_err(|_| ConfigError::NotAnInteger(raw.to_string()))?;
        if value < 0 {
            return Err(ConfigError::Negative(raw.to_string()));
        }
        match self {
            ConfigKey::MaxRetries => Ok(value as u32),
            ConfigKey::BackoffBase if value < 1 => {
                Err(ConfigError::OutOfRange { key: self.as_str(), value })
            }
            ConfigKey::BackoffBase => Ok(value as u32),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown config key: {0}")]
    UnknownKey(String),
    #[error("not an integer: {0}")]
    NotAnInteger(String),
    #[error("value must not be negative: {0}")]
    Negative(String),
    #[error("{key} must be >= 1, got {value}")]
    OutOfRange { key: &'static str, value: i64 },
}

/// Recognized config defaults when the `config` table has no row yet.
pub const DEFAULT_MAX_RETRIES: u32 = 0;
pub const DEFAULT_BACKOFF_BASE: u32 = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_recognized_keys() {
        assert_eq!(ConfigKey::parse("max_retries").unwrap(), ConfigKey::MaxRetries);
        assert_eq!(ConfigKey::parse("backoff_base").unwrap(), ConfigKey::BackoffBase);
    }

    #[test]
    fn rejects_unknown_key() {
        assert!(matches!(ConfigKey::parse("bogus"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn backoff_base_rejects_zero() {
        assert!(matches!(
            ConfigKey::BackoffBase.validate("0"),
            Err(ConfigError::OutOfRange { .. })
        ));
    }

    #[test]
    fn max_retries_accepts_zero() {
        assert_eq!(ConfigKey::MaxRetries.validate("0").unwrap(), 0);
    }

    #[test]
    fn rejects_negative_and_non_numeric() {
        assert!(matches!(ConfigKey::MaxRetries.validate("-1"), Err(ConfigError::Negative(_))));
        assert!(matches!(
            ConfigKey::MaxRetries.validate("nope"),
            Err(ConfigError::NotAnInteger(_))
        ));
    }
}
