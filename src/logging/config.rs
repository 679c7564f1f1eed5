use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use webhooks_error::ConfigError;

/// Допустимые уровни логирования.
pub const LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Формат вывода логов.
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// Конфигурация логирования.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Уровень по умолчанию
    pub level: String,
    /// Формат вывода
    pub format: LogFormat,
    /// Цветной вывод (игнорируется для json)
    pub with_ansi: bool,
    /// Выводить target события
    pub with_target: bool,
    /// Уровни для отдельных target'ов, например `webhooks::pubsub = "trace"`
    pub targets: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            with_ansi: true,
            with_target: true,
            targets: BTreeMap::new(),
        }
    }
}

impl LoggingConfig {
    /// Собирает директиву для `EnvFilter`: `"info,webhooks::pubsub=trace"`.
    pub fn build_filter_directive(&self) -> String {
        let mut directive = self.level.to_lowercase();
        for (target, level) in &self.targets {
            directive.push(',');
            directive.push_str(target);
            directive.push('=');
            directive.push_str(&level.to_lowercase());
        }
        directive
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_level("logging.level", &self.level)?;
        for (target, level) in &self.targets {
            if target.is_empty() {
                return Err(ConfigError::Invalid {
                    field: "logging.targets".to_string(),
                    reason: "empty target name".to_string(),
                });
            }
            check_level(&format!("logging.targets.{target}"), level)?;
        }
        Ok(())
    }
}

fn check_level(
    field: &str,
    level: &str,
) -> Result<(), ConfigError> {
    if LEVELS.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field: field.to_string(),
            reason: format!("unknown level '{level}', expected one of {LEVELS:?}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(LoggingConfig::default().build_filter_directive(), "info");
    }

    /// Тест проверяет, что уровни target'ов попадают в директиву в
    /// алфавитном порядке.
    #[test]
    fn test_directive_with_targets() {
        let mut cfg = LoggingConfig {
            level: "WARN".to_string(),
            ..Default::default()
        };
        cfg.targets.insert("webhooks::pubsub".into(), "trace".into());
        cfg.targets.insert("webhooks::handler".into(), "Debug".into());

        assert_eq!(
            cfg.build_filter_directive(),
            "warn,webhooks::handler=debug,webhooks::pubsub=trace"
        );
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_level() {
        let mut cfg = LoggingConfig::default();
        cfg.targets.insert("webhooks".into(), "loud".into());

        let err = cfg.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { ref field, .. } if field == "logging.targets.webhooks"
        ));
    }

    #[test]
    fn test_format_deserialize_lowercase() {
        let cfg: LoggingConfig =
            serde_json::from_str(r#"{"format": "json", "with_ansi": false}"#).unwrap();
        assert_eq!(cfg.format, LogFormat::Json);
        assert!(!cfg.with_ansi);
        assert_eq!(cfg.level, "info");
    }
}
