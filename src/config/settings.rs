use std::path::Path;

use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use webhooks_error::ConfigError;

use super::{PublisherConfig, SubscriptionDecl, DEFAULT_NAMESPACE};
use crate::{logging::LoggingConfig, topic::DEFAULT_DELIMITER};

/// Префикс переменных окружения: `WEBHOOKS__PUBLISHER__NAMESPACE=payout`.
pub const ENV_PREFIX: &str = "WEBHOOKS";

/// Полные настройки приложения.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub publisher: PublisherConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub subscriptions: Vec<SubscriptionDecl>,
}

impl Settings {
    /// Загружает настройки слоями: значения по умолчанию, затем файл (если
    /// указан), затем переменные окружения `WEBHOOKS__*`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("publisher.namespace", DEFAULT_NAMESPACE)
            .map_err(load_error)?
            .set_default("publisher.delimiter", DEFAULT_DELIMITER)
            .map_err(load_error)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings: Settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .and_then(Config::try_deserialize)
            .map_err(load_error)?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.publisher.validate()?;
        self.logging.validate()?;
        if let Some(decl) = self.subscriptions.iter().find(|d| d.topic.is_empty()) {
            return Err(ConfigError::Invalid {
                field: "subscriptions.topic".to_string(),
                reason: format!("empty topic (with = {:?})", decl.with),
            });
        }
        Ok(())
    }
}

fn load_error(err: ::config::ConfigError) -> ConfigError {
    ConfigError::Load {
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::{env, io::Write};

    use serial_test::serial;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::logging::LogFormat;

    fn clear_env() {
        for (key, _) in env::vars() {
            if key.starts_with("WEBHOOKS__") {
                env::remove_var(key);
            }
        }
    }

    fn toml_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    #[serial]
    fn test_load_defaults() {
        clear_env();
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings, Settings::default());
    }

    /// Тест проверяет чтение издателя, логирования и подписок из файла.
    #[test]
    #[serial]
    fn test_load_from_file() {
        clear_env();
        let file = toml_file(
            r#"
            [publisher]
            namespace = "payout"

            [logging]
            level = "debug"
            format = "json"

            [[subscriptions]]
            topic = "created"
            with = "on_created"

            [[subscriptions]]
            topic = "all"
            "#,
        );

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.publisher.namespace, "payout");
        assert_eq!(settings.publisher.delimiter, ".");
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(
            settings.subscriptions,
            vec![
                SubscriptionDecl::new("created", Some("on_created")),
                SubscriptionDecl::new("all", None),
            ]
        );
    }

    /// Тест проверяет, что переменные окружения перекрывают файл.
    #[test]
    #[serial]
    fn test_env_overrides_file() {
        clear_env();
        let file = toml_file("[publisher]\nnamespace = \"payout\"\n");
        env::set_var("WEBHOOKS__PUBLISHER__NAMESPACE", "refund");

        let settings = Settings::load(Some(file.path()));
        clear_env();

        assert_eq!(settings.unwrap().publisher.namespace, "refund");
    }

    #[test]
    #[serial]
    fn test_missing_file_is_load_error() {
        clear_env();
        let err = Settings::load(Some(Path::new("/nonexistent/webhooks.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Load { .. }));
    }

    #[test]
    #[serial]
    fn test_empty_namespace_is_invalid() {
        clear_env();
        let file = toml_file("[publisher]\nnamespace = \"\"\n");

        let err = Settings::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }
}
