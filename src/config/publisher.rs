use serde::{Deserialize, Serialize};
use webhooks_error::ConfigError;

use crate::{topic::DEFAULT_DELIMITER, Namespace};

/// Пространство имён по умолчанию.
pub const DEFAULT_NAMESPACE: &str = "webhooks";

/// Настройки одного издателя. Не меняются в течение его жизни.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PublisherConfig {
    pub namespace: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

fn default_delimiter() -> String {
    DEFAULT_DELIMITER.to_string()
}

impl PublisherConfig {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            delimiter: default_delimiter(),
        }
    }

    pub fn with_delimiter(
        mut self,
        delimiter: impl Into<String>,
    ) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.namespace.is_empty() {
            return Err(ConfigError::Invalid {
                field: "publisher.namespace".to_string(),
                reason: "namespace must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn namespace(&self) -> Namespace {
        Namespace::new(&self.namespace, &self.delimiter)
    }
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

/// Одна подписка из файла настроек.
///
/// `with` — имя метода получателя; без него вызывается `call`. Тема `all`
/// означает всё пространство имён.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubscriptionDecl {
    pub topic: String,
    #[serde(default)]
    pub with: Option<String>,
}

impl SubscriptionDecl {
    pub fn new(
        topic: impl Into<String>,
        with: Option<&str>,
    ) -> Self {
        Self {
            topic: topic.into(),
            with: with.map(str::to_string),
        }
    }
}
