use std::{fmt, sync::Arc};

use super::Pattern;

/// Разделитель по умолчанию между корнем пространства имён и листом.
pub const DEFAULT_DELIMITER: &str = ".";

/// Пространство имён тем издателя.
///
/// Полное имя темы — это `root + delimiter + leaf`. Подписка без листа
/// покрывает все темы пространства.
///
/// ```
/// use webhooks::Namespace;
///
/// let ns = Namespace::new("payout", ".");
/// assert_eq!(ns.qualify("created"), "payout.created");
/// assert_eq!(ns.qualify(None), "payout.");
/// assert!(ns.to_pattern(None).matches("payout.refunded"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    root: Arc<str>,
    delimiter: Arc<str>,
}

impl Namespace {
    /// Принимает всё, что умеет отображаться строкой.
    pub fn new(
        root: impl fmt::Display,
        delimiter: impl fmt::Display,
    ) -> Self {
        Self {
            root: Arc::from(root.to_string()),
            delimiter: Arc::from(delimiter.to_string()),
        }
    }

    /// Пространство с разделителем `"."`.
    pub fn with_default_delimiter(root: impl fmt::Display) -> Self {
        Self::new(root, DEFAULT_DELIMITER)
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Полное имя темы. Пустой или отсутствующий лист даёт `root + delimiter`.
    pub fn qualify<'a>(
        &self,
        leaf: impl Into<Option<&'a str>>,
    ) -> String {
        let leaf = leaf.into().unwrap_or_default();
        let mut topic = String::with_capacity(self.root.len() + self.delimiter.len() + leaf.len());
        topic.push_str(&self.root);
        topic.push_str(&self.delimiter);
        topic.push_str(leaf);
        topic
    }

    /// Шаблон, которому соответствует любая тема с префиксом `qualify(leaf)`.
    pub fn to_pattern<'a>(
        &self,
        leaf: impl Into<Option<&'a str>>,
    ) -> Pattern {
        Pattern::literal(self.qualify(leaf))
    }

    /// Шаблон всего пространства имён.
    pub fn scope(&self) -> Pattern {
        self.to_pattern(None)
    }
}

impl fmt::Display for Namespace {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}{}", self.root, self.delimiter)
    }
}
