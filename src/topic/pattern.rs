use std::{fmt, sync::Arc};

use super::intern_topic;

/// Шаблон темы: литеральный префикс, привязанный к началу строки.
///
/// Ни один символ префикса не трактуется как спецсимвол, поэтому `"a.*"`
/// совпадает только с темами, которые буквально начинаются с `"a.*"`.
/// Два шаблона равны, если равны их префиксы.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pattern {
    prefix: Arc<str>,
}

impl Pattern {
    /// Создаёт шаблон из литерального префикса.
    pub fn literal(prefix: impl AsRef<str>) -> Self {
        Self {
            prefix: intern_topic(prefix),
        }
    }

    /// Литеральный префикс шаблона.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Проверяет, начинается ли полная тема с префикса шаблона.
    #[inline]
    pub fn matches(
        &self,
        topic: &str,
    ) -> bool {
        topic.starts_with(&*self.prefix)
    }

    /// Лежит ли этот шаблон внутри области `scope` (например, пространства
    /// имён издателя).
    pub fn is_within(
        &self,
        scope: &Pattern,
    ) -> bool {
        self.prefix.starts_with(&*scope.prefix)
    }
}

impl fmt::Display for Pattern {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "^{}", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("payout.", "payout.created", true)]
    #[case("payout.", "payout.", true)]
    #[case("payout.created", "payout.created.v2", true)]
    #[case("payout.created", "payout.refunded", false)]
    #[case("payout.", "payouts.created", false)]
    #[case("payout.", "x.payout.created", false)]
    #[case("a.*", "a.*b", true)]
    #[case("a.*", "a.b", false)]
    #[case("a[1]", "a1", false)]
    fn test_matches_literal_prefix(
        #[case] prefix: &str,
        #[case] topic: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(Pattern::literal(prefix).matches(topic), expected);
    }

    /// Тест проверяет, что равенство шаблонов определяется содержимым.
    #[test]
    fn test_equality_by_prefix() {
        assert_eq!(Pattern::literal("x.y"), Pattern::literal(String::from("x.y")));
        assert_ne!(Pattern::literal("x.y"), Pattern::literal("x.z"));
    }

    /// Тест проверяет вложенность шаблонов.
    #[test]
    fn test_is_within() {
        let scope = Pattern::literal("payout.");
        assert!(Pattern::literal("payout.created").is_within(&scope));
        assert!(scope.is_within(&scope));
        assert!(!Pattern::literal("charge.created").is_within(&scope));
    }

    #[test]
    fn test_display() {
        assert_eq!(Pattern::literal("payout.").to_string(), "^payout.");
    }
}
