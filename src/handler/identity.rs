use std::{fmt, panic::Location};

/// Ключ равенства обработчиков.
///
/// Два обработчика с равными идентичностями считаются одним и тем же
/// логическим подписчиком, даже если это разные экземпляры: повторная
/// подписка такого обработчика на ту же тему заменяет старую подписку.
///
/// Правила нормализации:
/// - замыкание: `("closure", "<файл>:<строка>")` — место определения;
/// - ссылка на метод получателя: `(имя получателя, имя метода)`;
/// - ленивый обработчик на получателе: `(имя получателя, объявленный метод)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerIdentity {
    receiver: String,
    method: String,
}

impl HandlerIdentity {
    /// Имя "получателя" у всех замыканий.
    pub const CLOSURE: &'static str = "closure";

    pub fn new(
        receiver: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        Self {
            receiver: receiver.into(),
            method: method.into(),
        }
    }

    /// Идентичность замыкания по месту его определения.
    pub fn closure(site: &Location<'_>) -> Self {
        Self::new(Self::CLOSURE, format!("{}:{}", site.file(), site.line()))
    }

    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn is_closure(&self) -> bool {
        self.receiver == Self::CLOSURE
    }
}

impl fmt::Display for HandlerIdentity {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}#{}", self.receiver, self.method)
    }
}
