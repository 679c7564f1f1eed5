use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Запись о публикации, которую реестр передаёт каждому адаптеру.
///
/// Кроме полезной нагрузки содержит полное имя темы, идентификатор и время
/// публикации. Подписчикам из всего этого достаётся только `payload`.
#[derive(Debug)]
pub struct Notification<'a, P> {
    /// Полное имя темы (`namespace + delimiter + leaf`).
    pub name: &'a str,
    /// Уникальный идентификатор публикации.
    pub id: Uuid,
    /// Момент начала рассылки.
    pub started_at: DateTime<Utc>,
    /// Полезная нагрузка. Всегда последнее поле записи.
    pub payload: &'a P,
}

impl<'a, P> Notification<'a, P> {
    pub fn new(
        name: &'a str,
        payload: &'a P,
    ) -> Self {
        Self {
            name,
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            payload,
        }
    }
}

impl<P> Clone for Notification<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for Notification<'_, P> {}

#[cfg(test)]
mod tests {
    use super::*;

    /// Тест проверяет, что каждая запись получает свой идентификатор, а
    /// нагрузка передаётся по ссылке без копирования.
    #[test]
    fn test_notification_creation() {
        let payload = vec![1u8, 2, 3];
        let a = Notification::new("payout.created", &payload);
        let b = Notification::new("payout.created", &payload);

        assert_eq!(a.name, "payout.created");
        assert_ne!(a.id, b.id);
        assert!(std::ptr::eq(a.payload, &payload));
        assert!(a.started_at <= Utc::now());
    }
}
