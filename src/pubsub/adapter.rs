use std::{fmt, sync::Arc};

use webhooks_error::WebhooksResult;

use super::Notification;
use crate::{Handler, HandlerIdentity};

/// Обёртка над обработчиком, сводящая вызов с полной записью о публикации к
/// вызову "только с нагрузкой".
///
/// Также помнит лист темы, на который была оформлена подписка: по полному
/// шаблону его не восстановить. `topic_id` используется только для
/// диагностики и группировки, но не для сопоставления.
pub struct Adapter<P> {
    handler: Handler<P>,
    topic_id: Option<Arc<str>>,
}

impl<P> Adapter<P> {
    pub fn new(
        handler: Handler<P>,
        topic_id: Option<&str>,
    ) -> Self {
        Self {
            handler,
            topic_id: topic_id.map(Arc::from),
        }
    }

    pub fn handler(&self) -> &Handler<P> {
        &self.handler
    }

    /// Лист темы подписки; `None` для подписки на всё пространство.
    pub fn topic_id(&self) -> Option<&Arc<str>> {
        self.topic_id.as_ref()
    }

    pub fn identity(&self) -> HandlerIdentity {
        self.handler.identity()
    }

    /// Передаёт обработчику только последнее поле записи — нагрузку.
    #[inline]
    pub fn call(
        &self,
        notification: &Notification<'_, P>,
    ) -> WebhooksResult<()> {
        self.handler.call(notification.payload)
    }
}

impl<P> fmt::Debug for Adapter<P> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Adapter")
            .field("topic_id", &self.topic_id)
            .field("handler", &self.handler)
            .finish()
    }
}
