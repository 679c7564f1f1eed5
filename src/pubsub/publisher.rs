use std::{collections::BTreeMap, fmt, sync::Arc};

use webhooks_error::{bail, SubscribeError, WebhooksResult};

use super::{Registry, SubscriberEntry, SubscriptionId};
use crate::{config::PublisherConfig, Handler, Namespace};

/// Издатель событий, привязанный к одному пространству имён.
///
/// Все имена тем, которые принимает издатель, — это листья: полное имя
/// получается как `namespace + delimiter + leaf`. Подписка без листа
/// (`all`) получает все события пространства.
///
/// Несколько издателей могут разделять один [`Registry`]; каждый из них
/// видит в `subscribers()` только свои подписки.
pub struct Publisher<P = serde_json::Value> {
    namespace: Namespace,
    registry: Arc<Registry<P>>,
}

impl<P> Publisher<P> {
    /// Издатель с собственным реестром.
    pub fn new(config: &PublisherConfig) -> WebhooksResult<Self> {
        Self::with_registry(config, Arc::new(Registry::new()))
    }

    /// Издатель поверх общего реестра.
    pub fn with_registry(
        config: &PublisherConfig,
        registry: Arc<Registry<P>>,
    ) -> WebhooksResult<Self> {
        config.validate()?;
        Ok(Self {
            namespace: config.namespace(),
            registry,
        })
    }

    pub fn from_namespace(namespace: Namespace) -> Self {
        Self {
            namespace,
            registry: Arc::new(Registry::new()),
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn registry(&self) -> &Arc<Registry<P>> {
        &self.registry
    }

    /// Полное имя темы для листа.
    pub fn topic<'a>(
        &self,
        leaf: impl Into<Option<&'a str>>,
    ) -> String {
        self.namespace.qualify(leaf)
    }

    /// Построитель подписки на лист `leaf`.
    pub fn subscription(
        &self,
        leaf: &str,
    ) -> SubscriptionBuilder<'_, P> {
        SubscriptionBuilder {
            publisher: self,
            leaf: Some(leaf.to_string()),
            handler: None,
        }
    }

    /// Построитель подписки на всё пространство имён.
    pub fn subscription_all(&self) -> SubscriptionBuilder<'_, P> {
        SubscriptionBuilder {
            publisher: self,
            leaf: None,
            handler: None,
        }
    }

    /// Подписывает обработчик на лист темы.
    ///
    /// Повторная подписка логически того же обработчика на тот же лист
    /// заменяет предыдущую.
    pub fn subscribe(
        &self,
        leaf: &str,
        handler: impl Into<Handler<P>>,
    ) -> WebhooksResult<SubscriptionId> {
        Ok(self.register(Some(leaf), handler.into()))
    }

    /// Подписывает замыкание; его идентичность — место вызова.
    #[track_caller]
    pub fn subscribe_fn<F>(
        &self,
        leaf: &str,
        func: F,
    ) -> WebhooksResult<SubscriptionId>
    where
        F: Fn(&P) -> WebhooksResult<()> + Send + Sync + 'static,
    {
        let handler = Handler::from_fn(func);
        Ok(self.register(Some(leaf), handler))
    }

    /// Подписывает обработчик на все темы пространства.
    pub fn all(
        &self,
        handler: impl Into<Handler<P>>,
    ) -> WebhooksResult<SubscriptionId> {
        Ok(self.register(None, handler.into()))
    }

    #[track_caller]
    pub fn all_fn<F>(
        &self,
        func: F,
    ) -> WebhooksResult<SubscriptionId>
    where
        F: Fn(&P) -> WebhooksResult<()> + Send + Sync + 'static,
    {
        let handler = Handler::from_fn(func);
        Ok(self.register(None, handler))
    }

    /// Удаляет все подписки ровно на этот лист. Подписки `all` и на листья с
    /// тем же префиксом остаются.
    pub fn unsubscribe<'a>(
        &self,
        leaf: impl Into<Option<&'a str>>,
    ) -> usize {
        self.registry.unsubscribe(&self.namespace.to_pattern(leaf))
    }

    pub fn unsubscribe_id(
        &self,
        id: SubscriptionId,
    ) -> bool {
        self.registry.unsubscribe_id(id)
    }

    /// Получит ли событие на этот лист хоть один обработчик.
    pub fn listening<'a>(
        &self,
        leaf: impl Into<Option<&'a str>>,
    ) -> bool {
        self.registry.is_listening(&self.namespace.qualify(leaf))
    }

    /// Синхронно рассылает `payload` всем подписчикам листа.
    ///
    /// Возвращает количество вызванных обработчиков. Ошибка первого
    /// упавшего обработчика прерывает рассылку и возвращается как есть, с
    /// контекстом темы.
    pub fn publish<'a>(
        &self,
        leaf: impl Into<Option<&'a str>>,
        payload: &P,
    ) -> WebhooksResult<usize> {
        self.registry.publish(&self.namespace.qualify(leaf), payload)
    }

    /// Подписки этого пространства, сгруппированные по листу темы.
    ///
    /// Ключ `None` — подписки `all`. Внутри группы порядок подписки.
    pub fn subscribers(&self) -> BTreeMap<Option<Arc<str>>, Vec<SubscriberEntry<P>>> {
        let mut groups: BTreeMap<Option<Arc<str>>, Vec<SubscriberEntry<P>>> = BTreeMap::new();
        for entry in self.registry.entries_within(&self.namespace.scope()) {
            groups
                .entry(entry.topic_id().cloned())
                .or_default()
                .push(entry);
        }
        groups
    }

    fn register(
        &self,
        leaf: Option<&str>,
        handler: Handler<P>,
    ) -> SubscriptionId {
        let leaf = leaf.filter(|l| !l.is_empty());
        self.registry
            .subscribe(self.namespace.to_pattern(leaf), leaf, handler)
    }
}

impl<P> Clone for Publisher<P> {
    fn clone(&self) -> Self {
        Self {
            namespace: self.namespace.clone(),
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<P> fmt::Debug for Publisher<P> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Publisher")
            .field("namespace", &self.namespace.to_string())
            .field("subscriptions", &self.registry.len())
            .finish()
    }
}

/// Пошаговое оформление подписки.
///
/// Обработчик обязателен: `register` без него возвращает
/// `SubscribeError::InvalidArgument`.
pub struct SubscriptionBuilder<'p, P> {
    publisher: &'p Publisher<P>,
    leaf: Option<String>,
    handler: Option<Handler<P>>,
}

impl<P> SubscriptionBuilder<'_, P> {
    pub fn handler(
        mut self,
        handler: impl Into<Handler<P>>,
    ) -> Self {
        self.handler = Some(handler.into());
        self
    }

    #[track_caller]
    pub fn handler_fn<F>(
        mut self,
        func: F,
    ) -> Self
    where
        F: Fn(&P) -> WebhooksResult<()> + Send + Sync + 'static,
    {
        self.handler = Some(Handler::from_fn(func));
        self
    }

    pub fn register(self) -> WebhooksResult<SubscriptionId> {
        let Some(handler) = self.handler else {
            bail!(SubscribeError::InvalidArgument {
                reason: format!(
                    "handler is required for '{}'",
                    self.publisher.topic(self.leaf.as_deref())
                ),
            });
        };
        Ok(self.publisher.register(self.leaf.as_deref(), handler))
    }
}
