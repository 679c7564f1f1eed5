use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use parking_lot::RwLock;
use tracing::{debug, trace};
use webhooks_error::{ResultExt, WebhooksResult};

use super::{Adapter, Notification};
use crate::{Handler, HandlerIdentity, Pattern};

/// Идентификатор подписки внутри реестра.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Снимок одной подписки.
///
/// Хранится только в реестре; наружу выдаются копии, через которые реестр
/// изменить нельзя.
pub struct SubscriberEntry<P> {
    id: SubscriptionId,
    pattern: Pattern,
    identity: HandlerIdentity,
    adapter: Arc<Adapter<P>>,
}

impl<P> SubscriberEntry<P> {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn identity(&self) -> &HandlerIdentity {
        &self.identity
    }

    pub fn topic_id(&self) -> Option<&Arc<str>> {
        self.adapter.topic_id()
    }

    pub fn adapter(&self) -> &Adapter<P> {
        &self.adapter
    }
}

impl<P> Clone for SubscriberEntry<P> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            pattern: self.pattern.clone(),
            identity: self.identity.clone(),
            adapter: Arc::clone(&self.adapter),
        }
    }
}

impl<P> fmt::Debug for SubscriberEntry<P> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("SubscriberEntry")
            .field("id", &self.id)
            .field("pattern", &self.pattern.to_string())
            .field("topic_id", &self.topic_id())
            .field("handler", &self.identity.to_string())
            .finish()
    }
}

/// Счётчики реестра.
#[derive(Debug, Default)]
pub struct RegistryMetrics {
    /// Общее количество вызовов `publish`
    pub publish_count: AtomicU64,
    /// Количество успешных вызовов обработчиков
    pub delivery_count: AtomicU64,
    /// Количество публикаций, прерванных ошибкой обработчика
    pub failure_count: AtomicU64,
}

/// Реестр подписок.
///
/// Все подписки лежат в одном векторе под одной `RwLock`:
/// - изменения (подписка, отписка, замена дубликата) берут блокировку на
///   запись;
/// - публикация берёт блокировку на чтение только на время выбора
///   подходящих адаптеров и вызывает их уже без блокировки, поэтому
///   обработчик может сам подписываться и отписываться.
///
/// Порядок вызова совпадает с порядком подписки и не меняется, пока набор
/// подписок не изменён.
///
/// Один реестр может разделяться несколькими издателями с разными
/// пространствами имён.
pub struct Registry<P> {
    entries: RwLock<Vec<SubscriberEntry<P>>>,
    next_id: AtomicU64,
    metrics: RegistryMetrics,
}

impl<P> Registry<P> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            metrics: RegistryMetrics::default(),
        }
    }

    /// Добавляет подписку.
    ///
    /// Сначала удаляет все подписки с точно таким же шаблоном и той же
    /// идентичностью обработчика, поэтому повторная подписка логически того
    /// же обработчика заменяет старую, а не дублирует её. Удаление и вставка
    /// происходят под одной блокировкой.
    pub fn subscribe(
        &self,
        pattern: Pattern,
        topic_id: Option<&str>,
        handler: Handler<P>,
    ) -> SubscriptionId {
        let identity = handler.identity();
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let entry = SubscriberEntry {
            id,
            pattern,
            identity,
            adapter: Arc::new(Adapter::new(handler, topic_id)),
        };

        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|e| !(e.pattern == entry.pattern && e.identity == entry.identity));
        let replaced = before - entries.len();

        debug!(
            subscription = %id,
            pattern = %entry.pattern,
            handler = %entry.identity,
            replaced,
            "subscribed"
        );
        entries.push(entry);
        id
    }

    /// Удаляет все подписки, шаблон которых в точности равен `pattern`.
    /// Возвращает количество удалённых.
    pub fn unsubscribe(
        &self,
        pattern: &Pattern,
    ) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|e| e.pattern != *pattern);
        let removed = before - entries.len();

        debug!(pattern = %pattern, removed, "unsubscribed");
        removed
    }

    /// Удаляет одну подписку по идентификатору.
    pub fn unsubscribe_id(
        &self,
        id: SubscriptionId,
    ) -> bool {
        let mut entries = self.entries.write();
        match entries.iter().position(|e| e.id == id) {
            Some(idx) => {
                let entry = entries.remove(idx);
                debug!(subscription = %id, pattern = %entry.pattern, "unsubscribed");
                true
            }
            None => false,
        }
    }

    /// Есть ли хотя бы одна подписка, шаблон которой подходит под `topic`.
    pub fn is_listening(
        &self,
        topic: &str,
    ) -> bool {
        self.entries.read().iter().any(|e| e.pattern.matches(topic))
    }

    /// Снимок подписок, подходящих под полную тему, в порядке подписки.
    pub fn matching(
        &self,
        topic: &str,
    ) -> Vec<SubscriberEntry<P>> {
        self.entries
            .read()
            .iter()
            .filter(|e| e.pattern.matches(topic))
            .cloned()
            .collect()
    }

    /// Синхронно вызывает все подходящие обработчики.
    ///
    /// Первая ошибка обработчика прерывает рассылку: оставшиеся обработчики
    /// не вызываются, а ошибка возвращается вызывающему с контекстом темы.
    /// Реестр при этом остаётся в согласованном состоянии. Возвращает
    /// количество вызванных обработчиков.
    pub fn publish(
        &self,
        topic: &str,
        payload: &P,
    ) -> WebhooksResult<usize> {
        self.metrics.publish_count.fetch_add(1, Ordering::Relaxed);

        let targets = self.matching(topic);
        let notification = Notification::new(topic, payload);

        for entry in &targets {
            trace!(
                topic,
                notification = %notification.id,
                subscription = %entry.id,
                handler = %entry.identity,
                "dispatching"
            );
            if let Err(err) = entry.adapter.call(&notification) {
                self.metrics.failure_count.fetch_add(1, Ordering::Relaxed);
                return Err(err).with_context(|| {
                    format!("publish '{topic}' to {}", entry.identity)
                });
            }
            self.metrics.delivery_count.fetch_add(1, Ordering::Relaxed);
        }

        Ok(targets.len())
    }

    /// Копия всех подписок в порядке подписки.
    pub fn entries(&self) -> Vec<SubscriberEntry<P>> {
        self.entries.read().clone()
    }

    /// Копия подписок, шаблоны которых лежат внутри `scope`.
    pub fn entries_within(
        &self,
        scope: &Pattern,
    ) -> Vec<SubscriberEntry<P>> {
        self.entries
            .read()
            .iter()
            .filter(|e| e.pattern.is_within(scope))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Удаляет все подписки. Возвращает количество удалённых.
    pub fn clear(&self) -> usize {
        let removed = std::mem::take(&mut *self.entries.write()).len();
        debug!(removed, "registry cleared");
        removed
    }

    pub fn metrics(&self) -> &RegistryMetrics {
        &self.metrics
    }
}

impl<P> Default for Registry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for Registry<P> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Registry")
            .field("entries", &*self.entries.read())
            .field("metrics", &self.metrics)
            .finish()
    }
}
