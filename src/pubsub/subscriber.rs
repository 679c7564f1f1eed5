use std::{fmt, sync::Arc};

use webhooks_error::{ResultExt, SubscribeError, WebhooksResult};

use super::{Publisher, SubscriptionId};
use crate::{
    config::SubscriptionDecl, BoundMethod, Callable, Handler, LazyHandler, Receiver, CALL,
};

/// Каким обработчиком получатель отвечает на событие.
pub enum HandlerSpec<P> {
    /// Метод `call` самого получателя.
    Default,
    /// Метод получателя с этим именем.
    Method(String),
    /// Отдельное замыкание.
    Callable(Callable<P>),
    /// Ссылка на метод (возможно, другого получателя).
    Bound(BoundMethod<P>),
}

impl<P> HandlerSpec<P> {
    /// Разбирает текстовое описание обработчика из конфигурации.
    ///
    /// Отсутствие значения даёт [`HandlerSpec::Default`], любая непустая
    /// строка — [`HandlerSpec::Method`]. Есть ли такой метод у получателя,
    /// выясняется только при вызове. Пустое имя отклоняется с
    /// `SubscribeError::UnknownHandlerSpec`.
    pub fn parse(spec: Option<&str>) -> Result<Self, SubscribeError> {
        match spec {
            None => Ok(Self::Default),
            Some(name) => method_name(name).map(|name| Self::Method(name.to_string())),
        }
    }
}

/// Общее правило для имён из конфигурации и из кода: имя не может быть
/// пустым или состоять из одних пробелов.
fn method_name(name: &str) -> Result<&str, SubscribeError> {
    if name.trim().is_empty() {
        return Err(SubscribeError::UnknownHandlerSpec {
            spec: name.to_string(),
        });
    }
    Ok(name)
}

impl<P> From<Callable<P>> for HandlerSpec<P> {
    fn from(callable: Callable<P>) -> Self {
        Self::Callable(callable)
    }
}

impl<P> From<BoundMethod<P>> for HandlerSpec<P> {
    fn from(method: BoundMethod<P>) -> Self {
        Self::Bound(method)
    }
}

impl<P> From<&str> for HandlerSpec<P> {
    fn from(method: &str) -> Self {
        Self::Method(method.to_string())
    }
}

impl<P> fmt::Debug for HandlerSpec<P> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Default => f.write_str("Default"),
            Self::Method(name) => f.debug_tuple("Method").field(name).finish(),
            Self::Callable(c) => f.debug_tuple("Callable").field(c).finish(),
            Self::Bound(m) => f.debug_tuple("Bound").field(m).finish(),
        }
    }
}

/// Декларативная подписка получателя на события издателя.
///
/// Каждая подписка оформляется ленивым обработчиком, поэтому метод можно
/// определить в [`MethodTable`](crate::MethodTable) уже после
/// `subscribe_to`. Тема `"all"` (в любом регистре) означает подписку на
/// всё пространство имён.
pub struct Subscriber<P = serde_json::Value> {
    publisher: Publisher<P>,
    receiver: Arc<dyn Receiver<P>>,
}

impl<P: 'static> Subscriber<P> {
    pub fn new(
        publisher: Publisher<P>,
        receiver: Arc<dyn Receiver<P>>,
    ) -> Self {
        Self {
            publisher,
            receiver,
        }
    }

    pub fn publisher(&self) -> &Publisher<P> {
        &self.publisher
    }

    pub fn receiver(&self) -> &Arc<dyn Receiver<P>> {
        &self.receiver
    }

    pub fn subscribe_to(
        &self,
        topic: &str,
        spec: impl Into<HandlerSpec<P>>,
    ) -> WebhooksResult<SubscriptionId> {
        let lazy = match spec.into() {
            HandlerSpec::Default => LazyHandler::on(self.receiver.clone(), CALL),
            HandlerSpec::Method(name) => {
                method_name(&name)?;
                LazyHandler::on(self.receiver.clone(), name)
            }
            HandlerSpec::Callable(callable) => LazyHandler::new(callable, CALL),
            HandlerSpec::Bound(method) => LazyHandler::new(method, CALL),
        };
        self.route(topic, lazy.into())
    }

    /// Подписка замыканием вместо метода получателя.
    #[track_caller]
    pub fn subscribe_block<F>(
        &self,
        topic: &str,
        func: F,
    ) -> WebhooksResult<SubscriptionId>
    where
        F: Fn(&P) -> WebhooksResult<()> + Send + Sync + 'static,
    {
        let callable = Callable::new(func);
        self.route(topic, LazyHandler::new(callable, CALL).into())
    }

    /// Оформляет подписки, прочитанные из конфигурации.
    ///
    /// Останавливается на первом некорректном описании; уже оформленные к
    /// этому моменту подписки остаются.
    pub fn apply(
        &self,
        decls: &[SubscriptionDecl],
    ) -> WebhooksResult<Vec<SubscriptionId>> {
        decls
            .iter()
            .map(|decl| {
                let spec: HandlerSpec<P> = HandlerSpec::parse(decl.with.as_deref())
                    .with_context(|| format!("subscription to '{}'", decl.topic))?;
                self.subscribe_to(&decl.topic, spec)
            })
            .collect()
    }

    fn route(
        &self,
        topic: &str,
        handler: Handler<P>,
    ) -> WebhooksResult<SubscriptionId> {
        if topic.eq_ignore_ascii_case("all") {
            self.publisher.all(handler)
        } else {
            self.publisher.subscribe(topic, handler)
        }
    }
}

impl<P> fmt::Debug for Subscriber<P> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("publisher", &self.publisher)
            .field("receiver", &self.receiver.name())
            .finish()
    }
}
