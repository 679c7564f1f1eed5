//! Обработчики событий.
//!
//! - `callable`: замыкание-обработчик с местом определения.
//! - `identity`: ключ равенства "логически одинаковых" обработчиков.
//! - `lazy`: обработчик, метод которого ищется по имени при каждом вызове.
//! - `receiver`: трейт объектов с методами по имени и таблица методов.

pub mod callable;
pub mod identity;
pub mod lazy;
pub mod receiver;

use std::fmt;

pub use callable::*;
pub use identity::*;
pub use lazy::*;
pub use receiver::*;
use webhooks_error::WebhooksResult;

/// Обработчик, передаваемый в подписку: либо готовое замыкание, либо
/// ленивая ссылка "имя метода на получателе".
pub enum Handler<P> {
    Callable(Callable<P>),
    Lazy(LazyHandler<P>),
}

impl<P> Handler<P> {
    /// Обработчик из замыкания; место вызова становится его идентичностью.
    #[track_caller]
    pub fn from_fn<F>(func: F) -> Self
    where
        F: Fn(&P) -> WebhooksResult<()> + Send + Sync + 'static,
    {
        Self::Callable(Callable::new(func))
    }

    pub fn call(
        &self,
        payload: &P,
    ) -> WebhooksResult<()> {
        match self {
            Self::Callable(callable) => callable.call(payload),
            Self::Lazy(lazy) => lazy.call(payload),
        }
    }

    pub fn identity(&self) -> HandlerIdentity {
        match self {
            Self::Callable(callable) => callable.identity(),
            Self::Lazy(lazy) => lazy.identity(),
        }
    }
}

impl<P> Clone for Handler<P> {
    fn clone(&self) -> Self {
        match self {
            Self::Callable(c) => Self::Callable(c.clone()),
            Self::Lazy(l) => Self::Lazy(l.clone()),
        }
    }
}

impl<P> From<Callable<P>> for Handler<P> {
    fn from(callable: Callable<P>) -> Self {
        Self::Callable(callable)
    }
}

impl<P> From<LazyHandler<P>> for Handler<P> {
    fn from(lazy: LazyHandler<P>) -> Self {
        Self::Lazy(lazy)
    }
}

impl<P> From<BoundMethod<P>> for Handler<P> {
    fn from(bound: BoundMethod<P>) -> Self {
        Self::Lazy(LazyHandler::new(bound, CALL))
    }
}

impl<P> fmt::Debug for Handler<P> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Callable(c) => fmt::Debug::fmt(c, f),
            Self::Lazy(l) => fmt::Debug::fmt(l, f),
        }
    }
}
