use std::{fmt, sync::Arc};

use webhooks_error::{DispatchError, WebhooksResult};

use super::{receiver::unresolved, BoundMethod, Callable, HandlerIdentity, Receiver};

/// Имя метода, на которое откликается любой вызываемый объект.
pub const CALL: &str = "call";

/// На чём ленивый обработчик ищет свой метод.
pub enum Target<P> {
    /// Замыкание: откликается только на [`CALL`].
    Callable(Callable<P>),
    /// Ссылка на метод: откликается только на [`CALL`].
    Bound(BoundMethod<P>),
    /// Объект с методами, которые ищутся по имени.
    Receiver(Arc<dyn Receiver<P>>),
}

/// Обработчик, связанный с получателем и именем метода, которого при
/// подписке может ещё не существовать.
///
/// Метод ищется заново при каждом вызове, поэтому определённый позже метод
/// начинает получать события без повторной подписки. Отсутствие метода —
/// ошибка `HandlerUnresolved` только в момент вызова.
pub struct LazyHandler<P> {
    target: Target<P>,
    method: String,
}

impl<P> LazyHandler<P> {
    pub fn new(
        target: impl Into<Target<P>>,
        method: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            method: method.into(),
        }
    }

    /// Ленивый обработчик на объекте-получателе.
    pub fn on(
        receiver: Arc<dyn Receiver<P>>,
        method: impl Into<String>,
    ) -> Self {
        Self::new(Target::Receiver(receiver), method)
    }

    pub fn target(&self) -> &Target<P> {
        &self.target
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn call(
        &self,
        payload: &P,
    ) -> WebhooksResult<()> {
        match &self.target {
            Target::Receiver(receiver) => receiver
                .invoke(&self.method, payload)
                .unwrap_or_else(|| Err(unresolved(receiver.as_ref(), &self.method).into())),
            Target::Callable(callable) if self.method == CALL => callable.call(payload),
            Target::Bound(bound) if self.method == CALL => bound.call(payload),
            Target::Callable(_) => Err(DispatchError::HandlerUnresolved {
                receiver: HandlerIdentity::CLOSURE.to_string(),
                method: self.method.clone(),
            }
            .into()),
            Target::Bound(bound) => Err(DispatchError::HandlerUnresolved {
                receiver: bound.identity().to_string(),
                method: self.method.clone(),
            }
            .into()),
        }
    }

    /// Нормализованная идентичность.
    ///
    /// Для замыкания это место определения, для ссылки на метод — её
    /// получатель и имя метода (поэтому `LazyHandler(obj, "m")` и
    /// `LazyHandler(obj.method("m"), "call")` равны), для объекта — имя
    /// получателя и объявленный метод.
    pub fn identity(&self) -> HandlerIdentity {
        match &self.target {
            Target::Callable(callable) => callable.identity(),
            Target::Bound(bound) => bound.identity(),
            Target::Receiver(receiver) => {
                HandlerIdentity::new(receiver.name(), self.method.as_str())
            }
        }
    }
}

impl<P> Clone for Target<P> {
    fn clone(&self) -> Self {
        match self {
            Self::Callable(c) => Self::Callable(c.clone()),
            Self::Bound(b) => Self::Bound(b.clone()),
            Self::Receiver(r) => Self::Receiver(Arc::clone(r)),
        }
    }
}

impl<P> Clone for LazyHandler<P> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            method: self.method.clone(),
        }
    }
}

impl<P> PartialEq for LazyHandler<P> {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.identity() == other.identity()
    }
}

impl<P> Eq for LazyHandler<P> {}

impl<P> From<Callable<P>> for Target<P> {
    fn from(callable: Callable<P>) -> Self {
        Self::Callable(callable)
    }
}

impl<P> From<BoundMethod<P>> for Target<P> {
    fn from(bound: BoundMethod<P>) -> Self {
        Self::Bound(bound)
    }
}

impl<P, R> From<Arc<R>> for Target<P>
where
    R: Receiver<P> + 'static,
{
    fn from(receiver: Arc<R>) -> Self {
        Self::Receiver(receiver)
    }
}

impl<P> fmt::Debug for LazyHandler<P> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "LazyHandler({})", self.identity())
    }
}
