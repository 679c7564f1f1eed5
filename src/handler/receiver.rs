use std::{borrow::Cow, collections::HashMap, fmt, sync::Arc};

use parking_lot::RwLock;
use webhooks_error::{DispatchError, WebhooksResult};

use super::{Callable, HandlerIdentity};

/// Объект, методы которого ищутся по имени в момент вызова.
///
/// Реализуйте трейт для своих типов, чтобы подписывать их методы по имени:
///
/// ```
/// use std::borrow::Cow;
/// use webhooks::{Receiver, WebhooksResult};
///
/// struct PayoutHooks;
///
/// impl Receiver<serde_json::Value> for PayoutHooks {
///     fn name(&self) -> Cow<'_, str> {
///         Cow::Borrowed("PayoutHooks")
///     }
///
///     fn responds_to(&self, method: &str) -> bool {
///         method == "created"
///     }
///
///     fn invoke(
///         &self,
///         method: &str,
///         payload: &serde_json::Value,
///     ) -> Option<WebhooksResult<()>> {
///         match method {
///             "created" => Some(Ok(())),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Receiver<P>: Send + Sync {
    /// Стабильное имя получателя. Участвует в идентичности обработчиков,
    /// поэтому пересозданный объект того же "класса" должен возвращать то же
    /// имя.
    fn name(&self) -> Cow<'_, str>;

    /// Есть ли у получателя метод `method` прямо сейчас.
    fn responds_to(
        &self,
        method: &str,
    ) -> bool;

    /// Вызывает метод по имени. `None`, если метода нет.
    fn invoke(
        &self,
        method: &str,
        payload: &P,
    ) -> Option<WebhooksResult<()>>;
}

/// Получатель с таблицей методов, которые можно определять и удалять во
/// время работы.
///
/// Подписка на метод, которого ещё нет, допустима: поиск выполняется при
/// каждом вызове.
pub struct MethodTable<P> {
    name: String,
    methods: RwLock<HashMap<String, Callable<P>>>,
}

impl<P> MethodTable<P> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: RwLock::new(HashMap::new()),
        }
    }

    /// Определяет (или переопределяет) метод.
    #[track_caller]
    pub fn define<F>(
        &self,
        method: impl Into<String>,
        func: F,
    ) where
        F: Fn(&P) -> WebhooksResult<()> + Send + Sync + 'static,
    {
        let callable = Callable::new(func);
        self.methods.write().insert(method.into(), callable);
    }

    /// Удаляет метод. Возвращает `true`, если он был определён.
    pub fn undefine(
        &self,
        method: &str,
    ) -> bool {
        self.methods.write().remove(method).is_some()
    }

    /// Имена определённых методов в алфавитном порядке.
    pub fn method_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.methods.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl<P: 'static> MethodTable<P> {
    /// Ссылка на уже определённый метод (аналог `obj.method(:name)`).
    pub fn method(
        self: &Arc<Self>,
        method: &str,
    ) -> WebhooksResult<BoundMethod<P>> {
        BoundMethod::new(self.clone(), method)
    }
}

impl<P> Receiver<P> for MethodTable<P> {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    fn responds_to(
        &self,
        method: &str,
    ) -> bool {
        self.methods.read().contains_key(method)
    }

    fn invoke(
        &self,
        method: &str,
        payload: &P,
    ) -> Option<WebhooksResult<()>> {
        // Блокировка отпускается до вызова: метод может переопределять таблицу.
        let callable = self.methods.read().get(method).cloned()?;
        Some(callable.call(payload))
    }
}

impl<P> fmt::Debug for MethodTable<P> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("MethodTable")
            .field("name", &self.name)
            .field("methods", &self.method_names())
            .finish()
    }
}

/// Ссылка на метод конкретного получателя.
///
/// Создаётся только для существующего метода. Вызов всё равно идёт через
/// `Receiver::invoke`, поэтому удалённый позже метод даёт
/// `HandlerUnresolved`.
pub struct BoundMethod<P> {
    receiver: Arc<dyn Receiver<P>>,
    name: String,
}

impl<P> BoundMethod<P> {
    pub fn new(
        receiver: Arc<dyn Receiver<P>>,
        method: &str,
    ) -> WebhooksResult<Self> {
        if !receiver.responds_to(method) {
            return Err(unresolved(receiver.as_ref(), method).into());
        }
        Ok(Self {
            receiver,
            name: method.to_string(),
        })
    }

    pub fn receiver(&self) -> &Arc<dyn Receiver<P>> {
        &self.receiver
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn identity(&self) -> HandlerIdentity {
        HandlerIdentity::new(self.receiver.name(), self.name.as_str())
    }

    pub fn call(
        &self,
        payload: &P,
    ) -> WebhooksResult<()> {
        self.receiver
            .invoke(&self.name, payload)
            .unwrap_or_else(|| Err(unresolved(self.receiver.as_ref(), &self.name).into()))
    }
}

impl<P> Clone for BoundMethod<P> {
    fn clone(&self) -> Self {
        Self {
            receiver: Arc::clone(&self.receiver),
            name: self.name.clone(),
        }
    }
}

impl<P> fmt::Debug for BoundMethod<P> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "BoundMethod({}#{})", self.receiver.name(), self.name)
    }
}

pub(crate) fn unresolved<P, R>(
    receiver: &R,
    method: &str,
) -> DispatchError
where
    R: Receiver<P> + ?Sized,
{
    DispatchError::HandlerUnresolved {
        receiver: receiver.name().into_owned(),
        method: method.to_string(),
    }
}
