use std::{fmt, panic::Location, sync::Arc};

use webhooks_error::WebhooksResult;

use super::HandlerIdentity;

/// Сигнатура обработчика: получает только полезную нагрузку события.
pub type HandlerFn<P> = dyn Fn(&P) -> WebhooksResult<()> + Send + Sync;

/// Замыкание-обработчик вместе с местом его определения.
///
/// Место определения фиксируется через `#[track_caller]` и служит
/// идентичностью замыкания: замыкания плохо сравниваются по значению, а
/// место в исходнике переживает пересоздание объекта.
pub struct Callable<P> {
    func: Arc<HandlerFn<P>>,
    site: &'static Location<'static>,
}

impl<P> Callable<P> {
    #[track_caller]
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&P) -> WebhooksResult<()> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            site: Location::caller(),
        }
    }

    /// Место в исходнике, где был создан обработчик.
    pub fn site(&self) -> &'static Location<'static> {
        self.site
    }

    pub fn identity(&self) -> HandlerIdentity {
        HandlerIdentity::closure(self.site)
    }

    #[inline]
    pub fn call(
        &self,
        payload: &P,
    ) -> WebhooksResult<()> {
        (self.func)(payload)
    }
}

impl<P> Clone for Callable<P> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
            site: self.site,
        }
    }
}

impl<P> fmt::Debug for Callable<P> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "Callable({}:{})", self.site.file(), self.site.line())
    }
}
