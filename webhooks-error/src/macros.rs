/// Выходит из функции с `Err(StackError)`.
///
/// Первым аргументом идёт либо готовая ошибка (`DispatchError`,
/// `SubscribeError`, ...), либо [`StatusCode`](crate::StatusCode); во втором
/// случае остальное становится сообщением `GenericError`, при необходимости
/// через `format!`.
///
///
/// ```ignore
/// use webhooks_error::{bail, StatusCode, WebhooksResult};
///
/// fn on_created(payload: &serde_json::Value) -> WebhooksResult<()> {
///     let Some(amount) = payload["amount"].as_i64() else {
///         bail!(StatusCode::InvalidData, "payout without amount");
///     };
///     if amount < 0 {
///         bail!(StatusCode::InvalidValue, "negative amount: {}", amount);
///     }
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($err:expr) => {
        return Err($crate::StackError::from($err))
    };
    ($code:expr, $msg:expr) => {
        return Err($crate::StackError::new(
            $crate::types::GenericError::new($code, $msg)
        ))
    };
    ($code:expr, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::StackError::new(
            $crate::types::GenericError::new($code, format!($fmt, $($arg)*))
        ))
    };
}

/// `bail!` при ложном условии. После условия принимает те же аргументы.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            $crate::bail!($err);
        }
    };
    ($cond:expr, $code:expr, $msg:expr) => {
        if !($cond) {
            $crate::bail!($code, $msg);
        }
    };
    ($cond:expr, $code:expr, $fmt:expr, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($code, $fmt, $($arg)*);
        }
    };
}

/// Макро-форма [`ResultExt::context`] с форматированием сообщения. Кадр
/// получает место раскрытия макроса.
#[macro_export]
macro_rules! context {
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(val) => Ok(val),
            Err(e) => Err($crate::StackError::from(e).context($msg)),
        }
    };
    ($result:expr, $fmt:expr, $($arg:tt)*) => {
        match $result {
            Ok(val) => Ok(val),
            Err(e) => Err($crate::StackError::from(e).context(format!($fmt, $($arg)*))),
        }
    };
}

/// Кадры контекста на любом `Result`, чья ошибка сводится к
/// [`StackError`](crate::StackError).
pub trait ResultExt<T> {
    /// Добавляет кадр при ошибке.
    fn context<C>(
        self,
        ctx: C,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>;

    /// Как `context`, но сообщение строится только при ошибке.
    fn with_context<C, F>(
        self,
        f: F,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<crate::StackError>,
{
    #[track_caller]
    fn context<C>(
        self,
        ctx: C,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>,
    {
        match self {
            Ok(val) => Ok(val),
            Err(e) => Err(e.into().context(ctx)),
        }
    }

    #[track_caller]
    fn with_context<C, F>(
        self,
        f: F,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        match self {
            Ok(val) => Ok(val),
            Err(e) => Err(e.into().context(f())),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
