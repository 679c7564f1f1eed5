use std::{any::Any, error::Error};

use crate::StatusCode;

/// Общий трейт ошибок движка (object-safe).
///
/// Каждая ошибка знает свой [`StatusCode`]; по нему вызывающий код решает,
/// что показать наружу и с каким уровнем логировать.
pub trait ErrorExt: Error + Send + Sync + 'static {
    /// По умолчанию [`StatusCode::Internal`].
    fn status_code(&self) -> StatusCode {
        StatusCode::Internal
    }

    /// Для downcast к конкретному типу.
    fn as_any(&self) -> &dyn Any;

    /// Сообщение, которое можно отдать за пределы процесса.
    ///
    /// Внутренние ошибки скрываются за `"Internal error"`, остальные
    /// отдаются как есть.
    fn client_message(&self) -> String {
        if self.status_code().is_server_error() {
            "Internal error".to_string()
        } else {
            self.to_string()
        }
    }

    /// Теги для метрик. Типы ошибок дополняют их своими полями.
    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        vec![("status_code", self.status_code().code().to_string())]
    }
}
