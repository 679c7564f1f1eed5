use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Ошибки регистрации подписчика.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscribeError {
    /// Подписка без обработчика: не передан ни обработчик, ни замыкание.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Спецификация обработчика не является ни пустой, ни именем метода,
    /// ни вызываемым объектом. Из текста так разбирается пустое имя.
    #[error("unknown handler '{spec}'")]
    UnknownHandlerSpec { spec: String },
}

impl ErrorExt for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidArgument { .. } => StatusCode::InvalidArgs,
            Self::UnknownHandlerSpec { .. } => StatusCode::InvalidHandlerSpec,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", "subscribe".to_string()),
            ("status_code", self.status_code().to_string()),
        ];

        if let Self::UnknownHandlerSpec { spec } = self {
            tags.push(("handler_spec", spec.clone()));
        }

        tags
    }
}
