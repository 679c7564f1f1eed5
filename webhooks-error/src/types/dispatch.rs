use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Ошибки вызова обработчика во время публикации события.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Метод ленивого обработчика не найден у получателя в момент вызова.
    #[error("undefined method '{method}' for {receiver}")]
    HandlerUnresolved { receiver: String, method: String },

    /// Обработчик сообщил об ошибке.
    #[error("handler failed: {reason}")]
    HandlerFailed { reason: String },
}

impl DispatchError {
    /// Удобный конструктор для обработчиков событий.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::HandlerFailed {
            reason: reason.into(),
        }
    }
}

impl ErrorExt for DispatchError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerUnresolved { .. } => StatusCode::HandlerUnresolved,
            Self::HandlerFailed { .. } => StatusCode::HandlerFailed,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", "dispatch".to_string()),
            ("status_code", self.status_code().to_string()),
        ];

        if let Self::HandlerUnresolved { receiver, method } = self {
            tags.push(("receiver", receiver.clone()));
            tags.push(("method", method.clone()));
        }

        tags
    }
}
