use std::{fmt, panic::Location, sync::Arc};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{ErrorExt, StatusCode};

/// Ошибка движка: корневая ошибка и цепочка кадров контекста.
///
/// Корень лежит за `Arc`, поэтому клон дешёвый, а ошибку обработчика,
/// вызванного в одном потоке, можно вернуть в другой. Кадры добавляются
/// через [`StackError::context`] по мере подъёма ошибки и помнят место
/// вызова.
#[derive(Clone)]
pub struct StackError {
    root: Arc<dyn ErrorExt>,
    frames: Vec<Frame>,
}

/// Один кадр контекста.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub message: String,
    pub location: &'static Location<'static>,
}

impl fmt::Display for Frame {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "{} ({}:{})",
            self.message,
            self.location.file(),
            self.location.line()
        )
    }
}

/// Сериализуемый отчёт об ошибке (диагностика доставки вебхуков).
#[cfg(feature = "serde")]
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub code: u32,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<String>,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl StackError {
    pub fn new<E: ErrorExt>(err: E) -> Self {
        Self {
            root: Arc::new(err),
            frames: Vec::new(),
        }
    }

    /// Добавляет кадр контекста с местом вызова.
    #[track_caller]
    pub fn context(
        mut self,
        message: impl Into<String>,
    ) -> Self {
        self.frames.push(Frame {
            message: message.into(),
            location: Location::caller(),
        });
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.root.status_code()
    }

    /// Корневая ошибка без контекста.
    pub fn root(&self) -> &dyn ErrorExt {
        self.root.as_ref()
    }

    /// Кадры в порядке добавления: первый добавлен ближе всего к корню.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn downcast_ref<T: ErrorExt>(&self) -> Option<&T> {
        self.root.as_any().downcast_ref::<T>()
    }

    /// Ошибка возникла при вызове обработчика (метод не найден или
    /// обработчик упал с ошибкой доставки).
    pub fn is_dispatch_error(&self) -> bool {
        self.status_code().is_dispatch_error()
    }

    pub fn client_message(&self) -> String {
        self.root.client_message()
    }

    /// Теги корневой ошибки плюс глубина контекста.
    pub fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = self.root.metrics_tags();
        tags.push(("frames", self.frames.len().to_string()));
        tags
    }

    /// Многострочный отчёт с местами добавления контекста.
    ///
    /// ```text
    /// undefined method 'created' for Hooks
    ///   0: publish 'payout.created' (src/pubsub/registry.rs:210)
    /// ```
    pub fn report(&self) -> String {
        let mut out = self.root.to_string();
        for (i, frame) in self.frames.iter().enumerate() {
            out.push_str(&format!("\n  {i}: {frame}"));
        }
        out
    }

    #[cfg(feature = "serde")]
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.status_code().code(),
            message: self.client_message(),
            frames: self.frames.iter().map(Frame::to_string).collect(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для StackError
////////////////////////////////////////////////////////////////////////////////

impl fmt::Debug for StackError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("StackError")
            .field("root", &self.root.to_string())
            .field("status_code", &self.status_code())
            .field("frames", &self.frames)
            .finish()
    }
}

/// Внешний контекст первым: `outer: inner: root`.
impl fmt::Display for StackError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for frame in self.frames.iter().rev() {
            write!(f, "{}: ", frame.message)?;
        }
        write!(f, "{}", self.root)
    }
}

impl std::error::Error for StackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.root.as_ref())
    }
}

impl<E: ErrorExt> From<E> for StackError {
    fn from(err: E) -> Self {
        Self::new(err)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
