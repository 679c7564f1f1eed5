use std::fmt;

use num_enum::TryFromPrimitive;
#[cfg(feature = "serde_repr")]
use serde_repr::{Deserialize_repr, Serialize_repr};
#[cfg(feature = "strum")]
use strum_macros::{AsRefStr, EnumIter};

/// Коды статуса для категоризации ошибок.
///
/// # Диапазоны:
/// - 0xxx: Успех
/// - 1xxx: Общие ошибки и конфигурация
/// - 2xxx: Ошибки данных
/// - 9xxx: Подписки и доставка событий
///
/// Код переживает сериализацию отчёта об ошибке, поэтому значения
/// вариантов менять нельзя. `TryFrom<u32>` генерирует `num_enum`, числовая
/// сериализация включается фичей `serde_repr`.
#[cfg_attr(feature = "strum", derive(AsRefStr, EnumIter))]
#[cfg_attr(feature = "serde_repr", derive(Serialize_repr, Deserialize_repr))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u32)]
#[non_exhaustive]
pub enum StatusCode {
    // === 0xxx: Успех ===
    Success = 0,

    // === 1xxx: Общие ошибки ===
    Unknown = 1000,
    Unsupported = 1001,
    Unexpected = 1002,
    Internal = 1003,
    InvalidArgs = 1004,
    NotImplemented = 1005,
    InvalidConfig = 1006,

    // === 2xxx: Ошибки данных ===
    NotFound = 2000,
    AlreadyExists = 2001,
    InvalidValue = 2004,
    InvalidData = 2009,

    // === 9xxx: Подписки и доставка ===
    HandlerUnresolved = 9000,
    HandlerFailed = 9001,
    InvalidHandlerSpec = 9002,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl StatusCode {
    /// Числовое представление кода статуса.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Является ли код ошибкой вызывающей стороны — неверные аргументы,
    /// спецификация обработчика или конфигурация.
    pub fn is_client_error(&self) -> bool {
        let c = self.code();
        if (2000..=2999).contains(&c) {
            return true;
        }
        matches!(
            self,
            Self::InvalidArgs | Self::InvalidConfig | Self::InvalidHandlerSpec
        )
    }

    /// Является ли код внутренней ошибкой.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Unknown | Self::Unexpected | Self::Internal | Self::NotImplemented
        )
    }

    /// Ошибка, возникшая при доставке события подписчику (диапазон 9xxx).
    pub fn is_dispatch_error(&self) -> bool {
        (9000..=9999).contains(&self.code())
    }

    /// Уровень, с которым CLI пишет ошибку с этим кодом в лог.
    pub fn log_level(&self) -> LogLevel {
        match self {
            Self::Success => LogLevel::Trace,
            Self::NotFound | Self::AlreadyExists => LogLevel::Debug,
            Self::InvalidArgs
            | Self::InvalidValue
            | Self::InvalidData
            | Self::InvalidConfig
            | Self::InvalidHandlerSpec => LogLevel::Info,
            Self::HandlerUnresolved | Self::HandlerFailed => LogLevel::Warn,
            Self::Internal | Self::Unexpected => LogLevel::Error,
            _ => LogLevel::Warn,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для StatusCode
////////////////////////////////////////////////////////////////////////////////

impl From<StatusCode> for u32 {
    fn from(c: StatusCode) -> Self {
        c.code()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        #[cfg(feature = "strum")]
        {
            write!(f, "{} ({})", self.as_ref(), self.code())
        }
        #[cfg(not(feature = "strum"))]
        {
            write!(f, "{:?} ({})", self, self.code())
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    /// Тест проверяет разделение ошибок вызывающей стороны и внутренних.
    #[test]
    fn test_client_vs_server() {
        assert!(StatusCode::InvalidArgs.is_client_error());
        assert!(StatusCode::InvalidHandlerSpec.is_client_error());
        assert!(StatusCode::NotFound.is_client_error());
        assert!(!StatusCode::HandlerFailed.is_client_error());
        assert!(StatusCode::NotImplemented.is_server_error());
        assert!(!StatusCode::InvalidConfig.is_server_error());
    }

    /// Тест проверяет, что код переживает путь через число, а незнакомое
    /// число не превращается в код.
    #[test]
    fn test_numeric_round_trip() {
        for code in [
            StatusCode::InvalidConfig,
            StatusCode::InvalidData,
            StatusCode::HandlerUnresolved,
            StatusCode::InvalidHandlerSpec,
        ] {
            let n: u32 = code.into();
            assert_eq!(StatusCode::try_from(n).ok(), Some(code));
        }
        assert!(StatusCode::try_from(9999u32).is_err());
        assert_eq!(StatusCode::HandlerFailed.code(), 9001);
    }

    /// Тест проверяет диапазон ошибок доставки (9xxx).
    #[test]
    fn test_is_dispatch_error() {
        assert!(StatusCode::HandlerUnresolved.is_dispatch_error());
        assert!(StatusCode::HandlerFailed.is_dispatch_error());
        assert!(!StatusCode::InvalidArgs.is_dispatch_error());
    }

    /// Тест проверяет рекомендуемые уровни логирования.
    #[test]
    fn test_log_level() {
        assert_eq!(StatusCode::Success.log_level(), LogLevel::Trace);
        assert_eq!(StatusCode::InvalidArgs.log_level(), LogLevel::Info);
        assert_eq!(StatusCode::HandlerUnresolved.log_level(), LogLevel::Warn);
        assert_eq!(StatusCode::Internal.log_level(), LogLevel::Error);
        assert_eq!(StatusCode::AlreadyExists.log_level(), LogLevel::Debug);
    }

    /// Тест проверяет формат Display без feature "strum".
    #[cfg(not(feature = "strum"))]
    #[test]
    fn test_display() {
        assert_eq!(
            StatusCode::HandlerUnresolved.to_string(),
            "HandlerUnresolved (9000)"
        );
    }
}
