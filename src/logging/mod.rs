//! Логирование через `tracing`.
//!
//! Движок сам подписчика не устанавливает: он только пишет события
//! (`debug!` при подписке и отписке, `trace!` на каждый вызов обработчика).
//! Приложение вызывает [`init_logging`] один раз при старте.

pub mod config;
mod filters;
mod formatter;

pub use self::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use webhooks_error::{bail, StatusCode, WebhooksResult};

/// Устанавливает глобальный подписчик `tracing`.
///
/// Повторный вызов возвращает ошибку `Internal`: глобальный подписчик
/// устанавливается только один раз.
pub fn init_logging(config: &LoggingConfig) -> WebhooksResult<()> {
    config.validate()?;

    let env_filter = filters::build_filter_from_config(config);
    let fmt_layer = formatter::build_formatter_from_config(config);

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
    {
        bail!(StatusCode::Internal, "logging already initialized: {}", e);
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        level = %config.level,
        format = ?config.format,
        "Logging system initialized"
    );
    Ok(())
}
