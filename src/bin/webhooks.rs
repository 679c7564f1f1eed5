//! CLI для webhooks
//!
//! Загружает настройки, поднимает издателя, подписывает печатающего
//! получателя на объявленные в настройках темы и публикует события из
//! командной строки.

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{debug, error, info, warn};
use webhooks::{
    init_logging, HandlerSpec, LogFormat, LogLevel, MethodTable, Publisher, Receiver, Settings,
    StackError, SubscriptionDecl, Subscriber, CALL,
};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_COMMIT"),
    ", built ",
    env!("BUILD_TIME"),
    ")"
);

/// Основная структура CLI аргументов
#[derive(Parser)]
#[command(name = "webhooks")]
#[command(version = VERSION)]
#[command(about = "Publish events to in-process webhook subscribers", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Путь к файлу настроек (toml, yaml, json)
    #[arg(short, long, env = "WEBHOOKS_CONFIG")]
    config: Option<PathBuf>,
    /// Пространство имён вместо указанного в настройках
    #[arg(short, long)]
    namespace: Option<String>,
    /// Формат логов вместо указанного в настройках
    #[arg(long, value_enum)]
    log_format: Option<CliLogFormat>,
    /// Включить подробный вывод (debug)
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,
    /// Подавить большинство логов (только warn/error)
    #[arg(short, long)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum CliLogFormat {
    Compact,
    Pretty,
    Json,
}

impl From<CliLogFormat> for LogFormat {
    fn from(format: CliLogFormat) -> Self {
        match format {
            CliLogFormat::Compact => LogFormat::Compact,
            CliLogFormat::Pretty => LogFormat::Pretty,
            CliLogFormat::Json => LogFormat::Json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Опубликовать событие в одну или несколько тем
    #[command(alias = "p")]
    Publish {
        /// Лист темы; можно указать несколько раз
        #[arg(short, long = "topic", required = true)]
        topics: Vec<String>,
        /// Полезная нагрузка в JSON
        #[arg(short, long, default_value = "{}")]
        payload: String,
    },
    /// Показать подписки из настроек
    #[command(alias = "ls")]
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    if let Some(namespace) = cli.namespace {
        settings.publisher.namespace = namespace;
    }
    if let Some(format) = cli.log_format {
        settings.logging.format = format.into();
    }
    if cli.verbose {
        settings.logging.level = "debug".to_string();
    } else if cli.quiet {
        settings.logging.level = "warn".to_string();
    }
    init_logging(&settings.logging).context("failed to initialize logging")?;

    let publisher: Publisher<Value> =
        Publisher::new(&settings.publisher).context("invalid publisher settings")?;
    let receiver = printing_receiver(&settings.subscriptions);
    let subscriber = Subscriber::new(publisher.clone(), receiver);

    let decls = if settings.subscriptions.is_empty() {
        vec![SubscriptionDecl::new("all", None)]
    } else {
        settings.subscriptions.clone()
    };
    subscriber
        .apply(&decls)
        .context("failed to apply subscriptions")?;
    debug!(namespace = %publisher.namespace(), count = decls.len(), "subscriptions applied");

    match cli.command {
        Commands::Publish { topics, payload } => {
            let payload: Value =
                serde_json::from_str(&payload).context("payload is not valid JSON")?;
            for topic in &topics {
                let delivered = publisher
                    .publish(topic.as_str(), &payload)
                    .inspect_err(log_failure)
                    .with_context(|| format!("failed to publish '{topic}'"))?;
                println!("{} -> {delivered} handler(s)", publisher.topic(topic.as_str()));
            }
        }
        Commands::List => {
            for (topic_id, entries) in publisher.subscribers() {
                let topic = topic_id.as_deref().unwrap_or("<all>");
                for entry in entries {
                    println!("{topic:<16} {} {}", entry.id(), entry.identity());
                }
            }
        }
    }

    Ok(())
}

/// Пишет ошибку доставки в лог с уровнем по её коду.
fn log_failure(err: &StackError) {
    let code = err.status_code();
    let report = err.report();
    match code.log_level() {
        LogLevel::Error => error!(%code, "{report}"),
        LogLevel::Warn => warn!(%code, "{report}"),
        LogLevel::Info => info!(%code, "{report}"),
        LogLevel::Debug | LogLevel::Trace => debug!(%code, "{report}"),
    }
}

/// Получатель, который печатает каждое событие. Определяет `call` и все
/// методы, названные в настройках.
fn printing_receiver(decls: &[SubscriptionDecl]) -> Arc<dyn Receiver<Value>> {
    let table = Arc::new(MethodTable::new("cli"));
    let methods = decls
        .iter()
        .filter_map(|decl| match HandlerSpec::<Value>::parse(decl.with.as_deref()) {
            Ok(HandlerSpec::Method(name)) => Some(name),
            _ => None,
        })
        .chain(std::iter::once(CALL.to_string()));

    for method in methods {
        let label = method.clone();
        table.define(method, move |payload: &Value| {
            println!("cli#{label} <- {payload}");
            Ok(())
        });
    }
    table
}
