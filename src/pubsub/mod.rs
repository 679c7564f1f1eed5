//! Движок публикации и подписки.
//!
//! - `adapter`: сводит запись о публикации к вызову обработчика с нагрузкой.
//! - `notification`: запись о публикации.
//! - `registry`: общий реестр подписок с синхронной рассылкой.
//! - `publisher`: API издателя, привязанный к пространству имён.
//! - `subscriber`: декларативные подписки получателя.

pub mod adapter;
pub mod notification;
pub mod publisher;
pub mod registry;
pub mod subscriber;

pub use adapter::*;
pub use notification::*;
pub use publisher::*;
pub use registry::*;
pub use subscriber::*;
