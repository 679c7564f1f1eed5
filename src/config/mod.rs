//! Настройки издателя, логирования и декларативных подписок.

pub mod publisher;
pub mod settings;

pub use publisher::*;
pub use settings::*;
