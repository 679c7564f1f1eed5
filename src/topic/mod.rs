//! Пространства имён и шаблоны тем.
//!
//! - `namespace`: построение полных имён тем из корня, разделителя и листа.
//! - `pattern`: литеральный префиксный матчер, по которому реестр сопоставляет
//!   опубликованную тему с подписками.
//! - `intern` (приватный): пул общих `Arc<str>` для живых префиксов.

mod intern;
pub mod namespace;
pub mod pattern;

pub(crate) use intern::{intern_topic, pool_len};
pub use namespace::*;
pub use pattern::*;
