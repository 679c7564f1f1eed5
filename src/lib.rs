//! In-process publish/subscribe for named events.
//!
//! A [`Publisher`] is bound to a [`Namespace`] (`root` + `delimiter`) and
//! broadcasts payloads to every handler whose subscription pattern is a
//! literal prefix of the published topic. Handlers may be closures, bound
//! method references or [`LazyHandler`]s that look their method up on a
//! [`Receiver`] at every call, so a method defined after subscribing starts
//! receiving events without re-subscribing.
//!
//! ```
//! use webhooks::{Namespace, Publisher};
//!
//! let payouts: Publisher<u64> = Publisher::from_namespace(Namespace::new("payout", "."));
//! payouts.subscribe_fn("created", |amount| {
//!     assert_eq!(*amount, 100);
//!     Ok(())
//! })?;
//! assert_eq!(payouts.publish("created", &100)?, 1);
//! # Ok::<(), webhooks::StackError>(())
//! ```

/// Settings: publisher, logging, declarative subscriptions.
pub mod config;
/// Event handlers, their identity and lazy method resolution.
pub mod handler;
/// Logging setup on top of `tracing`.
pub mod logging;
/// Registry, publisher and declarative subscriber.
pub mod pubsub;
/// Namespaces and topic patterns.
pub mod topic;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// Settings.
pub use crate::config::{PublisherConfig, Settings, SubscriptionDecl};
/// Handlers.
pub use handler::{
    BoundMethod, Callable, Handler, HandlerIdentity, LazyHandler, MethodTable, Receiver, Target,
    CALL,
};
/// Logging.
pub use logging::{init_logging, LogFormat, LoggingConfig};
/// Pub/Sub API.
pub use pubsub::{
    Adapter, HandlerSpec, Notification, Publisher, Registry, SubscriberEntry, Subscriber,
    SubscriptionBuilder, SubscriptionId,
};
/// Topics.
pub use topic::{Namespace, Pattern};
/// Errors and result types.
pub use webhooks_error::{
    bail, ensure, ConfigError, DispatchError, GenericError, LogLevel, ResultExt, StackError,
    StatusCode, SubscribeError, WebhooksResult,
};
