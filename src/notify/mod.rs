//! Notification fan-out.
//!
//! ## Contents
//! - `Notifier` forwards countdown transitions to the bus, the host broadcast and
//!   the external sink
//! - [`ExternalSink`], [`ExternalNotice`], [`NoticeStatus`] the external channel contract
//! - [`DiscordWebhook`] the built-in sink (feature `webhook`)
//! - [`Messages`] player/operator message templates

mod messages;
mod notifier;
mod sink;
#[cfg(feature = "webhook")]
mod webhook;

pub use messages::Messages;
pub(crate) use notifier::{Notice, Notifier};
pub use sink::{ExternalNotice, ExternalSink, NoticeStatus};
#[cfg(feature = "webhook")]
pub use webhook::{DiscordWebhook, WebhookMessage};
