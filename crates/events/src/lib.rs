//! Tavern event bus and notification infrastructure.
//!
//! Provides the thin realtime layer between the moderation API and its
//! observers:
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`SiteEvent`] — the canonical site event envelope.
//! - [`EventPersistence`] — background service that durably writes every
//!   event to the `events` table.
//! - [`delivery`] — Discord webhook delivery channel.

pub mod bus;
pub mod delivery;
pub mod persistence;

pub use bus::{EventBus, SiteEvent};
pub use delivery::discord::DiscordNotifier;
pub use persistence::EventPersistence;
