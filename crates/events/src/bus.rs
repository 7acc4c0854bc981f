//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`SiteEvent`]s. It is
//! designed to be shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tavern_core::types::DbId;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Event type names
// ---------------------------------------------------------------------------

/// A character sheet was submitted and entered the moderation queue.
pub const EVENT_CHARACTER_SUBMITTED: &str = "character.submitted";

/// A moderator approved a character; its profile page now exists.
pub const EVENT_CHARACTER_APPROVED: &str = "character.approved";

/// A moderator rejected a character.
pub const EVENT_CHARACTER_REJECTED: &str = "character.rejected";

/// A moderator deleted a character.
pub const EVENT_CHARACTER_DELETED: &str = "character.deleted";

// ---------------------------------------------------------------------------
// SiteEvent
// ---------------------------------------------------------------------------

/// A domain event that occurred on the site.
///
/// Constructed via [`SiteEvent::new`] and enriched with the builder
/// methods [`with_source`](SiteEvent::with_source),
/// [`with_actor`](SiteEvent::with_actor), and
/// [`with_payload`](SiteEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteEvent {
    /// Dot-separated event name, e.g. `"character.submitted"`.
    pub event_type: String,

    /// Optional source entity kind (e.g. `"character"`).
    pub source_entity_type: Option<String>,

    /// Optional source entity database id.
    pub source_entity_id: Option<DbId>,

    /// Optional id of the moderator that triggered the event.
    /// `None` for public actions such as submissions.
    pub actor_moderator_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl SiteEvent {
    /// Create a new event with only the required `event_type`.
    ///
    /// All optional fields default to `None` / empty object.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            source_entity_type: None,
            source_entity_id: None,
            actor_moderator_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach a source entity to the event.
    pub fn with_source(mut self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        self.source_entity_type = Some(entity_type.into());
        self.source_entity_id = Some(entity_id);
        self
    }

    /// Attach the acting moderator to the event.
    pub fn with_actor(mut self, moderator_id: DbId) -> Self {
        self.actor_moderator_id = Some(moderator_id);
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`SiteEvent`].
pub struct EventBus {
    sender: broadcast::Sender<SiteEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    /// The persistence layer (when subscribed) ensures database capture.
    pub fn publish(&self, event: SiteEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<SiteEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
