//! Event-to-notification routing.
//!
//! [`NotificationRouter`] subscribes to the site event bus and fans each
//! event out to its delivery channels: a JSON frame pushed to every
//! connected moderator WebSocket client, and (when configured) a Discord
//! webhook message.

use std::sync::Arc;

use axum::extract::ws::Message;
use tavern_events::{DiscordNotifier, SiteEvent};
use tokio::sync::broadcast;

use crate::ws::WsManager;

/// Routes site events to moderator notifications.
pub struct NotificationRouter {
    ws_manager: Arc<WsManager>,
    discord: Option<DiscordNotifier>,
}

impl NotificationRouter {
    /// Create a new router.
    ///
    /// `discord_webhook_url` enables Discord delivery when set.
    pub fn new(ws_manager: Arc<WsManager>, discord_webhook_url: Option<String>) -> Self {
        Self {
            ws_manager,
            discord: discord_webhook_url.map(DiscordNotifier::new),
        }
    }

    /// Run the main routing loop.
    ///
    /// Subscribes to the event bus via `receiver` and processes each event.
    /// The loop exits when the channel is closed (i.e. the
    /// [`EventBus`](tavern_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<SiteEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.route_event(&event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification router lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification router shutting down");
                    break;
                }
            }
        }
    }

    /// Fan a single event out to all channels.
    async fn route_event(&self, event: &SiteEvent) {
        self.push_to_panel(event).await;

        if let Some(discord) = &self.discord {
            // Delivery retries internally; a final failure is logged and
            // the event still reached the panel and the events table.
            if let Err(e) = discord.deliver(event).await {
                tracing::error!(
                    error = %e,
                    event_type = %event.event_type,
                    "Discord delivery failed"
                );
            }
        }
    }

    /// Push the event as a JSON text frame to every connected moderator.
    async fn push_to_panel(&self, event: &SiteEvent) {
        let msg = serde_json::json!({
            "type": "event",
            "event_type": event.event_type,
            "source_entity_type": event.source_entity_type,
            "source_entity_id": event.source_entity_id,
            "payload": event.payload,
            "timestamp": event.timestamp,
        });
        let ws_msg = Message::Text(msg.to_string().into());
        self.ws_manager.broadcast(ws_msg).await;
    }
}
