use std::sync::Arc;

use crate::config::ServerConfig;
use crate::middleware::rate_limit::RateLimiter;
use crate::profiles::ProfileWriter;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: tavern_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (moderator panel clients).
    pub ws_manager: Arc<WsManager>,
    /// Centralized event bus for publishing site events.
    pub event_bus: Arc<tavern_events::EventBus>,
    /// Per-IP limiter for the public submission endpoint.
    pub rate_limiter: Arc<RateLimiter>,
    /// Renders and writes static profile pages for approved characters.
    pub profiles: Arc<ProfileWriter>,
}
