//! HTTP request handlers, one module per resource.

pub mod api_keys;
pub mod auth;
pub mod character;
pub mod moderation;
