//! Middleware layers for the HTTP API.

pub mod auth;
pub mod request_id;
