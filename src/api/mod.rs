//! HTTP API server module.
//!
//! This module provides the axum-based HTTP server exposing the task
//! endpoints over REST.

mod server;

pub use server::{ApiServer, build_router, start_server};
