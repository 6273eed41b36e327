// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP/WebSocket gateway for the Flowdesk backend.
//!
//! A thin driving surface over the order flow and the agent service:
//! typed request/response handlers, a live notification socket, and an
//! aggregated health endpoint. Authentication and user management stay
//! with outside collaborators; the gateway trusts the ids it is given.

pub mod error;
pub mod handlers;
pub mod notify;
pub mod ws;

use std::sync::Arc;

use axum::routing::{get, patch, post};
use axum::Router;
use flowdesk_agent::AgentService;
use flowdesk_core::{CompletionProvider, FlowdeskError, Notifier, Store};
use flowdesk_orders::OrderFlow;
use flowdesk_telegram::TelegramFleet;
use tower_http::cors::CorsLayer;

pub use error::ApiError;
pub use notify::{HubNotifier, NotifyEvent, NotifyHub};

/// Shared state for request handlers.
#[derive(Clone)]
pub struct AppState {
    pub flow: Arc<OrderFlow>,
    pub agents: Arc<AgentService>,
    pub store: Arc<dyn Store>,
    pub provider: Arc<dyn CompletionProvider>,
    pub notifier: Arc<dyn Notifier>,
    pub hub: Arc<NotifyHub>,
    /// Present when Telegram polling is enabled; bind requests then
    /// start a dispatcher immediately.
    pub fleet: Option<Arc<TelegramFleet>>,
}

/// Builds the full route table over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/api/chatbot", post(handlers::post_chatbot))
        .route("/api/chatbot/history", get(handlers::get_chatbot_history))
        .route("/api/agent/sessions", post(handlers::post_agent_sessions))
        .route("/api/agent/chat", post(handlers::post_agent_chat))
        .route("/api/agent/keys", post(handlers::post_agent_keys))
        .route("/api/agent/telegram", post(handlers::post_agent_telegram))
        .route("/api/sdk/chat", post(handlers::post_sdk_chat))
        .route(
            "/api/orders/{id}/status",
            patch(handlers::patch_order_status),
        )
        .route("/api/ws/notifications", get(ws::notifications_ws))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds and serves the gateway until the task is aborted.
pub async fn start_server(host: &str, port: u16, state: AppState) -> Result<(), FlowdeskError> {
    let app = router(state);
    let addr = format!("{host}:{port}");
    let listener =
        tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| FlowdeskError::Channel {
                message: format!("failed to bind gateway to {addr}: {e}"),
                source: Some(Box::new(e)),
            })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| FlowdeskError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
