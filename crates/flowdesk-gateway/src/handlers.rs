// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the Flowdesk REST API.
//!
//! Every handler is a thin translation layer: deserialize, call the
//! domain service, serialize. Domain errors propagate with `?` and map
//! to status codes in [`crate::error::ApiError`].

use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

use flowdesk_agent::ConversationKey;
use flowdesk_core::{
    Attachment, ChatTurn, FlowdeskError, HealthStatus, OrderRecord, OrderStatus,
};
use flowdesk_orders::GUEST_USER;

use crate::error::ApiError;
use crate::AppState;

/// Turns returned by the history endpoint, newest last.
const HISTORY_LIMIT: i64 = 200;

// --- Chatbot ---

/// Request body for POST /api/chatbot.
#[derive(Debug, Deserialize)]
pub struct ChatbotRequest {
    /// Visitor identity; anonymous visitors share the guest identity.
    #[serde(default)]
    pub user_id: Option<String>,
    /// May be empty on upload-only turns.
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub attachment: Option<AttachmentUpload>,
}

/// Uploaded file metadata. The bytes are stored by the upload collaborator;
/// the flow only needs the name.
#[derive(Debug, Deserialize)]
pub struct AttachmentUpload {
    pub file_name: String,
}

/// Response body for POST /api/chatbot.
#[derive(Debug, Serialize)]
pub struct ChatbotResponse {
    pub user_message: String,
    pub bot_reply: String,
    /// Up to five previous turns followed by the turn just processed.
    pub conversation: Vec<ChatTurn>,
}

/// POST /api/chatbot
///
/// Runs one turn of the order-taking conversation.
pub async fn post_chatbot(
    State(state): State<AppState>,
    Json(body): Json<ChatbotRequest>,
) -> Result<Json<ChatbotResponse>, ApiError> {
    let attachment = body.attachment.map(|a| Attachment {
        file_name: a.file_name,
    });
    let outcome = state
        .flow
        .handle_turn(body.user_id.as_deref(), &body.message, attachment)
        .await?;
    Ok(Json(ChatbotResponse {
        user_message: outcome.user_message,
        bot_reply: outcome.bot_reply,
        conversation: outcome.conversation,
    }))
}

/// Query parameters for GET /api/chatbot/history.
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Response body for GET /api/chatbot/history.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub user_id: String,
    pub turns: Vec<ChatTurn>,
}

/// GET /api/chatbot/history?user_id=
pub async fn get_chatbot_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let user_id = params
        .user_id
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .unwrap_or(GUEST_USER);
    let turns = state.store.recent_chat_turns(user_id, HISTORY_LIMIT).await?;
    Ok(Json(HistoryResponse {
        user_id: user_id.to_string(),
        turns,
    }))
}

// --- Agent sessions ---

/// Request body for POST /api/agent/sessions.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub owner_user_id: String,
    pub name: String,
    pub business_type: String,
    pub business_description: String,
    /// Plan name; the service default applies when omitted.
    #[serde(default)]
    pub plan: Option<String>,
}

/// Response body for POST /api/agent/sessions.
#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub greeting: String,
}

/// POST /api/agent/sessions
pub async fn post_agent_sessions(
    State(state): State<AppState>,
    Json(body): Json<CreateSessionRequest>,
) -> Result<Json<CreateSessionResponse>, ApiError> {
    let (session, greeting) = state
        .agents
        .create_session(
            &body.owner_user_id,
            &body.name,
            &body.business_type,
            &body.business_description,
            body.plan.as_deref(),
        )
        .await?;
    Ok(Json(CreateSessionResponse {
        session_id: session.id,
        greeting,
    }))
}

/// Request body for POST /api/agent/chat.
#[derive(Debug, Deserialize)]
pub struct AgentChatRequest {
    pub session_id: String,
    pub message: String,
}

/// Reply shape shared by the web and SDK chat endpoints.
#[derive(Debug, Serialize)]
pub struct AgentChatResponse {
    pub reply: String,
    pub usage_used: i64,
    pub usage_limit: i64,
}

/// POST /api/agent/chat
///
/// One metered turn on the session's primary web conversation.
pub async fn post_agent_chat(
    State(state): State<AppState>,
    Json(body): Json<AgentChatRequest>,
) -> Result<Json<AgentChatResponse>, ApiError> {
    let reply = state
        .agents
        .accept(
            ConversationKey::Primary {
                session_id: body.session_id,
            },
            &body.message,
        )
        .await?;
    Ok(Json(AgentChatResponse {
        reply: reply.text,
        usage_used: reply.usage_used,
        usage_limit: reply.usage_limit,
    }))
}

/// Request body for POST /api/agent/keys.
#[derive(Debug, Deserialize)]
pub struct IssueKeyRequest {
    pub session_id: String,
}

/// Response body for POST /api/agent/keys. The key is shown exactly once.
#[derive(Debug, Serialize)]
pub struct IssueKeyResponse {
    pub api_key: String,
}

/// POST /api/agent/keys
pub async fn post_agent_keys(
    State(state): State<AppState>,
    Json(body): Json<IssueKeyRequest>,
) -> Result<Json<IssueKeyResponse>, ApiError> {
    let api_key = state.agents.issue_key(&body.session_id).await?;
    Ok(Json(IssueKeyResponse { api_key }))
}

/// Request body for POST /api/agent/telegram.
#[derive(Debug, Deserialize)]
pub struct BindTelegramRequest {
    pub session_id: String,
    pub bot_token: String,
}

/// Response body for POST /api/agent/telegram.
#[derive(Debug, Serialize)]
pub struct BindTelegramResponse {
    pub session_id: String,
    /// Whether a dispatcher is polling for this bot now.
    pub polling: bool,
}

/// POST /api/agent/telegram
///
/// Binds a bot token to the session and starts polling immediately when
/// the Telegram adapter is enabled.
pub async fn post_agent_telegram(
    State(state): State<AppState>,
    Json(body): Json<BindTelegramRequest>,
) -> Result<Json<BindTelegramResponse>, ApiError> {
    state
        .agents
        .bind_telegram(&body.bot_token, &body.session_id)
        .await?;

    let mut polling = false;
    if let Some(fleet) = &state.fleet {
        fleet.launch(&body.bot_token).await?;
        polling = true;
    }

    Ok(Json(BindTelegramResponse {
        session_id: body.session_id,
        polling,
    }))
}

/// Request body for POST /api/sdk/chat. The API key travels in the
/// `x-api-key` header, not the body.
#[derive(Debug, Deserialize)]
pub struct SdkChatRequest {
    /// Caller-chosen id isolating one end-user's conversation.
    #[serde(default)]
    pub session_id: Option<String>,
    pub message: String,
}

/// POST /api/sdk/chat
pub async fn post_sdk_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SdkChatRequest>,
) -> Result<Json<AgentChatResponse>, ApiError> {
    let api_key = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| {
            FlowdeskError::InvalidInput("x-api-key header is required".to_string())
        })?;

    let reply = state
        .agents
        .accept(
            ConversationKey::Sdk {
                api_key,
                external_session: body.session_id,
            },
            &body.message,
        )
        .await?;
    Ok(Json(AgentChatResponse {
        reply: reply.text,
        usage_used: reply.usage_used,
        usage_limit: reply.usage_limit,
    }))
}

// --- Orders ---

/// Request body for PATCH /api/orders/{id}/status.
#[derive(Debug, Deserialize)]
pub struct OrderStatusRequest {
    pub status: String,
}

/// PATCH /api/orders/{id}/status
///
/// Updates the order and notifies its owner for customer-visible
/// transitions. Notification failure never fails the update.
pub async fn patch_order_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<OrderStatusRequest>,
) -> Result<Json<OrderRecord>, ApiError> {
    let status = OrderStatus::from_str(&body.status).map_err(|_| {
        FlowdeskError::InvalidInput(format!("unknown order status: {}", body.status))
    })?;

    let order = state.store.update_order_status(&id, status).await?;

    if let Some(text) = status_notification(&order) {
        if let Err(e) = state.notifier.notify(&order.user_id, &text).await {
            warn!(error = %e, order_id = %order.id, "status notification failed");
        }
    }

    Ok(Json(order))
}

/// The customer-facing message for a status transition, if any.
fn status_notification(order: &OrderRecord) -> Option<String> {
    match order.status {
        OrderStatus::InProgress => {
            Some(format!("Your order #{} is now in progress.", order.id))
        }
        OrderStatus::ReadyForPayment => Some(format!(
            "Your order #{} is now ready for payment.",
            order.id
        )),
        OrderStatus::Completed => Some(format!(
            "Your order #{} has been completed successfully.",
            order.id
        )),
        OrderStatus::Pending | OrderStatus::Cancelled => None,
    }
}

// --- Health ---

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub storage: String,
    pub provider: String,
}

/// GET /health
pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let storage = component_health(state.store.health_check().await);
    let provider = component_health(state.provider.health_check().await);
    let status = if storage == "healthy" && provider == "healthy" {
        "ok"
    } else {
        "degraded"
    };
    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage,
        provider,
    })
}

fn component_health(result: Result<HealthStatus, FlowdeskError>) -> String {
    match result {
        Ok(HealthStatus::Healthy) => "healthy".to_string(),
        Ok(HealthStatus::Degraded(m)) => format!("degraded: {m}"),
        Ok(HealthStatus::Unhealthy(m)) => format!("unhealthy: {m}"),
        Err(e) => format!("unhealthy: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chatbot_request_deserializes_minimal() {
        let json = r#"{"message": "I want an AI Chatbot"}"#;
        let req: ChatbotRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.message, "I want an AI Chatbot");
        assert!(req.user_id.is_none());
        assert!(req.attachment.is_none());
    }

    #[test]
    fn chatbot_request_deserializes_with_attachment() {
        let json = r#"{
            "user_id": "u-1",
            "message": "",
            "attachment": {"file_name": "requirements.pdf"}
        }"#;
        let req: ChatbotRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.user_id.as_deref(), Some("u-1"));
        assert!(req.message.is_empty());
        assert_eq!(req.attachment.unwrap().file_name, "requirements.pdf");
    }

    #[test]
    fn chatbot_request_tolerates_missing_message() {
        let json = r#"{"user_id": "u-1"}"#;
        let req: ChatbotRequest = serde_json::from_str(json).unwrap();
        assert!(req.message.is_empty());
    }

    #[test]
    fn sdk_chat_request_session_defaults_to_none() {
        let json = r#"{"message": "hi"}"#;
        let req: SdkChatRequest = serde_json::from_str(json).unwrap();
        assert!(req.session_id.is_none());
    }

    #[test]
    fn order_status_parses_snake_case() {
        assert_eq!(
            OrderStatus::from_str("ready_for_payment").unwrap(),
            OrderStatus::ReadyForPayment
        );
        assert!(OrderStatus::from_str("shipped").is_err());
    }

    #[test]
    fn status_notifications_cover_customer_visible_transitions() {
        let mut order = OrderRecord {
            id: "o-1".to_string(),
            user_id: "u-1".to_string(),
            service: "AI Chatbot".to_string(),
            industry: "General".to_string(),
            host_duration: "1_month".to_string(),
            workflow_name: "Bot".to_string(),
            workflow_details: "Details".to_string(),
            attachment_name: None,
            total_cents: 19_900,
            status: OrderStatus::ReadyForPayment,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        };
        assert_eq!(
            status_notification(&order).unwrap(),
            "Your order #o-1 is now ready for payment."
        );

        order.status = OrderStatus::Completed;
        assert_eq!(
            status_notification(&order).unwrap(),
            "Your order #o-1 has been completed successfully."
        );

        order.status = OrderStatus::InProgress;
        assert_eq!(
            status_notification(&order).unwrap(),
            "Your order #o-1 is now in progress."
        );

        order.status = OrderStatus::Pending;
        assert!(status_notification(&order).is_none());
        order.status = OrderStatus::Cancelled;
        assert!(status_notification(&order).is_none());
    }

    #[test]
    fn agent_chat_response_serializes() {
        let resp = AgentChatResponse {
            reply: "Hello!".to_string(),
            usage_used: 3,
            usage_limit: 10,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"usage_used\":3"));
        assert!(json.contains("\"usage_limit\":10"));
    }
}
