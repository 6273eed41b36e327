// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the conversational order flow.
//!
//! Each test builds an isolated flow over a temp SQLite store, a scripted
//! completion provider, and a recording notifier. Tests are independent and
//! order-insensitive.

use std::sync::Arc;

use async_trait::async_trait;
use flowdesk_config::model::{OrdersConfig, StorageConfig};
use flowdesk_core::traits::CompletionProvider;
use flowdesk_core::types::{CompletionRequest, CompletionResponse, HealthStatus};
use flowdesk_core::{Attachment, FlowdeskError, OrderStatus, Store};
use flowdesk_orders::{OrderFlow, ServiceCatalog, Suggester};
use flowdesk_storage::SqliteStore;
use flowdesk_test_utils::{RecordingNotifier, ScriptedProvider};
use tempfile::TempDir;

struct TestFlow {
    flow: OrderFlow,
    store: Arc<SqliteStore>,
    notifier: Arc<RecordingNotifier>,
    _dir: TempDir,
}

async fn flow_with_provider(provider: Arc<dyn CompletionProvider>) -> TestFlow {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("flowdesk.db");
    let store = Arc::new(SqliteStore::new(StorageConfig {
        database_path: path.to_string_lossy().into_owned(),
        wal_mode: true,
    }));
    store.initialize().await.unwrap();

    let catalog = ServiceCatalog::from_config(&OrdersConfig::default().services);
    let suggester = Suggester::new(provider, "test-model", 0.2);
    let notifier = Arc::new(RecordingNotifier::new());
    let flow = OrderFlow::new(store.clone(), catalog, suggester, notifier.clone());

    TestFlow {
        flow,
        store,
        notifier,
        _dir: dir,
    }
}

async fn flow_with(replies: Vec<String>) -> TestFlow {
    flow_with_provider(Arc::new(ScriptedProvider::with_replies(replies))).await
}

async fn say(tf: &TestFlow, user: &str, message: &str) -> String {
    tf.flow
        .handle_turn(Some(user), message, None)
        .await
        .unwrap()
        .bot_reply
}

// ---- Test 1: the full journey, suggestion pick included ----

#[tokio::test]
async fn full_order_journey_submits_pending_order() {
    let tf = flow_with(vec![
        "Care Triage Bot\nPatient Flow Assistant\nIntake Wizard".to_string(),
    ])
    .await;
    let user = "u-alice";

    let r = say(&tf, user, "I want an AI Chatbot").await;
    assert!(r.starts_with("Great! You selected AI Chatbot."), "got: {r}");

    let r = say(&tf, user, "healthcare").await;
    assert!(r.starts_with("Industry set to healthcare."), "got: {r}");

    let r = say(&tf, user, "6 months").await;
    assert!(r.starts_with("Perfect! What should be the workflow name?"), "got: {r}");

    let r = say(&tf, user, "suggest").await;
    assert!(r.contains("1. Care Triage Bot"), "got: {r}");
    assert!(r.contains("3. Intake Wizard"), "got: {r}");

    let r = say(&tf, user, "2").await;
    assert!(
        r.starts_with("Selected workflow name: Patient Flow Assistant"),
        "got: {r}"
    );

    let details = "Route patient intake questions to the right department";
    let r = say(&tf, user, details).await;
    assert_eq!(r, "Do you want to attach a file? (yes/no)");

    let r = say(&tf, user, "no").await;
    assert!(r.starts_with("Okay, no problem."), "got: {r}");

    // 19_900 cents/month over six months.
    let r = say(&tf, user, "price").await;
    assert!(r.starts_with("Total price: $1194.00"), "got: {r}");

    let r = say(&tf, user, "confirm").await;
    assert!(r.contains("submitted successfully"), "got: {r}");
    assert!(r.contains("Service: AI Chatbot"), "got: {r}");
    assert!(r.contains("Hosting Duration: 6 months"), "got: {r}");
    assert!(r.contains("Total Price: $1194.00"), "got: {r}");

    // The order landed with every collected field.
    let sent = tf.notifier.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, user);
    let order_id = sent[0]
        .1
        .strip_prefix("Your order #")
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap()
        .to_string();
    let order = tf.store.get_order(&order_id).await.unwrap().unwrap();
    assert_eq!(order.user_id, user);
    assert_eq!(order.service, "AI Chatbot");
    assert_eq!(order.industry, "healthcare");
    assert_eq!(order.host_duration, "6_months");
    assert_eq!(order.workflow_name, "Patient Flow Assistant");
    assert_eq!(order.workflow_details, details);
    assert_eq!(order.attachment_name, None);
    assert_eq!(order.total_cents, 119_400);
    assert_eq!(order.status, OrderStatus::Pending);

    // Confirm destroyed the draft; the next message starts over.
    let r = say(&tf, user, "hello").await;
    assert!(r.starts_with("Hello! Which service do you want to automate?"), "got: {r}");
}

// ---- Test 2: six advancing turns reach the confirmation stage ----

#[tokio::test]
async fn six_advancing_turns_reach_ready() {
    let tf = flow_with(vec![]).await;
    let user = "u-bob";

    // Alias match, blank industry default, fuzzy duration, literal name and
    // details, declined attachment.
    say(&tf, user, "rpa").await;
    let r = say(&tf, user, "").await;
    assert!(r.starts_with("Industry set to General."), "got: {r}");
    say(&tf, user, "3 months").await;
    say(&tf, user, "Invoice Sync").await;
    say(&tf, user, "Syncs invoices nightly").await;
    let r = say(&tf, user, "no").await;
    assert!(r.starts_with("Okay, no problem."), "got: {r}");

    // 49_900 cents/month over three months.
    let r = say(&tf, user, "price").await;
    assert!(r.starts_with("Total price: $1497.00"), "got: {r}");
}

// ---- Test 3: misses re-prompt without advancing ----

#[tokio::test]
async fn unrecognized_input_reprompts_without_advancing() {
    let tf = flow_with(vec![]).await;
    let user = "u-carol";

    let r = say(&tf, user, "zzz").await;
    assert!(r.starts_with("Hello! Which service do you want to automate?"), "got: {r}");
    assert!(r.contains("Workflow Automation"), "got: {r}");
    assert!(r.contains("Predictive Analytics"), "got: {r}");

    say(&tf, user, "I want predictive analytics").await;
    say(&tf, user, "banking").await;

    let r = say(&tf, user, "forever").await;
    assert!(r.starts_with("Please select a valid hosting duration:"), "got: {r}");
    let r = say(&tf, user, "next week").await;
    assert!(r.starts_with("Please select a valid hosting duration:"), "got: {r}");

    // Still at the duration stage; a valid answer advances.
    let r = say(&tf, user, "12 months").await;
    assert!(r.starts_with("Perfect! What should be the workflow name?"), "got: {r}");
}

// ---- Test 4: suggestion choices are consumed on use ----

#[tokio::test]
async fn digit_after_consumed_choices_is_free_text() {
    let tf = flow_with(vec!["Alpha\nBeta\nGamma".to_string()]).await;
    let user = "u-dave";

    say(&tf, user, "ai chatbot").await;
    say(&tf, user, "retail").await;
    say(&tf, user, "1 month").await;

    let r = say(&tf, user, "suggest").await;
    assert!(r.contains("1. Alpha"), "got: {r}");
    assert!(r.contains("2. Beta"), "got: {r}");

    let r = say(&tf, user, "2").await;
    assert!(r.starts_with("Selected workflow name: Beta"), "got: {r}");

    // The stored choices were consumed; a repeated digit is now verbatim
    // workflow details, not a selection.
    let r = say(&tf, user, "2").await;
    assert_eq!(r, "Do you want to attach a file? (yes/no)");

    say(&tf, user, "no").await;
    let r = say(&tf, user, "confirm").await;
    assert!(r.contains("Workflow Name: Beta"), "got: {r}");
    assert!(r.contains("Workflow Details: 2"), "got: {r}");
}

// ---- Test 5: out-of-range digit falls back to verbatim text ----

#[tokio::test]
async fn out_of_range_digit_becomes_workflow_name() {
    let tf = flow_with(vec!["Alpha\nBeta".to_string()]).await;
    let user = "u-erin";

    say(&tf, user, "workflow design").await;
    say(&tf, user, "media").await;
    say(&tf, user, "1 month").await;
    say(&tf, user, "suggest").await;

    // Only two choices came back; "3" is out of range and becomes the name.
    let r = say(&tf, user, "3").await;
    assert!(r.starts_with("Got it! Can you provide the workflow details?"), "got: {r}");

    say(&tf, user, "details here").await;
    say(&tf, user, "no").await;
    let r = say(&tf, user, "confirm").await;
    assert!(r.contains("Workflow Name: 3"), "got: {r}");
}

// ---- Test 6: suggestion failures degrade to a re-prompt ----

struct DownProvider;

#[async_trait]
impl CompletionProvider for DownProvider {
    fn name(&self) -> &str {
        "down-provider"
    }

    async fn complete(
        &self,
        _request: CompletionRequest,
    ) -> Result<CompletionResponse, FlowdeskError> {
        Err(FlowdeskError::Unavailable {
            service: "down-provider".to_string(),
            message: "connection refused".to_string(),
            source: None,
        })
    }

    async fn health_check(&self) -> Result<HealthStatus, FlowdeskError> {
        Ok(HealthStatus::Unhealthy("down".to_string()))
    }
}

#[tokio::test]
async fn suggestion_failure_keeps_the_turn_alive() {
    let tf = flow_with_provider(Arc::new(DownProvider)).await;
    let user = "u-frank";

    say(&tf, user, "ai chatbot").await;
    say(&tf, user, "retail").await;
    say(&tf, user, "1 month").await;

    let r = say(&tf, user, "suggest").await;
    assert!(r.starts_with("Sorry, I couldn't generate suggestions"), "got: {r}");

    // Typing a name still advances.
    let r = say(&tf, user, "Shelf Restock Alerts").await;
    assert!(r.starts_with("Got it! Can you provide the workflow details?"), "got: {r}");
}

// ---- Test 7: cancel destroys the draft ----

#[tokio::test]
async fn cancel_clears_draft_and_restarts() {
    let tf = flow_with(vec![]).await;
    let user = "u-gina";

    say(&tf, user, "ai chatbot").await;
    say(&tf, user, "retail").await;
    say(&tf, user, "1 month").await;
    say(&tf, user, "Stock Bot").await;
    say(&tf, user, "Answers stock questions").await;
    say(&tf, user, "no").await;

    let r = say(&tf, user, "cancel").await;
    assert_eq!(r, "Your order has been cancelled.");

    let r = say(&tf, user, "hello").await;
    assert!(r.starts_with("Hello! Which service do you want to automate?"), "got: {r}");

    // Nothing was submitted or notified.
    assert!(tf.notifier.sent().await.is_empty());
}

// ---- Test 8: price is a query, not a transition ----

#[tokio::test]
async fn price_is_repeatable_and_deterministic() {
    let tf = flow_with(vec![]).await;
    let user = "u-hana";

    say(&tf, user, "workflow automation").await;
    say(&tf, user, "logistics").await;
    say(&tf, user, "12 months").await;
    say(&tf, user, "Fleet Tracker").await;
    say(&tf, user, "Tracks fleet positions").await;
    say(&tf, user, "no").await;

    // 29_900 cents/month over twelve months.
    let first = say(&tf, user, "price").await;
    let second = say(&tf, user, "price").await;
    assert!(first.starts_with("Total price: $3588.00"), "got: {first}");
    assert_eq!(first, second);

    let r = say(&tf, user, "maybe later").await;
    assert_eq!(
        r,
        "Type 'confirm' to submit, 'cancel' to discard, or 'price' to see total."
    );

    let r = say(&tf, user, "submit").await;
    assert!(r.contains("submitted successfully"), "got: {r}");
}

// ---- Test 9: attachment accept and upload ----

#[tokio::test]
async fn uploaded_file_is_recorded_on_the_order() {
    let tf = flow_with(vec![]).await;
    let user = "u-ivan";

    say(&tf, user, "ai chatbot").await;
    say(&tf, user, "retail").await;
    say(&tf, user, "1 month").await;
    say(&tf, user, "Stock Bot").await;
    say(&tf, user, "Answers stock questions").await;

    let r = say(&tf, user, "yes").await;
    assert_eq!(r, "Please upload your file now.");

    // Words alone do not satisfy the upload prompt.
    let r = say(&tf, user, "here it comes").await;
    assert_eq!(r, "Please upload your file now.");

    let r = tf
        .flow
        .handle_turn(
            Some(user),
            "here it is",
            Some(Attachment {
                file_name: "requirements.pdf".to_string(),
            }),
        )
        .await
        .unwrap()
        .bot_reply;
    assert!(r.starts_with("Got your file: requirements.pdf."), "got: {r}");

    say(&tf, user, "confirm").await;
    let sent = tf.notifier.sent().await;
    let order_id = sent[0]
        .1
        .strip_prefix("Your order #")
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap()
        .to_string();
    let order = tf.store.get_order(&order_id).await.unwrap().unwrap();
    assert_eq!(order.attachment_name.as_deref(), Some("requirements.pdf"));
}

// ---- Test 10: backing out of the upload prompt ----

#[tokio::test]
async fn declining_at_upload_prompt_skips_the_file() {
    let tf = flow_with(vec![]).await;
    let user = "u-jack";

    say(&tf, user, "ai chatbot").await;
    say(&tf, user, "retail").await;
    say(&tf, user, "1 month").await;
    say(&tf, user, "Stock Bot").await;
    say(&tf, user, "Answers stock questions").await;
    say(&tf, user, "yes").await;

    let r = say(&tf, user, "no").await;
    assert!(r.starts_with("Okay, no problem."), "got: {r}");

    say(&tf, user, "confirm").await;
    let sent = tf.notifier.sent().await;
    let order_id = sent[0]
        .1
        .strip_prefix("Your order #")
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap()
        .to_string();
    let order = tf.store.get_order(&order_id).await.unwrap().unwrap();
    assert_eq!(order.attachment_name, None);
}

// ---- Test 11: unclear attachment answers re-prompt ----

#[tokio::test]
async fn attachment_decision_requires_yes_or_no() {
    let tf = flow_with(vec![]).await;
    let user = "u-kim";

    say(&tf, user, "ai chatbot").await;
    say(&tf, user, "retail").await;
    say(&tf, user, "1 month").await;
    say(&tf, user, "Stock Bot").await;
    say(&tf, user, "Answers stock questions").await;

    let r = say(&tf, user, "perhaps").await;
    assert_eq!(r, "Please answer 'yes' or 'no'.");

    let r = say(&tf, user, "NOPE").await;
    assert!(r.starts_with("Okay, no problem."), "got: {r}");
}

// ---- Test 12: anonymous turns share the guest identity ----

#[tokio::test]
async fn guest_turns_accumulate_a_bounded_window() {
    let tf = flow_with(vec![]).await;

    for i in 1..=6 {
        tf.flow
            .handle_turn(None, &format!("m{i}"), None)
            .await
            .unwrap();
    }
    // A blank identity resolves to the same guest history.
    let outcome = tf.flow.handle_turn(Some("  "), "m7", None).await.unwrap();

    assert!(!outcome.bot_reply.is_empty());
    assert_eq!(outcome.conversation.len(), 6);
    assert_eq!(outcome.conversation[0].message, "m2");
    assert_eq!(outcome.conversation[5].message, "m7");
    assert!(
        outcome
            .conversation
            .iter()
            .all(|turn| turn.user_id == "guest")
    );
}
