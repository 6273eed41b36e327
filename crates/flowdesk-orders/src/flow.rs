// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The conversational order state machine.
//!
//! One handler per draft stage. A turn takes the per-user lock, loads the
//! draft, dispatches on the derived stage, persists (or clears) the draft,
//! and appends one chat turn. Stages only move forward; the one way back is
//! "cancel", which drops the draft entirely.

use std::sync::Arc;

use flowdesk_core::{
    Attachment, ChatTurn, FlowdeskError, Notifier, OrderRecord, OrderStatus, Store, new_id,
    now_rfc3339,
};
use tracing::{debug, info, warn};

use crate::catalog::{HostDuration, ServiceCatalog};
use crate::draft::{AttachmentChoice, DraftStage, OrderDraft};
use crate::matcher::{contains_normalized, extract_digits};
use crate::pricing;
use crate::store::DraftStore;
use crate::suggest::Suggester;

/// Identity recorded for visitors who are not signed in.
pub const GUEST_USER: &str = "guest";

/// How many past turns are echoed back with each reply.
const HISTORY_WINDOW: i64 = 5;

const SUGGESTIONS_UNAVAILABLE: &str =
    "Sorry, I couldn't generate suggestions right now. Please type your own.";

/// The reply to one chatbot message, plus the recent conversation window.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub user_message: String,
    pub bot_reply: String,
    /// The previous turns (up to five) followed by the turn just processed.
    pub conversation: Vec<ChatTurn>,
}

/// Whether the turn leaves a draft behind.
enum Disposition {
    Persist,
    Clear,
}

/// The order-taking chatbot.
pub struct OrderFlow {
    store: Arc<dyn Store>,
    drafts: DraftStore,
    catalog: ServiceCatalog,
    suggester: Suggester,
    notifier: Arc<dyn Notifier>,
}

impl OrderFlow {
    pub fn new(
        store: Arc<dyn Store>,
        catalog: ServiceCatalog,
        suggester: Suggester,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            drafts: DraftStore::new(store.clone()),
            store,
            catalog,
            suggester,
            notifier,
        }
    }

    /// Access to draft maintenance (idle expiry sweep).
    pub fn drafts(&self) -> &DraftStore {
        &self.drafts
    }

    /// Process one visitor message.
    ///
    /// Turns for the same identity are serialized; the draft is re-read
    /// under the lock so concurrent duplicates cannot race past each other.
    pub async fn handle_turn(
        &self,
        user_id: Option<&str>,
        message: &str,
        attachment: Option<Attachment>,
    ) -> Result<TurnOutcome, FlowdeskError> {
        let user_id = match user_id {
            Some(id) if !id.trim().is_empty() => id,
            _ => GUEST_USER,
        };
        let history = self.store.recent_chat_turns(user_id, HISTORY_WINDOW).await?;

        let lock = self.drafts.lock_for(user_id);
        let _guard = lock.lock().await;

        let mut draft = self.drafts.load(user_id).await?.unwrap_or_default();
        let stage = draft.stage();
        debug!(user_id, ?stage, "processing chatbot turn");

        let (bot_reply, disposition) = match stage {
            DraftStage::NeedService => self.need_service(&mut draft, message),
            DraftStage::NeedIndustry => need_industry(&mut draft, message),
            DraftStage::NeedDuration => need_duration(&mut draft, message),
            DraftStage::NeedWorkflowName => self.need_workflow_name(&mut draft, message).await,
            DraftStage::NeedWorkflowDetails => {
                self.need_workflow_details(&mut draft, message).await
            }
            DraftStage::NeedAttachmentDecision => need_attachment_decision(&mut draft, message),
            DraftStage::AwaitingUpload => awaiting_upload(&mut draft, message, attachment.as_ref()),
            DraftStage::Ready => self.ready(user_id, &mut draft, message).await?,
        };

        match disposition {
            Disposition::Persist => self.drafts.save(user_id, &draft).await?,
            Disposition::Clear => self.drafts.clear(user_id).await?,
        }

        let turn = ChatTurn {
            id: new_id(),
            user_id: user_id.to_string(),
            message: message.to_string(),
            reply: bot_reply.clone(),
            created_at: now_rfc3339(),
        };
        self.store.insert_chat_turn(&turn).await?;

        let mut conversation = history;
        conversation.push(turn);
        Ok(TurnOutcome {
            user_message: message.to_string(),
            bot_reply,
            conversation,
        })
    }

    fn need_service(&self, draft: &mut OrderDraft, message: &str) -> (String, Disposition) {
        match self.catalog.match_service(message) {
            Some(entry) => {
                draft.service = Some(entry.title.clone());
                let reply = format!(
                    "Great! You selected {}.\nWhich industry does this workflow belong to? \
                     (type your own or leave blank for 'General')",
                    entry.title
                );
                (reply, Disposition::Persist)
            }
            None => {
                let reply = format!(
                    "Hello! Which service do you want to automate? ({})",
                    self.catalog.titles().join(", ")
                );
                (reply, Disposition::Persist)
            }
        }
    }

    async fn need_workflow_name(
        &self,
        draft: &mut OrderDraft,
        message: &str,
    ) -> (String, Disposition) {
        if contains_normalized(message, "suggest") {
            let service = draft.service.as_deref().unwrap_or("Automation");
            let industry = draft.industry.as_deref().unwrap_or("General");
            let reply = match self.suggester.workflow_names(service, industry).await {
                Ok(choices) if !choices.is_empty() => {
                    let listed = numbered(&choices);
                    draft.workflow_name_choices = choices;
                    format!(
                        "Here are {} workflow name suggestions for the {} industry:\n\
                         {}\nReply with the number of your choice or type your own.",
                        draft.workflow_name_choices.len(),
                        industry,
                        listed
                    )
                }
                Ok(_) => SUGGESTIONS_UNAVAILABLE.to_string(),
                Err(e) => {
                    warn!(error = %e, "workflow name suggestions failed");
                    SUGGESTIONS_UNAVAILABLE.to_string()
                }
            };
            return (reply, Disposition::Persist);
        }

        if !draft.workflow_name_choices.is_empty() {
            let digits = extract_digits(message);
            let picked = match digits.as_str() {
                "1" | "2" | "3" => {
                    let idx = digits.parse::<usize>().unwrap_or(1) - 1;
                    draft.workflow_name_choices.get(idx).cloned()
                }
                _ => None,
            };
            draft.workflow_name_choices.clear();
            return match picked {
                Some(name) => {
                    draft.workflow_name = Some(name.clone());
                    (
                        format!(
                            "Selected workflow name: {name}\n\
                             Now, can you provide workflow details or type 'suggest'?"
                        ),
                        Disposition::Persist,
                    )
                }
                None => {
                    draft.workflow_name = Some(message.to_string());
                    (
                        "Got it! Can you provide the workflow details? You can type 'suggest' \
                         to get suggestions."
                            .to_string(),
                        Disposition::Persist,
                    )
                }
            };
        }

        draft.workflow_name = Some(message.to_string());
        (
            "Got it! Can you provide the workflow details? You can type 'suggest' to get \
             suggestions."
                .to_string(),
            Disposition::Persist,
        )
    }

    async fn need_workflow_details(
        &self,
        draft: &mut OrderDraft,
        message: &str,
    ) -> (String, Disposition) {
        if contains_normalized(message, "suggest") {
            let name = draft.workflow_name.as_deref().unwrap_or_default();
            let service = draft.service.as_deref().unwrap_or("Automation");
            let industry = draft.industry.as_deref().unwrap_or("General");
            let reply = match self
                .suggester
                .workflow_details(name, service, industry)
                .await
            {
                Ok(choices) if !choices.is_empty() => {
                    let listed = numbered(&choices);
                    draft.workflow_details_choices = choices;
                    format!(
                        "Here are {} workflow details suggestions:\n{}\n\
                         Reply with the number of your choice or type your own.",
                        draft.workflow_details_choices.len(),
                        listed
                    )
                }
                Ok(_) => SUGGESTIONS_UNAVAILABLE.to_string(),
                Err(e) => {
                    warn!(error = %e, "workflow details suggestions failed");
                    SUGGESTIONS_UNAVAILABLE.to_string()
                }
            };
            return (reply, Disposition::Persist);
        }

        if !draft.workflow_details_choices.is_empty() {
            let digits = extract_digits(message);
            let picked = match digits.as_str() {
                "1" | "2" | "3" => {
                    let idx = digits.parse::<usize>().unwrap_or(1) - 1;
                    draft.workflow_details_choices.get(idx).cloned()
                }
                _ => None,
            };
            draft.workflow_details_choices.clear();
            return match picked {
                Some(details) => {
                    draft.workflow_details = Some(details);
                    (
                        "Workflow details saved.\nDo you want to attach a file? (yes/no)"
                            .to_string(),
                        Disposition::Persist,
                    )
                }
                None => {
                    draft.workflow_details = Some(message.to_string());
                    (
                        "Do you want to attach a file? (yes/no)".to_string(),
                        Disposition::Persist,
                    )
                }
            };
        }

        draft.workflow_details = Some(message.to_string());
        (
            "Do you want to attach a file? (yes/no)".to_string(),
            Disposition::Persist,
        )
    }

    async fn ready(
        &self,
        user_id: &str,
        draft: &mut OrderDraft,
        message: &str,
    ) -> Result<(String, Disposition), FlowdeskError> {
        let command = message.trim().to_lowercase();
        let (Some(service), Some(industry), Some(duration), Some(name), Some(details)) = (
            draft.service.clone(),
            draft.industry.clone(),
            draft.host_duration.clone(),
            draft.workflow_name.clone(),
            draft.workflow_details.clone(),
        ) else {
            return Err(FlowdeskError::Integrity(
                "draft reached ready with missing fields".to_string(),
            ));
        };
        let duration = HostDuration::from_canonical(&duration).ok_or_else(|| {
            FlowdeskError::Integrity(format!("unknown duration in draft: {duration}"))
        })?;

        if ["price", "total", "how much"].contains(&command.as_str()) {
            let total = pricing::quote(&self.catalog, &service, duration, &industry)?;
            let reply = format!(
                "Total price: {}\nType 'confirm' to submit or 'cancel' to discard.",
                pricing::format_cents(total)
            );
            return Ok((reply, Disposition::Persist));
        }

        if ["confirm", "submit", "ok", "okay"].contains(&command.as_str()) {
            let total = pricing::quote(&self.catalog, &service, duration, &industry)?;
            let order = OrderRecord {
                id: new_id(),
                user_id: user_id.to_string(),
                service: service.clone(),
                industry: industry.clone(),
                host_duration: duration.canonical().to_string(),
                workflow_name: name.clone(),
                workflow_details: details.clone(),
                attachment_name: draft.attachment_name.clone(),
                total_cents: total,
                status: OrderStatus::Pending,
                created_at: now_rfc3339(),
            };
            self.store.insert_order(&order).await?;
            info!(order_id = %order.id, user_id, total_cents = total, "order submitted");

            let note = format!(
                "Your order #{} has been received. Our admin will review it within 24 hours.",
                order.id
            );
            if let Err(e) = self.notifier.notify(user_id, &note).await {
                warn!(error = %e, user_id, "order notification failed");
            }

            let reply = format!(
                "Order {name} submitted successfully!\n\n\
                 Service: {service}\n\
                 Industry: {industry}\n\
                 Hosting Duration: {}\n\
                 Workflow Name: {name}\n\
                 Workflow Details: {details}\n\
                 Total Price: {}\n\n\
                 Our team will contact you soon to start building your workflow. Thank you!",
                duration.label(),
                pricing::format_cents(total)
            );
            return Ok((reply, Disposition::Clear));
        }

        if ["cancel", "no", "stop"].contains(&command.as_str()) {
            return Ok((
                "Your order has been cancelled.".to_string(),
                Disposition::Clear,
            ));
        }

        Ok((
            "Type 'confirm' to submit, 'cancel' to discard, or 'price' to see total.".to_string(),
            Disposition::Persist,
        ))
    }
}

fn need_industry(draft: &mut OrderDraft, message: &str) -> (String, Disposition) {
    let trimmed = message.trim();
    let industry = if trimmed.is_empty() { "General" } else { trimmed };
    draft.industry = Some(industry.to_string());
    (
        format!(
            "Industry set to {industry}.\nWhich hosting plan do you want? \
             (1 month, 3 months, 6 months, 12 months)"
        ),
        Disposition::Persist,
    )
}

fn need_duration(draft: &mut OrderDraft, message: &str) -> (String, Disposition) {
    match HostDuration::match_duration(message) {
        Some(duration) => {
            draft.host_duration = Some(duration.canonical().to_string());
            (
                "Perfect! What should be the workflow name? You can type 'suggest' to get \
                 suggestions."
                    .to_string(),
                Disposition::Persist,
            )
        }
        None => (
            "Please select a valid hosting duration: 1 month, 3 months, 6 months, 12 months."
                .to_string(),
            Disposition::Persist,
        ),
    }
}

fn need_attachment_decision(draft: &mut OrderDraft, message: &str) -> (String, Disposition) {
    let answer = message.trim().to_lowercase();
    if ["no", "nope", "nah"].contains(&answer.as_str()) {
        draft.attachment = Some(AttachmentChoice::Declined);
        draft.attachment_checked = true;
        (
            "Okay, no problem. You can type 'price' to see the total or 'confirm' to submit."
                .to_string(),
            Disposition::Persist,
        )
    } else if ["yes", "yep", "yeah"].contains(&answer.as_str()) {
        draft.attachment = Some(AttachmentChoice::Accepted);
        ("Please upload your file now.".to_string(), Disposition::Persist)
    } else {
        (
            "Please answer 'yes' or 'no'.".to_string(),
            Disposition::Persist,
        )
    }
}

fn awaiting_upload(
    draft: &mut OrderDraft,
    message: &str,
    attachment: Option<&Attachment>,
) -> (String, Disposition) {
    if let Some(file) = attachment {
        draft.attachment_name = Some(file.file_name.clone());
        draft.attachment_checked = true;
        return (
            format!(
                "Got your file: {}. You can type 'price' to see the total or 'confirm' to submit.",
                file.file_name
            ),
            Disposition::Persist,
        );
    }
    let answer = message.trim().to_lowercase();
    if ["no", "nope", "nah", "skip"].contains(&answer.as_str()) {
        draft.attachment = Some(AttachmentChoice::Declined);
        draft.attachment_checked = true;
        return (
            "Okay, no problem. You can type 'price' to see the total or 'confirm' to submit."
                .to_string(),
            Disposition::Persist,
        );
    }
    (
        "Please upload your file now.".to_string(),
        Disposition::Persist,
    )
}

fn numbered(choices: &[String]) -> String {
    choices
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. {}", i + 1, c))
        .collect::<Vec<_>>()
        .join("\n")
}
