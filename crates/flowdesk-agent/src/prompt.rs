// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persona prompt assembly for agent sessions.

use flowdesk_core::AgentSession;

/// Builds the system prompt that makes the model speak as the business.
pub fn persona_prompt(session: &AgentSession) -> String {
    format!(
        "You are an AI Customer Service agent for the following business:\n\
         \n\
         Business: {}\n\
         Business Type: {}\n\
         Description: {}\n\
         \n\
         From now on, respond as the business speaking directly to customers.\n\
         Be professional, polite, and helpful. Answer questions, share offers, \
         explain services, and provide information based on the business description.\n\
         Only ask clarifying questions if absolutely necessary.",
        session.name, session.business_type, session.business_description
    )
}

/// The acknowledgment returned when a session is created.
pub fn session_greeting(business_type: &str) -> String {
    format!("You are now the AI Customer Service for {business_type}. Speak as a customer!")
}
