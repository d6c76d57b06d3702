//! Chatbot exchange backed by the local session cache

use crate::api::PortfolioClient;
use crate::chat_history::{ChatHistoryStore, ChatSession, MessageRole};
use crate::error::{PortfolioError, Result};
use crate::models::{ChatReply, ChatRequest};

pub struct ChatExchange<'a> {
    client: &'a PortfolioClient,
    store: &'a ChatHistoryStore,
}

impl<'a> ChatExchange<'a> {
    pub fn new(client: &'a PortfolioClient, store: &'a ChatHistoryStore) -> Self {
        Self { client, store }
    }

    /// Send one message and persist both sides of the exchange.
    ///
    /// An unknown `session_id` starts a new session. If the backend call
    /// fails the user's message is still saved and the error is returned.
    pub fn send(&self, session_id: Option<&str>, text: &str) -> Result<ChatSession> {
        if text.trim().is_empty() {
            return Err(PortfolioError::InvalidInput("message is empty".to_string()));
        }

        let mut session = open_session(self.store, session_id);
        session.push_message(MessageRole::User, text);
        let request = ChatRequest {
            message: text.trim().to_string(),
            conversation_id: session.conversation_id.clone(),
        };

        let reply = match self.client.chat(&request) {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("Chat request failed for session {}: {}", session.id, e);
                self.store.upsert(&session)?;
                return Err(e);
            }
        };

        apply_reply(&mut session, reply);
        self.store.upsert(&session)?;
        log::info!(
            "Chat session {} now has {} messages",
            session.id,
            session.messages.len()
        );
        Ok(session)
    }
}

fn open_session(store: &ChatHistoryStore, session_id: Option<&str>) -> ChatSession {
    match session_id {
        Some(id) => store.find(id).unwrap_or_else(|| {
            log::debug!("No cached session {}, starting a new one", id);
            ChatSession {
                id: id.to_string(),
                ..ChatSession::new()
            }
        }),
        None => ChatSession::new(),
    }
}

fn apply_reply(session: &mut ChatSession, reply: ChatReply) {
    session.push_message(MessageRole::Assistant, &reply.response);
    if !reply.conversation_id.is_empty() {
        session.conversation_id = Some(reply.conversation_id);
    }
}

/// Convenience wrapper around [`ChatExchange::send`]
pub fn send_message(
    client: &PortfolioClient,
    store: &ChatHistoryStore,
    session_id: Option<&str>,
    text: &str,
) -> Result<ChatSession> {
    ChatExchange::new(client, store).send(session_id, text)
}
