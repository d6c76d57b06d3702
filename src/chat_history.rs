//! Local cache of chatbot sessions
//!
//! Sessions live in a single JSON array on disk. The file is a cache: it is
//! not versioned, and an unreadable file is treated as empty.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

const DEFAULT_TITLE: &str = "New chat";
const TITLE_MAX_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    /// Backend conversation this session continues, once known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: format!("session_{}", now.format("%Y%m%d%H%M%S%f")),
            title: DEFAULT_TITLE.to_string(),
            conversation_id: None,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a message; the first user message names the session
    pub fn push_message(&mut self, role: MessageRole, content: &str) {
        let now = Utc::now();
        let content = content.trim().to_string();

        if role == MessageRole::User
            && self.title == DEFAULT_TITLE
            && !self.messages.iter().any(|m| m.role == MessageRole::User)
        {
            self.title = session_title(&content);
        }

        self.messages.push(ChatMessage {
            role,
            content,
            timestamp: now,
        });
        self.updated_at = now;
    }

    pub fn last_reply(&self) -> Option<&ChatMessage> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::Assistant)
    }
}

fn session_title(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or("").trim();
    if first_line.is_empty() {
        return DEFAULT_TITLE.to_string();
    }
    if first_line.chars().count() <= TITLE_MAX_CHARS {
        first_line.to_string()
    } else {
        let cut: String = first_line.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}...", cut.trim_end())
    }
}

/// File-backed session store
#[derive(Debug, Clone)]
pub struct ChatHistoryStore {
    path: PathBuf,
}

impl ChatHistoryStore {
    pub fn at<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All cached sessions, most recently updated first
    pub fn load(&self) -> Vec<ChatSession> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                log::warn!("Could not read chat history {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<ChatSession>>(&content) {
            Ok(mut sessions) => {
                sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
                sessions
            }
            Err(e) => {
                log::warn!(
                    "Discarding unreadable chat history {}: {}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    pub fn save(&self, sessions: &[ChatSession]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(sessions)?;
        fs::write(&self.path, json)?;
        log::debug!(
            "Saved {} chat sessions to {}",
            sessions.len(),
            self.path.display()
        );
        Ok(())
    }

    pub fn find(&self, id: &str) -> Option<ChatSession> {
        self.load().into_iter().find(|s| s.id == id)
    }

    /// Insert or replace a session by id
    pub fn upsert(&self, session: &ChatSession) -> Result<()> {
        let mut sessions = self.load();
        match sessions.iter_mut().find(|s| s.id == session.id) {
            Some(existing) => *existing = session.clone(),
            None => sessions.push(session.clone()),
        }
        self.save(&sessions)
    }

    /// Delete a session; returns whether it existed
    pub fn remove(&self, id: &str) -> Result<bool> {
        let mut sessions = self.load();
        let before = sessions.len();
        sessions.retain(|s| s.id != id);
        if sessions.len() == before {
            return Ok(false);
        }
        self.save(&sessions)?;
        Ok(true)
    }
}
