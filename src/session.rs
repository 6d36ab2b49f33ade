//! Conversation session state
//!
//! A session is an explicit, append-only log of role-tagged messages scoped
//! to one user's interaction with the gateway. The full log is sent on every
//! chat-completion call; messages are never mutated or removed once appended.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Author of a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a user message timestamped now
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create an assistant message timestamped now
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Append-only conversation log for one user session
#[derive(Debug)]
pub struct Session {
    id: String,
    messages: Vec<Message>,
    created_at: DateTime<Utc>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create an empty session with a fresh ID
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            messages: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Session identifier
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Session creation time
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Append a message to the log
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Ordered view of the conversation so far
    #[must_use]
    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages in the log
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the log is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Clear the conversation, keeping the session ID
    pub fn reset(&mut self) {
        self.messages.clear();
    }
}

/// In-memory session registry keyed by session ID
///
/// Cloning is cheap; all clones share the same map. Each session sits behind
/// its own mutex, so concurrent turns against one session are serialized
/// (appends stay ordering-safe) without blocking other sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, Arc<Mutex<Session>>>>>,
}

impl SessionStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new session and return its ID
    pub async fn create(&self) -> String {
        let session = Session::new();
        let id = session.id().to_string();
        self.inner
            .write()
            .await
            .insert(id.clone(), Arc::new(Mutex::new(session)));
        tracing::debug!(session = %id, "session created");
        id
    }

    /// Remove a session, returning whether it existed
    pub async fn remove(&self, id: &str) -> bool {
        let removed = self.inner.write().await.remove(id).is_some();
        if removed {
            tracing::debug!(session = %id, "session destroyed");
        }
        removed
    }

    /// Whether a session exists
    pub async fn contains(&self, id: &str) -> bool {
        self.inner.read().await.contains_key(id)
    }

    /// Get a handle to a session, if it exists
    pub async fn get(&self, id: &str) -> Option<Arc<Mutex<Session>>> {
        self.inner.read().await.get(id).cloned()
    }

    /// Snapshot of a session's message log
    pub async fn history(&self, id: &str) -> Option<Vec<Message>> {
        let session = self.get(id).await?;
        let guard = session.lock().await;
        Some(guard.snapshot().to_vec())
    }
}
