//! Per-session chat memory

use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::MemoryConfig;
use crate::types::{ChatMessage, SessionId};

/// Conversation history keyed by session
///
/// Implementations:
/// - `InMemoryChatMemory`: bounded message window per session
pub trait ChatMemoryStore: Send + Sync {
    /// Remembered messages of a session, oldest first
    fn messages(&self, session: &SessionId) -> Vec<ChatMessage>;

    /// Remember a message, evicting the oldest ones past the window
    fn append(&self, session: &SessionId, message: ChatMessage);

    /// Forget a session
    fn clear(&self, session: &SessionId);

    /// Number of sessions currently remembered
    fn session_count(&self) -> usize;
}

#[derive(Default)]
struct SessionWindow {
    messages: VecDeque<ChatMessage>,
    last_used: u64,
}

/// Message window memory held in process
///
/// Holds at most `max_sessions` sessions; starting one more forgets the
/// session that was appended to least recently.
pub struct InMemoryChatMemory {
    sessions: DashMap<SessionId, SessionWindow>,
    max_messages: usize,
    max_sessions: usize,
    clock: AtomicU64,
}

impl InMemoryChatMemory {
    /// Keep at most `max_messages` per session
    pub fn new(max_messages: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            max_messages,
            max_sessions: MemoryConfig::default().max_sessions,
            clock: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &MemoryConfig) -> Self {
        Self::new(config.max_messages).with_max_sessions(config.max_sessions)
    }

    /// Cap the number of remembered sessions
    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions.max(1);
        self
    }

    fn evict_least_recent(&self, keep: &SessionId) {
        while self.sessions.len() > self.max_sessions {
            let oldest = self
                .sessions
                .iter()
                .filter(|entry| entry.key() != keep)
                .min_by_key(|entry| entry.value().last_used)
                .map(|entry| entry.key().clone());

            match oldest {
                Some(session) => {
                    tracing::debug!("Forgetting idle chat session {}", session);
                    self.sessions.remove(&session);
                }
                None => break,
            }
        }
    }
}

impl ChatMemoryStore for InMemoryChatMemory {
    fn messages(&self, session: &SessionId) -> Vec<ChatMessage> {
        self.sessions
            .get(session)
            .map(|window| window.messages.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn append(&self, session: &SessionId, message: ChatMessage) {
        if self.max_messages == 0 {
            return;
        }

        let created = !self.sessions.contains_key(session);
        {
            let mut window = self.sessions.entry(session.clone()).or_default();
            window.last_used = self.clock.fetch_add(1, Ordering::Relaxed);
            window.messages.push_back(message);
            while window.messages.len() > self.max_messages {
                window.messages.pop_front();
            }
        }

        if created {
            self.evict_least_recent(session);
        }
    }

    fn clear(&self, session: &SessionId) {
        self.sessions.remove(session);
    }

    fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
