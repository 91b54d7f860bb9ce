//! Per-user conversation sessions

use std::collections::HashMap;

use super::routing::ConversationState;

/// What the flow has learned about a user so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    /// Selected tool category (`cordless`, `rotary`, `hammer`).
    pub category: Option<String>,
    /// Selected product id (`prod_*`).
    pub product_id: Option<String>,
}

impl SessionContext {
    /// Fold newer values over this context; `None` keeps the old value.
    pub fn merge(&mut self, other: SessionContext) {
        if other.category.is_some() {
            self.category = other.category;
        }
        if other.product_id.is_some() {
            self.product_id = other.product_id;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub state: ConversationState,
    pub context: SessionContext,
}

/// Session storage keyed by user id.
pub trait SessionStore {
    /// Current session for `user_id`; a fresh `initial` session if unknown.
    fn get(&self, user_id: &str) -> Session;

    fn set(&mut self, user_id: &str, session: Session);
}

/// Process-lifetime store. Lost on restart.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: HashMap<String, Session>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Sessions sorted by user id.
    pub fn iter_sorted(&self) -> Vec<(&str, &Session)> {
        let mut all: Vec<_> = self
            .sessions
            .iter()
            .map(|(user, session)| (user.as_str(), session))
            .collect();
        all.sort_by(|a, b| a.0.cmp(b.0));
        all
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, user_id: &str) -> Session {
        self.sessions.get(user_id).cloned().unwrap_or_default()
    }

    fn set(&mut self, user_id: &str, session: Session) {
        self.sessions.insert(user_id.to_string(), session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_user_starts_initial() {
        let store = InMemorySessionStore::new();
        let session = store.get("972500000000");
        assert_eq!(session.state, ConversationState::Initial);
        assert_eq!(session.context, SessionContext::default());
        assert!(store.is_empty());
    }

    #[test]
    fn test_users_are_independent() {
        let mut store = InMemorySessionStore::new();
        store.set(
            "a",
            Session {
                state: ConversationState::HumanAgent,
                context: SessionContext::default(),
            },
        );
        assert_eq!(store.get("a").state, ConversationState::HumanAgent);
        assert_eq!(store.get("b").state, ConversationState::Initial);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_context_merge_keeps_old_values() {
        let mut ctx = SessionContext {
            category: Some("rotary".to_string()),
            product_id: None,
        };
        ctx.merge(SessionContext {
            category: None,
            product_id: Some("prod_1".to_string()),
        });
        assert_eq!(ctx.category.as_deref(), Some("rotary"));
        assert_eq!(ctx.product_id.as_deref(), Some("prod_1"));
    }
}
