//! In-process session store for single-node deployments and tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use gatehouse_core::result::AppResult;
use gatehouse_core::types::PrincipalId;
use gatehouse_entity::Session;

use super::store::SessionStore;

/// [`SessionStore`] over a sharded concurrent map.
///
/// Check-and-write happens under the shard lock for the principal's key.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: DashMap<PrincipalId, Session>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the store holds no sessions.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn find_by_principal(&self, principal_id: PrincipalId) -> AppResult<Option<Session>> {
        Ok(self.sessions.get(&principal_id).map(|s| s.value().clone()))
    }

    async fn exists(&self, principal_id: PrincipalId) -> AppResult<bool> {
        Ok(self.sessions.contains_key(&principal_id))
    }

    async fn insert(&self, session: &Session) -> AppResult<bool> {
        match self.sessions.entry(session.principal_id) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(session.clone());
                Ok(true)
            }
        }
    }

    async fn overwrite(
        &self,
        principal_id: PrincipalId,
        expected_hash: Option<&str>,
        new_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let Some(mut session) = self.sessions.get_mut(&principal_id) else {
            return Ok(false);
        };

        if let Some(expected) = expected_hash {
            if session.hashed_refresh_token != expected {
                return Ok(false);
            }
        }

        session.hashed_refresh_token = new_hash.to_string();
        session.expires_at = expires_at;
        session.updated_at = Utc::now();
        Ok(true)
    }
}
