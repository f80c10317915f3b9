//! Session lifecycle: create on registration, rotate on refresh, reset on login.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use gatehouse_core::error::AppError;
use gatehouse_core::types::PrincipalId;
use gatehouse_entity::{Role, Session};

use super::store::SessionStore;
use crate::error::SessionError;
use crate::hashing::CredentialHasher;
use crate::jwt::{TokenCodec, TokenPair};

/// Orchestrates the codec, the hasher and the session store.
///
/// Every successful call returns a freshly minted [`TokenPair`] whose
/// refresh secret is the only one the stored session will accept.
#[derive(Clone)]
pub struct SessionManager {
    codec: Arc<TokenCodec>,
    hasher: Arc<CredentialHasher>,
    store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Creates a new session manager.
    pub fn new(
        codec: Arc<TokenCodec>,
        hasher: Arc<CredentialHasher>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            codec,
            hasher,
            store,
        }
    }

    /// Returns the token codec.
    pub fn codec(&self) -> &Arc<TokenCodec> {
        &self.codec
    }

    /// Returns the session store.
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Opens the first session for a principal.
    ///
    /// Fails with [`SessionError::Internal`] if the principal already holds one.
    pub async fn create(
        &self,
        principal_id: PrincipalId,
        role: Role,
    ) -> Result<TokenPair, SessionError> {
        let (pair, hash) = self.mint(principal_id, role).await?;

        if !self
            .insert_new(principal_id, &hash, pair.refresh_expires_at)
            .await?
        {
            warn!(principal_id = %principal_id, "Session already exists; refusing to create another");
            return Err(SessionError::Internal);
        }

        info!(principal_id = %principal_id, role = %role, "Session created");
        Ok(pair)
    }

    /// Rotates the credential pair after checking the presented refresh secret.
    ///
    /// The overwrite is conditioned on the hash that was just verified, so of
    /// two concurrent rotations with the same secret only one can succeed.
    pub async fn update(
        &self,
        principal_id: PrincipalId,
        role: Role,
        presented_refresh_token: &str,
    ) -> Result<TokenPair, SessionError> {
        let session = self
            .store
            .find_by_principal(principal_id)
            .await
            .map_err(|e| SessionError::internal("Failed to load session", e))?
            .ok_or_else(|| {
                debug!(principal_id = %principal_id, "Refresh attempted without a session");
                SessionError::NoSession
            })?;

        if session.is_expired_at(Utc::now()) {
            info!(
                principal_id = %principal_id,
                expired_at = %session.expires_at,
                "Refresh token expired"
            );
            return Err(SessionError::InvalidRefreshToken);
        }

        let matches = self
            .verify_secret(presented_refresh_token, &session.hashed_refresh_token)
            .await
            .map_err(|e| SessionError::internal("Failed to verify refresh token", e))?;
        if !matches {
            warn!(principal_id = %principal_id, "Refresh token mismatch");
            return Err(SessionError::InvalidRefreshToken);
        }

        let (pair, hash) = self.mint(principal_id, role).await?;

        let swapped = self
            .store
            .overwrite(
                principal_id,
                Some(&session.hashed_refresh_token),
                &hash,
                pair.refresh_expires_at,
            )
            .await
            .map_err(|e| SessionError::internal("Failed to rotate session", e))?;
        if !swapped {
            warn!(principal_id = %principal_id, "Refresh token already rotated by a concurrent request");
            return Err(SessionError::InvalidRefreshToken);
        }

        info!(principal_id = %principal_id, session_id = %session.id, "Session rotated");
        Ok(pair)
    }

    /// Replaces whatever session the principal holds without checking its secret.
    ///
    /// Only reachable after the caller has verified the principal's primary
    /// credential. The last reset wins.
    pub async fn reset_session(
        &self,
        principal_id: PrincipalId,
        role: Role,
    ) -> Result<TokenPair, SessionError> {
        let exists = self
            .store
            .exists(principal_id)
            .await
            .map_err(|e| SessionError::internal("Failed to check session existence", e))?;

        let (pair, hash) = self.mint(principal_id, role).await?;
        let expires_at = pair.refresh_expires_at;

        let written = if exists {
            self.overwrite_any(principal_id, &hash, expires_at).await?
                || self.insert_new(principal_id, &hash, expires_at).await?
        } else {
            // A concurrent create may win the insert; fall through to overwrite it.
            self.insert_new(principal_id, &hash, expires_at).await?
                || self.overwrite_any(principal_id, &hash, expires_at).await?
        };

        if !written {
            warn!(principal_id = %principal_id, "Session reset could neither insert nor overwrite");
            return Err(SessionError::Internal);
        }

        info!(principal_id = %principal_id, replaced = exists, "Session reset");
        Ok(pair)
    }

    async fn mint(
        &self,
        principal_id: PrincipalId,
        role: Role,
    ) -> Result<(TokenPair, String), SessionError> {
        let pair = self
            .codec
            .issue_pair(principal_id, role)
            .map_err(|e| SessionError::internal("Failed to issue credentials", e))?;

        let hash = self
            .hash_secret(&pair.refresh_token)
            .await
            .map_err(|e| SessionError::internal("Failed to hash refresh token", e))?;

        Ok((pair, hash))
    }

    async fn insert_new(
        &self,
        principal_id: PrincipalId,
        hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, SessionError> {
        let session = Session::new(principal_id, hash.to_string(), expires_at, Utc::now());
        self.store
            .insert(&session)
            .await
            .map_err(|e| SessionError::internal("Failed to persist session", e))
    }

    async fn overwrite_any(
        &self,
        principal_id: PrincipalId,
        hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, SessionError> {
        self.store
            .overwrite(principal_id, None, hash, expires_at)
            .await
            .map_err(|e| SessionError::internal("Failed to overwrite session", e))
    }

    async fn hash_secret(&self, secret: &str) -> Result<String, AppError> {
        let hasher = Arc::clone(&self.hasher);
        let secret = secret.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&secret))
            .await
            .map_err(|e| AppError::internal(format!("Hashing task failed: {e}")))?
    }

    async fn verify_secret(&self, secret: &str, digest: &str) -> Result<bool, AppError> {
        let hasher = Arc::clone(&self.hasher);
        let (secret, digest) = (secret.to_string(), digest.to_string());
        tokio::task::spawn_blocking(move || hasher.verify(&secret, &digest))
            .await
            .map_err(|e| AppError::internal(format!("Verification task failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::hasher::test_hasher;
    use crate::jwt::codec::test_config;
    use crate::session::MemorySessionStore;
    use chrono::Duration;

    fn manager() -> (SessionManager, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::new());
        let manager = SessionManager::new(
            Arc::new(TokenCodec::new(&test_config("manager-test-secret")).unwrap()),
            Arc::new(test_hasher()),
            store.clone(),
        );
        (manager, store)
    }

    #[tokio::test]
    async fn test_create_then_update_rotates() {
        let (manager, store) = manager();
        let principal = PrincipalId::new();

        let first = manager.create(principal, Role::Client).await.unwrap();
        let second = manager
            .update(principal, Role::Client, &first.refresh_token)
            .await
            .unwrap();

        assert_ne!(first.refresh_token, second.refresh_token);
        assert_ne!(first.access_token, second.access_token);
        let claims = manager
            .codec()
            .verify_access_token(&second.access_token)
            .unwrap();
        assert_eq!(claims.sub, principal);
        assert_eq!(claims.role, Role::Client);

        let stored = store.find_by_principal(principal).await.unwrap().unwrap();
        assert_ne!(stored.hashed_refresh_token, second.refresh_token);
        assert_eq!(stored.expires_at, second.refresh_expires_at);
    }

    #[tokio::test]
    async fn test_create_twice_is_internal() {
        let (manager, _) = manager();
        let principal = PrincipalId::new();

        manager.create(principal, Role::Client).await.unwrap();
        let err = manager.create(principal, Role::Client).await.unwrap_err();
        assert_eq!(err, SessionError::Internal);
    }

    #[tokio::test]
    async fn test_update_without_session() {
        let (manager, _) = manager();
        let err = manager
            .update(PrincipalId::new(), Role::Client, "anything")
            .await
            .unwrap_err();
        assert_eq!(err, SessionError::NoSession);
    }

    #[tokio::test]
    async fn test_update_with_wrong_secret() {
        let (manager, _) = manager();
        let principal = PrincipalId::new();
        let pair = manager.create(principal, Role::Client).await.unwrap();

        let err = manager
            .update(principal, Role::Client, "not-the-secret")
            .await
            .unwrap_err();
        assert_eq!(err, SessionError::InvalidRefreshToken);

        // A failed attempt leaves the real secret usable.
        assert!(manager.update(principal, Role::Client, &pair.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_on_expired_session_rejects_correct_secret() {
        let (manager, store) = manager();
        let principal = PrincipalId::new();
        let pair = manager.create(principal, Role::Client).await.unwrap();

        let stored = store.find_by_principal(principal).await.unwrap().unwrap();
        store
            .overwrite(
                principal,
                None,
                &stored.hashed_refresh_token,
                Utc::now() - Duration::minutes(1),
            )
            .await
            .unwrap();

        let err = manager
            .update(principal, Role::Client, &pair.refresh_token)
            .await
            .unwrap_err();
        assert_eq!(err, SessionError::InvalidRefreshToken);
    }

    #[tokio::test]
    async fn test_reset_without_session_creates_one() {
        let (manager, store) = manager();
        let principal = PrincipalId::new();

        let pair = manager.reset_session(principal, Role::Moderator).await.unwrap();
        assert!(store.exists(principal).await.unwrap());
        assert!(manager.update(principal, Role::Moderator, &pair.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_reset_invalidates_outstanding_secret() {
        let (manager, store) = manager();
        let principal = PrincipalId::new();
        let original = manager.create(principal, Role::Client).await.unwrap();
        let session_id = store.find_by_principal(principal).await.unwrap().unwrap().id;

        let reset = manager.reset_session(principal, Role::Client).await.unwrap();

        let err = manager
            .update(principal, Role::Client, &original.refresh_token)
            .await
            .unwrap_err();
        assert_eq!(err, SessionError::InvalidRefreshToken);
        assert!(manager.update(principal, Role::Client, &reset.refresh_token).await.is_ok());
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.find_by_principal(principal).await.unwrap().unwrap().id,
            session_id
        );
    }

    #[tokio::test]
    async fn test_rotation_chain_scenario() {
        let (manager, _) = manager();
        let principal = PrincipalId::new();

        let (a1, r1) = {
            let pair = manager.create(principal, Role::Client).await.unwrap();
            (pair.access_token, pair.refresh_token)
        };
        let second = manager.update(principal, Role::Client, &r1).await.unwrap();
        assert_ne!(second.access_token, a1);
        assert_ne!(second.refresh_token, r1);

        let replay = manager.update(principal, Role::Client, &r1).await.unwrap_err();
        assert_eq!(replay, SessionError::InvalidRefreshToken);

        assert!(manager
            .update(principal, Role::Client, &second.refresh_token)
            .await
            .is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_only_one_wins() {
        let (manager, _) = manager();
        let principal = PrincipalId::new();
        let pair = manager.create(principal, Role::Client).await.unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let manager = manager.clone();
                let secret = pair.refresh_token.clone();
                tokio::spawn(async move { manager.update(principal, Role::Client, &secret).await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(e) => assert_eq!(e, SessionError::InvalidRefreshToken),
            }
        }
        assert_eq!(successes, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_resets_leave_one_session() {
        let (manager, store) = manager();
        let principal = PrincipalId::new();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let manager = manager.clone();
                tokio::spawn(async move { manager.reset_session(principal, Role::Client).await })
            })
            .collect();

        let mut pairs = Vec::new();
        for handle in handles {
            pairs.push(handle.await.unwrap().unwrap());
        }
        assert_eq!(store.len(), 1);

        let live = {
            let mut live = 0;
            for pair in &pairs {
                if manager
                    .update(principal, Role::Client, &pair.refresh_token)
                    .await
                    .is_ok()
                {
                    live += 1;
                }
            }
            live
        };
        assert_eq!(live, 1);
    }
}
