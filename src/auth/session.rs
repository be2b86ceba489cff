use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub last_used_at: DateTime<Utc>,
}

/// Ephemeral sessions keyed by token hash. Nothing here survives a restart.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, user_id: &str, token: &str, ttl: Duration) -> Session {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            token_hash: hash_token(token),
            expires_at: now + ttl,
            created_at: now,
            last_used_at: now,
        };

        self.sessions
            .write()
            .await
            .insert(session.token_hash.clone(), session.clone());
        session
    }

    pub async fn find_by_token(&self, token: &str) -> Option<Session> {
        let token_hash = hash_token(token);
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;

        match sessions.get_mut(&token_hash) {
            Some(session) if session.expires_at > now => {
                session.last_used_at = now;
                Some(session.clone())
            }
            Some(_) => {
                sessions.remove(&token_hash);
                None
            }
            None => None,
        }
    }

    pub async fn delete_by_token(&self, token: &str) -> Option<Session> {
        self.sessions.write().await.remove(&hash_token(token))
    }

    pub async fn cleanup_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.expires_at > now);
        before - sessions.len()
    }
}

fn hash_token(token: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
