use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::UserId;

/// Capability interface over the user → credential map.
///
/// One credential per user, in-memory only, destroyed by process restart.
/// The coordinator guards `set` so a stored credential is never overwritten;
/// implementations only need per-user linearizability under concurrent
/// handlers.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn has(&self, user_id: UserId) -> bool;
    async fn get(&self, user_id: UserId) -> Option<String>;
    async fn set(&self, user_id: UserId, credential: String);
}

#[derive(Default)]
pub struct InMemorySessionStore {
    inner: RwLock<HashMap<UserId, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn has(&self, user_id: UserId) -> bool {
        self.inner.read().await.contains_key(&user_id)
    }

    async fn get(&self, user_id: UserId) -> Option<String> {
        self.inner.read().await.get(&user_id).cloned()
    }

    async fn set(&self, user_id: UserId, credential: String) {
        self.inner.write().await.insert(user_id, credential);
    }
}
