//! Per-user session state: the last submission's profile, content and images.
//!
//! The session id travels in the `booster_session` cookie. Storage is Redis
//! when configured, otherwise an in-process map. Last write wins.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tower_cookies::{cookie::SameSite, Cookie, Cookies};
use uuid::Uuid;

use crate::models::{BusinessProfile, GeneratedContent, ImageResult};

pub const SESSION_COOKIE: &str = "booster_session";
const KEY_PREFIX: &str = "booster:session:";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Corrupt session payload: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionData {
    pub profile: Option<BusinessProfile>,
    pub content: Option<GeneratedContent>,
    #[serde(default)]
    pub images: Vec<ImageResult>,
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, id: Uuid) -> Result<Option<SessionData>, SessionError>;
    async fn save(&self, id: Uuid, data: &SessionData) -> Result<(), SessionError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Redis
// ────────────────────────────────────────────────────────────────────────────

pub struct RedisSessionStore {
    client: redis::Client,
    ttl: Duration,
}

impl RedisSessionStore {
    pub fn new(client: redis::Client, ttl: Duration) -> Self {
        Self { client, ttl }
    }

    fn key(id: Uuid) -> String {
        format!("{KEY_PREFIX}{id}")
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, id: Uuid) -> Result<Option<SessionData>, SessionError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(Self::key(id)).await?;
        raw.map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(SessionError::from)
    }

    async fn save(&self, id: Uuid, data: &SessionData) -> Result<(), SessionError> {
        let json = serde_json::to_string(data)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set_ex::<_, _, ()>(Self::key(id), json, self.ttl.as_secs())
            .await?;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory
// ────────────────────────────────────────────────────────────────────────────

/// Process-local store used when no Redis URL is configured.
pub struct MemorySessionStore {
    ttl: Duration,
    entries: RwLock<HashMap<Uuid, (Instant, SessionData)>>,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: Uuid) -> Result<Option<SessionData>, SessionError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(&id)
            .filter(|(saved_at, _)| saved_at.elapsed() < self.ttl)
            .map(|(_, data)| data.clone()))
    }

    async fn save(&self, id: Uuid, data: &SessionData) -> Result<(), SessionError> {
        let mut entries = self.entries.write().await;
        entries.retain(|_, (saved_at, _)| saved_at.elapsed() < self.ttl);
        entries.insert(id, (Instant::now(), data.clone()));
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Cookie
// ────────────────────────────────────────────────────────────────────────────

/// Session id from the request cookie, if present and well-formed.
pub fn session_id(cookies: &Cookies) -> Option<Uuid> {
    cookies
        .get(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok())
}

/// Existing session id, or a fresh one written back as a cookie.
pub fn ensure_session_id(cookies: &Cookies) -> Uuid {
    if let Some(id) = session_id(cookies) {
        return id;
    }

    let id = Uuid::new_v4();
    let mut cookie = Cookie::new(SESSION_COOKIE, id.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookies.add(cookie);
    id
}

/// Session data for the request's cookie; empty when there is no session yet.
pub async fn load_current(
    store: &dyn SessionStore,
    cookies: &Cookies,
) -> Result<SessionData, SessionError> {
    match session_id(cookies) {
        Some(id) => Ok(store.load(id).await?.unwrap_or_default()),
        None => Ok(SessionData::default()),
    }
}
