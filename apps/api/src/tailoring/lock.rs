//! Per-resume advisory lock around a tailoring run.
//!
//! Two concurrent runs on the same resume would race on the final save, so
//! the second caller is turned away with `TailoringInProgress` instead.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;

/// Proof of ownership handed back by `acquire`; only its holder can release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockToken(String);

impl LockToken {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[async_trait]
pub trait TailorLock: Send + Sync {
    /// `None` when another run already holds the lock.
    async fn acquire(&self, resume_id: Uuid) -> Result<Option<LockToken>, AppError>;
    async fn release(&self, resume_id: Uuid, token: LockToken) -> Result<(), AppError>;
}

/// Holds an acquired lock for the length of a run.
///
/// `release` frees it inline. If the guard is dropped instead (the caller's
/// future was cancelled), the release is spawned onto the runtime so a retry
/// does not wait out the TTL.
pub struct LockGuard {
    lock: Arc<dyn TailorLock>,
    resume_id: Uuid,
    token: Option<LockToken>,
}

impl LockGuard {
    pub fn new(lock: Arc<dyn TailorLock>, resume_id: Uuid, token: LockToken) -> Self {
        Self {
            lock,
            resume_id,
            token: Some(token),
        }
    }

    pub async fn release(mut self) {
        if let Some(token) = self.token.take() {
            release_logged(self.lock.as_ref(), self.resume_id, token).await;
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let Some(token) = self.token.take() else {
            return;
        };
        let lock = self.lock.clone();
        let resume_id = self.resume_id;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    release_logged(lock.as_ref(), resume_id, token).await;
                });
            }
            Err(_) => {
                warn!("No runtime to release tailor lock for resume {resume_id}, left to expire")
            }
        }
    }
}

async fn release_logged(lock: &dyn TailorLock, resume_id: Uuid, token: LockToken) {
    if let Err(e) = lock.release(resume_id, token).await {
        warn!("Failed to release tailor lock for resume {resume_id}: {e}");
    }
}

// Deletes the key only if it still carries our token; an expired lock that
// someone else re-acquired is left alone.
const RELEASE_SCRIPT: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
else
    return 0
end
"#;

pub struct RedisTailorLock {
    client: redis::Client,
    ttl: Duration,
}

impl RedisTailorLock {
    pub fn new(client: redis::Client, ttl: Duration) -> Self {
        Self { client, ttl }
    }

    fn key(resume_id: Uuid) -> String {
        format!("tailor-lock:{resume_id}")
    }
}

fn redis_err(e: redis::RedisError) -> AppError {
    AppError::Internal(anyhow::anyhow!("Redis lock error: {e}"))
}

#[async_trait]
impl TailorLock for RedisTailorLock {
    async fn acquire(&self, resume_id: Uuid) -> Result<Option<LockToken>, AppError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(redis_err)?;
        let token = LockToken::generate();
        let reply: Option<String> = redis::cmd("SET")
            .arg(Self::key(resume_id))
            .arg(token.as_str())
            .arg("NX")
            .arg("PX")
            .arg(self.ttl.as_millis() as u64)
            .query_async(&mut conn)
            .await
            .map_err(redis_err)?;
        Ok(reply.map(|_| token))
    }

    async fn release(&self, resume_id: Uuid, token: LockToken) -> Result<(), AppError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(redis_err)?;
        let deleted: i32 = redis::Script::new(RELEASE_SCRIPT)
            .key(Self::key(resume_id))
            .arg(token.as_str())
            .invoke_async(&mut conn)
            .await
            .map_err(redis_err)?;
        if deleted == 0 {
            warn!("Tailor lock for resume {resume_id} expired before release");
        }
        Ok(())
    }
}
