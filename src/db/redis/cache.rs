use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Trend report for a query, case-insensitive
    Trends(String),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Trends(query) => write!(f, "trends:{}", query.trim().to_lowercase()),
        }
    }
}

/// Creates a Redis client for the trend cache
///
/// No connection is made here; an unreachable server shows up as cache misses.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    Ok(Client::open(redis_url)?)
}

/// Serialized value waiting to be written
struct PendingWrite {
    key: String,
    json: String,
    ttl: u64,
}

/// Best-effort JSON cache in Redis
///
/// Reads never fail: connection, read and decode errors are logged and
/// reported as misses. Writes are queued to a background task.
#[derive(Clone)]
pub struct Cache {
    client: Client,
    writes: mpsc::UnboundedSender<PendingWrite>,
}

/// Stops the writer task after it has flushed queued writes
pub struct CacheWriterHandle {
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl CacheWriterHandle {
    /// Waits until every write queued before the call has been attempted
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Cache writer task panicked");
        }
    }
}

struct CacheWriter {
    client: Client,
    writes: mpsc::UnboundedReceiver<PendingWrite>,
}

impl CacheWriter {
    async fn run(mut self, mut shutdown_rx: oneshot::Receiver<()>) {
        tracing::debug!("Cache writer started");

        loop {
            tokio::select! {
                write = self.writes.recv() => match write {
                    Some(write) => self.write(write).await,
                    None => break,
                },
                _ = &mut shutdown_rx => {
                    // Drain what is already queued without waiting on live senders
                    self.writes.close();
                    let mut flushed = 0;
                    while let Some(write) = self.writes.recv().await {
                        self.write(write).await;
                        flushed += 1;
                    }
                    tracing::info!(flushed, "Cache writer flushed");
                    break;
                }
            }
        }

        tracing::debug!("Cache writer stopped");
    }

    async fn write(&self, write: PendingWrite) {
        if let Err(e) = self.try_write(&write).await {
            tracing::warn!(key = %write.key, error = %e, "Cache write failed");
        }
    }

    async fn try_write(&self, write: &PendingWrite) -> AppResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(&write.key, &write.json, write.ttl).await?;
        Ok(())
    }
}

impl Cache {
    /// Creates the cache and spawns its writer task
    pub async fn new(client: Client) -> (Self, CacheWriterHandle) {
        let (writes_tx, writes_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let writer = CacheWriter {
            client: client.clone(),
            writes: writes_rx,
        };
        let task = tokio::spawn(writer.run(shutdown_rx));

        (
            Self {
                client,
                writes: writes_tx,
            },
            CacheWriterHandle { shutdown_tx, task },
        )
    }

    async fn read<T: serde::de::DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key).await?;

        cached
            .map(|json| {
                serde_json::from_str(&json)
                    .map_err(|e| AppError::Internal(format!("Cache decode error: {}", e)))
            })
            .transpose()
    }

    /// Cached value for `key`; `None` on a miss or when Redis is unusable
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let key = key.to_string();
        match self.read(&key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                None
            }
        }
    }

    /// Queues a JSON write with a TTL in seconds; returns without waiting for Redis
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Cache encode error");
                return;
            }
        };

        let write = PendingWrite {
            key: key.to_string(),
            json,
            ttl,
        };
        if self.writes.send(write).is_err() {
            tracing::warn!(key = %key, "Cache writer stopped, dropping write");
        }
    }
}
