use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::mpsc;

/// Cache keys for computed recommendation lists
///
/// Every key embeds the catalog fingerprint, so entries computed from an
/// older catalog are never served for a newer one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    SimilarByName {
        fingerprint: String,
        query: String,
        top_n: usize,
    },
    SimilarByDescription {
        fingerprint: String,
        query: String,
        top_n: usize,
    },
    Collaborative {
        fingerprint: String,
        user_id: i64,
        top_n: usize,
    },
    Hybrid {
        fingerprint: String,
        user_id: i64,
        query: Option<String>,
        top_n: usize,
    },
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::SimilarByName {
                fingerprint,
                query,
                top_n,
            } => write!(f, "rec:{}:name:{}:{}", fingerprint, top_n, query.to_lowercase()),
            CacheKey::SimilarByDescription {
                fingerprint,
                query,
                top_n,
            } => write!(f, "rec:{}:desc:{}:{}", fingerprint, top_n, query.to_lowercase()),
            CacheKey::Collaborative {
                fingerprint,
                user_id,
                top_n,
            } => write!(f, "rec:{}:user:{}:{}", fingerprint, user_id, top_n),
            CacheKey::Hybrid {
                fingerprint,
                user_id,
                query,
                top_n,
            } => write!(
                f,
                "rec:{}:hybrid:{}:{}:{}",
                fingerprint,
                user_id,
                top_n,
                query.as_deref().unwrap_or("").to_lowercase()
            ),
        }
    }
}

/// Creates a Redis client for caching
///
/// Establishes a connection to Redis for fast data caching.
/// Uses connection pooling via the connection-manager feature.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Message for asynchronous cache writes
struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

/// Cache handler for storing and retrieving data from Redis
///
/// A disabled cache misses every lookup and drops every write. Redis failures
/// are logged and treated as misses, never surfaced to callers.
#[derive(Clone)]
pub struct Cache {
    backend: Option<CacheBackend>,
    ttl: u64,
}

#[derive(Clone)]
struct CacheBackend {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl CacheWriterHandle {
    /// Initiates a graceful shutdown of the cache writer
    ///
    /// Sends a shutdown signal to the writer task, which flushes pending
    /// writes to Redis before exiting.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");
    }
}

impl Cache {
    /// Creates a new Cache instance with an async write background task
    ///
    /// This spawns a background task that processes cache writes asynchronously,
    /// preventing cache operations from blocking API responses.
    pub async fn new(redis_client: Client, ttl: u64) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        tokio::spawn(async move {
            Self::cache_writer_task(client, write_rx, shutdown_rx).await;
        });

        let cache = Self {
            backend: Some(CacheBackend {
                redis_client,
                write_tx,
            }),
            ttl,
        };

        (cache, CacheWriterHandle { shutdown_tx })
    }

    /// A cache that never stores anything
    pub fn disabled(ttl: u64) -> Self {
        Self { backend: None, ttl }
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Seconds a written entry stays valid
    pub fn ttl(&self) -> u64 {
        self.ttl
    }

    /// Background task that processes cache write messages
    ///
    /// On shutdown signal, flushes all remaining messages before exiting.
    async fn cache_writer_task(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    if let Err(e) = Self::write_to_redis(&client, msg).await {
                        tracing::error!(error = %e, "Failed to write to Redis cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    write_rx.close();
                    let mut flushed = 0;
                    while let Some(msg) = write_rx.recv().await {
                        if let Err(e) = Self::write_to_redis(&client, msg).await {
                            tracing::error!(error = %e, "Failed to flush cache write during shutdown");
                        } else {
                            flushed += 1;
                        }
                    }

                    tracing::info!(flushed, "Cache writer task stopped");
                    break;
                }
            }
        }
    }

    async fn write_to_redis(client: &Client, msg: CacheWriteMessage) -> redis::RedisResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(msg.key, msg.value, msg.ttl).await?;
        Ok(())
    }

    /// Retrieves a value from the cache by key
    ///
    /// Returns `None` on a miss, when the cache is disabled, or when Redis or
    /// deserialization fails.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let backend = self.backend.as_ref()?;

        let cached: Option<String> = match backend.redis_client.get_multiplexed_async_connection().await {
            Ok(mut conn) => conn
                .get::<_, Option<String>>(key.to_string())
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "Redis get failed");
                    None
                }),
            Err(e) => {
                tracing::warn!(error = %e, "Redis connection failed");
                None
            }
        };

        let json = cached?;
        match serde_json::from_str(&json) {
            Ok(value) => {
                tracing::debug!(key = %key, "Cache hit");
                Some(value)
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache deserialization error");
                None
            }
        }
    }

    /// Stores a value in the cache asynchronously without blocking
    ///
    /// The value is serialized here and handed to the background writer, so
    /// this returns before Redis has acknowledged anything.
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let Some(backend) = &self.backend else {
            return;
        };

        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let msg = CacheWriteMessage {
            key: key.to_string(),
            value: json,
            ttl,
        };

        if let Err(e) = backend.write_tx.send(msg) {
            tracing::error!(error = %e, "Failed to send cache write message");
        }
    }
}
