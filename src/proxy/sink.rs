//! Traffic log sinks
//!
//! The sink is write-shared across concurrent handlers. Writes serialize at
//! block granularity: a whole block is written without interruption from
//! another task's block, so a request's lines never interleave mid-write.
//! The log is append-only text and is never parsed back.

use std::path::Path;
use std::pin::Pin;
use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::error;

/// Append-only, block-granular destination for the traffic log.
#[async_trait]
pub trait TrafficSink: Send + Sync {
    /// Write one complete block.
    ///
    /// Write failures must be contained: they are reported on the
    /// diagnostic channel only and never surface to the request that
    /// produced the block.
    async fn write_block(&self, block: &str);
}

/// Sink over any async writer: standard output or a log file created at
/// startup.
pub struct WriterSink {
    writer: Mutex<Pin<Box<dyn AsyncWrite + Send>>>,
}

impl WriterSink {
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::pin(tokio::io::stdout())),
        }
    }

    /// Create (truncating) the log file at `path`.
    pub async fn create(path: &Path) -> std::io::Result<Self> {
        let file = tokio::fs::File::create(path).await?;
        Ok(Self {
            writer: Mutex::new(Box::pin(file)),
        })
    }
}

#[async_trait]
impl TrafficSink for WriterSink {
    async fn write_block(&self, block: &str) {
        let mut writer = self.writer.lock().await;
        if let Err(e) = writer.write_all(block.as_bytes()).await {
            error!("Failed to write traffic log block: {e}");
            return;
        }
        if let Err(e) = writer.flush().await {
            error!("Failed to flush traffic log: {e}");
        }
    }
}

/// In-memory sink recording whole blocks in arrival order, for tests and
/// embedding.
#[derive(Debug, Default)]
pub struct MemorySink {
    blocks: StdMutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocks(&self) -> Vec<String> {
        self.blocks
            .lock()
            .expect("memory sink lock poisoned")
            .clone()
    }
}

#[async_trait]
impl TrafficSink for MemorySink {
    async fn write_block(&self, block: &str) {
        self.blocks
            .lock()
            .expect("memory sink lock poisoned")
            .push(block.to_string());
    }
}
