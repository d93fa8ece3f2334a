// src/application/background/pool.rs
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::article::ArticleId;

/// A unit of background work scoped to one article.
pub trait ArticleJob: Send + 'static {
    fn article_id(&self) -> ArticleId;
}

#[async_trait]
pub trait JobHandler<J>: Send + Sync + 'static {
    async fn handle(&self, job: J) -> ApplicationResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub workers: usize,
    pub queue_capacity: usize,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_capacity: 256,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub submitted: u64,
    pub completed: u64,
    pub failed: u64,
}

#[derive(Default)]
struct Counters {
    submitted: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
}

enum Envelope<J> {
    Job(J),
    Barrier(oneshot::Sender<()>),
}

/// Fixed set of shards, each draining its own bounded queue.
///
/// Jobs are routed by article id, so work for a single article runs one at a
/// time in submission order while different articles proceed in parallel.
/// `submit` waits for queue space when a shard is saturated, never for the job.
pub struct WorkerPool<J> {
    name: &'static str,
    senders: Mutex<Vec<mpsc::Sender<Envelope<J>>>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    counters: Arc<Counters>,
}

impl<J: ArticleJob> WorkerPool<J> {
    /// Spawns the shards on the current tokio runtime.
    pub fn start(
        name: &'static str,
        settings: PoolSettings,
        handler: Arc<dyn JobHandler<J>>,
    ) -> Self {
        let workers = settings.workers.max(1);
        let capacity = settings.queue_capacity.max(1);
        let counters = Arc::new(Counters::default());

        let mut senders = Vec::with_capacity(workers);
        let mut handles = Vec::with_capacity(workers);
        for shard in 0..workers {
            let (tx, rx) = mpsc::channel(capacity);
            senders.push(tx);
            handles.push(tokio::spawn(run_shard(
                name,
                shard,
                rx,
                Arc::clone(&handler),
                Arc::clone(&counters),
            )));
        }

        tracing::debug!(pool = name, workers, capacity, "worker pool started");

        Self {
            name,
            senders: Mutex::new(senders),
            handles: Mutex::new(handles),
            counters,
        }
    }

    pub async fn submit(&self, job: J) -> ApplicationResult<()> {
        let article_id = job.article_id();
        let sender = self
            .sender_for(article_id)
            .ok_or_else(|| self.closed_error())?;
        sender
            .send(Envelope::Job(job))
            .await
            .map_err(|_| self.closed_error())?;
        self.counters.submitted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Resolves once every job submitted before the call has finished.
    pub async fn flush(&self) {
        let senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner).clone();
        let mut barriers = Vec::with_capacity(senders.len());
        for sender in senders {
            let (tx, rx) = oneshot::channel();
            if sender.send(Envelope::Barrier(tx)).await.is_ok() {
                barriers.push(rx);
            }
        }
        for barrier in barriers {
            let _ = barrier.await;
        }
    }

    /// Closes the queues and waits for queued jobs to drain.
    pub async fn shutdown(&self) {
        self.senders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        let handles: Vec<_> = self
            .handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        for handle in handles {
            if let Err(err) = handle.await {
                tracing::error!(pool = self.name, error = %err, "worker shard aborted");
            }
        }
        tracing::debug!(pool = self.name, "worker pool stopped");
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            submitted: self.counters.submitted.load(Ordering::Relaxed),
            completed: self.counters.completed.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
        }
    }

    fn sender_for(&self, article_id: ArticleId) -> Option<mpsc::Sender<Envelope<J>>> {
        let senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);
        if senders.is_empty() {
            return None;
        }
        senders.get(shard_index(article_id, senders.len())).cloned()
    }

    fn closed_error(&self) -> ApplicationError {
        ApplicationError::infrastructure(format!("{} worker pool is shut down", self.name))
    }
}

/// Stable shard for an article. `shards` must be non-zero.
fn shard_index(article_id: ArticleId, shards: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    article_id.hash(&mut hasher);
    let shards = u64::try_from(shards).unwrap_or(u64::MAX);
    usize::try_from(hasher.finish() % shards).unwrap_or_default()
}

async fn run_shard<J: ArticleJob>(
    name: &'static str,
    shard: usize,
    mut rx: mpsc::Receiver<Envelope<J>>,
    handler: Arc<dyn JobHandler<J>>,
    counters: Arc<Counters>,
) {
    while let Some(envelope) = rx.recv().await {
        match envelope {
            Envelope::Job(job) => {
                let article_id = job.article_id();
                let handler = Arc::clone(&handler);
                // A panicking handler must not take the shard down with it.
                let outcome = tokio::spawn(async move { handler.handle(job).await }).await;
                match outcome {
                    Ok(Ok(())) => {
                        counters.completed.fetch_add(1, Ordering::Relaxed);
                    }
                    Ok(Err(err)) => {
                        counters.failed.fetch_add(1, Ordering::Relaxed);
                        tracing::error!(
                            pool = name,
                            article_id = %article_id,
                            error = %err,
                            "background job failed"
                        );
                    }
                    Err(err) => {
                        counters.failed.fetch_add(1, Ordering::Relaxed);
                        tracing::error!(
                            pool = name,
                            article_id = %article_id,
                            error = %err,
                            "background job panicked"
                        );
                    }
                }
            }
            Envelope::Barrier(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::trace!(pool = name, shard, "worker shard drained");
}
