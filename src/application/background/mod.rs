// src/application/background/mod.rs
//! Bounded background work that follows a committed article mutation:
//! version-log appends and embedding refreshes.
mod embeddings;
mod pool;
mod versions;

pub use embeddings::{EmbeddingJob, EmbeddingJobHandler};
pub use pool::{ArticleJob, JobHandler, PoolSettings, PoolStats, WorkerPool};
pub use versions::{VersionJob, VersionJobHandler};
