//! Job pipeline building blocks: a mediator-style request pipeline with a
//! timing/logging behavior, and the job record kept in a key-partitioned
//! table store.

pub mod behavior;
pub mod config;
pub mod error;
pub mod memory_store;
pub mod pipeline;
pub mod store;
pub mod types;

pub use behavior::LoggingBehavior;
pub use config::{LoggingBehaviorConfig, ThresholdMode};
pub use error::{ConfigError, StoreError, StoreResult};
pub use memory_store::MemoryJobStore;
pub use pipeline::{Next, Pipeline, PipelineBehavior, Request, RequestHandler};
pub use store::JobStore;
pub use types::{ETag, JobEntity, JobRow};
