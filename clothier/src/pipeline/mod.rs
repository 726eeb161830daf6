//! Asset download and composite pipeline.
//!
//! Each asset goes through three stages:
//!
//! ```text
//! AssetId → Resolve → TextureId → Fetch → bytes → Composite → artifact path
//! ```
//!
//! [`AssetPipeline`] runs many assets at once, either from an explicit id
//! list or from a group catalog listing. Failures are isolated per asset.
//!
//! # Concurrency
//!
//! - A `network` [`ConcurrencyLimiter`] bounds every remote call of a run,
//!   catalog pages included.
//! - A `cpu` [`ConcurrencyLimiter`] bounds composites, which run on the
//!   blocking pool through a [`BlockingExecutor`].
//!
//! # Key Components
//!
//! - [`AssetPipeline`] - entry point for direct-asset and group runs
//! - [`RunReport`] - produced artifacts plus per-asset failures
//! - [`Template`] - overlay image shared by all composites
//! - [`RunContext`] - type labels known for the assets of one run

mod concurrency_limiter;
mod context;
mod error;
mod executor;
mod orchestrator;
pub mod stages;
mod template;

pub use concurrency_limiter::{ConcurrencyLimiter, ConcurrencyPermit};
pub use context::RunContext;
pub use error::{AssetFailure, PipelineError, RunReport, Stage, StageError};
pub use executor::{
    BlockingExecutor, BlockingResult, ConcurrentResults, ConcurrentRunner, ExecutorError,
    TokioExecutor,
};
pub use orchestrator::AssetPipeline;
pub use template::Template;
