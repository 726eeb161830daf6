//! Per-asset pipeline stages.
//!
//! 1. **Resolve** - asset id to texture id (one remote call)
//! 2. **Fetch** - texture id to raw bytes (one remote call)
//! 3. **Composite** - bytes to a stored artifact (blocking pool)
//!
//! Each stage returns a `Result` and logs its own failures; deciding what
//! to do with a failure is left to the orchestrator.

mod composite;
mod fetch;
mod resolve;

pub use composite::{artifact_file_name, composite_stage, store_artifact, CompositeSettings};
pub use fetch::fetch_stage;
pub use resolve::{extract_texture_id, resolve_stage};
