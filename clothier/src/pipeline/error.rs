//! Error types for the asset pipeline.
//!
//! [`PipelineError`] is fatal and stops a run before or at its start.
//! [`StageError`] belongs to one asset: the orchestrator logs it, records it
//! as an [`AssetFailure`] and carries on with the rest of the batch.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::asset::AssetId;
use crate::catalog::CatalogError;
use crate::http::HttpError;

/// Fatal errors raised at construction or at the start of a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A configuration value cannot be used
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An explicitly configured template does not exist
    #[error("template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// The template exists but is not a decodable image
    #[error("failed to decode template {}: {message}", path.display())]
    TemplateDecode { path: PathBuf, message: String },

    /// The runtime or assets directory could not be prepared
    #[error("failed to prepare directory {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP session for the run could not be opened
    #[error("failed to open HTTP session: {0}")]
    Session(#[source] HttpError),

    /// Catalog pagination failed
    #[error("catalog listing failed: {0}")]
    Catalog(#[from] CatalogError),
}

/// The per-asset stage an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Resolve,
    Fetch,
    Composite,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Resolve => "resolve",
            Stage::Fetch => "fetch",
            Stage::Composite => "composite",
        };
        f.write_str(name)
    }
}

/// Recoverable failure of one stage for one asset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageError {
    /// The asset id is not a decimal number
    #[error("invalid asset id '{0}'")]
    InvalidAssetId(String),

    /// The resolution request did not succeed
    #[error("resolution request failed: {0}")]
    ResolveRequest(HttpError),

    /// The resolution response matched none of the texture id patterns
    #[error("no texture id in resolution response")]
    NoTextureId,

    /// The content download did not succeed
    #[error("texture download failed: {0}")]
    Fetch(HttpError),

    /// Writing or replacing the artifact failed
    #[error("I/O error on {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    /// Fetched bytes are not a recognizable image format
    #[error("unrecognized image format")]
    UnrecognizedFormat,

    /// Fetched bytes could not be decoded
    #[error("image decode failed: {0}")]
    ImageDecode(String),

    /// The composited image could not be encoded
    #[error("image encode failed: {0}")]
    ImageEncode(String),

    /// The blocking task running the composite panicked
    #[error("composite task panicked: {0}")]
    TaskPanicked(String),
}

impl StageError {
    /// Returns the stage this error belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            StageError::InvalidAssetId(_)
            | StageError::ResolveRequest(_)
            | StageError::NoTextureId => Stage::Resolve,
            StageError::Fetch(_) => Stage::Fetch,
            StageError::Io { .. }
            | StageError::UnrecognizedFormat
            | StageError::ImageDecode(_)
            | StageError::ImageEncode(_)
            | StageError::TaskPanicked(_) => Stage::Composite,
        }
    }
}

/// A dropped asset and the reason it was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFailure {
    pub asset_id: AssetId,
    pub stage: Stage,
    pub error: StageError,
}

impl AssetFailure {
    pub fn new(asset_id: AssetId, error: StageError) -> Self {
        Self {
            asset_id,
            stage: error.stage(),
            error,
        }
    }
}

/// Outcome of one run: produced artifacts plus the assets that were dropped.
///
/// Artifact order is completion order, not input order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub artifacts: Vec<PathBuf>,
    pub failures: Vec<AssetFailure>,
}

impl RunReport {
    /// Number of assets that reached a stored artifact.
    pub fn success_count(&self) -> usize {
        self.artifacts.len()
    }

    /// Number of assets dropped at any stage.
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Failures recorded for one stage.
    pub fn failures_at(&self, stage: Stage) -> impl Iterator<Item = &AssetFailure> {
        self.failures.iter().filter(move |f| f.stage == stage)
    }

    /// Discards failure details, keeping only the artifact paths.
    pub fn into_artifacts(self) -> Vec<PathBuf> {
        self.artifacts
    }
}
