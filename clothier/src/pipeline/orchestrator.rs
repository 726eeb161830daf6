//! Pipeline orchestrator - fans assets out across the stages.
//!
//! A run goes through two phases:
//!
//! ```text
//! ids ──▶ resolve (all, concurrently) ──▶ keep successes
//!     ──▶ fetch + composite (all, concurrently) ──▶ keep successes ──▶ paths
//! ```
//!
//! Every remote call of both phases shares the `network` limiter, so the
//! number of requests in flight never exceeds `max_concurrent` whatever the
//! batch size. Composites additionally pass through the `cpu` limiter.
//! A failed asset is logged and dropped; it never aborts the batch.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, instrument, warn};

use super::stages::{composite_stage, fetch_stage, resolve_stage, CompositeSettings};
use super::{
    AssetFailure, BlockingExecutor, ConcurrencyLimiter, ConcurrentRunner, PipelineError,
    RunContext, RunReport, StageError, Template, TokioExecutor,
};
use crate::asset::{AssetId, TextureId};
use crate::catalog::{paginate_catalog, CatalogQuery};
use crate::config::PipelineConfig;
use crate::http::{load_auth_cookie, HttpConnector, ReqwestConnector};

/// State shared by every task of every run.
struct Shared<E> {
    config: PipelineConfig,
    template: Option<Template>,
    network: ConcurrencyLimiter,
    cpu: ConcurrencyLimiter,
    executor: E,
}

/// Downloads clothing textures and stores them composited with the template.
///
/// The pipeline owns its limiters and template for its whole lifetime. HTTP
/// sessions are per run: each entry call opens one through the connector
/// and drops it when the call returns.
///
/// # Example
///
/// ```no_run
/// use clothier::asset::AssetId;
/// use clothier::config::PipelineConfig;
/// use clothier::pipeline::AssetPipeline;
///
/// # async fn run() -> Result<(), clothier::pipeline::PipelineError> {
/// let config = PipelineConfig::new().with_runtime_dir("./runtime");
/// let pipeline = AssetPipeline::from_config(config)?;
///
/// let paths = pipeline
///     .download_assets(&[AssetId::from("607785314")])
///     .await?;
/// println!("{} artifacts", paths.len());
/// # Ok(())
/// # }
/// ```
pub struct AssetPipeline<K, E = TokioExecutor>
where
    K: HttpConnector,
{
    connector: K,
    shared: Arc<Shared<E>>,
}

impl AssetPipeline<ReqwestConnector, TokioExecutor> {
    /// Builds a production pipeline.
    ///
    /// The auth cookie file is read once here; a missing or empty file means
    /// unauthenticated requests.
    pub fn from_config(config: PipelineConfig) -> Result<Self, PipelineError> {
        let cookie = load_auth_cookie(&config.cookie_file_path());
        if cookie.is_some() {
            info!("Using authenticated session");
        }
        let connector = ReqwestConnector::new(config.session_config(cookie));
        Self::new(config, connector)
    }
}

impl<K> AssetPipeline<K, TokioExecutor>
where
    K: HttpConnector,
{
    /// Builds a pipeline that opens sessions through `connector`.
    pub fn new(config: PipelineConfig, connector: K) -> Result<Self, PipelineError> {
        Self::with_executor(config, connector, TokioExecutor::new())
    }
}

impl<K, E> AssetPipeline<K, E>
where
    K: HttpConnector,
    E: BlockingExecutor + ConcurrentRunner,
{
    /// Builds a pipeline with a custom executor.
    ///
    /// Fails if a limit is zero or the template cannot be loaded.
    pub fn with_executor(
        config: PipelineConfig,
        connector: K,
        executor: E,
    ) -> Result<Self, PipelineError> {
        if config.max_concurrent() == 0 {
            return Err(PipelineError::InvalidConfig(
                "max_concurrent must be at least 1".to_string(),
            ));
        }
        if config.worker_threads() == 0 {
            return Err(PipelineError::InvalidConfig(
                "worker_threads must be at least 1".to_string(),
            ));
        }

        let template = Template::from_config(&config)?;

        info!(
            runtime_dir = %config.runtime_dir().display(),
            max_concurrent = config.max_concurrent(),
            workers = config.worker_threads(),
            template = ?template.as_ref().map(|t| t.path().display().to_string()),
            "Asset pipeline ready"
        );

        Ok(Self {
            connector,
            shared: Arc::new(Shared {
                network: ConcurrencyLimiter::new(config.max_concurrent(), "network"),
                cpu: ConcurrencyLimiter::new(config.worker_threads(), "cpu"),
                template,
                config,
                executor,
            }),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.shared.config
    }

    pub fn template(&self) -> Option<&Template> {
        self.shared.template.as_ref()
    }

    /// Limiter gating every remote call.
    pub fn network_limiter(&self) -> &ConcurrencyLimiter {
        &self.shared.network
    }

    /// Limiter sizing the composite worker pool.
    pub fn cpu_limiter(&self) -> &ConcurrencyLimiter {
        &self.shared.cpu
    }

    /// Downloads the given assets and returns the stored artifact paths.
    ///
    /// Artifacts are labelled `Unknown`. Order of the result is unspecified.
    pub async fn download_assets(&self, ids: &[AssetId]) -> Result<Vec<PathBuf>, PipelineError> {
        self.download_assets_report(ids)
            .await
            .map(RunReport::into_artifacts)
    }

    /// Like [`download_assets`](Self::download_assets), also reporting
    /// which assets were dropped and why.
    pub async fn download_assets_report(&self, ids: &[AssetId]) -> Result<RunReport, PipelineError> {
        if ids.is_empty() {
            return Ok(RunReport::default());
        }

        let client = Arc::new(self.connector.connect().map_err(PipelineError::Session)?);
        self.run(client, ids.to_vec(), RunContext::new()).await
    }

    /// Lists up to `limit` clothing items of a group and downloads them.
    ///
    /// Artifacts are labelled with each item's catalog type.
    pub async fn download_group_items(
        &self,
        group_id: &str,
        sort: &str,
        limit: usize,
    ) -> Result<Vec<PathBuf>, PipelineError> {
        self.download_group_report(group_id, sort, limit)
            .await
            .map(RunReport::into_artifacts)
    }

    /// Group mode with failure details.
    ///
    /// Pagination and downloads share one session. A pagination error ends
    /// the run before anything is downloaded.
    #[instrument(skip(self))]
    pub async fn download_group_report(
        &self,
        group_id: &str,
        sort: &str,
        limit: usize,
    ) -> Result<RunReport, PipelineError> {
        if limit == 0 {
            return Ok(RunReport::default());
        }

        let client = Arc::new(self.connector.connect().map_err(PipelineError::Session)?);
        let query =
            CatalogQuery::new(group_id, sort, limit).with_page_size(self.shared.config.page_size());

        let items = paginate_catalog(
            client.as_ref(),
            &self.shared.network,
            self.shared.config.catalog_search_url(),
            &query,
        )
        .await?;

        info!(group_id, items = items.len(), "Group catalog listed");

        if items.is_empty() {
            return Ok(RunReport::default());
        }

        let context = RunContext::from_items(&items);
        let ids = items.into_iter().map(|item| item.asset_id).collect();
        self.run(client, ids, context).await
    }

    /// Runs both phases for one batch on one session.
    async fn run(
        &self,
        client: Arc<K::Client>,
        ids: Vec<AssetId>,
        context: RunContext,
    ) -> Result<RunReport, PipelineError> {
        let start = Instant::now();
        let assets_dir = prepare_assets_dir(&self.shared.config)?;
        let ids = dedup_preserving_order(ids);
        let total = ids.len();
        let mut report = RunReport::default();

        info!(assets = total, "Run started");

        // Phase 1: resolve
        let resolve_tasks: Vec<_> = ids
            .into_iter()
            .map(|asset_id| {
                let shared = Arc::clone(&self.shared);
                let client = Arc::clone(&client);
                async move {
                    let result = resolve_stage(
                        &asset_id,
                        client.as_ref(),
                        &shared.network,
                        shared.config.asset_delivery_url(),
                    )
                    .await;
                    (asset_id, result)
                }
            })
            .collect();

        let mut resolved: Vec<(AssetId, TextureId)> = Vec::with_capacity(total);
        for outcome in self.shared.executor.run_concurrent(resolve_tasks).await {
            match outcome {
                Ok((asset_id, Ok(texture_id))) => resolved.push((asset_id, texture_id)),
                Ok((asset_id, Err(e))) => report.failures.push(AssetFailure::new(asset_id, e)),
                Err(e) => error!(error = %e, "Resolve task failed"),
            }
        }

        if resolved.is_empty() {
            warn!(assets = total, "No asset could be resolved");
            return Ok(report);
        }

        debug!(resolved = resolved.len(), assets = total, "Resolve phase complete");

        // Phase 2: fetch + composite
        let settings = Arc::new(CompositeSettings {
            assets_dir,
            template: self.shared.template.clone(),
            keep_partial: self.shared.config.keep_partial_artifacts(),
        });
        let context = Arc::new(context);

        let download_tasks: Vec<_> = resolved
            .into_iter()
            .map(|(asset_id, texture_id)| {
                let shared = Arc::clone(&self.shared);
                let client = Arc::clone(&client);
                let settings = Arc::clone(&settings);
                let context = Arc::clone(&context);
                async move {
                    let result =
                        download_one(&shared, client.as_ref(), &settings, &context, &asset_id, &texture_id)
                            .await;
                    (asset_id, result)
                }
            })
            .collect();

        for outcome in self.shared.executor.run_concurrent(download_tasks).await {
            match outcome {
                Ok((asset_id, Ok(path))) => {
                    info!(asset_id = %asset_id, path = %path.display(), "Processed asset");
                    report.artifacts.push(path);
                }
                Ok((asset_id, Err(e))) => report.failures.push(AssetFailure::new(asset_id, e)),
                Err(e) => error!(error = %e, "Download task failed"),
            }
        }

        info!(
            assets = total,
            succeeded = report.success_count(),
            failed = report.failure_count(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Run complete"
        );

        Ok(report)
    }
}

/// Fetch then composite one resolved asset.
async fn download_one<C, E>(
    shared: &Shared<E>,
    client: &C,
    settings: &CompositeSettings,
    context: &RunContext,
    asset_id: &AssetId,
    texture_id: &TextureId,
) -> Result<PathBuf, StageError>
where
    C: crate::http::AsyncHttpClient,
    E: BlockingExecutor,
{
    let bytes = fetch_stage(
        asset_id,
        texture_id,
        client,
        &shared.network,
        shared.config.asset_delivery_url(),
    )
    .await?;

    let label = context.label_for(asset_id);
    composite_stage(asset_id, &label, bytes, settings, &shared.executor, &shared.cpu).await
}

/// Creates the assets directory and returns its absolute path.
fn prepare_assets_dir(config: &PipelineConfig) -> Result<PathBuf, PipelineError> {
    let dir = config.assets_dir();
    let directory_error = |source: std::io::Error| PipelineError::Directory {
        path: dir.clone(),
        source,
    };

    fs::create_dir_all(&dir).map_err(directory_error)?;
    fs::canonicalize(&dir).map_err(directory_error)
}

/// Drops repeated ids so each asset is attempted once per run.
fn dedup_preserving_order(ids: Vec<AssetId>) -> Vec<AssetId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}
