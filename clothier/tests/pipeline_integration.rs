//! Integration tests for the asset pipeline.
//!
//! These tests drive the public API end to end against an in-memory asset
//! service:
//! - Direct-asset runs with mixed successes and failures
//! - Group runs with cursor pagination and type labels
//! - The network concurrency cap under load
//! - Template compositing and renaming of the finished artifacts

use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clothier::asset::AssetId;
use clothier::catalog::{page_url, rename_from_catalog, CatalogQuery};
use clothier::config::PipelineConfig;
use clothier::http::{AsyncHttpClient, HttpConnector, HttpError};
use clothier::pipeline::{AssetPipeline, PipelineError, Stage};
use image::{ImageFormat, Rgba, RgbaImage};
use tempfile::TempDir;

const DELIVERY: &str = "https://delivery.test/v1/asset/";
const CATALOG: &str = "https://catalog.test/v1/search/items/details";

// =============================================================================
// Test Helpers
// =============================================================================

/// In-memory asset service keyed by exact URL.
#[derive(Default)]
struct FakeService {
    routes: HashMap<String, Result<Vec<u8>, HttpError>>,
    hits: Mutex<Vec<String>>,
    active: AtomicUsize,
    peak: AtomicUsize,
    latency: Duration,
}

impl FakeService {
    fn route(&mut self, url: String, response: Result<Vec<u8>, HttpError>) {
        self.routes.insert(url, response);
    }

    /// Serves asset `id` as texture `90000{id}` with a `size`x`size` PNG.
    ///
    /// The texture range is disjoint from the asset ids used here.
    fn asset(&mut self, id: &str, size: u32) {
        let texture = format!("90000{}", id);
        self.route(
            delivery(id),
            Ok(format!(
                "<roblox><Item><Properties><Content name=\"ShirtTemplate\"><url>http://www.roblox.com/asset/?id={}</url></Content></Properties></Item></roblox>",
                texture
            )
            .into_bytes()),
        );
        self.route(delivery(&texture), Ok(png(size, Rgba([0, 0, 200, 255]))));
    }

    fn hits_with_prefix(&self, prefix: &str) -> usize {
        self.hits
            .lock()
            .unwrap()
            .iter()
            .filter(|url| url.starts_with(prefix))
            .count()
    }
}

#[derive(Clone)]
struct FakeClient {
    service: Arc<FakeService>,
}

impl AsyncHttpClient for FakeClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        let service = &self.service;
        service.hits.lock().unwrap().push(url.to_string());

        let now = service.active.fetch_add(1, Ordering::SeqCst) + 1;
        service.peak.fetch_max(now, Ordering::SeqCst);
        if !service.latency.is_zero() {
            tokio::time::sleep(service.latency).await;
        }
        service.active.fetch_sub(1, Ordering::SeqCst);

        service.routes.get(url).cloned().unwrap_or(Err(HttpError::Status {
            url: url.to_string(),
            status: 404,
        }))
    }
}

struct FakeConnector {
    service: Arc<FakeService>,
    sessions: Arc<AtomicUsize>,
}

impl FakeConnector {
    fn new(service: FakeService) -> Self {
        Self {
            service: Arc::new(service),
            sessions: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl HttpConnector for FakeConnector {
    type Client = FakeClient;

    fn connect(&self) -> Result<FakeClient, HttpError> {
        self.sessions.fetch_add(1, Ordering::SeqCst);
        Ok(FakeClient {
            service: Arc::clone(&self.service),
        })
    }
}

fn delivery(id: &str) -> String {
    format!("{}?id={}", DELIVERY, id)
}

fn png(size: u32, pixel: Rgba<u8>) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    RgbaImage::from_pixel(size, size, pixel)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

fn base_config(runtime: &Path) -> PipelineConfig {
    PipelineConfig::new()
        .with_runtime_dir(runtime)
        .with_asset_delivery_url(DELIVERY)
        .with_catalog_search_url(CATALOG)
}

fn catalog_page(items: &[(u64, u32)], cursor: Option<&str>) -> Vec<u8> {
    let data: Vec<serde_json::Value> = items
        .iter()
        .map(|(id, code)| serde_json::json!({ "id": id, "itemType": "Asset", "assetType": code }))
        .collect();
    serde_json::json!({ "previousPageCursor": null, "nextPageCursor": cursor, "data": data })
        .to_string()
        .into_bytes()
}

// =============================================================================
// Direct-asset runs
// =============================================================================

#[tokio::test]
async fn test_direct_run_keeps_only_successful_assets() {
    let runtime = TempDir::new().unwrap();
    let mut service = FakeService::default();
    service.asset("1001", 16);
    service.route(delivery("1002"), Ok(b"<roblox></roblox>".to_vec()));
    service.route(
        delivery("1003"),
        Ok(b"<Content>rbxassetid://55</Content>".to_vec()),
    );
    let pipeline = AssetPipeline::new(base_config(runtime.path()), FakeConnector::new(service))
        .unwrap();

    let ids: Vec<AssetId> = ["1001", "1002", "1003"].into_iter().map(AssetId::from).collect();
    let report = pipeline.download_assets_report(&ids).await.unwrap();

    assert_eq!(report.artifacts.len(), 1);
    assert!(report.artifacts.len() <= ids.len());
    for path in &report.artifacts {
        assert!(path.exists());
        assert!(image::open(path).is_ok());
    }

    let resolve_failures: Vec<_> = report.failures_at(Stage::Resolve).collect();
    assert_eq!(resolve_failures.len(), 1);
    assert_eq!(resolve_failures[0].asset_id, AssetId::from("1002"));

    let fetch_failures: Vec<_> = report.failures_at(Stage::Fetch).collect();
    assert_eq!(fetch_failures.len(), 1);
    assert_eq!(fetch_failures[0].asset_id, AssetId::from("1003"));

    let written: Vec<_> = fs::read_dir(runtime.path().join("assets"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(written, vec!["1001_Unknown.png".to_string()]);
}

#[tokio::test]
async fn test_template_composite_matches_fetched_size() {
    let runtime = TempDir::new().unwrap();
    RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]))
        .save(runtime.path().join("template.png"))
        .unwrap();
    let mut service = FakeService::default();
    service.asset("7", 32);
    let pipeline = AssetPipeline::new(base_config(runtime.path()), FakeConnector::new(service))
        .unwrap();

    let paths = pipeline
        .download_assets(&[AssetId::from("7")])
        .await
        .unwrap();

    assert_eq!(paths.len(), 1);
    let output = image::open(&paths[0]).unwrap().to_rgba8();
    assert_eq!(output.dimensions(), (32, 32));
}

#[tokio::test]
async fn test_repeated_runs_produce_identical_artifacts() {
    let runtime = TempDir::new().unwrap();
    RgbaImage::from_pixel(5, 3, Rgba([10, 200, 10, 100]))
        .save(runtime.path().join("template.png"))
        .unwrap();
    let mut service = FakeService::default();
    service.asset("8", 24);
    let pipeline = AssetPipeline::new(base_config(runtime.path()), FakeConnector::new(service))
        .unwrap();
    let ids = [AssetId::from("8")];

    let first_paths = pipeline.download_assets(&ids).await.unwrap();
    let first = fs::read(&first_paths[0]).unwrap();
    let second_paths = pipeline.download_assets(&ids).await.unwrap();
    let second = fs::read(&second_paths[0]).unwrap();

    assert_eq!(first_paths, second_paths);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_explicit_template_must_exist() {
    let runtime = TempDir::new().unwrap();
    let config = base_config(runtime.path()).with_template(Some(runtime.path().join("custom.png")));

    let result = AssetPipeline::new(config, FakeConnector::new(FakeService::default()));

    assert!(matches!(result, Err(PipelineError::TemplateNotFound(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_cap_under_load() {
    let runtime = TempDir::new().unwrap();
    let mut service = FakeService {
        latency: Duration::from_millis(3),
        ..FakeService::default()
    };
    let ids: Vec<AssetId> = (1..=40u64).map(AssetId::from).collect();
    for id in &ids {
        service.asset(id.as_str(), 4);
    }
    let connector = FakeConnector::new(service);
    let service = Arc::clone(&connector.service);
    let sessions = Arc::clone(&connector.sessions);
    let pipeline = AssetPipeline::new(
        base_config(runtime.path())
            .with_max_concurrent(4)
            .with_worker_threads(2),
        connector,
    )
    .unwrap();

    let paths = pipeline.download_assets(&ids).await.unwrap();

    assert_eq!(paths.len(), 40);
    assert!(service.peak.load(Ordering::SeqCst) <= 4);
    assert!(pipeline.cpu_limiter().peak_in_flight() <= 2);
    assert_eq!(sessions.load(Ordering::SeqCst), 1);
}

// =============================================================================
// Group runs
// =============================================================================

#[tokio::test]
async fn test_group_run_stops_listing_at_limit() {
    let runtime = TempDir::new().unwrap();
    let query = CatalogQuery::new("4242", "Updated", 10);
    let first: Vec<(u64, u32)> = (100..108).map(|id| (id, 11)).collect();
    let second: Vec<(u64, u32)> = (108..116).map(|id| (id, 12)).collect();
    let third: Vec<(u64, u32)> = (116..125).map(|id| (id, 11)).collect();

    let mut service = FakeService::default();
    service.route(page_url(CATALOG, &query, None).unwrap(), Ok(catalog_page(&first, Some("c2"))));
    service.route(
        page_url(CATALOG, &query, Some("c2")).unwrap(),
        Ok(catalog_page(&second, Some("c3"))),
    );
    service.route(
        page_url(CATALOG, &query, Some("c3")).unwrap(),
        Ok(catalog_page(&third, None)),
    );
    for id in 100..125u64 {
        service.asset(&id.to_string(), 4);
    }
    let connector = FakeConnector::new(service);
    let service = Arc::clone(&connector.service);
    let sessions = Arc::clone(&connector.sessions);
    let pipeline = AssetPipeline::new(base_config(runtime.path()), connector).unwrap();

    let paths = pipeline
        .download_group_items("4242", "Updated", 10)
        .await
        .unwrap();

    assert_eq!(paths.len(), 10);
    assert_eq!(service.hits_with_prefix(CATALOG), 2);
    assert_eq!(sessions.load(Ordering::SeqCst), 1);

    let assets = runtime.path().join("assets");
    assert!(assets.join("100_Shirt.png").exists());
    assert!(assets.join("109_Pants.png").exists());
    assert!(!assets.join("110_Pants.png").exists());
}

#[tokio::test]
async fn test_group_run_with_short_listing() {
    let runtime = TempDir::new().unwrap();
    let query = CatalogQuery::new("9", "Updated", 10);
    let mut service = FakeService::default();
    service.route(
        page_url(CATALOG, &query, None).unwrap(),
        Ok(catalog_page(&[(1, 11), (2, 64)], None)),
    );
    service.asset("1", 4);
    service.asset("2", 4);
    let pipeline = AssetPipeline::new(base_config(runtime.path()), FakeConnector::new(service))
        .unwrap();

    let paths = pipeline
        .download_group_items("9", "Updated", 10)
        .await
        .unwrap();

    assert_eq!(paths.len(), 2);
    let assets = runtime.path().join("assets");
    assert!(assets.join("1_Shirt.png").exists());
    assert!(assets.join("2_Type64.png").exists());
}

#[tokio::test]
async fn test_group_run_surfaces_malformed_listing() {
    let runtime = TempDir::new().unwrap();
    let query = CatalogQuery::new("9", "Updated", 10);
    let mut service = FakeService::default();
    service.route(page_url(CATALOG, &query, None).unwrap(), Ok(b"not json".to_vec()));
    let pipeline = AssetPipeline::new(base_config(runtime.path()), FakeConnector::new(service))
        .unwrap();

    let result = pipeline.download_group_items("9", "Updated", 10).await;

    assert!(matches!(result, Err(PipelineError::Catalog(_))));
}

// =============================================================================
// Renaming
// =============================================================================

#[tokio::test]
async fn test_rename_after_download() {
    let runtime = TempDir::new().unwrap();
    let mut service = FakeService::default();
    service.asset("11", 4);
    service.asset("12", 4);
    let pipeline = AssetPipeline::new(base_config(runtime.path()), FakeConnector::new(service))
        .unwrap();
    pipeline
        .download_assets(&[AssetId::from("11"), AssetId::from("12")])
        .await
        .unwrap();

    let catalog = runtime.path().join("catalog_items.json");
    fs::write(
        &catalog,
        r#"{"items": [{"name": "Cool Shirt"}, {"name": "*Hot* Pants"}]}"#,
    )
    .unwrap();

    let assets = runtime.path().join("assets");
    let renamed = rename_from_catalog(&catalog, &assets).unwrap();

    assert_eq!(renamed.len(), 2);
    assert!(assets.join("Cool_Shirt.png").exists());
    assert!(assets.join("Hot_Pants.png").exists());
    assert!(!assets.join("11_Unknown.png").exists());
}
