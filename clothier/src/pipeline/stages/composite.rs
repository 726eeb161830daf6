//! Composite stage - overlays the template onto a fetched texture.
//!
//! The raw bytes are written to the destination before any decoding, then
//! replaced by the composited PNG. Decoding, resizing and encoding run on
//! the blocking pool; the `cpu` limiter bounds how many run at once.

use std::fs;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbaImage};
use tracing::{debug, error, instrument, warn};

use crate::asset::{AssetId, TypeLabel};
use crate::config::ARTIFACT_EXTENSION;
use crate::pipeline::{BlockingExecutor, ConcurrencyLimiter, StageError, Template};

/// Settings shared by every composite of a run.
#[derive(Debug, Clone)]
pub struct CompositeSettings {
    pub assets_dir: PathBuf,
    pub template: Option<Template>,
    pub keep_partial: bool,
}

/// File name of the artifact for an asset: `{asset_id}_{label}.png`.
pub fn artifact_file_name(asset_id: &AssetId, label: &TypeLabel) -> String {
    format!("{}_{}.{}", asset_id, label, ARTIFACT_EXTENSION)
}

/// Stores one fetched texture as an artifact.
///
/// Returns the artifact path. On failure the write-first file is removed
/// unless `keep_partial` is set.
#[instrument(skip(bytes, settings, executor, cpu_limiter), fields(asset_id = %asset_id, label = %label))]
pub async fn composite_stage<E>(
    asset_id: &AssetId,
    label: &TypeLabel,
    bytes: Vec<u8>,
    settings: &CompositeSettings,
    executor: &E,
    cpu_limiter: &ConcurrencyLimiter,
) -> Result<PathBuf, StageError>
where
    E: BlockingExecutor,
{
    let destination = settings
        .assets_dir
        .join(artifact_file_name(asset_id, label));
    let template = settings.template.clone();
    let keep_partial = settings.keep_partial;

    let result = {
        let _permit = cpu_limiter.acquire().await;
        let target = destination.clone();
        executor
            .execute_blocking(move || {
                store_artifact(&bytes, &target, template.as_ref().map(Template::image), keep_partial)
            })
            .await
            .map_err(|e| StageError::TaskPanicked(e.to_string()))
            .and_then(|inner| inner)
    };

    match result {
        Ok(()) => {
            debug!(asset_id = %asset_id, path = %destination.display(), "Artifact stored");
            Ok(destination)
        }
        Err(e @ StageError::TaskPanicked(_)) => {
            // the task died before its own cleanup could run
            if !keep_partial {
                remove_partial(&destination);
            }
            error!(asset_id = %asset_id, error = %e, "Failed to composite asset");
            Err(e)
        }
        Err(e) => {
            error!(asset_id = %asset_id, error = %e, "Failed to composite asset");
            Err(e)
        }
    }
}

/// Synchronous write-then-composite (runs in spawn_blocking).
pub fn store_artifact(
    bytes: &[u8],
    destination: &Path,
    template: Option<&RgbaImage>,
    keep_partial: bool,
) -> Result<(), StageError> {
    fs::write(destination, bytes).map_err(|e| io_error(destination, e))?;

    let result = match template {
        Some(template) => overlay_template(bytes, template, destination),
        None => image::guess_format(bytes)
            .map(|_| ())
            .map_err(|_| StageError::UnrecognizedFormat),
    };

    if result.is_err() && !keep_partial {
        remove_partial(destination);
    }

    result
}

fn remove_partial(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to remove partial artifact");
        }
    }
}

/// Decodes the fetched image, blends the template over it and saves a PNG.
///
/// The output always has the fetched image's dimensions. The template is
/// resized into a fresh buffer when the sizes differ.
fn overlay_template(
    bytes: &[u8],
    template: &RgbaImage,
    destination: &Path,
) -> Result<(), StageError> {
    let mut base = image::load_from_memory(bytes)
        .map_err(|e| StageError::ImageDecode(e.to_string()))?
        .to_rgba8();
    let (width, height) = base.dimensions();

    if template.dimensions() == (width, height) {
        imageops::overlay(&mut base, template, 0, 0);
    } else {
        let resized = imageops::resize(template, width, height, FilterType::Lanczos3);
        imageops::overlay(&mut base, &resized, 0, 0);
    }

    base.save_with_format(destination, ImageFormat::Png)
        .map_err(|e| match e {
            image::ImageError::IoError(io) => io_error(destination, io),
            other => StageError::ImageEncode(other.to_string()),
        })
}

fn io_error(path: &Path, e: std::io::Error) -> StageError {
    StageError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::executor::SyncExecutor;
    use crate::pipeline::{BlockingResult, ExecutorError, TokioExecutor};
    use image::Rgba;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn png_bytes(width: u32, height: u32, pixel: Rgba<u8>) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, pixel);
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    /// Runs the work to completion, then reports the task as panicked.
    struct DyingExecutor;

    impl BlockingExecutor for DyingExecutor {
        fn execute_blocking<F, R>(&self, f: F) -> BlockingResult<R>
        where
            F: FnOnce() -> R + Send + 'static,
            R: Send + 'static,
        {
            let _ = f();
            Box::pin(std::future::ready(Err(ExecutorError::TaskPanicked(
                "worker died".to_string(),
            ))))
        }
    }

    fn settings(dir: &TempDir, template: Option<RgbaImage>, keep_partial: bool) -> CompositeSettings {
        CompositeSettings {
            assets_dir: dir.path().to_path_buf(),
            template: template.map(Template::from_image),
            keep_partial,
        }
    }

    #[test]
    fn test_artifact_file_name() {
        assert_eq!(
            artifact_file_name(&AssetId::from("123"), &TypeLabel::new("Shirt")),
            "123_Shirt.png"
        );
    }

    #[test]
    fn test_output_takes_fetched_dimensions() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("1_Shirt.png");
        let fetched = png_bytes(16, 8, Rgba([0, 0, 255, 255]));
        let template = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));

        store_artifact(&fetched, &destination, Some(&template), false).unwrap();

        let output = image::open(&destination).unwrap().to_rgba8();
        assert_eq!(output.dimensions(), (16, 8));
        // opaque template covers the fetched image
        let pixel = output.get_pixel(8, 4);
        assert!(pixel[0] > 200);
        assert!(pixel[2] < 50);
    }

    #[test]
    fn test_transparent_template_keeps_fetched_pixels() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("1_Pants.png");
        let fetched = png_bytes(4, 4, Rgba([0, 200, 0, 255]));
        let template = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 0]));

        store_artifact(&fetched, &destination, Some(&template), false).unwrap();

        let output = image::open(&destination).unwrap().to_rgba8();
        assert_eq!(*output.get_pixel(1, 1), Rgba([0, 200, 0, 255]));
    }

    #[test]
    fn test_composite_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("1_Shirt.png");
        let fetched = png_bytes(12, 12, Rgba([10, 20, 30, 255]));
        let template = RgbaImage::from_pixel(5, 7, Rgba([200, 100, 50, 128]));

        store_artifact(&fetched, &destination, Some(&template), false).unwrap();
        let first = fs::read(&destination).unwrap();
        store_artifact(&fetched, &destination, Some(&template), false).unwrap();
        let second = fs::read(&destination).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_template_is_not_mutated() {
        let dir = TempDir::new().unwrap();
        let template = RgbaImage::from_pixel(3, 3, Rgba([1, 2, 3, 4]));
        let before = template.clone();

        store_artifact(
            &png_bytes(9, 9, Rgba([0, 0, 0, 255])),
            &dir.path().join("a.png"),
            Some(&template),
            false,
        )
        .unwrap();

        assert_eq!(template, before);
    }

    #[test]
    fn test_without_template_stores_raw_bytes() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("1_Unknown.png");
        let fetched = png_bytes(3, 3, Rgba([1, 1, 1, 255]));

        store_artifact(&fetched, &destination, None, false).unwrap();

        assert_eq!(fs::read(&destination).unwrap(), fetched);
    }

    #[test]
    fn test_without_template_rejects_unknown_format() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("1_Unknown.png");

        let result = store_artifact(b"<html>not an image</html>", &destination, None, false);

        assert_eq!(result, Err(StageError::UnrecognizedFormat));
        assert!(!destination.exists());
    }

    #[test]
    fn test_decode_failure_removes_partial_file() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("1_Shirt.png");
        let template = RgbaImage::new(2, 2);

        let result = store_artifact(b"garbage", &destination, Some(&template), false);

        assert!(matches!(result, Err(StageError::ImageDecode(_))));
        assert!(!destination.exists());
    }

    #[test]
    fn test_decode_failure_keeps_partial_file_when_configured() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("1_Shirt.png");
        let template = RgbaImage::new(2, 2);

        let result = store_artifact(b"garbage", &destination, Some(&template), true);

        assert!(result.is_err());
        assert_eq!(fs::read(&destination).unwrap(), b"garbage");
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("absent").join("1_Shirt.png");

        let result = store_artifact(&png_bytes(1, 1, Rgba([0, 0, 0, 255])), &destination, None, false);

        assert!(matches!(result, Err(StageError::Io { .. })));
    }

    #[test]
    fn test_composite_stage_with_sync_executor() {
        let dir = TempDir::new().unwrap();
        let settings = settings(&dir, Some(RgbaImage::new(2, 2)), false);
        let limiter = ConcurrencyLimiter::new(1, "cpu");

        let path = futures::executor::block_on(composite_stage(
            &AssetId::from("5"),
            &TypeLabel::new("Pants"),
            png_bytes(6, 6, Rgba([9, 9, 9, 255])),
            &settings,
            &SyncExecutor,
            &limiter,
        ))
        .unwrap();

        assert_eq!(path, dir.path().join("5_Pants.png"));
        assert!(path.exists());
        assert_eq!(limiter.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_composite_stage_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let settings = settings(&dir, None, false);
        let limiter = ConcurrencyLimiter::new(1, "cpu");

        let result = composite_stage(
            &AssetId::from("5"),
            &TypeLabel::unknown(),
            b"nope".to_vec(),
            &settings,
            &TokioExecutor::new(),
            &limiter,
        )
        .await;

        assert_eq!(result, Err(StageError::UnrecognizedFormat));
        assert!(!dir.path().join("5_Unknown.png").exists());
    }

    #[tokio::test]
    async fn test_panicked_task_removes_written_file() {
        let dir = TempDir::new().unwrap();
        let limiter = ConcurrencyLimiter::new(1, "cpu");

        let result = composite_stage(
            &AssetId::from("5"),
            &TypeLabel::unknown(),
            png_bytes(2, 2, Rgba([0, 0, 0, 255])),
            &settings(&dir, None, false),
            &DyingExecutor,
            &limiter,
        )
        .await;

        assert!(matches!(result, Err(StageError::TaskPanicked(_))));
        assert!(!dir.path().join("5_Unknown.png").exists());
    }

    #[tokio::test]
    async fn test_panicked_task_keeps_file_when_configured() {
        let dir = TempDir::new().unwrap();
        let limiter = ConcurrencyLimiter::new(1, "cpu");

        let result = composite_stage(
            &AssetId::from("5"),
            &TypeLabel::unknown(),
            png_bytes(2, 2, Rgba([0, 0, 0, 255])),
            &settings(&dir, None, true),
            &DyingExecutor,
            &limiter,
        )
        .await;

        assert!(result.is_err());
        assert!(dir.path().join("5_Unknown.png").exists());
    }
}
