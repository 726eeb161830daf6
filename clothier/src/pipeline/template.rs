//! The overlay template.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;
use tracing::{debug, info};

use super::PipelineError;
use crate::config::PipelineConfig;

/// Overlay image decoded once and shared read-only by every composite.
///
/// Cloning is cheap; the pixels sit behind an `Arc` and are never mutated.
/// Composites that need a different size resize their own copy.
#[derive(Debug, Clone)]
pub struct Template {
    path: PathBuf,
    image: Arc<RgbaImage>,
}

impl Template {
    /// Loads and decodes a template image.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        if !path.is_file() {
            return Err(PipelineError::TemplateNotFound(path.to_path_buf()));
        }

        let image = image::open(path)
            .map_err(|e| PipelineError::TemplateDecode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
            .to_rgba8();

        debug!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "Template loaded"
        );

        Ok(Self {
            path: path.to_path_buf(),
            image: Arc::new(image),
        })
    }

    /// Picks the template for a pipeline configuration.
    ///
    /// An explicitly configured template must exist. Otherwise the default
    /// `template.png` in the runtime directory is used when present, and
    /// compositing is skipped when it is not.
    pub fn from_config(config: &PipelineConfig) -> Result<Option<Self>, PipelineError> {
        match config.template() {
            Some(explicit) => Self::load(explicit).map(Some),
            None => {
                let fallback = config.template_path();
                if fallback.is_file() {
                    Self::load(&fallback).map(Some)
                } else {
                    info!(
                        path = %fallback.display(),
                        "No template found, artifacts will be stored as downloaded"
                    );
                    Ok(None)
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Wraps an in-memory image, for callers that build templates directly.
    pub fn from_image(image: RgbaImage) -> Self {
        Self {
            path: PathBuf::new(),
            image: Arc::new(image),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::TempDir;

    fn write_png(path: &Path, width: u32, height: u32) {
        RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 128]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn test_load_template() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("template.png");
        write_png(&path, 8, 4);

        let template = Template::load(&path).unwrap();
        assert_eq!(template.dimensions(), (8, 4));
        assert_eq!(template.path(), path.as_path());
    }

    #[test]
    fn test_missing_explicit_template_is_fatal() {
        let dir = TempDir::new().unwrap();
        let config = PipelineConfig::new()
            .with_runtime_dir(dir.path())
            .with_template(Some(dir.path().join("missing.png")));

        assert!(matches!(
            Template::from_config(&config),
            Err(PipelineError::TemplateNotFound(_))
        ));
    }

    #[test]
    fn test_undecodable_template_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("template.png");
        std::fs::write(&path, b"not an image").unwrap();

        assert!(matches!(
            Template::load(&path),
            Err(PipelineError::TemplateDecode { .. })
        ));
    }

    #[test]
    fn test_default_template_used_when_present() {
        let dir = TempDir::new().unwrap();
        write_png(&dir.path().join("template.png"), 2, 2);
        let config = PipelineConfig::new().with_runtime_dir(dir.path());

        let template = Template::from_config(&config).unwrap();
        assert!(template.is_some());
    }

    #[test]
    fn test_no_default_template_means_none() {
        let dir = TempDir::new().unwrap();
        let config = PipelineConfig::new().with_runtime_dir(dir.path());

        assert!(Template::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_clone_shares_pixels() {
        let template = Template::from_image(RgbaImage::new(4, 4));
        let copy = template.clone();
        assert!(Arc::ptr_eq(&template.image, &copy.image));
    }
}
