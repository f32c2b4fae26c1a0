//! Vehicle pictures on the local filesystem.

use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use image::{DynamicImage, ImageError, ImageReader};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use driveflow_core::{
    application::{ApplicationError, ports::ImageStore, ports::Thumbnail},
    error::{DriveflowError, DriveflowResult},
};

/// Default directory, relative to the working directory.
pub const DEFAULT_IMAGES_DIR: &str = "vehicle_images";

/// Default thumbnail bounds.
pub const DEFAULT_THUMBNAIL_SIZE: (u32, u32) = (150, 150);

type CacheKey = (String, (u32, u32));

/// Images copied into one managed directory, with a thumbnail cache.
#[derive(Debug)]
pub struct LocalImageStore {
    dir: PathBuf,
    cache: Mutex<HashMap<CacheKey, Thumbnail>>,
}

impl LocalImageStore {
    /// Use `dir` as the images directory, creating it if missing.
    pub fn new(dir: impl Into<PathBuf>) -> DriveflowResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| map_io_error(&dir, e, "create images directory"))?;
        debug!(dir = %dir.display(), "Images directory ready");
        Ok(Self {
            dir,
            cache: Mutex::new(HashMap::new()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of a stored image. `None` unless `name` is a bare file
    /// name, so stored names never reach outside the images directory.
    pub fn path_of(&self, name: &str) -> Option<PathBuf> {
        is_bare_file_name(name).then(|| self.dir.join(name))
    }

    /// Number of cached thumbnails.
    pub fn cached(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Exactly one normal path component and no separator of either platform.
fn is_bare_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

/// `vehicle_<unix-ts>_<8 hex>.<ext>`
fn generated_name(extension: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "vehicle_{}_{}.{}",
        Utc::now().timestamp(),
        &suffix[..8],
        extension.trim_start_matches('.').to_lowercase()
    )
}

impl ImageStore for LocalImageStore {
    #[instrument(skip(self), fields(source = %source.display()))]
    fn import_and_copy(&self, source: &Path) -> DriveflowResult<Option<String>> {
        let reader = ImageReader::open(source)
            .and_then(|r| r.with_guessed_format())
            .map_err(|e| map_io_error(source, e, "open image"))?;
        let format = reader.format();

        match reader.decode() {
            Ok(_) => {}
            Err(ImageError::IoError(e)) => return Err(map_io_error(source, e, "read image")),
            Err(e) => {
                warn!(error = %e, "File is not a valid image");
                return Ok(None);
            }
        }

        let extension = format
            .and_then(|f| f.extensions_str().first().copied())
            .map(str::to_string)
            .or_else(|| {
                source
                    .extension()
                    .map(|ext| ext.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| "img".to_string());

        let name = generated_name(&extension);
        let destination = self.dir.join(&name);
        std::fs::copy(source, &destination)
            .map_err(|e| map_io_error(&destination, e, "copy image"))?;

        info!(name = %name, "Image imported");
        Ok(Some(name))
    }

    fn load_thumbnail(&self, name: &str, bounds: (u32, u32)) -> Option<Thumbnail> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let key = (name.to_string(), bounds);
        if let Some(hit) = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Some(hit.clone());
        }

        let Some(path) = self.path_of(name) else {
            warn!(name, "Refusing image name outside the images directory");
            return None;
        };
        if !path.exists() {
            warn!(path = %path.display(), "Image not found");
            return None;
        }

        let image = match ImageReader::open(&path)
            .map_err(ImageError::IoError)
            .and_then(|r| r.with_guessed_format().map_err(ImageError::IoError))
            .and_then(|r| r.decode())
        {
            Ok(image) => image,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load thumbnail");
                return None;
            }
        };

        let thumbnail = fit_within(image, bounds);
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, thumbnail.clone());
        Some(thumbnail)
    }

    #[instrument(skip(self))]
    fn discard(&self, name: &str) -> DriveflowResult<bool> {
        let Some(path) = self.path_of(name.trim()) else {
            warn!(name, "Refusing image name outside the images directory");
            return Ok(false);
        };
        match std::fs::remove_file(&path) {
            Ok(()) => {
                self.cache
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .retain(|(cached, _), _| cached != name.trim());
                info!(path = %path.display(), "Image removed");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(map_io_error(&path, e, "remove image")),
        }
    }

    fn clear_cache(&self) {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        debug!(entries = cache.len(), "Clearing thumbnail cache");
        cache.clear();
    }
}

/// Shrink to fit `bounds`, keeping the aspect ratio. Never enlarges.
fn fit_within(image: DynamicImage, (width, height): (u32, u32)) -> Thumbnail {
    let image = if image.width() > width || image.height() > height {
        image.thumbnail(width.max(1), height.max(1))
    } else {
        image
    };
    let rgba = image.to_rgba8();
    Thumbnail {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> DriveflowError {
    ApplicationError::ImageImport {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
