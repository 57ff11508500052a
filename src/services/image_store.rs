use std::path::{Path, PathBuf};
use uuid::Uuid;
use crate::errors::{AppError, AppResult};

/// URL prefix the image directory is served under.
pub const IMAGE_URL_PREFIX: &str = "/images";

const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Employee photos on local disk, addressed by public URL path.
#[derive(Clone, Debug)]
pub struct ImageStore {
    dir: PathBuf,
    max_size: usize,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>, max_size: usize) -> Self {
        Self { dir: dir.into(), max_size }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Checks type and size, returning the lowercased extension.
    pub fn validate(&self, filename: &str, size: usize) -> AppResult<String> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .filter(|e| ALLOWED_EXTENSIONS.contains(&e.as_str()))
            .ok_or_else(|| {
                AppError::Validation("Only .jpg, .jpeg and .png images are allowed".into())
            })?;

        if size > self.max_size {
            return Err(AppError::Validation(format!(
                "Image exceeds the maximum size of {} bytes",
                self.max_size
            )));
        }

        Ok(extension)
    }

    /// Writes the bytes under a fresh unique name and returns its URL path.
    pub async fn save(&self, bytes: &[u8], extension: &str) -> AppResult<String> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let filename = format!("{}.{}", Uuid::new_v4(), extension);
        let path = self.dir.join(&filename);
        tokio::fs::write(&path, bytes).await.map_err(|e| {
            tracing::error!("Failed to write image {}: {}", path.display(), e);
            AppError::File(e)
        })?;

        tracing::debug!("Stored image {} ({} bytes)", path.display(), bytes.len());
        Ok(format!("{}/{}", IMAGE_URL_PREFIX, filename))
    }

    /// Best-effort delete of a previously stored image.
    pub async fn remove(&self, url_path: &str) {
        let Some(path) = self.resolve(url_path) else {
            tracing::warn!("Ignoring image path outside the image store: {}", url_path);
            return;
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::debug!("Removed image {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove image {}: {}", path.display(), e),
        }
    }

    /// Maps a URL path back to a file in the store. Only bare file names
    /// under the prefix resolve.
    pub fn resolve(&self, url_path: &str) -> Option<PathBuf> {
        let name = url_path.strip_prefix(IMAGE_URL_PREFIX)?.strip_prefix('/')?;
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return None;
        }
        Some(self.dir.join(name))
    }
}
