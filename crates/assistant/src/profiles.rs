//! File-backed customer profile store.
//!
//! One JSON file per device under the configured directory. Writes go
//! through a temp file and a rename so a crash never leaves a
//! half-written profile behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use forneria_core::DeviceId;
use tracing::{instrument, warn};

use crate::models::CustomerProfile;
use crate::ports::{ProfileError, ProfileStore};

/// Longest sanitized token kept for a file name.
const MAX_NAME_LEN: usize = 64;

/// Stores one profile per device as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct FileProfileStore {
    dir: PathBuf,
}

impl FileProfileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Device tokens are minted as UUIDs; sanitizing only defends
    /// against hand-crafted ones reaching the filesystem.
    fn path_for(&self, device: &DeviceId) -> PathBuf {
        let safe: String = device
            .as_str()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .take(MAX_NAME_LEN)
            .collect();

        let name = if safe.is_empty() {
            "unknown".to_owned()
        } else {
            safe
        };

        self.dir.join(format!("{name}.json"))
    }
}

#[async_trait]
impl ProfileStore for FileProfileStore {
    #[instrument(skip(self), fields(device = %device))]
    async fn load(&self, device: &DeviceId) -> Result<CustomerProfile, ProfileError> {
        let path = self.path_for(device);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(CustomerProfile::default());
            }
            Err(err) => return Err(err.into()),
        };

        match serde_json::from_slice(&bytes) {
            Ok(profile) => Ok(profile),
            Err(err) => {
                // A corrupt file loses its data but must not brick the chat.
                warn!(path = %path.display(), error = %err, "Discarding unreadable profile");
                Ok(CustomerProfile::default())
            }
        }
    }

    #[instrument(skip(self, profile), fields(device = %device))]
    async fn save(
        &self,
        device: &DeviceId,
        profile: &CustomerProfile,
    ) -> Result<(), ProfileError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(device);
        let bytes = serde_json::to_vec_pretty(profile)?;

        let tmp = temp_path(&path);
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;

        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
