use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tam::{TokenPair, TokenStore, TokenStoreError};
use tokio::fs;
use tracing::debug;

pub const DEFAULT_PROFILE: &str = "default";

/// `~/.tam`, where session files live.
pub fn get_storage_dir() -> Result<PathBuf, TokenStoreError> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| TokenStoreError::Unavailable("home directory not found".to_string()))?;
    Ok(home_dir.join(".tam"))
}

/// Keeps one profile's token pair in `<dir>/<profile>.json`.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn for_profile(profile: &str) -> Result<Self, TokenStoreError> {
        Ok(Self::in_dir(&get_storage_dir()?, profile))
    }

    pub fn in_dir(dir: &Path, profile: &str) -> Self {
        Self { path: dir.join(format!("{}.json", profile)) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self) -> Result<Option<TokenPair>, TokenStoreError> {
        let json_data = match fs::read_to_string(&self.path).await {
            Ok(json_data) => json_data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(serde_json::from_str(&json_data)?))
    }

    async fn set(&self, tokens: TokenPair) -> Result<(), TokenStoreError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).await?;
        }

        // Replace atomically.
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, serde_json::to_string_pretty(&tokens)?).await?;
        fs::rename(&staging, &self.path).await?;
        debug!("Stored session in {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Profiles with a stored session in `dir`, sorted.
pub fn list_profiles(dir: &Path) -> Result<Vec<String>, TokenStoreError> {
    let mut profiles = Vec::new();
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(profiles),
        Err(e) => return Err(e.into()),
    };

    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension() == Some(std::ffi::OsStr::new("json")) {
            if let Some(profile_name) = path.file_stem().and_then(|stem| stem.to_str()) {
                profiles.push(profile_name.to_string());
            }
        }
    }

    profiles.sort();
    Ok(profiles)
}
