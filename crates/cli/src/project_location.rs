use std::path::PathBuf;

use tam_core::{ApiConfig, SetupConfig, read};
use tracing::debug;

use crate::commands::error::ProjectLocationError;

pub const CONFIG_FILE_NAME: &str = "tam.yaml";

#[derive(Debug, Clone)]
pub struct ProjectLocation {
    project_dir: PathBuf,
}

impl ProjectLocation {
    pub fn new(project_dir: PathBuf) -> Self {
        Self { project_dir }
    }

    pub fn config_path(&self) -> PathBuf {
        self.project_dir.join(CONFIG_FILE_NAME)
    }

    /// Reads tam.yaml, or falls back to the defaults plus `TAM_*` overrides
    /// when the directory has none.
    pub fn setup_config(&self) -> Result<SetupConfig, ProjectLocationError> {
        let path = self.config_path();
        if !path.exists() {
            debug!("No {} in {}, using defaults", CONFIG_FILE_NAME, self.project_dir.display());
            return Ok(SetupConfig { api: ApiConfig::default().apply_env_overrides()?, profile: None });
        }

        Ok(read(&path, false)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tam::Locale;
    use tempfile::tempdir;

    #[test]
    fn test_reads_project_config() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "api:\n  base_url: https://club.example/api\n  locale: en\nprofile: staff\n",
        )
        .unwrap();

        let config = ProjectLocation::new(dir.path().to_path_buf()).setup_config().unwrap();

        assert_eq!(config.profile.as_deref(), Some("staff"));
        assert_eq!(config.api.locale, Locale::En);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "api:\n  base_url: club.example\n").unwrap();

        assert!(matches!(
            ProjectLocation::new(dir.path().to_path_buf()).setup_config(),
            Err(ProjectLocationError::Yaml(_))
        ));
    }
}
