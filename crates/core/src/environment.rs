use std::path::{Path, PathBuf};

use tracing::debug;

/// Loads `TAM_*` overrides from a .env file.
///
/// The project directory's .env wins; otherwise dotenvy walks up from the
/// current working directory. Variables already present in the process
/// environment are never overwritten.
///
/// Returns the path of the file that was loaded, if any.
pub fn load_env_from_project_path(project_path: &Path) -> Option<PathBuf> {
    let project_env = project_path.join(".env");
    let loaded = match dotenvy::from_path(&project_env) {
        Ok(()) => Some(project_env),
        Err(_) => dotenvy::dotenv().ok(),
    };

    match &loaded {
        Some(path) => debug!("Loaded environment from {}", path.display()),
        None => debug!("No .env file found, using process environment only"),
    }

    loaded
}
