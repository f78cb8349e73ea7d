pub mod authentication;
mod environment;
pub use environment::load_env_from_project_path;
mod logger;
pub use logger::{setup_info_logger, setup_logger};
pub mod shared;
pub use shared::common_types;
mod yaml;
pub use yaml::{read, ApiConfig, ReadYamlError, SetupConfig};
