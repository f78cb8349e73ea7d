use std::{env, fs::File, io::Read, path::Path, time::Duration};

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::common_types::Locale;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ApiConfig {
    /// Root of the REST API, e.g. `http://localhost:8000/api`.
    pub base_url: String,

    #[serde(default)]
    pub locale: Locale,

    /// No timeout is applied when unset.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_API_URL.to_string(), locale: Locale::default(), timeout_secs: None }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Applies `TAM_API_URL`, `TAM_LOCALE` and `TAM_TIMEOUT_SECS` on top of the
    /// values read from yaml.
    pub fn apply_env_overrides(mut self) -> Result<Self, ReadYamlError> {
        if let Ok(url) = env::var("TAM_API_URL") {
            self.base_url = url;
        }

        if let Ok(locale) = env::var("TAM_LOCALE") {
            self.locale = locale
                .parse()
                .map_err(|_| ReadYamlError::InvalidValue("TAM_LOCALE".to_string(), locale))?;
        }

        if let Ok(timeout) = env::var("TAM_TIMEOUT_SECS") {
            let secs = timeout
                .parse()
                .map_err(|_| ReadYamlError::InvalidValue("TAM_TIMEOUT_SECS".to_string(), timeout))?;
            self.timeout_secs = Some(secs);
        }

        Ok(self)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct SetupConfig {
    #[serde(default)]
    pub api: ApiConfig,

    /// Name of the stored session profile used when none is passed explicitly.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub profile: Option<String>,
}

#[derive(Error, Debug)]
pub enum ReadYamlError {
    #[error("Can not find yaml")]
    CanNotFindYaml,

    #[error("Can not read yaml")]
    CanNotReadYaml,

    #[error("Setup config is invalid yaml and does not match the struct - {0}")]
    SetupConfigInvalidYaml(String),

    #[error("Environment variable {0} not found")]
    EnvironmentVariableNotFound(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("Invalid substitution pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("api.base_url must start with http:// or https://, got {0}")]
    InvalidBaseUrl(String),
}

/// Substitutes `${VAR}` placeholders with values from the environment.
fn substitute_env_variables(contents: &str) -> Result<String, ReadYamlError> {
    let re = Regex::new(r"\$\{([^}]+)\}")?;

    let mut missing = None;
    let result = re.replace_all(contents, |caps: &Captures| {
        let var_name = &caps[1];
        match env::var(var_name) {
            Ok(val) => val,
            Err(_) => {
                missing.get_or_insert_with(|| var_name.to_string());
                String::new()
            }
        }
    });

    if let Some(var_name) = missing {
        return Err(ReadYamlError::EnvironmentVariableNotFound(var_name));
    }

    Ok(result.into_owned())
}

/// Reads and parses a `tam.yaml` configuration file.
///
/// Unless `raw_yaml` is set, `${VAR}` placeholders are substituted before
/// parsing and `TAM_*` environment overrides are applied afterwards.
pub fn read(file_path: &Path, raw_yaml: bool) -> Result<SetupConfig, ReadYamlError> {
    let mut file = File::open(file_path).map_err(|_| ReadYamlError::CanNotFindYaml)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|_| ReadYamlError::CanNotReadYaml)?;

    let substituted_contents =
        if raw_yaml { contents } else { substitute_env_variables(&contents)? };

    let mut config: SetupConfig = serde_yaml::from_str(&substituted_contents)
        .map_err(|e| ReadYamlError::SetupConfigInvalidYaml(e.to_string()))?;

    if !raw_yaml {
        config.api = config.api.apply_env_overrides()?;
    }

    if !config.api.base_url.starts_with("http://") && !config.api.base_url.starts_with("https://")
    {
        return Err(ReadYamlError::InvalidBaseUrl(config.api.base_url));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_yaml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_full_config() {
        let file = write_yaml(
            "api:\n  base_url: https://club.example/api\n  locale: en\n  timeout_secs: 15\nprofile: staff\n",
        );

        let config = read(file.path(), true).unwrap();

        assert_eq!(config.api.base_url, "https://club.example/api");
        assert_eq!(config.api.locale, Locale::En);
        assert_eq!(config.api.timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.profile.as_deref(), Some("staff"));
    }

    #[test]
    fn test_defaults_when_sections_missing() {
        let file = write_yaml("profile: default\n");

        let config = read(file.path(), true).unwrap();

        assert_eq!(config.api, ApiConfig::default());
        assert_eq!(config.api.locale, Locale::Fa);
        assert!(config.api.timeout().is_none());
    }

    #[test]
    fn test_env_substitution() {
        env::set_var("TAM_YAML_TEST_HOST", "staging.example");
        let substituted =
            substitute_env_variables("base_url: https://${TAM_YAML_TEST_HOST}/api").unwrap();

        assert_eq!(substituted, "base_url: https://staging.example/api");
    }

    #[test]
    fn test_missing_env_variable_is_an_error() {
        let result = substitute_env_variables("base_url: ${TAM_YAML_TEST_DOES_NOT_EXIST}");

        assert!(matches!(
            result,
            Err(ReadYamlError::EnvironmentVariableNotFound(name)) if name == "TAM_YAML_TEST_DOES_NOT_EXIST"
        ));
    }

    #[test]
    fn test_rejects_base_url_without_scheme() {
        let file = write_yaml("api:\n  base_url: localhost:8000/api\n");

        let result = read(file.path(), true);

        assert!(matches!(result, Err(ReadYamlError::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = read(Path::new("/definitely/not/here/tam.yaml"), false);

        assert!(matches!(result, Err(ReadYamlError::CanNotFindYaml)));
    }
}
