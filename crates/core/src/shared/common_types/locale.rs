use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Content language sent to the backend in `Accept-Language`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Fa,
    En,
}

impl Locale {
    pub fn as_header_value(&self) -> &'static str {
        match self {
            Locale::Fa => "fa",
            Locale::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_header_value())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unsupported locale '{0}', expected 'fa' or 'en'")]
pub struct ParseLocaleError(pub String);

impl FromStr for Locale {
    type Err = ParseLocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fa" | "fa-ir" => Ok(Locale::Fa),
            "en" | "en-us" | "en-gb" => Ok(Locale::En),
            other => Err(ParseLocaleError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locale() {
        assert_eq!("fa".parse::<Locale>().unwrap(), Locale::Fa);
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("fa-IR".parse::<Locale>().unwrap(), Locale::Fa);
        assert_eq!("de".parse::<Locale>(), Err(ParseLocaleError("de".to_string())));
    }

    #[test]
    fn test_default_is_persian() {
        assert_eq!(Locale::default().as_header_value(), "fa");
    }
}
