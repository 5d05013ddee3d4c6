//! Runtime settings: where exports go and how the canvas is sized.
//!
//! Settings come from an optional JSON file, then environment variables
//! override individual fields. Every field has a default, so an empty `{}`
//! (or no file at all) is a valid configuration.

use std::{
    env, fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    canvas::{DEFAULT_HEIGHT, DEFAULT_WIDTH},
    error::{Error, Result},
};

pub const ENV_OUTPUT_DIR: &str = "COMMAND_CANVAS_OUTPUT_DIR";
pub const ENV_EXTENSION: &str = "COMMAND_CANVAS_EXTENSION";
pub const ENV_HISTORY_LIMIT: &str = "COMMAND_CANVAS_HISTORY_LIMIT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory export files are written into.
    pub output_dir: PathBuf,
    /// Required extension of export files, without the dot.
    pub extension: String,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Exclusive upper bound for randomly generated shape parameters.
    pub max_dimension: u32,
    /// Maximum number of commands kept on each history stack. `None` keeps all.
    pub history_limit: Option<NonZeroUsize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("OutputFiles"),
            extension: "xml".to_owned(),
            canvas_width: DEFAULT_WIDTH,
            canvas_height: DEFAULT_HEIGHT,
            max_dimension: 500,
            history_limit: None,
        }
    }
}

impl Config {
    /// Loads `path` (or the defaults when `None`), applies environment
    /// overrides and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and [`Error::Config`]
    /// if it cannot be parsed or the final settings are invalid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                debug!(path = %path.display(), "reading config file");
                Self::from_json(&fs::read_to_string(path)?)?
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`Error::Config`] on malformed JSON or unknown fields.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| Error::Config(err.to_string()))
    }

    /// Applies overrides looked up through `lookup`, normally the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the history limit is not a number.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(extension) = lookup(ENV_EXTENSION) {
            self.extension = extension;
        }
        if let Some(limit) = lookup(ENV_HISTORY_LIMIT) {
            let limit: usize = limit.trim().parse().map_err(|_| {
                Error::Config(format!("{ENV_HISTORY_LIMIT} must be a number, got `{limit}`"))
            })?;
            // Zero means unlimited.
            self.history_limit = NonZeroUsize::new(limit);
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        let extension = self.extension.trim_start_matches('.');
        if extension.is_empty() || extension.contains(['/', '\\']) {
            return Err(Error::Config(format!(
                "extension `{}` is not usable",
                self.extension
            )));
        }
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(Error::Config("canvas dimensions must be non-zero".into()));
        }
        if self.max_dimension < 2 {
            return Err(Error::Config("max_dimension must be at least 2".into()));
        }
        Ok(())
    }

    /// The extension without any leading dot.
    #[must_use]
    pub fn extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.output_dir, PathBuf::from("OutputFiles"));
        assert_eq!(config.extension(), "xml");
        assert_eq!(config.canvas_width, 1450);
        assert_eq!(config.canvas_height, 850);
        assert_eq!(config.history_limit, None);
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_json() {
        let config = Config::from_json(r#"{ "extension": ".svg", "history_limit": 20 }"#).unwrap();

        assert_eq!(config.extension(), "svg");
        assert_eq!(config.history_limit, NonZeroUsize::new(20));
        assert_eq!(config.max_dimension, 500);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            Config::from_json(r#"{ "colour": "red" }"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(env_of(&[
                (ENV_OUTPUT_DIR, "/tmp/out"),
                (ENV_EXTENSION, "svg"),
                (ENV_HISTORY_LIMIT, "3"),
            ]))
            .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.extension(), "svg");
        assert_eq!(config.history_limit, NonZeroUsize::new(3));

        config
            .apply_overrides(env_of(&[(ENV_HISTORY_LIMIT, "0")]))
            .unwrap();
        assert_eq!(config.history_limit, None);
    }

    #[test]
    fn test_bad_history_limit() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(env_of(&[(ENV_HISTORY_LIMIT, "lots")]))
            .unwrap_err();

        assert!(err.to_string().contains(ENV_HISTORY_LIMIT));
    }

    #[test]
    fn test_validate() {
        let mut config = Config {
            extension: ".".into(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        config.extension = "xml".into();
        config.canvas_width = 0;
        assert!(config.validate().is_err());

        config.canvas_width = 10;
        config.max_dimension = 1;
        assert!(config.validate().is_err());
    }
}
