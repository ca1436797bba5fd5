//! Translation settings, loadable from a JSON file.
//!
//! ```json
//! { "filter": "basic", "similarity_cutoff": 0.75, "matcher": "similarity" }
//! ```
//!
//! Every field is optional; missing fields take their defaults.

use crate::filters::FilterKind;
use crate::grounding::{ExactMatcher, KindMatcher, SimilarityMatcher};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("similarity_cutoff must be within [0, 1], got {0}")]
    InvalidCutoff(f64),
}

/// How free-form kind names are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherKind {
    #[default]
    Similarity,
    Exact,
}

// ============================================================================
// Translation Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslateConfig {
    /// Filter applied to engine output
    pub filter: FilterKind,
    /// Minimum similarity for fuzzy kind matching
    pub similarity_cutoff: f64,
    pub matcher: MatcherKind,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            filter: FilterKind::Greedy,
            similarity_cutoff: SimilarityMatcher::DEFAULT_CUTOFF,
            matcher: MatcherKind::Similarity,
        }
    }
}

impl TranslateConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.similarity_cutoff) {
            return Err(ConfigError::InvalidCutoff(self.similarity_cutoff));
        }
        Ok(())
    }

    pub fn matcher(&self) -> Box<dyn KindMatcher> {
        match self.matcher {
            MatcherKind::Similarity => Box::new(SimilarityMatcher::new(self.similarity_cutoff)),
            MatcherKind::Exact => Box::new(ExactMatcher),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declare::TemplateKind;
    use std::io::Write;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(TranslateConfig::from_json("{}").unwrap(), TranslateConfig::default());
    }

    #[test]
    fn loads_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"filter": "basic", "similarity_cutoff": 0.9}}"#).unwrap();

        let config = TranslateConfig::from_path(file.path()).unwrap();
        assert_eq!(config.filter, FilterKind::Basic);
        assert_eq!(config.matcher, MatcherKind::Similarity);
        // 0.9 rejects a one-letter typo in an eight-letter name.
        assert_eq!(config.matcher().resolve("Responce"), None);
        assert_eq!(config.matcher().resolve("Response"), Some(TemplateKind::Response));
    }

    #[test]
    fn rejects_out_of_range_cutoff() {
        assert!(matches!(
            TranslateConfig::from_json(r#"{"similarity_cutoff": 1.5}"#),
            Err(ConfigError::InvalidCutoff(_))
        ));
    }

    #[test]
    fn rejects_unknown_fields_and_values() {
        assert!(matches!(
            TranslateConfig::from_json(r#"{"filtr": "basic"}"#),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            TranslateConfig::from_json(r#"{"filter": "optimal"}"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            TranslateConfig::from_path(dir.path().join("absent.json")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn exact_matcher_from_config() {
        let config = TranslateConfig::from_json(r#"{"matcher": "exact"}"#).unwrap();
        assert_eq!(config.matcher().resolve("response"), None);
        assert_eq!(config.matcher().resolve("Response"), Some(TemplateKind::Response));
    }
}
