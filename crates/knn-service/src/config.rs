//! Service configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnnConfig {
    /// Neighbor count when a request does not name one
    pub k: usize,
    /// Upper bound accepted for a request's k
    pub max_k: usize,
    /// Corpus file names, resolved against a data directory
    pub corpus: CorpusFiles,
}

impl KnnConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a default neighbor count
    #[inline]
    #[must_use]
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// With an upper bound on requested k
    #[inline]
    #[must_use]
    pub fn with_max_k(mut self, max_k: usize) -> Self {
        self.max_k = max_k;
        self
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Fails if the file cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self, ServiceError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ServiceError::io(path, e))?;
        Ok(toml::from_str(&raw)?)
    }
}

impl Default for KnnConfig {
    fn default() -> Self {
        Self {
            k: 3,
            max_k: 32,
            corpus: CorpusFiles::default(),
        }
    }
}

/// Corpus blob file names within a data directory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusFiles {
    /// Image blob file name
    pub images: String,
    /// Label blob file name
    pub labels: String,
}

impl Default for CorpusFiles {
    fn default() -> Self {
        Self {
            images: "train-images-idx3-ubyte".into(),
            labels: "train-labels-idx1-ubyte".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_sane() {
        let config = KnnConfig::new();
        assert_eq!(config.k, 3);
        assert_eq!(config.max_k, 32);
        assert_eq!(config.corpus.images, "train-images-idx3-ubyte");
        assert_eq!(config.corpus.labels, "train-labels-idx1-ubyte");
    }

    #[test]
    fn builders_override_fields() {
        let config = KnnConfig::new().with_k(5).with_max_k(9);
        assert_eq!(config.k, 5);
        assert_eq!(config.max_k, 9);
    }

    #[tokio::test]
    async fn load_merges_partial_toml_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "k = 7\n\n[corpus]\nimages = \"imgs.bin\"").unwrap();

        let config = KnnConfig::load(file.path()).await.unwrap();
        assert_eq!(config.k, 7);
        assert_eq!(config.max_k, 32);
        assert_eq!(config.corpus.images, "imgs.bin");
        assert_eq!(config.corpus.labels, "train-labels-idx1-ubyte");
    }

    #[tokio::test]
    async fn load_missing_file_is_io_error() {
        let err = KnnConfig::load(Path::new("/definitely/not/here.toml"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Io { .. }));
    }

    #[tokio::test]
    async fn load_bad_toml_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "k = \"not a number\"").unwrap();

        let err = KnnConfig::load(file.path()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Config(_)));
    }
}
