//! Corpus file ingress

use std::path::Path;

use knn_corpus::{CorpusSpec, RawCorpus};
use knn_features::LabeledFeatures;

use crate::config::CorpusFiles;
use crate::error::ServiceError;

/// Read and decode the configured corpus blobs from a data directory
///
/// # Errors
/// IO failures reading either blob, plus every decode failure from
/// [`knn_corpus::decode`].
pub async fn load_corpus_files(
    dir: &Path,
    files: &CorpusFiles,
    spec: &CorpusSpec,
) -> Result<Vec<LabeledFeatures>, ServiceError> {
    let images_path = dir.join(&files.images);
    let images = tokio::fs::read(&images_path)
        .await
        .map_err(|e| ServiceError::io(&images_path, e))?;

    let labels_path = dir.join(&files.labels);
    let labels = tokio::fs::read(&labels_path)
        .await
        .map_err(|e| ServiceError::io(&labels_path, e))?;

    tracing::debug!(
        images = images.len(),
        labels = labels.len(),
        dir = %dir.display(),
        "read corpus blobs"
    );

    Ok(knn_corpus::decode(
        spec,
        RawCorpus {
            images: &images,
            labels: &labels,
        },
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use knn_test_utils::CorpusBuilder;

    fn spec_2x2() -> CorpusSpec {
        CorpusSpec {
            rows: 2,
            cols: 2,
            ..CorpusSpec::mnist()
        }
    }

    #[tokio::test]
    async fn loads_and_decodes_blobs_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let (images, labels) = CorpusBuilder::new(2, 2)
            .push(vec![1, 2, 3, 4], 7)
            .push(vec![5, 6, 7, 8], 2)
            .build();
        let files = CorpusFiles {
            images: "imgs.bin".into(),
            labels: "lbls.bin".into(),
        };
        std::fs::write(dir.path().join(&files.images), images).unwrap();
        std::fs::write(dir.path().join(&files.labels), labels).unwrap();

        let samples = load_corpus_files(dir.path(), &files, &spec_2x2())
            .await
            .unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].label.as_deref(), Some("7"));
        assert_eq!(samples[1].features.as_bytes(), &[5, 6, 7, 8]);
    }

    #[tokio::test]
    async fn missing_blob_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_corpus_files(dir.path(), &CorpusFiles::default(), &spec_2x2())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Io { .. }));
    }

    #[tokio::test]
    async fn decode_failures_pass_through() {
        let dir = tempfile::tempdir().unwrap();
        let (images, labels) = CorpusBuilder::new(2, 2)
            .push(vec![1, 2, 3, 4], 7)
            .with_label_count(9)
            .build();
        let files = CorpusFiles::default();
        std::fs::write(dir.path().join(&files.images), images).unwrap();
        std::fs::write(dir.path().join(&files.labels), labels).unwrap();

        let err = load_corpus_files(dir.path(), &files, &spec_2x2())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Corpus(_)));
    }
}
