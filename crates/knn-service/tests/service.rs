//! End-to-end flows through the collaborator boundary

use pretty_assertions::assert_eq;

use knn_corpus::CorpusSpec;
use knn_features::{FeatureVector, FeaturesId, FeaturesPayload};
use knn_service::{load_corpus_files, report, KnnConfig, KnnService};
use knn_store::FeatureStore;
use knn_test_utils::{labeled, CorpusBuilder};

fn spec_2x2() -> CorpusSpec {
    CorpusSpec {
        rows: 2,
        cols: 2,
        ..CorpusSpec::mnist()
    }
}

async fn service_with(samples: Vec<knn_features::LabeledFeatures>) -> KnnService {
    let service = KnnService::new(FeatureStore::in_memory(), KnnConfig::new());
    service.seed_training(samples).await.unwrap();
    service
}

#[tokio::test]
async fn test_corpus_files_to_classification() {
    let dir = tempfile::tempdir().unwrap();
    let config = KnnConfig::new();
    let (images, labels) = CorpusBuilder::new(2, 2)
        .push(vec![0, 0, 0, 0], 5)
        .push(vec![10, 10, 10, 10], 7)
        .push(vec![9, 9, 9, 9], 7)
        .build();
    std::fs::write(dir.path().join(&config.corpus.images), images).unwrap();
    std::fs::write(dir.path().join(&config.corpus.labels), labels).unwrap();

    let samples = load_corpus_files(dir.path(), &config.corpus, &spec_2x2())
        .await
        .unwrap();
    assert_eq!(samples.len(), 3);

    let service = KnnService::new(FeatureStore::in_memory(), config);
    assert_eq!(service.seed_training(samples).await.unwrap(), 3);

    let response = service
        .classify_request(FeaturesPayload::Raw(vec![8, 8, 8, 8]), Some("2"))
        .await
        .unwrap();

    assert_eq!(response.label, "7");
    let nearest = FeatureVector::new(vec![9, 9, 9, 9]);
    assert_eq!(response.id, FeaturesId::of(&nearest, Some("7")));

    service.close().await.unwrap();
}

#[tokio::test]
async fn test_store_and_fetch_roundtrip() {
    let service = service_with(vec![]).await;

    let stored = service
        .store_request(FeaturesPayload::Raw(vec![0, 1, 2]))
        .await
        .unwrap();
    let fetched = service.fetch_stored(&stored.id.to_string()).await.unwrap();
    assert_eq!(fetched.features, "AAEC");
    assert_eq!(fetched.label, None);

    // The encoded form of the same bytes lands on the same record
    let again = service
        .store_request(FeaturesPayload::Encoded("AAEC".into()))
        .await
        .unwrap();
    assert_eq!(again.id, stored.id);
}

#[tokio::test]
async fn test_unknown_id_reports_not_found() {
    let service = service_with(vec![labeled(&[1, 2, 3], "a")]).await;

    let err = service.fetch_stored("nonexistent-id").await.unwrap_err();
    let shape = report(&err);
    assert_eq!(shape.code, "NOT_FOUND");
    assert_eq!(shape.status, 404);
    assert!(shape.message.contains("nonexistent-id"));
}

#[tokio::test]
async fn test_ambiguous_prefix_reports_bad_value() {
    let service = service_with(vec![labeled(&[1, 2, 3], "a"), labeled(&[4, 5, 6], "b")]).await;

    let err = service.fetch_stored("a-").await.unwrap_err();
    let shape = report(&err);
    assert_eq!(shape.code, "BAD_VALUE");
    assert_eq!(shape.status, 400);
}

#[tokio::test]
async fn test_malformed_payload_reports_bad_value() {
    let service = service_with(vec![]).await;

    let err = service
        .store_request(FeaturesPayload::Encoded("!!not base64!!".into()))
        .await
        .unwrap_err();
    let shape = report(&err);
    assert_eq!(shape.code, "BAD_VALUE");
    assert_eq!(shape.status, 400);
}

#[tokio::test]
async fn test_internal_failures_are_masked() {
    let service = service_with(vec![labeled(&[1], "a")]).await;
    service.close().await.unwrap();

    let err = service
        .store_request(FeaturesPayload::Raw(vec![1]))
        .await
        .unwrap_err();
    let shape = report(&err);
    assert_eq!(shape.code, "DATABASE");
    assert_eq!(shape.status, 500);
    assert_eq!(shape.message, "internal server error");
}

#[tokio::test]
async fn test_k_bounds_follow_config() {
    let config = KnnConfig::new().with_k(2).with_max_k(4);
    let service = KnnService::new(FeatureStore::in_memory(), config);
    let samples = (0u8..6).map(|i| labeled(&[i, i], "a")).collect();
    service.seed_training(samples).await.unwrap();

    let query = FeaturesPayload::Raw(vec![0, 0]);
    service
        .classify_request(query.clone(), Some("4"))
        .await
        .unwrap();

    for bad in ["5", "0", "abc", ""] {
        let err = service
            .classify_request(query.clone(), Some(bad))
            .await
            .unwrap_err();
        let shape = report(&err);
        assert_eq!(shape.status, 400, "k = {bad:?}");
    }
}
