//! Collaborator-facing request adapters
//!
//! Thin orchestration over the store and the classifier: requests come
//! in stringly (payloads, optional `k` strings, id prefixes), get
//! validated and typed here, and go out as serializable responses. No
//! classification or storage logic lives at this layer.

use serde::{Deserialize, Serialize};

use knn_features::{FeatureVector, FeaturesId, FeaturesPayload, Label, LabeledFeatures};
use knn_store::{EncodedFeatures, FeatureStore};

use crate::config::KnnConfig;
use crate::error::ServiceError;
use crate::validate::{k_param, ParamSpec};

/// Response to a store request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreResponse {
    /// Content-addressed id of the stored sample
    pub id: FeaturesId,
}

/// Response to a classify request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifyResponse {
    /// Id of the nearest training record
    pub id: FeaturesId,
    /// Winning label
    pub label: Label,
}

/// Request adapters over a feature store and classifier
#[derive(Debug)]
pub struct KnnService {
    store: FeatureStore,
    config: KnnConfig,
    k_spec: ParamSpec,
}

impl KnnService {
    /// Build a service over an open store
    #[must_use]
    pub fn new(store: FeatureStore, config: KnnConfig) -> Self {
        let k_spec = k_param(&config);
        Self {
            store,
            config,
            k_spec,
        }
    }

    /// The active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &KnnConfig {
        &self.config
    }

    /// Store collaborator-supplied features as a test sample
    ///
    /// # Errors
    /// Malformed payloads and store failures.
    pub async fn store_request(
        &self,
        payload: FeaturesPayload,
    ) -> Result<StoreResponse, ServiceError> {
        let id = self.store.add(payload, None).await?;
        Ok(StoreResponse { id })
    }

    /// Fetch a stored sample in transport-encoded form
    ///
    /// Accepts full ids and unambiguous prefixes.
    ///
    /// # Errors
    /// `NotFound` for misses, `BadValue` for ambiguous prefixes.
    pub async fn fetch_stored(&self, id: &str) -> Result<EncodedFeatures, ServiceError> {
        Ok(self.store.get_encoded(id).await?)
    }

    /// Classify collaborator-supplied features against the training set
    ///
    /// `k` arrives as an optional string and falls back to the
    /// configured default; the response names the nearest training
    /// record and the majority label.
    ///
    /// # Errors
    /// Invalid `k`, malformed payloads, store and classifier failures.
    pub async fn classify_request(
        &self,
        payload: FeaturesPayload,
        k: Option<&str>,
    ) -> Result<ClassifyResponse, ServiceError> {
        let k = self.validate_k(k)?;
        let query = payload.into_vector()?;
        self.classify_vector(&query, k).await
    }

    /// Classify an already-stored sample by id
    ///
    /// # Errors
    /// Id resolution failures plus everything `classify_request` can fail with.
    pub async fn classify_stored(
        &self,
        id: &str,
        k: Option<&str>,
    ) -> Result<ClassifyResponse, ServiceError> {
        let k = self.validate_k(k)?;
        let stored = self.store.get(id).await?;
        self.classify_vector(&stored.features, k).await
    }

    /// Clear the store and bulk-load labeled training samples
    ///
    /// Returns the number of samples submitted; content-identical
    /// duplicates collapse onto one stored record.
    ///
    /// # Errors
    /// Store failures; a failed load leaves the store partially seeded.
    pub async fn seed_training(
        &self,
        samples: Vec<LabeledFeatures>,
    ) -> Result<usize, ServiceError> {
        self.store.clear().await?;
        let mut submitted = 0usize;
        for sample in samples {
            let LabeledFeatures { features, label } = sample;
            self.store.add(features.into(), label).await?;
            submitted += 1;
        }
        tracing::info!(samples = submitted, "seeded training data");
        Ok(submitted)
    }

    /// Close the underlying store; later requests fail
    ///
    /// # Errors
    /// Engine failures only.
    pub async fn close(&self) -> Result<(), ServiceError> {
        Ok(self.store.close().await?)
    }

    async fn classify_vector(
        &self,
        query: &FeatureVector,
        k: usize,
    ) -> Result<ClassifyResponse, ServiceError> {
        let training = self.store.all_training().await?;
        let result = knn_classify::classify(query, &training, k)?;
        let nearest = &training[result.nearest];
        tracing::debug!(label = %result.label, nearest = %nearest.id, k, "classified query");
        Ok(ClassifyResponse {
            id: nearest.id,
            label: result.label,
        })
    }

    fn validate_k(&self, raw: Option<&str>) -> Result<usize, ServiceError> {
        let value = self.k_spec.validate(raw)?;
        value
            .parse()
            .map_err(|_| ServiceError::invalid_param("k", format!("`{value}` is out of range")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use knn_features::{ErrorKind, Partition};
    use knn_test_utils::labeled;

    fn service() -> KnnService {
        KnnService::new(FeatureStore::in_memory(), KnnConfig::new())
    }

    async fn seeded_service() -> KnnService {
        let svc = service();
        svc.seed_training(vec![
            labeled(&[0, 0, 0, 0], "a"),
            labeled(&[10, 10, 10, 10], "b"),
            labeled(&[9, 9, 9, 9], "b"),
        ])
        .await
        .unwrap();
        svc
    }

    #[tokio::test]
    async fn store_request_places_test_partition() {
        let svc = service();
        let response = svc
            .store_request(FeaturesPayload::Raw(vec![8, 8, 8, 8]))
            .await
            .unwrap();
        assert_eq!(response.id.partition(), Partition::Test);
    }

    #[tokio::test]
    async fn classify_request_names_nearest_training_record() {
        let svc = seeded_service().await;
        let response = svc
            .classify_request(FeaturesPayload::Raw(vec![8, 8, 8, 8]), Some("2"))
            .await
            .unwrap();

        assert_eq!(response.label, "b");
        let nearest = FeatureVector::new(vec![9, 9, 9, 9]);
        assert_eq!(response.id, FeaturesId::of(&nearest, Some("b")));
    }

    #[tokio::test]
    async fn classify_request_uses_configured_default_k() {
        let svc = seeded_service().await;
        // k = 1 would pick the exact "a" match; at the default k = 3
        // the two "b" records outvote it
        let response = svc
            .classify_request(FeaturesPayload::Raw(vec![0, 0, 0, 0]), None)
            .await
            .unwrap();
        assert_eq!(response.label, "b");

        let response = svc
            .classify_request(FeaturesPayload::Raw(vec![0, 0, 0, 0]), Some("1"))
            .await
            .unwrap();
        assert_eq!(response.label, "a");
    }

    #[tokio::test]
    async fn classify_rejects_bad_k() {
        let svc = seeded_service().await;
        for bad in ["abc", "0", "-2", "999"] {
            let err = svc
                .classify_request(FeaturesPayload::Raw(vec![0, 0, 0, 0]), Some(bad))
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::BadValue, "k = {bad}");
        }
    }

    #[tokio::test]
    async fn classify_stored_resolves_prefixes() {
        let svc = seeded_service().await;
        let stored = svc
            .store_request(FeaturesPayload::Raw(vec![8, 8, 8, 8]))
            .await
            .unwrap();

        let full = stored.id.to_string();
        let response = svc.classify_stored(&full, Some("2")).await.unwrap();
        assert_eq!(response.label, "b");

        // Unique prefix works too; test ids share nothing else here
        let prefix = &full[..full.len() - 1];
        let response = svc.classify_stored(prefix, Some("2")).await.unwrap();
        assert_eq!(response.label, "b");
    }

    #[tokio::test]
    async fn fetch_stored_returns_transport_form() {
        let svc = seeded_service().await;
        let stored = svc
            .store_request(FeaturesPayload::Raw(vec![1, 2, 3]))
            .await
            .unwrap();

        let fetched = svc.fetch_stored(&stored.id.to_string()).await.unwrap();
        assert_eq!(fetched.features, FeatureVector::new(vec![1, 2, 3]).encode());
        assert_eq!(fetched.label, None);
    }

    #[tokio::test]
    async fn fetch_training_sample_keeps_label() {
        let svc = seeded_service().await;
        let id = FeaturesId::of(&FeatureVector::new(vec![0, 0, 0, 0]), Some("a"));
        let fetched = svc.fetch_stored(&id.to_string()).await.unwrap();
        assert_eq!(fetched.label.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn seed_training_replaces_previous_data() {
        let svc = seeded_service().await;
        let submitted = svc
            .seed_training(vec![labeled(&[1, 1, 1, 1], "z")])
            .await
            .unwrap();
        assert_eq!(submitted, 1);

        let response = svc
            .classify_request(FeaturesPayload::Raw(vec![0, 0, 0, 0]), Some("1"))
            .await
            .unwrap();
        assert_eq!(response.label, "z");
    }

    #[tokio::test]
    async fn classify_with_empty_training_is_bad_format() {
        let svc = service();
        let err = svc
            .classify_request(FeaturesPayload::Raw(vec![0, 0]), Some("1"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadFormat);
    }

    #[tokio::test]
    async fn dimension_mismatch_is_bad_format() {
        let svc = seeded_service().await;
        let err = svc
            .classify_request(FeaturesPayload::Raw(vec![1, 2]), Some("1"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadFormat);
    }

    #[tokio::test]
    async fn closed_service_reports_database() {
        let svc = seeded_service().await;
        svc.close().await.unwrap();
        let err = svc
            .store_request(FeaturesPayload::Raw(vec![1]))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Database);
    }

    #[tokio::test]
    async fn responses_serialize_with_string_ids() {
        let svc = seeded_service().await;
        let response = svc
            .classify_request(FeaturesPayload::Raw(vec![8, 8, 8, 8]), None)
            .await
            .unwrap();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["label"], "b");
        assert!(json["id"].as_str().unwrap().starts_with("a-"));
    }
}
