//! The feature store handle
//!
//! [`FeatureStore`] owns a [`StorageEngine`] for its whole lifetime:
//! open it, use it, close it. Every handle is explicitly passed; there
//! is no ambient global store.

use knn_features::{
    FeaturesId, FeaturesPayload, Label, LabeledFeatures, Partition, Sample, TrainingFeatures,
    FULL_ID_LEN,
};

use crate::engine::{MemoryEngine, StorageEngine};
use crate::error::StoreError;
use crate::record::{EncodedFeatures, StoredRecord};

/// Content-addressed store for training and test samples
#[derive(Debug)]
pub struct FeatureStore {
    engine: Box<dyn StorageEngine>,
}

impl FeatureStore {
    /// Open a store over the given engine
    #[must_use]
    pub fn open(engine: Box<dyn StorageEngine>) -> Self {
        Self { engine }
    }

    /// Open a store over a fresh in-memory engine
    #[must_use]
    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryEngine::new()))
    }

    /// Add a sample, returning its content-addressed id
    ///
    /// The payload is normalized to canonical raw form first, so raw and
    /// encoded submissions of the same bytes are the same sample. Adding
    /// a sample that is already stored succeeds with the existing id;
    /// content addressing makes the insert idempotent.
    ///
    /// # Errors
    /// Fails on malformed encoded payloads and on engine failures.
    pub async fn add(
        &self,
        payload: FeaturesPayload,
        label: Option<Label>,
    ) -> Result<FeaturesId, StoreError> {
        let features = payload.into_vector()?;
        let record = StoredRecord::new(features, Sample::from_label(label));
        let id = record.id;
        match self.engine.insert(record).await {
            Ok(()) => {
                tracing::debug!(%id, "stored features");
                Ok(id)
            }
            // The same content under the same label is already stored
            Err(StoreError::Duplicate { .. }) => Ok(id),
            Err(e) => Err(e),
        }
    }

    /// Fetch a stored sample in wire form
    ///
    /// # Errors
    /// See [`lookup`](Self::lookup) for the id resolution rules.
    pub async fn get(&self, id: &str) -> Result<LabeledFeatures, StoreError> {
        Ok(self.lookup(id).await?.into_labeled())
    }

    /// Fetch a stored sample in transport-encoded form
    ///
    /// # Errors
    /// See [`lookup`](Self::lookup) for the id resolution rules.
    pub async fn get_encoded(&self, id: &str) -> Result<EncodedFeatures, StoreError> {
        Ok(self.lookup(id).await?.into_encoded())
    }

    /// Resolve an id or id prefix to its stored record
    ///
    /// Ids shorter than the full rendered length are prefix lookups:
    /// exactly one match resolves, none is `NotFound`, several are
    /// `AmbiguousId`. Full-length ids resolve exactly.
    pub async fn lookup(&self, id: &str) -> Result<StoredRecord, StoreError> {
        if id.len() < FULL_ID_LEN {
            let mut matches = self.engine.fetch_prefix(id).await?;
            if matches.len() > 1 {
                return Err(StoreError::ambiguous(id, matches.len()));
            }
            match matches.pop() {
                Some(record) => Ok(record),
                None => Err(StoreError::not_found(id)),
            }
        } else {
            self.engine
                .fetch(id)
                .await?
                .ok_or_else(|| StoreError::not_found(id))
        }
    }

    /// Every training sample, in stable id order
    ///
    /// # Errors
    /// Fails if the engine fails or hands back a mispartitioned record.
    pub async fn all_training(&self) -> Result<Vec<TrainingFeatures>, StoreError> {
        let records = self.engine.all_in(Partition::Training).await?;
        records
            .into_iter()
            .map(|record| match record.sample {
                Sample::Training { label } => Ok(TrainingFeatures {
                    id: record.id,
                    features: record.features,
                    label,
                }),
                Sample::Test => Err(StoreError::Engine(format!(
                    "test-partition record {} in training scan",
                    record.id
                ))),
            })
            .collect()
    }

    /// Remove every sample from both partitions
    ///
    /// # Errors
    /// Fails only on engine failures; clearing an empty store is fine.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.engine.clear().await?;
        tracing::info!("cleared feature store");
        Ok(())
    }

    /// Close the store; every later operation fails
    ///
    /// # Errors
    /// Fails only on engine failures.
    pub async fn close(&self) -> Result<(), StoreError> {
        self.engine.close().await?;
        tracing::info!("closed feature store");
        Ok(())
    }
}
