//! Stored record shapes

use serde::{Deserialize, Serialize};

use knn_features::{FeatureVector, FeaturesId, Label, LabeledFeatures, Sample};

/// A stored sample: content-addressed id, features, partition payload
///
/// Created whole by an `add`, never mutated, removed only by `clear`.
/// The id is always the content address of the `(features, sample)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Content-addressed id
    pub id: FeaturesId,
    /// Feature bytes
    pub features: FeatureVector,
    /// Partition membership with its label, if any
    pub sample: Sample,
}

impl StoredRecord {
    /// Build a record, deriving its content-addressed id
    #[must_use]
    pub fn new(features: FeatureVector, sample: Sample) -> Self {
        let id = FeaturesId::of_sample(&features, &sample);
        Self {
            id,
            features,
            sample,
        }
    }

    /// Wire form with an optional label
    #[must_use]
    pub fn to_labeled(&self) -> LabeledFeatures {
        LabeledFeatures {
            features: self.features.clone(),
            label: self.sample.label().map(str::to_owned),
        }
    }

    /// Wire form with an optional label (consumes self)
    #[must_use]
    pub fn into_labeled(self) -> LabeledFeatures {
        LabeledFeatures {
            label: self.sample.into_label(),
            features: self.features,
        }
    }

    /// Transport-encoded wire form (consumes self)
    #[must_use]
    pub fn into_encoded(self) -> EncodedFeatures {
        EncodedFeatures {
            features: self.features.encode(),
            label: self.sample.into_label(),
        }
    }
}

/// A stored record in transport-encoded form
///
/// What collaborators receive when they fetch a stored image back:
/// base64 features plus the label when the record is a training sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedFeatures {
    /// Standard-base64 feature bytes
    pub features: String,
    /// Class label; absent for test samples
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use knn_features::Partition;

    #[test]
    fn new_derives_content_address() {
        let features = FeatureVector::new(vec![0, 2, 54, 3, 5]);
        let record = StoredRecord::new(features.clone(), Sample::Training { label: "a".into() });
        assert_eq!(record.id, FeaturesId::of(&features, Some("a")));
        assert_eq!(record.id.partition(), Partition::Training);
    }

    #[test]
    fn labeled_form_carries_optional_label() {
        let record = StoredRecord::new(FeatureVector::new(vec![1, 2]), Sample::Test);
        assert_eq!(record.to_labeled().label, None);

        let record = StoredRecord::new(
            FeatureVector::new(vec![1, 2]),
            Sample::Training { label: "7".into() },
        );
        assert_eq!(record.into_labeled().label.as_deref(), Some("7"));
    }

    #[test]
    fn encoded_form_is_base64() {
        let features = FeatureVector::new(vec![0, 1, 2]);
        let record = StoredRecord::new(features.clone(), Sample::Test);
        let encoded = record.into_encoded();
        assert_eq!(encoded.features, features.encode());
        assert_eq!(encoded.label, None);
    }

    #[test]
    fn encoded_form_wire_shape() {
        let record = StoredRecord::new(
            FeatureVector::new(vec![0, 1, 2]),
            Sample::Training { label: "7".into() },
        );
        let json = serde_json::to_value(record.into_encoded()).unwrap();
        assert_eq!(json, serde_json::json!({"features": "AAEC", "label": "7"}));

        let record = StoredRecord::new(FeatureVector::new(vec![0, 1, 2]), Sample::Test);
        let json = serde_json::to_value(record.into_encoded()).unwrap();
        assert_eq!(json, serde_json::json!({"features": "AAEC"}));
    }
}
