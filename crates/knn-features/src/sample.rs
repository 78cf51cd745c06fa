//! Sample partitions and record types

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::id::FeaturesId;
use crate::vector::FeatureVector;

/// Classification label carried by training samples
pub type Label = String;

/// The two disjoint populations a stored sample belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    /// Labeled reference samples the classifier votes over
    Training,
    /// Unlabeled query samples
    Test,
}

impl Partition {
    /// Single-character tag embedded in ids
    #[inline]
    #[must_use]
    pub const fn tag(self) -> char {
        match self {
            Self::Training => 'a',
            Self::Test => 'b',
        }
    }

    /// Recover a partition from its id tag
    #[inline]
    #[must_use]
    pub const fn from_tag(tag: char) -> Option<Self> {
        match tag {
            'a' => Some(Self::Training),
            'b' => Some(Self::Test),
            _ => None,
        }
    }

    /// Human-readable partition name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Training => "training",
            Self::Test => "test",
        }
    }
}

impl Display for Partition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sample's partition together with its partition-specific payload
///
/// The label exists exactly when the sample is a training sample; an
/// unlabeled training sample is not representable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sample {
    /// Labeled training sample
    Training {
        /// The class label
        label: Label,
    },
    /// Unlabeled test sample
    Test,
}

impl Sample {
    /// Build from an optional wire label; a present label means training
    #[must_use]
    pub fn from_label(label: Option<Label>) -> Self {
        match label {
            Some(label) => Self::Training { label },
            None => Self::Test,
        }
    }

    /// The label, if this is a training sample
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Training { label } => Some(label),
            Self::Test => None,
        }
    }

    /// The partition this sample belongs to
    #[inline]
    #[must_use]
    pub const fn partition(&self) -> Partition {
        match self {
            Self::Training { .. } => Partition::Training,
            Self::Test => Partition::Test,
        }
    }

    /// The label, if any (consumes self)
    #[must_use]
    pub fn into_label(self) -> Option<Label> {
        match self {
            Self::Training { label } => Some(label),
            Self::Test => None,
        }
    }
}

/// Wire-level record: features plus an optional label
///
/// Collaborators omit the label for test samples. Internally the option
/// becomes a [`Sample`] at the boundary and stays closed from there on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledFeatures {
    /// Feature bytes (base64 in human-readable encodings)
    pub features: FeatureVector,
    /// Class label; absent for test samples
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
}

impl LabeledFeatures {
    /// A training-partition record
    #[must_use]
    pub fn labeled(features: FeatureVector, label: impl Into<Label>) -> Self {
        Self {
            features,
            label: Some(label.into()),
        }
    }

    /// A test-partition record
    #[must_use]
    pub fn unlabeled(features: FeatureVector) -> Self {
        Self {
            features,
            label: None,
        }
    }

    /// Split into features and a partition-typed sample
    #[must_use]
    pub fn into_parts(self) -> (FeatureVector, Sample) {
        (self.features, Sample::from_label(self.label))
    }
}

/// A stored training record as the classifier consumes it
///
/// The label is not optional here: training-partition membership is a
/// type-level guarantee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingFeatures {
    /// Content-addressed id of the stored record
    pub id: FeaturesId,
    /// Feature bytes
    pub features: FeatureVector,
    /// The class label
    pub label: Label,
}
