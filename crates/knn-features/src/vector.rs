//! Feature vectors and their transport encoding

use std::fmt::{self, Formatter};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::FeaturesError;

/// An ordered vector of `u8` intensity features
///
/// Row-major pixel intensities for image samples. Immutable once built;
/// equality is byte equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FeatureVector(Vec<u8>);

impl FeatureVector {
    /// Create a vector from raw bytes
    #[inline]
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Number of features
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the vector has no features
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the raw bytes
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Take the raw bytes (consumes self)
    #[inline]
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Transport-encode to standard base64 (padded)
    #[inline]
    #[must_use]
    pub fn encode(&self) -> String {
        BASE64.encode(&self.0)
    }

    /// Decode from standard base64
    ///
    /// Exact inverse of [`encode`](Self::encode): round-trips every byte
    /// sequence, including the empty one.
    ///
    /// # Errors
    /// Returns an error if `s` is not valid standard base64.
    #[inline]
    pub fn decode(s: &str) -> Result<Self, FeaturesError> {
        Ok(Self(BASE64.decode(s)?))
    }
}

impl From<Vec<u8>> for FeatureVector {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for FeatureVector {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// Human-readable encodings carry the base64 form, binary ones the raw bytes
impl serde::Serialize for FeatureVector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.encode())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> serde::Deserialize<'de> for FeatureVector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct FeatureVectorVisitor;

        impl<'de> serde::de::Visitor<'de> for FeatureVectorVisitor {
            type Value = FeatureVector;

            fn expecting(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
                formatter.write_str("a base64 feature string or byte array")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                FeatureVector::decode(value).map_err(serde::de::Error::custom)
            }

            fn visit_bytes<E>(self, value: &[u8]) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(FeatureVector::new(value.to_vec()))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(byte) = seq.next_element()? {
                    bytes.push(byte);
                }
                Ok(FeatureVector::new(bytes))
            }
        }

        if deserializer.is_human_readable() {
            deserializer.deserialize_str(FeatureVectorVisitor)
        } else {
            deserializer.deserialize_bytes(FeatureVectorVisitor)
        }
    }
}

/// Features as supplied by a collaborator, raw or transport-encoded
///
/// A closed union in place of a boolean "is encoded" flag. Whichever
/// variant arrives, [`into_vector`](Self::into_vector) normalizes it to
/// the canonical raw form, so downstream code never branches on the
/// transport representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeaturesPayload {
    /// Raw feature bytes
    Raw(Vec<u8>),
    /// Standard-base64 transport encoding of the feature bytes
    Encoded(String),
}

impl FeaturesPayload {
    /// Normalize to a raw feature vector
    ///
    /// # Errors
    /// Returns an error if an encoded payload is not valid base64.
    pub fn into_vector(self) -> Result<FeatureVector, FeaturesError> {
        match self {
            Self::Raw(bytes) => Ok(FeatureVector::new(bytes)),
            Self::Encoded(s) => FeatureVector::decode(&s),
        }
    }
}

impl From<Vec<u8>> for FeaturesPayload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Raw(bytes)
    }
}

impl From<FeatureVector> for FeaturesPayload {
    fn from(vector: FeatureVector) -> Self {
        Self::Raw(vector.into_bytes())
    }
}
