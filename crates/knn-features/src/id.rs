//! Content-addressed sample identifiers

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::FeaturesError;
use crate::sample::{Partition, Sample};
use crate::vector::FeatureVector;

/// Digest width in bytes (Blake3)
pub const DIGEST_LEN: usize = 32;

/// Rendered length of a full id: tag, separator, hex digest
pub const FULL_ID_LEN: usize = 2 + DIGEST_LEN * 2;

/// Stands in for the label when hashing unlabeled content
const UNLABELED_MARKER: &str = "unlabeled";

/// Content-addressed identifier of a stored sample
///
/// Rendered as `<tag>-<64 hex>`: the tag names the partition (`a`
/// training, `b` test) and the digest is Blake3 over the
/// transport-encoded features joined to the label. Identical content
/// under an identical label always yields the identical id, which is
/// what makes store inserts idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeaturesId {
    partition: Partition,
    digest: [u8; DIGEST_LEN],
}

impl FeaturesId {
    /// Compute the id for transport-encoded features and an optional label
    ///
    /// The partition is derived from label presence: labeled content is
    /// training, unlabeled content is test.
    #[must_use]
    pub fn compute(encoded: &str, label: Option<&str>) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(encoded.as_bytes());
        hasher.update(b"-");
        hasher.update(label.unwrap_or(UNLABELED_MARKER).as_bytes());
        Self {
            partition: if label.is_some() {
                Partition::Training
            } else {
                Partition::Test
            },
            digest: *hasher.finalize().as_bytes(),
        }
    }

    /// Compute the id for raw features and an optional label
    #[inline]
    #[must_use]
    pub fn of(features: &FeatureVector, label: Option<&str>) -> Self {
        Self::compute(&features.encode(), label)
    }

    /// Compute the id a stored `(features, sample)` pair gets
    #[inline]
    #[must_use]
    pub fn of_sample(features: &FeatureVector, sample: &Sample) -> Self {
        Self::of(features, sample.label())
    }

    /// The partition encoded in this id
    #[inline]
    #[must_use]
    pub const fn partition(&self) -> Partition {
        self.partition
    }

    /// The raw digest bytes
    #[inline]
    #[must_use]
    pub const fn digest(&self) -> &[u8; DIGEST_LEN] {
        &self.digest
    }
}

impl Display for FeaturesId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.partition.tag(), hex::encode(self.digest))
    }
}

impl FromStr for FeaturesId {
    type Err = FeaturesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != FULL_ID_LEN {
            return Err(FeaturesError::malformed_id(
                s,
                format!("expected {FULL_ID_LEN} characters, got {}", bytes.len()),
            ));
        }
        let partition = Partition::from_tag(bytes[0] as char)
            .ok_or_else(|| FeaturesError::malformed_id(s, "unknown partition tag"))?;
        if bytes[1] != b'-' {
            return Err(FeaturesError::malformed_id(s, "missing `-` separator"));
        }
        // Both leading characters are ASCII, so byte offset 2 is a char boundary
        let digest_bytes = hex::decode(&s[2..])
            .map_err(|e| FeaturesError::malformed_id(s, e.to_string()))?;
        let mut digest = [0u8; DIGEST_LEN];
        digest.copy_from_slice(&digest_bytes);
        Ok(Self { partition, digest })
    }
}

// Human-readable encodings carry the `<tag>-<hex>` string, binary ones a
// tag byte followed by the digest
impl serde::Serialize for FeaturesId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            let mut buf = [0u8; DIGEST_LEN + 1];
            buf[0] = self.partition.tag() as u8;
            buf[1..].copy_from_slice(&self.digest);
            serializer.serialize_bytes(&buf)
        }
    }
}

impl<'de> serde::Deserialize<'de> for FeaturesId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct FeaturesIdVisitor;

        impl serde::de::Visitor<'_> for FeaturesIdVisitor {
            type Value = FeaturesId;

            fn expecting(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
                formatter.write_str("a `<tag>-<hex>` id string or tag-prefixed digest bytes")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                value.parse().map_err(serde::de::Error::custom)
            }

            fn visit_bytes<E>(self, value: &[u8]) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                if value.len() != DIGEST_LEN + 1 {
                    return Err(serde::de::Error::invalid_length(
                        value.len(),
                        &"33 bytes (tag + digest)",
                    ));
                }
                let partition = Partition::from_tag(value[0] as char)
                    .ok_or_else(|| serde::de::Error::custom("unknown partition tag"))?;
                let mut digest = [0u8; DIGEST_LEN];
                digest.copy_from_slice(&value[1..]);
                Ok(FeaturesId { partition, digest })
            }
        }

        if deserializer.is_human_readable() {
            deserializer.deserialize_str(FeaturesIdVisitor)
        } else {
            deserializer.deserialize_bytes(FeaturesIdVisitor)
        }
    }
}
