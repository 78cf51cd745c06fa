//! KNN feature store
//!
//! Content-addressed storage for training and test samples.
//!
//! # Core Concepts
//!
//! - [`FeatureStore`]: explicitly passed handle with an open/close lifecycle
//! - [`StorageEngine`]: the document-database seam beneath the store
//! - [`MemoryEngine`]: default trie-backed in-memory engine
//! - [`StoredRecord`]: immutable stored sample with its content-addressed id
//!
//! # Example
//!
//! ```rust
//! use knn_features::FeaturesPayload;
//! use knn_store::FeatureStore;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), knn_store::StoreError> {
//! let store = FeatureStore::in_memory();
//! let id = store
//!     .add(FeaturesPayload::Raw(vec![0, 2, 54, 3, 5]), Some("3".into()))
//!     .await?;
//! let sample = store.get(&id.to_string()).await?;
//! assert_eq!(sample.label.as_deref(), Some("3"));
//! store.close().await?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

mod engine;
mod error;
mod record;
mod store;

pub use engine::{MemoryEngine, StorageEngine};
pub use error::StoreError;
pub use record::{EncodedFeatures, StoredRecord};
pub use store::FeatureStore;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
