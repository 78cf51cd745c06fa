//! Collaborator boundary for the KNN recognition system
//!
//! Everything a collaborating process touches goes through this crate:
//! stringly request parameters are validated here, corpus files are
//! loaded here, and errors leave here as serializable reports with
//! transport status codes.
//!
//! # Core Concepts
//!
//! - **KnnService**: request adapters over a feature store and the classifier
//! - **KnnConfig**: TOML-backed settings for `k` bounds and corpus file names
//! - **ParamSpec**: declarative validation for stringly request parameters
//! - **ErrorReport**: the only error shape collaborators ever see
//!
//! # Example
//!
//! ```
//! use knn_features::FeaturesPayload;
//! use knn_service::{KnnConfig, KnnService};
//! use knn_store::FeatureStore;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), knn_service::ServiceError> {
//! let service = KnnService::new(FeatureStore::in_memory(), KnnConfig::new());
//! let stored = service.store_request(FeaturesPayload::Raw(vec![1, 2, 3])).await?;
//! let fetched = service.fetch_stored(&stored.id.to_string()).await?;
//! assert_eq!(fetched.label, None);
//! # service.close().await?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

mod config;
mod error;
mod loader;
mod service;
mod validate;

pub use config::{CorpusFiles, KnnConfig};
pub use error::{report, ErrorReport, ServiceError};
pub use loader::load_corpus_files;
pub use service::{ClassifyResponse, KnnService, StoreResponse};
pub use validate::{k_param, Check, ParamSpec, Requirement};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
