//! Lifecycle engine for Typesense Cloud clusters.
//!
//! Maps a declared [`DesiredConfig`] onto create/read/update/delete/import
//! calls against the cluster management API and returns a flattened
//! [`ClusterState`] for the caller to persist.

pub mod config;
pub mod resource;
pub mod schema;
pub mod types;

use async_trait::async_trait;
use typesense_cloud_api::{Cluster, CreateClusterRequest, TypesenseCloudClient, UpdateClusterRequest};

pub use typesense_cloud_api;

pub use config::EngineConfig;
pub use resource::{ClusterResource, WaitPolicy};
pub use types::{ClusterId, ClusterState, DesiredConfig, YesNo};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not create cluster")]
    CreateFailed {
        #[source]
        source: typesense_cloud_api::Error,
    },

    #[error("cluster {id} created, but could not reach expected state")]
    ConvergenceFailed {
        id: ClusterId,
        #[source]
        source: typesense_cloud_api::Error,
    },

    #[error("cluster {id} created, but still provisioning after {polls} polls")]
    ConvergenceTimeout { id: ClusterId, polls: u32 },

    #[error("cluster {id} created, but waiting for it was cancelled")]
    ConvergenceCancelled { id: ClusterId },

    #[error("could not read cluster {id}")]
    ReadFailed {
        id: ClusterId,
        #[source]
        source: typesense_cloud_api::Error,
    },

    #[error("cluster {id} no longer exists")]
    NotFound {
        id: ClusterId,
        #[source]
        source: typesense_cloud_api::Error,
    },

    #[error("could not update cluster {id}")]
    UpdateFailed {
        id: ClusterId,
        #[source]
        source: typesense_cloud_api::Error,
    },

    #[error("could not delete cluster {id}")]
    DeleteFailed {
        id: ClusterId,
        #[source]
        source: typesense_cloud_api::Error,
    },

    #[error("malformed record for cluster {id}: {reason}")]
    MalformedRecord { id: ClusterId, reason: String },

    #[error("missing env var: {0}")]
    MissingEnv(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// The cluster is gone on the remote side; drop it from state.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Id of a cluster that exists remotely even though creation failed.
    pub fn orphaned_id(&self) -> Option<&ClusterId> {
        match self {
            Self::ConvergenceFailed { id, .. }
            | Self::ConvergenceTimeout { id, .. }
            | Self::ConvergenceCancelled { id } => Some(id),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// The cluster management operations the engine relies on.
///
/// Implemented by [`TypesenseCloudClient`]; tests plug in fakes.
#[async_trait]
pub trait ClusterApi: Send + Sync + 'static {
    async fn create_cluster(&self, req: &CreateClusterRequest) -> typesense_cloud_api::Result<Cluster>;

    async fn get_cluster(&self, id: &str) -> typesense_cloud_api::Result<Cluster>;

    async fn update_cluster(&self, id: &str, req: &UpdateClusterRequest) -> typesense_cloud_api::Result<()>;

    async fn terminate_cluster(&self, id: &str) -> typesense_cloud_api::Result<()>;
}

#[async_trait]
impl ClusterApi for TypesenseCloudClient {
    async fn create_cluster(&self, req: &CreateClusterRequest) -> typesense_cloud_api::Result<Cluster> {
        TypesenseCloudClient::create_cluster(self, req).await
    }

    async fn get_cluster(&self, id: &str) -> typesense_cloud_api::Result<Cluster> {
        TypesenseCloudClient::get_cluster(self, id).await
    }

    async fn update_cluster(&self, id: &str, req: &UpdateClusterRequest) -> typesense_cloud_api::Result<()> {
        TypesenseCloudClient::update_cluster(self, id, req).await
    }

    async fn terminate_cluster(&self, id: &str) -> typesense_cloud_api::Result<()> {
        TypesenseCloudClient::terminate_cluster(self, id).await
    }
}
