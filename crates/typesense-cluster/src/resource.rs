use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};
use typesense_cloud_api::{Cluster, TypesenseCloudClient};

use crate::config::EngineConfig;
use crate::types::{ClusterId, ClusterState, DesiredConfig};
use crate::{ClusterApi, Error, Result};

/// How long `create` keeps polling a cluster that is still provisioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Pause before every status poll.
    pub interval: Duration,
    /// Give up after this many polls that all reported `provisioning`.
    pub max_polls: u32,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(8),
            max_polls: 225,
        }
    }
}

/// Reconciles one declared cluster against the control plane.
///
/// Holds no state besides the API handle, so a single instance can serve
/// concurrent operations on different clusters. Every operation re-reads the
/// remote record instead of trusting anything cached.
#[derive(Clone)]
pub struct ClusterResource {
    api: Arc<dyn ClusterApi>,
    wait: WaitPolicy,
}

impl ClusterResource {
    /// `wait.max_polls` is raised to 1 so a created cluster is always read
    /// at least once.
    pub fn new(api: Arc<dyn ClusterApi>, wait: WaitPolicy) -> Self {
        let wait = WaitPolicy {
            max_polls: wait.max_polls.max(1),
            ..wait
        };
        Self { api, wait }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let client = TypesenseCloudClient::with_base_url(config.api_key.clone(), config.api_url.clone());
        Self::new(Arc::new(client), config.wait)
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::from_config(&EngineConfig::from_env()?))
    }

    pub fn wait_policy(&self) -> WaitPolicy {
        self.wait
    }

    /// Create the cluster and block until it leaves `provisioning`.
    ///
    /// Setting `cancel` to `true` aborts the wait between two polls. Once the
    /// create call succeeded every failure carries the cluster id, see
    /// [`Error::orphaned_id`].
    pub async fn create(&self, desired: &DesiredConfig, cancel: watch::Receiver<bool>) -> Result<ClusterState> {
        let cluster = self
            .api
            .create_cluster(&desired.create_request())
            .await
            .map_err(|source| Error::CreateFailed { source })?;

        let id = ClusterId(cluster.id);
        info!(cluster_id = %id, status = %cluster.status, "typesense: cluster created");

        let cluster = self.wait_until_provisioned(&id, cancel).await?;
        ClusterState::from_cluster(cluster)
    }

    pub async fn read(&self, id: &ClusterId) -> Result<ClusterState> {
        let cluster = self.api.get_cluster(id.as_str()).await.map_err(|source| {
            if source.is_not_found() {
                Error::NotFound { id: id.clone(), source }
            } else {
                Error::ReadFailed { id: id.clone(), source }
            }
        })?;

        ClusterState::from_cluster(cluster)
    }

    /// Apply the in-place subset of `desired` and return the re-read record.
    ///
    /// A failing re-read is reported as such even though the remote change
    /// already went through; nothing is rolled back.
    pub async fn update(&self, id: &ClusterId, desired: &DesiredConfig) -> Result<ClusterState> {
        self.api
            .update_cluster(id.as_str(), &desired.update_request())
            .await
            .map_err(|source| Error::UpdateFailed { id: id.clone(), source })?;

        info!(cluster_id = %id, "typesense: cluster updated");

        self.read(id).await
    }

    /// Request termination. Teardown happens asynchronously on the remote side
    /// and is not awaited.
    pub async fn delete(&self, id: &ClusterId) -> Result<()> {
        self.api
            .terminate_cluster(id.as_str())
            .await
            .map_err(|source| Error::DeleteFailed { id: id.clone(), source })?;

        info!(cluster_id = %id, "typesense: cluster terminated");
        Ok(())
    }

    /// Adopt an existing cluster. Existence is checked by the next `read`.
    pub fn import(&self, external_id: &str) -> ClusterId {
        ClusterId(external_id.to_string())
    }

    async fn wait_until_provisioned(&self, id: &ClusterId, mut cancel: watch::Receiver<bool>) -> Result<Cluster> {
        for poll in 1..=self.wait.max_polls {
            tokio::select! {
                biased;
                _ = cancelled(&mut cancel) => {
                    warn!(cluster_id = %id, poll, "typesense: wait for cluster cancelled");
                    return Err(Error::ConvergenceCancelled { id: id.clone() });
                }
                _ = tokio::time::sleep(self.wait.interval) => {}
            }

            let cluster = self
                .api
                .get_cluster(id.as_str())
                .await
                .map_err(|source| Error::ConvergenceFailed { id: id.clone(), source })?;

            if !cluster.is_provisioning() {
                info!(cluster_id = %id, status = %cluster.status, polls = poll, "typesense: cluster provisioned");
                return Ok(cluster);
            }

            debug!(cluster_id = %id, poll, "typesense: cluster still provisioning");
        }

        warn!(cluster_id = %id, polls = self.wait.max_polls, "typesense: gave up waiting for cluster");
        Err(Error::ConvergenceTimeout {
            id: id.clone(),
            polls: self.wait.max_polls,
        })
    }
}

/// Resolves once `signal` reads `true`. A dropped sender never cancels.
async fn cancelled(signal: &mut watch::Receiver<bool>) {
    loop {
        if *signal.borrow_and_update() {
            return;
        }
        if signal.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
