//! In-memory control plane for lifecycle tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use typesense_cloud_api::{Cluster, CreateClusterRequest, StatusCode, UpdateClusterRequest};
use typesense_cluster::ClusterApi;

/// One call the engine made, with request bodies as the JSON that would hit
/// the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create(serde_json::Value),
    Get(String),
    Update(String, serde_json::Value),
    Terminate(String),
}

/// Fake control plane.
///
/// Clusters are created in `provisioning` and report `ready` after
/// `polls_until_ready` reads. Failures are injected per call kind and
/// consumed once.
#[derive(Default)]
pub struct FakeClusterApi {
    clusters: Mutex<HashMap<String, Cluster>>,
    calls: Mutex<Vec<Call>>,
    next_id: Mutex<u32>,
    polls_until_ready: Mutex<u32>,
    final_status: Mutex<Option<String>>,
    create_error: Mutex<Option<typesense_cloud_api::Error>>,
    get_errors: Mutex<VecDeque<typesense_cloud_api::Error>>,
    update_error: Mutex<Option<typesense_cloud_api::Error>>,
    terminate_error: Mutex<Option<typesense_cloud_api::Error>>,
}

impl FakeClusterApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `provisioning` for the next `polls` reads.
    pub fn with_provisioning_polls(self, polls: u32) -> Self {
        *self.polls_until_ready.lock().unwrap() = polls;
        self
    }

    /// Status reported once provisioning is over (default `ready`).
    pub fn with_final_status(self, status: &str) -> Self {
        *self.final_status.lock().unwrap() = Some(status.to_string());
        self
    }

    pub fn fail_create(&self, err: typesense_cloud_api::Error) {
        *self.create_error.lock().unwrap() = Some(err);
    }

    pub fn fail_next_get(&self, err: typesense_cloud_api::Error) {
        self.get_errors.lock().unwrap().push_back(err);
    }

    pub fn fail_update(&self, err: typesense_cloud_api::Error) {
        *self.update_error.lock().unwrap() = Some(err);
    }

    pub fn fail_terminate(&self, err: typesense_cloud_api::Error) {
        *self.terminate_error.lock().unwrap() = Some(err);
    }

    pub fn insert(&self, cluster: Cluster) {
        self.clusters.lock().unwrap().insert(cluster.id.clone(), cluster);
    }

    pub fn cluster(&self, id: &str) -> Option<Cluster> {
        self.clusters.lock().unwrap().get(id).cloned()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn get_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Get(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

pub fn api_error(status: u16, body: &str) -> typesense_cloud_api::Error {
    typesense_cloud_api::Error::Api {
        endpoint: "fake",
        status: StatusCode::from_u16(status).unwrap(),
        body: body.to_string(),
    }
}

pub fn not_found() -> typesense_cloud_api::Error {
    api_error(404, "Not Found")
}

/// A cluster record as the control plane reports it.
pub fn cluster(id: &str, status: &str) -> Cluster {
    Cluster {
        id: id.to_string(),
        name: "search".into(),
        memory: "1_gb".into(),
        vcpu: "2_vcpus".into(),
        regions: vec!["oregon".into()],
        high_availability: "no".into(),
        high_performance_disk: "no".into(),
        search_delivery_network: "off".into(),
        load_balancing: "no".into(),
        typesense_server_version: "27.1".into(),
        auto_upgrade_capacity: false,
        status: status.to_string(),
    }
}

#[async_trait]
impl ClusterApi for FakeClusterApi {
    async fn create_cluster(&self, req: &CreateClusterRequest) -> typesense_cloud_api::Result<Cluster> {
        self.record(Call::Create(serde_json::to_value(req).unwrap()));
        if let Some(err) = self.create_error.lock().unwrap().take() {
            return Err(err);
        }

        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            format!("cluster-{next}")
        };

        let created = Cluster {
            id: id.clone(),
            name: req.name.clone().unwrap_or_else(|| format!("generated-{id}")),
            memory: req.memory.clone(),
            vcpu: req.vcpu.clone(),
            regions: req.regions.clone(),
            high_availability: req.high_availability.clone(),
            high_performance_disk: req.high_performance_disk.clone(),
            search_delivery_network: "off".into(),
            load_balancing: "no".into(),
            typesense_server_version: "27.1".into(),
            auto_upgrade_capacity: req.auto_upgrade_capacity,
            status: typesense_cloud_api::STATUS_PROVISIONING.into(),
        };
        self.insert(created.clone());
        Ok(created)
    }

    async fn get_cluster(&self, id: &str) -> typesense_cloud_api::Result<Cluster> {
        self.record(Call::Get(id.to_string()));
        if let Some(err) = self.get_errors.lock().unwrap().pop_front() {
            return Err(err);
        }

        let mut clusters = self.clusters.lock().unwrap();
        let Some(cluster) = clusters.get_mut(id) else {
            return Err(not_found());
        };

        if cluster.is_provisioning() {
            let mut remaining = self.polls_until_ready.lock().unwrap();
            if *remaining > 0 {
                *remaining -= 1;
            } else {
                cluster.status = self
                    .final_status
                    .lock()
                    .unwrap()
                    .clone()
                    .unwrap_or_else(|| "ready".into());
            }
        }

        Ok(cluster.clone())
    }

    async fn update_cluster(&self, id: &str, req: &UpdateClusterRequest) -> typesense_cloud_api::Result<()> {
        self.record(Call::Update(id.to_string(), serde_json::to_value(req).unwrap()));
        if let Some(err) = self.update_error.lock().unwrap().take() {
            return Err(err);
        }

        let mut clusters = self.clusters.lock().unwrap();
        let cluster = clusters.get_mut(id).ok_or_else(not_found)?;
        if let Some(name) = &req.name {
            cluster.name = name.clone();
        }
        cluster.auto_upgrade_capacity = req.auto_upgrade_capacity;
        Ok(())
    }

    async fn terminate_cluster(&self, id: &str) -> typesense_cloud_api::Result<()> {
        self.record(Call::Terminate(id.to_string()));
        if let Some(err) = self.terminate_error.lock().unwrap().take() {
            return Err(err);
        }

        self.clusters.lock().unwrap().remove(id);
        Ok(())
    }
}
