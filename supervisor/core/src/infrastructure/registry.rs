// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Component Registry
//!
//! Name-keyed map of `ComponentRecord`s shared by the launcher, the
//! registration handler, the gateway, the shutdown coordinator and the
//! watchdog. The registry is constructed once at startup and cloned into each
//! of them; clones share the same map.
//!
//! # Locking
//!
//! Every method takes the lock for exactly one read or one write and never
//! awaits while holding it. Callers perform network I/O on snapshots and then
//! commit through a single short write (`promote`, `disconnect`, `update`).

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::domain::component::{ComponentConfig, ComponentMetadata};
use crate::domain::errors::RegistrationError;
use crate::domain::rpc::ComponentRpc;
use crate::infrastructure::process::ProcessHandle;

/// Lifecycle record of one component.
#[derive(Clone)]
pub struct ComponentRecord {
    pub config: Arc<ComponentConfig>,
    /// Distinguishes successive launches under the same name
    pub launch_id: u64,
    pub process: Option<ProcessHandle>,
    pub endpoint: Option<String>,
    pub client: Option<Arc<dyn ComponentRpc>>,
    pub metadata: Option<ComponentMetadata>,
    pub registered_pid: Option<u32>,
    pub launched_at: DateTime<Utc>,
    pub registered_at: Option<DateTime<Utc>>,
}

impl ComponentRecord {
    pub fn placeholder(config: ComponentConfig) -> Self {
        Self {
            config: Arc::new(config),
            launch_id: next_launch_id(),
            process: None,
            endpoint: None,
            client: None,
            metadata: None,
            registered_pid: None,
            launched_at: Utc::now(),
            registered_at: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Live records have completed registration and can take RPCs.
    pub fn is_live(&self) -> bool {
        self.metadata.is_some() && self.client.is_some()
    }

    /// Pid of the launched process, when known.
    pub fn launched_pid(&self) -> Option<u32> {
        self.process.as_ref().map(ProcessHandle::pid).filter(|pid| *pid != 0)
    }

    /// Reject a registration whose pid does not belong to this launch.
    fn check_pid(&self, reported: u32) -> Result<(), RegistrationError> {
        match self.launched_pid() {
            Some(expected) if expected != reported => Err(RegistrationError::StaleRegistration {
                name: self.config.name.clone(),
                expected,
                reported,
            }),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for ComponentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRecord")
            .field("name", &self.config.name)
            .field("launch_id", &self.launch_id)
            .field("process", &self.process)
            .field("endpoint", &self.endpoint)
            .field("connected", &self.client.is_some())
            .field("metadata", &self.metadata)
            .field("registered_pid", &self.registered_pid)
            .field("launched_at", &self.launched_at)
            .field("registered_at", &self.registered_at)
            .finish()
    }
}

fn next_launch_id() -> u64 {
    static NEXT: AtomicU64 = AtomicU64::new(1);
    NEXT.fetch_add(1, Ordering::Relaxed)
}

/// Fields committed by a successful registration handshake.
pub struct Registration {
    pub name: String,
    pub endpoint: String,
    pub pid: u32,
    pub client: Arc<dyn ComponentRpc>,
    pub metadata: ComponentMetadata,
}

/// Result of committing a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Promotion {
    /// First registration of this launch
    Registered,
    /// The record was already live; its connection was replaced
    Reconnected,
}

#[derive(Clone, Default)]
pub struct ComponentRegistry {
    components: Arc<RwLock<HashMap<String, ComponentRecord>>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fresh placeholder, replacing any record under the same name.
    /// Returns the replaced record and the new record's launch id.
    pub fn insert_placeholder(&self, config: ComponentConfig) -> (u64, Option<ComponentRecord>) {
        let record = ComponentRecord::placeholder(config);
        let launch_id = record.launch_id;
        let name = record.config.name.clone();
        let previous = self.components.write().insert(name, record);
        (launch_id, previous)
    }

    /// Attach the spawned process to the record, provided the record still
    /// belongs to the same launch. A registration committed from a different
    /// pid before the attach is dropped.
    pub fn attach_process(&self, name: &str, launch_id: u64, process: ProcessHandle) -> bool {
        let mut components = self.components.write();
        match components.get_mut(name) {
            Some(record) if record.launch_id == launch_id => {
                if record.registered_pid.is_some_and(|pid| pid != process.pid()) {
                    record.client = None;
                    record.metadata = None;
                    record.endpoint = None;
                    record.registered_pid = None;
                    record.registered_at = None;
                }
                record.process = Some(process);
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<ComponentRecord> {
        self.components.read().get(name).cloned()
    }

    pub fn put(&self, record: ComponentRecord) {
        let name = record.config.name.clone();
        self.components.write().insert(name, record);
    }

    pub fn remove(&self, name: &str) -> Option<ComponentRecord> {
        self.components.write().remove(name)
    }

    /// Remove the record only if it still belongs to `launch_id`.
    pub fn remove_launch(&self, name: &str, launch_id: u64) -> Option<ComponentRecord> {
        let mut components = self.components.write();
        if components.get(name).map(|r| r.launch_id) == Some(launch_id) {
            components.remove(name)
        } else {
            None
        }
    }

    /// Remove a placeholder that still belongs to `launch_id` and has not
    /// registered in the meantime.
    pub fn remove_unregistered(&self, name: &str, launch_id: u64) -> Option<ComponentRecord> {
        let mut components = self.components.write();
        let expired = components
            .get(name)
            .is_some_and(|r| r.launch_id == launch_id && r.metadata.is_none());
        if expired {
            components.remove(name)
        } else {
            None
        }
    }

    /// Mutate a record in place under the write lock.
    pub fn update<R>(&self, name: &str, f: impl FnOnce(&mut ComponentRecord) -> R) -> Option<R> {
        self.components.write().get_mut(name).map(f)
    }

    /// Snapshot of every record, sorted by name.
    pub fn list(&self) -> Vec<ComponentRecord> {
        let mut records: Vec<_> = self.components.read().values().cloned().collect();
        records.sort_by(|a, b| a.config.name.cmp(&b.config.name));
        records
    }

    /// Snapshot of live records, sorted by name.
    pub fn live(&self) -> Vec<ComponentRecord> {
        let mut records: Vec<_> = self
            .components
            .read()
            .values()
            .filter(|r| r.is_live())
            .cloned()
            .collect();
        records.sort_by(|a, b| a.config.name.cmp(&b.config.name));
        records
    }

    /// Client and metadata of a live component.
    pub fn live_client(&self, name: &str) -> Option<(Arc<dyn ComponentRpc>, ComponentMetadata)> {
        let components = self.components.read();
        let record = components.get(name)?;
        match (&record.client, &record.metadata) {
            (Some(client), Some(metadata)) => Some((client.clone(), metadata.clone())),
            _ => None,
        }
    }

    /// Validate a registration request against the current record without
    /// committing anything.
    pub fn check_registration(&self, name: &str, pid: u32) -> Result<u64, RegistrationError> {
        let components = self.components.read();
        let record = components
            .get(name)
            .ok_or_else(|| RegistrationError::UnknownComponent(name.to_string()))?;
        record.check_pid(pid)?;
        Ok(record.launch_id)
    }

    /// Commit a completed handshake. `launch_id` must be the one returned by
    /// `check_registration`; a relaunch in between invalidates the handshake.
    pub fn promote(
        &self,
        launch_id: u64,
        registration: Registration,
    ) -> Result<Promotion, RegistrationError> {
        let mut components = self.components.write();
        let record = components
            .get_mut(&registration.name)
            .ok_or_else(|| RegistrationError::UnknownComponent(registration.name.clone()))?;

        record.check_pid(registration.pid)?;
        if record.launch_id != launch_id {
            return Err(RegistrationError::UnknownComponent(registration.name));
        }

        let promotion = if record.is_live() {
            Promotion::Reconnected
        } else {
            Promotion::Registered
        };

        record.endpoint = Some(registration.endpoint);
        record.client = Some(registration.client);
        record.metadata = Some(registration.metadata);
        record.registered_pid = Some(registration.pid);
        record.registered_at = Some(Utc::now());

        Ok(promotion)
    }

    /// Drop the live connection of a component. The record stays.
    pub fn disconnect(&self, name: &str) -> Option<Arc<dyn ComponentRpc>> {
        self.components
            .write()
            .get_mut(name)
            .and_then(|record| record.client.take())
    }

    /// Placeholders older than `deadline` that never became live.
    pub fn expired_placeholders(&self, deadline: Duration) -> Vec<ComponentRecord> {
        let now = Utc::now();
        self.components
            .read()
            .values()
            .filter(|r| r.metadata.is_none())
            .filter(|r| {
                now.signed_duration_since(r.launched_at)
                    .to_std()
                    .map(|age| age >= deadline)
                    .unwrap_or(false)
            })
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.components.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::component::{CommandInfo, CommandReply, ComponentStatus, ShutdownAck};
    use crate::domain::rpc::RpcError;
    use async_trait::async_trait;

    struct NullRpc;

    #[async_trait]
    impl ComponentRpc for NullRpc {
        async fn get_metadata(&self) -> Result<ComponentMetadata, RpcError> {
            Ok(metadata("null"))
        }
        async fn execute_command(&self, _: &str, _: String) -> Result<CommandReply, RpcError> {
            Err(RpcError::Connect("unused".to_string()))
        }
        async fn get_status(&self) -> Result<ComponentStatus, RpcError> {
            Err(RpcError::Connect("unused".to_string()))
        }
        async fn shutdown(&self) -> Result<ShutdownAck, RpcError> {
            Err(RpcError::Connect("unused".to_string()))
        }
    }

    fn metadata(name: &str) -> ComponentMetadata {
        ComponentMetadata {
            name: name.to_string(),
            version: "1.0.0".to_string(),
            description: String::new(),
            author: String::new(),
            commands: vec![CommandInfo::new(format!("{}.ping", name), "ping")],
        }
    }

    fn registration(name: &str, pid: u32) -> Registration {
        Registration {
            name: name.to_string(),
            endpoint: "127.0.0.1:9001".to_string(),
            pid,
            client: Arc::new(NullRpc),
            metadata: metadata(name),
        }
    }

    #[test]
    fn test_placeholder_is_not_live() {
        let registry = ComponentRegistry::new();
        let (_, previous) = registry.insert_placeholder(ComponentConfig::new("echo", "echo-worker"));
        assert!(previous.is_none());

        let record = registry.get("echo").unwrap();
        assert!(!record.is_live());
        assert!(registry.live().is_empty());
        assert!(registry.live_client("echo").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_promote_makes_record_live() {
        let registry = ComponentRegistry::new();
        registry.insert_placeholder(ComponentConfig::new("echo", "echo-worker"));

        let launch_id = registry.check_registration("echo", 42).unwrap();
        let promotion = registry.promote(launch_id, registration("echo", 42)).unwrap();
        assert_eq!(promotion, Promotion::Registered);

        let record = registry.get("echo").unwrap();
        assert!(record.is_live());
        assert_eq!(record.endpoint.as_deref(), Some("127.0.0.1:9001"));
        assert_eq!(record.registered_pid, Some(42));
        assert!(record.registered_at.is_some());

        let again = registry.promote(launch_id, registration("echo", 42)).unwrap();
        assert_eq!(again, Promotion::Reconnected);
    }

    #[test]
    fn test_unknown_component_is_rejected() {
        let registry = ComponentRegistry::new();
        let err = registry.check_registration("ghost", 1).unwrap_err();
        assert!(matches!(err, RegistrationError::UnknownComponent(name) if name == "ghost"));
        assert!(registry.promote(1, registration("ghost", 1)).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_relaunch_invalidates_pending_handshake() {
        let registry = ComponentRegistry::new();
        registry.insert_placeholder(ComponentConfig::new("echo", "echo-worker"));
        let launch_id = registry.check_registration("echo", 7).unwrap();

        let (_, previous) = registry.insert_placeholder(ComponentConfig::new("echo", "echo-worker"));
        assert!(previous.is_some());

        let err = registry.promote(launch_id, registration("echo", 7)).unwrap_err();
        assert!(matches!(err, RegistrationError::UnknownComponent(_)));
        assert!(!registry.get("echo").unwrap().is_live());
    }

    #[test]
    fn test_remove_launch_only_removes_matching_launch() {
        let registry = ComponentRegistry::new();
        let (old_id, _) = registry.insert_placeholder(ComponentConfig::new("echo", "echo-worker"));
        let (new_id, _) = registry.insert_placeholder(ComponentConfig::new("echo", "echo-worker"));
        assert_ne!(old_id, new_id);

        assert!(registry.remove_launch("echo", old_id).is_none());
        assert!(registry.remove_launch("echo", new_id).is_some());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_unregistered_spares_live_records() {
        let registry = ComponentRegistry::new();
        let (pending_id, _) = registry.insert_placeholder(ComponentConfig::new("pending", "bin"));
        let (live_id, _) = registry.insert_placeholder(ComponentConfig::new("live", "bin"));
        registry.promote(live_id, registration("live", 3)).unwrap();

        assert!(registry.remove_unregistered("live", live_id).is_none());
        assert!(registry.remove_unregistered("pending", live_id).is_none());
        assert!(registry.remove_unregistered("pending", pending_id).is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_disconnect_drops_client_and_keeps_record() {
        let registry = ComponentRegistry::new();
        registry.insert_placeholder(ComponentConfig::new("echo", "echo-worker"));
        let launch_id = registry.check_registration("echo", 1).unwrap();
        registry.promote(launch_id, registration("echo", 1)).unwrap();

        assert!(registry.disconnect("echo").is_some());
        let record = registry.get("echo").unwrap();
        assert!(!record.is_live());
        assert!(record.metadata.is_some());
        assert!(registry.disconnect("echo").is_none());
    }

    #[test]
    fn test_list_is_sorted_snapshot() {
        let registry = ComponentRegistry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry.insert_placeholder(ComponentConfig::new(name, "bin"));
        }
        let snapshot = registry.list();
        let names: Vec<_> = snapshot.iter().map(|r| r.name().to_string()).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);

        registry.remove("mid");
        assert_eq!(snapshot.len(), 3);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_expired_placeholders() {
        let registry = ComponentRegistry::new();
        registry.insert_placeholder(ComponentConfig::new("slow", "bin"));
        registry.insert_placeholder(ComponentConfig::new("fast", "bin"));
        let launch_id = registry.check_registration("fast", 1).unwrap();
        registry.promote(launch_id, registration("fast", 1)).unwrap();

        registry.update("slow", |r| r.launched_at = Utc::now() - chrono::Duration::seconds(60));
        registry.update("fast", |r| r.launched_at = Utc::now() - chrono::Duration::seconds(60));

        let expired = registry.expired_placeholders(Duration::from_secs(30));
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].name(), "slow");
        assert!(registry.expired_placeholders(Duration::from_secs(120)).is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_attach_drops_registration_from_other_pid() {
        let registry = ComponentRegistry::new();
        let (launch_id, _) = registry.insert_placeholder(ComponentConfig::new("echo", "echo-worker"));

        // Committed before any process is attached, from a pid that is not ours
        let checked = registry.check_registration("echo", 999_999).unwrap();
        registry.promote(checked, registration("echo", 999_999)).unwrap();
        assert!(registry.get("echo").unwrap().is_live());

        let mut command = tokio::process::Command::new("sleep");
        command.arg("30");
        let process = ProcessHandle::spawn(command, "echo").unwrap();
        assert!(registry.attach_process("echo", launch_id, process.clone()));

        let record = registry.get("echo").unwrap();
        assert!(!record.is_live());
        assert!(record.endpoint.is_none());
        assert_eq!(record.registered_pid, None);
        assert_eq!(record.launched_pid(), Some(process.pid()));
        assert!(registry.live_client("echo").is_none());

        process.kill().await;
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_attach_keeps_registration_from_same_pid() {
        let registry = ComponentRegistry::new();
        let (launch_id, _) = registry.insert_placeholder(ComponentConfig::new("echo", "echo-worker"));

        let mut command = tokio::process::Command::new("sleep");
        command.arg("30");
        let process = ProcessHandle::spawn(command, "echo").unwrap();

        let checked = registry.check_registration("echo", process.pid()).unwrap();
        registry
            .promote(checked, registration("echo", process.pid()))
            .unwrap();
        assert!(registry.attach_process("echo", launch_id, process.clone()));
        assert!(registry.get("echo").unwrap().is_live());

        process.kill().await;
    }
}
