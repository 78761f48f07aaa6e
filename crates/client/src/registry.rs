//! Device registry: named sessions in insertion order.
//!
//! The registry owns every [`DeviceSession`]. Lookups hand out `Arc`
//! clones so in-flight calls survive a concurrent `remove`; the write lock
//! is only held for structural changes, never across network I/O.

use crate::error::{EngineError, Result};
use crate::session::DeviceSession;
use fortigate_config::{DeviceConfig, DevicesConfig};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;

type Entries = Vec<(String, Arc<DeviceSession>)>;

/// Insertion-ordered collection of registered devices.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    entries: RwLock<Entries>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a loaded configuration, preserving the
    /// file's device order.
    pub fn from_config(config: &DevicesConfig) -> Result<Self> {
        let registry = Self::new();
        for (name, device) in config.iter() {
            registry.add(name, device)?;
        }
        Ok(registry)
    }

    /// Register a device. Fails if the identifier is already taken.
    pub fn add(&self, name: &str, config: &DeviceConfig) -> Result<Arc<DeviceSession>> {
        let session = Arc::new(DeviceSession::new(name, config)?);
        let mut entries = self.write_entries();
        if entries.iter().any(|(existing, _)| existing == name) {
            return Err(EngineError::DuplicateDevice(name.to_string()));
        }
        entries.push((name.to_string(), Arc::clone(&session)));
        info!(device = name, host = %config.host, "device registered");
        Ok(session)
    }

    /// Remove a device, returning its session for teardown.
    pub fn remove(&self, name: &str) -> Result<Arc<DeviceSession>> {
        let mut entries = self.write_entries();
        let position = entries
            .iter()
            .position(|(existing, _)| existing == name)
            .ok_or_else(|| EngineError::DeviceNotFound(name.to_string()))?;
        let (_, session) = entries.remove(position);
        info!(device = name, "device removed");
        Ok(session)
    }

    /// Look up a device by identifier.
    pub fn get(&self, name: &str) -> Result<Arc<DeviceSession>> {
        self.read_entries()
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, session)| Arc::clone(session))
            .ok_or_else(|| EngineError::DeviceNotFound(name.to_string()))
    }

    /// All sessions in registration order.
    pub fn list(&self) -> Vec<Arc<DeviceSession>> {
        self.read_entries()
            .iter()
            .map(|(_, session)| Arc::clone(session))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_entries().is_empty()
    }

    fn read_entries(&self) -> RwLockReadGuard<'_, Entries> {
        match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, Entries> {
        match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
