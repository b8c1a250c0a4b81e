//! Registry of mounts that currently have an authenticated session
//!
//! The registry is an owned component shared by handle: cloning a
//! [`SessionRegistry`] yields another handle onto the same set.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::mount::MountId;

/// In-memory registry of active mounts
///
/// Entries are kept as a multiset: registering the same mount twice records
/// it twice, and each `unregister` removes a single entry.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    mounts: Arc<Mutex<Vec<MountId>>>,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<MountId>> {
        self.mounts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark a mount as active
    pub fn register(&self, mount: &MountId) {
        let mut mounts = self.lock();
        mounts.push(mount.clone());
        debug!(mount = %mount, active = mounts.len(), "Mount registered");
    }

    /// Register a mount for as long as the returned lease lives
    pub fn lease(&self, mount: &MountId) -> MountLease {
        self.register(mount);
        MountLease {
            registry: self.clone(),
            mount: mount.clone(),
        }
    }

    /// Remove one entry for the mount; returns false if it was not registered
    pub fn unregister(&self, mount: &MountId) -> bool {
        let mut mounts = self.lock();
        match mounts.iter().position(|m| m == mount) {
            Some(index) => {
                mounts.remove(index);
                debug!(mount = %mount, active = mounts.len(), "Mount unregistered");
                true
            }
            None => false,
        }
    }

    /// Whether the mount has at least one registered session
    pub fn is_active(&self, mount: &MountId) -> bool {
        self.lock().contains(mount)
    }

    /// Snapshot of registered mounts, including duplicates
    pub fn active_mounts(&self) -> Vec<MountId> {
        self.lock().clone()
    }

    /// Number of registered entries
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no mount is registered
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// One registry entry, removed when the lease is dropped
#[derive(Debug)]
pub struct MountLease {
    registry: SessionRegistry,
    mount: MountId,
}

impl MountLease {
    pub fn mount(&self) -> &MountId {
        &self.mount
    }
}

impl Drop for MountLease {
    fn drop(&mut self) {
        self.registry.unregister(&self.mount);
    }
}
