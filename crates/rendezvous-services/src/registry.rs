//! Community registry — tracks announced onion communities and when each was
//! last heard from.
//!
//! The registry is a map from onion address to [`Community`] behind a single
//! `RwLock`. Every operation takes the lock once for its whole duration, so a
//! reader never sees a half-applied update and two registrations for the same
//! address resolve last-writer-wins. Entries older than the liveness timeout
//! are removed by [`Registry::sweep`], which the reaper calls periodically.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use rendezvous_core::{validate_onion_address, Clock, RegistryError, SystemClock};

/// A community as announced by its host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Community {
    /// Onion address. Primary key.
    pub address: String,
    /// Display name. Never empty.
    pub name: String,
    /// Free-form description, empty when not given.
    pub description: String,
    /// Last register or heartbeat, in milliseconds since the UNIX epoch.
    pub last_seen: u64,
}

/// The community registry — shared between the API handlers and the reaper.
pub struct Registry {
    communities: RwLock<HashMap<String, Community>>,
    clock: Arc<dyn Clock>,
    liveness_timeout: Duration,
}

pub type SharedRegistry = Arc<Registry>;

/// Create a new empty registry on the system clock.
pub fn new_registry(liveness_timeout: Duration) -> SharedRegistry {
    Arc::new(Registry::new(liveness_timeout))
}

impl Registry {
    pub fn new(liveness_timeout: Duration) -> Self {
        Self::with_clock(liveness_timeout, Arc::new(SystemClock))
    }

    /// Create a registry that reads time from `clock`.
    pub fn with_clock(liveness_timeout: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            communities: RwLock::new(HashMap::new()),
            clock,
            liveness_timeout,
        }
    }

    pub fn liveness_timeout(&self) -> Duration {
        self.liveness_timeout
    }

    /// Register a community, or replace the metadata of an existing one.
    ///
    /// Returns the number of communities after the insert. Nothing is
    /// changed when validation fails.
    pub async fn register(
        &self,
        address: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<usize, RegistryError> {
        validate_onion_address(address)?;
        if name.is_empty() {
            return Err(RegistryError::NameRequired);
        }

        let mut communities = self.communities.write().await;
        let now = self.clock.now_millis();
        // lastSeen never moves backwards, even if the wall clock does.
        let last_seen = communities
            .get(address)
            .map_or(now, |existing| existing.last_seen.max(now));

        communities.insert(
            address.to_string(),
            Community {
                address: address.to_string(),
                name: name.to_string(),
                description: description.unwrap_or_default().to_string(),
                last_seen,
            },
        );
        let count = communities.len();
        drop(communities);

        tracing::info!(address, name, count, "registered community");
        Ok(count)
    }

    /// Refresh `last_seen` for a known community. Never creates an entry.
    pub async fn heartbeat(&self, address: &str) -> Result<(), RegistryError> {
        let mut communities = self.communities.write().await;
        let now = self.clock.now_millis();
        match communities.get_mut(address) {
            Some(community) => {
                community.last_seen = community.last_seen.max(now);
                tracing::trace!(address, "heartbeat");
                Ok(())
            }
            None => {
                tracing::debug!(address, "heartbeat for unknown community");
                Err(RegistryError::NotFound)
            }
        }
    }

    /// Snapshot of every stored community, sorted by address.
    ///
    /// Stale entries not yet swept are included.
    pub async fn list(&self) -> Vec<Community> {
        let mut snapshot: Vec<Community> =
            self.communities.read().await.values().cloned().collect();
        snapshot.sort_by(|a, b| a.address.cmp(&b.address));
        snapshot
    }

    pub async fn get(&self, address: &str) -> Option<Community> {
        self.communities.read().await.get(address).cloned()
    }

    pub async fn count(&self) -> usize {
        self.communities.read().await.len()
    }

    /// Remove every community silent for longer than the liveness timeout.
    ///
    /// A community exactly at the timeout survives. Returns how many were
    /// removed.
    pub async fn sweep(&self) -> usize {
        let timeout = self.liveness_timeout.as_millis() as u64;

        let mut communities = self.communities.write().await;
        let now = self.clock.now_millis();
        let before = communities.len();
        communities.retain(|address, community| {
            let stale = now.saturating_sub(community.last_seen) > timeout;
            if stale {
                tracing::info!(address = %address, "removed stale community");
            }
            !stale
        });
        let remaining = communities.len();
        let removed = before - remaining;

        if removed > 0 {
            tracing::debug!(removed, remaining, "swept stale communities");
        }
        removed
    }
}
