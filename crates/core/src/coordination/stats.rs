// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Aggregate registry statistics

use super::registry::Registry;
use serde::{Deserialize, Serialize};

/// Totals across every client currently in the registry
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryStats {
    pub total_clients: usize,
    pub total_locks: u64,
    pub total_unlocks: u64,
    /// Clients with no activity since the last purge scan
    pub total_idle_clients: usize,
}

impl RegistryStats {
    pub fn collect(registry: &Registry) -> Self {
        let mut stats = RegistryStats::default();

        registry.for_each(|_, table| {
            let activity = table.activity();
            stats.total_clients += 1;
            stats.total_locks += activity.locks;
            stats.total_unlocks += activity.unlocks;
            if table.is_idle() {
                stats.total_idle_clients += 1;
            }
        });

        stats
    }
}
