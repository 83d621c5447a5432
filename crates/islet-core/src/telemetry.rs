// Copyright 2025 islet contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Process-wide loading counters maintained by the registry.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Counters describing the scheduler's loading activity.
///
/// Initialized at process start, incremented synchronously inside registry
/// operations, reset only by an explicit registry reset. All additions
/// saturate; counters never wrap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Number of distinct components constructed.
    pub components_loaded: u64,
    /// Accumulated wall-clock construction time.
    pub total_load_time: Duration,
    /// Number of `load()` calls served from the loaded-instance cache.
    pub cache_hits: u64,
    /// Network requests reported by external consumers.
    pub network_requests: u64,
    /// Bytes transferred, as reported by external consumers.
    pub bytes_transferred: u64,
}

impl PerformanceMetrics {
    /// Fresh, all-zero counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one successful construction and its elapsed time.
    pub fn record_load(&mut self, elapsed: Duration) {
        self.components_loaded = self.components_loaded.saturating_add(1);
        self.total_load_time = self.total_load_time.saturating_add(elapsed);
    }

    /// Records a `load()` call that found the component already loaded.
    pub fn record_cache_hit(&mut self) {
        self.cache_hits = self.cache_hits.saturating_add(1);
    }

    /// Records a network request observed by an external consumer.
    pub fn record_network_request(&mut self, bytes: u64) {
        self.network_requests = self.network_requests.saturating_add(1);
        self.bytes_transferred = self.bytes_transferred.saturating_add(bytes);
    }

    /// Zeroes every counter. Test isolation only.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
