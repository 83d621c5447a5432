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

//! Scriptable network telemetry.

use islet_core::platform::NetworkProbe;
use islet_core::NetworkSnapshot;
use std::sync::{Arc, Mutex};

type ChangeListener = Arc<dyn Fn(NetworkSnapshot) + Send + Sync>;

/// Probe implementing [`NetworkProbe`] over a test-controlled snapshot.
///
/// Starts either with a fixed snapshot or with no telemetry at all
/// (mirroring platforms without the Network Information API). Tests change
/// conditions mid-run with [`set_snapshot`](StaticNetworkProbe::set_snapshot),
/// which also notifies every change subscriber.
pub struct StaticNetworkProbe {
    snapshot: Mutex<Option<NetworkSnapshot>>,
    listeners: Mutex<Vec<ChangeListener>>,
}

impl StaticNetworkProbe {
    /// A probe reporting the given conditions.
    pub fn with(snapshot: NetworkSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot)),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// A probe on a platform without network telemetry.
    pub fn unavailable() -> Self {
        Self {
            snapshot: Mutex::new(None),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Replaces the reported conditions and notifies change subscribers.
    /// Listeners run outside the internal locks and may sample the probe.
    pub fn set_snapshot(&self, snapshot: NetworkSnapshot) {
        *self
            .snapshot
            .lock()
            .expect("sim network lock poisoned") = Some(snapshot.clone());
        let listeners: Vec<ChangeListener> = self
            .listeners
            .lock()
            .expect("sim network lock poisoned")
            .clone();
        for listener in listeners {
            listener(snapshot.clone());
        }
    }
}

impl NetworkProbe for StaticNetworkProbe {
    fn sample(&self) -> Option<NetworkSnapshot> {
        self.snapshot
            .lock()
            .expect("sim network lock poisoned")
            .clone()
    }

    fn on_change(&self, callback: Box<dyn Fn(NetworkSnapshot) + Send + Sync>) {
        self.listeners
            .lock()
            .expect("sim network lock poisoned")
            .push(Arc::from(callback));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use islet_core::EffectiveType;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn snapshot(rtt_ms: u32) -> NetworkSnapshot {
        NetworkSnapshot {
            effective_type: EffectiveType::FourG,
            downlink_mbps: 10.0,
            rtt_ms,
            save_data: false,
        }
    }

    #[test]
    fn unavailable_probe_samples_none() {
        assert!(StaticNetworkProbe::unavailable().sample().is_none());
    }

    #[test]
    fn set_snapshot_notifies_subscribers_with_new_conditions() {
        let probe = StaticNetworkProbe::with(snapshot(50));
        let notified = Arc::new(AtomicU32::new(0));
        let counter = notified.clone();
        probe.on_change(Box::new(move |live| {
            assert_eq!(live.rtt_ms, 400);
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        probe.set_snapshot(snapshot(400));
        assert_eq!(notified.load(Ordering::SeqCst), 1);
        assert_eq!(probe.sample().map(|s| s.rtt_ms), Some(400));
    }
}
