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

//! Read-only access to live network telemetry.

use crate::network::NetworkSnapshot;

/// Host capability for sampling connection state.
///
/// Mirrors the browser's Network Information API, which is optional on many
/// platforms: absence must not error, so [`sample`](NetworkProbe::sample)
/// returns `None` when no telemetry exists and the resolver falls back to
/// its neutral default.
pub trait NetworkProbe: Send + Sync {
    /// Takes a point-in-time sample of connection state, or `None` when the
    /// platform exposes no network telemetry.
    fn sample(&self) -> Option<NetworkSnapshot>;

    /// Subscribes to connection-change notifications.
    ///
    /// Hosts without a change signal keep the default no-op; the scheduler
    /// then simply never re-evaluates network-aware strategies.
    fn on_change(&self, _callback: Box<dyn Fn(NetworkSnapshot) + Send + Sync>) {}
}
