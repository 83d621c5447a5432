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

//! Network telemetry types consumed by the strategy resolver.
//!
//! A [`NetworkSnapshot`] is a read-only sample of live connection state,
//! taken at decision time and never cached indefinitely. A
//! [`NetworkCondition`] is the declared policy it is checked against.

use serde::{Deserialize, Serialize};

/// The connection's effective type tier, ordered from slowest to fastest.
///
/// Ordering matters: a declared minimum tier is satisfied by any tier that
/// compares greater or equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EffectiveType {
    /// Slower than 2G.
    #[serde(rename = "slow-2g")]
    Slow2g,
    /// 2G-class connection.
    #[serde(rename = "2g")]
    TwoG,
    /// 3G-class connection.
    #[serde(rename = "3g")]
    ThreeG,
    /// 4G-class connection or better.
    #[serde(rename = "4g")]
    FourG,
}

/// A point-in-time sample of live connection telemetry.
///
/// Mirrors the fields of the browser's Network Information API. Absence of
/// the API is represented by the probe returning no snapshot at all, never
/// by fabricated values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    /// The connection's effective type tier.
    pub effective_type: EffectiveType,
    /// Estimated downlink bandwidth in megabits per second.
    pub downlink_mbps: f64,
    /// Estimated round-trip time in milliseconds.
    pub rtt_ms: u32,
    /// Whether the user has requested reduced data usage.
    pub save_data: bool,
}

/// Declared network thresholds a component's strategy resolution honors.
///
/// All fields are optional; an empty condition resolves to the lazy default.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NetworkCondition {
    /// RTT above this many milliseconds defers the component to interaction.
    #[serde(default)]
    pub slow_threshold_ms: Option<u32>,
    /// RTT below this many milliseconds promotes the component to eager.
    #[serde(default)]
    pub fast_threshold_ms: Option<u32>,
    /// Defer to interaction whenever the connection reports save-data.
    #[serde(default)]
    pub require_save_data: bool,
    /// Minimum effective type tier; anything below defers to interaction.
    #[serde(default)]
    pub min_effective_type: Option<EffectiveType>,
}

impl NetworkCondition {
    /// A condition that only defers when the user requested save-data.
    pub fn save_data() -> Self {
        Self {
            require_save_data: true,
            ..Self::default()
        }
    }

    /// A condition with a slow-RTT threshold in milliseconds.
    pub fn slow_threshold(ms: u32) -> Self {
        Self {
            slow_threshold_ms: Some(ms),
            ..Self::default()
        }
    }

    /// A condition with a fast-RTT threshold in milliseconds.
    pub fn fast_threshold(ms: u32) -> Self {
        Self {
            fast_threshold_ms: Some(ms),
            ..Self::default()
        }
    }

    /// A condition requiring at least the given effective type tier.
    pub fn min_tier(tier: EffectiveType) -> Self {
        Self {
            min_effective_type: Some(tier),
            ..Self::default()
        }
    }
}
