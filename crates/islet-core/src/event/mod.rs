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

//! Event-driven observability primitives.
//!
//! The [`EventBus`] is a generic MPSC channel; the registry publishes a
//! [`ComponentEvent`] on it for every successful load. This is the only
//! externally observable signal of the scheduler's internal state changes.

mod bus;

pub use self::bus::EventBus;

use crate::metadata::TriggerClass;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// An observability event emitted by the component registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ComponentEvent {
    /// A `load()` call succeeded.
    ///
    /// Fired exactly once per successful call: constructions carry
    /// `from_cache: false`, repeat requests for an already-loaded component
    /// carry `from_cache: true` with a zero load time.
    Loaded {
        /// The component's unique name.
        name: String,
        /// Wall-clock time spent constructing and initializing.
        load_time: Duration,
        /// The trigger class the component was loaded under.
        strategy: TriggerClass,
        /// Whether this call was served from the loaded-instance cache.
        from_cache: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loaded_event_serializes_with_tag() {
        let event = ComponentEvent::Loaded {
            name: "gallery".to_string(),
            load_time: Duration::from_millis(12),
            strategy: TriggerClass::Lazy,
            from_cache: false,
        };

        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["event"], "loaded");
        assert_eq!(json["name"], "gallery");
        assert_eq!(json["strategy"], "lazy");
        assert_eq!(json["from_cache"], false);
    }
}
