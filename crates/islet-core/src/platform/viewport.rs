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

//! The viewport intersection primitive and its pooling key.

use crate::platform::dom::ElementHandle;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The `(root_margin, threshold, root)` tuple that identifies one underlying
/// platform observer.
///
/// Two observation requests with equal canonical keys share a single
/// platform observer; this is the invariant the observation manager's pool
/// maintains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObserverConfig {
    /// Margin around the root, in CSS margin syntax.
    pub root_margin: String,
    /// Visibility fraction in `[0, 1]` required to report an intersection.
    pub threshold: f64,
    /// Observation root; `None` means the viewport itself.
    pub root: Option<ElementHandle>,
}

impl ObserverConfig {
    /// Canonicalizes the configuration to the string key the observer pool
    /// is indexed by.
    pub fn canonical_key(&self) -> String {
        match self.root {
            Some(ElementHandle(id)) => {
                format!("{}|{}|{}", self.root_margin, self.threshold, id)
            }
            None => format!("{}|{}|viewport", self.root_margin, self.threshold),
        }
    }
}

/// One entry of an intersection report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    /// The element the entry is about.
    pub target: ElementHandle,
    /// Whether the element currently intersects the root.
    pub is_intersecting: bool,
}

/// Callback invoked by a platform observer with a batch of entries, in the
/// order the platform reported them.
pub type IntersectionCallback = Arc<dyn Fn(&[IntersectionEntry]) + Send + Sync>;

/// One live platform observer, watching any number of elements.
pub trait PlatformObserver: Send + Sync {
    /// Starts watching an element.
    fn observe(&self, element: ElementHandle);

    /// Stops watching a single element; the observer keeps running for the
    /// others.
    fn unobserve(&self, element: ElementHandle);

    /// Stops watching everything and releases the observer.
    fn disconnect(&self);
}

/// Host capability for creating intersection observers.
pub trait ViewportHost: Send + Sync {
    /// Creates an observer for the given configuration.
    ///
    /// Returns `None` when the platform lacks intersection support; callers
    /// must then fire their completion path synchronously and immediately
    /// rather than silently refusing to load.
    fn create_observer(
        &self,
        config: &ObserverConfig,
        on_intersect: IntersectionCallback,
    ) -> Option<Box<dyn PlatformObserver>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_key_distinguishes_margin_threshold_and_root() {
        let base = ObserverConfig {
            root_margin: "50px".to_string(),
            threshold: 0.1,
            root: None,
        };
        assert_eq!(base.canonical_key(), "50px|0.1|viewport");

        let other_margin = ObserverConfig {
            root_margin: "100px".to_string(),
            ..base.clone()
        };
        assert_ne!(base.canonical_key(), other_margin.canonical_key());

        let rooted = ObserverConfig {
            root: Some(ElementHandle(7)),
            ..base.clone()
        };
        assert_eq!(rooted.canonical_key(), "50px|0.1|7");
    }

    #[test]
    fn equal_configs_share_a_key() {
        let a = ObserverConfig {
            root_margin: "0px".to_string(),
            threshold: 0.5,
            root: None,
        };
        let b = a.clone();
        assert_eq!(a.canonical_key(), b.canonical_key());
    }
}
