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

//! Minimal DOM query surface used for element discovery.

use serde::{Deserialize, Serialize};

/// An opaque, host-assigned handle to one DOM element.
///
/// The scheduler never inspects elements; it only needs a stable identity to
/// key observation targets by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle(pub u64);

/// The small set of conventional selectors the discovery heuristic probes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `[data-component="Name"]`.
    DataComponent(String),
    /// `.Name`.
    Class(String),
    /// `#Name`.
    Id(String),
}

/// Bounded, synchronous DOM lookups provided by the host page.
pub trait DomHost: Send + Sync {
    /// Returns every element matching the selector, in document order.
    fn query(&self, selector: &Selector) -> Vec<ElementHandle>;

    /// The sentinel root element, used as an observation fallback when no
    /// candidate element is found for a component.
    fn document_root(&self) -> ElementHandle;
}
