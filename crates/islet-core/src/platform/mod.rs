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

//! Abstractions over the browser primitives the scheduler consumes.
//!
//! Any host (a real browser binding, a server-side renderer, or the
//! `islet-sim` crate) implements these traits to plug its environment into
//! the scheduler. Every trait is designed to degrade gracefully: a missing
//! capability is expressed in the type (`Option`, empty results), never as
//! an error the scheduler has to handle.

pub mod dom;
pub mod probe;
pub mod scheduling;
pub mod viewport;

pub use self::dom::{DomHost, ElementHandle, Selector};
pub use self::probe::NetworkProbe;
pub use self::scheduling::{IdleHost, InteractionHost, ListenerGuard, TriggerCallback};
pub use self::viewport::{
    IntersectionCallback, IntersectionEntry, ObserverConfig, PlatformObserver, ViewportHost,
};
