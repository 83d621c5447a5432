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

//! # Islet Core
//!
//! Foundational crate containing traits, core types, and interface contracts
//! for the islet component-loading scheduler.
//!
//! Nothing in this crate touches a real browser: the platform primitives the
//! scheduler consumes (viewport intersection, network telemetry, idle
//! callbacks, input events, DOM queries) are expressed as traits in
//! [`platform`], and concrete hosts implement them.

#![warn(missing_docs)]

pub mod component;
pub mod error;
pub mod event;
pub mod metadata;
pub mod network;
pub mod platform;
pub mod telemetry;

pub use component::{Component, ComponentFactory, ComponentHandle, ComponentMetadata};
pub use error::{SchedulerError, SchedulerResult};
pub use event::ComponentEvent;
pub use metadata::{ComponentDescriptor, Condition, LoadingStrategy, TemplateScope, TriggerClass};
pub use network::{EffectiveType, NetworkCondition, NetworkSnapshot};
pub use telemetry::PerformanceMetrics;
