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

//! # Islet Scheduler
//!
//! The decision engine of the islet loading system: the component
//! [`registry`], the pooled viewport [`observation`] manager, the
//! network-aware strategy [`resolver`], registration-time [`validation`],
//! and the page [`orchestrator`] that ties them to a template.
//!
//! One registry and one observation manager are constructed explicitly per
//! process and passed by `Arc` to whatever needs them; there is no ambient
//! global lookup.

#![warn(missing_docs)]

pub mod observation;
pub mod orchestrator;
pub mod registry;
pub mod resolver;
pub mod validation;

pub use observation::ObservationManager;
pub use orchestrator::PageOrchestrator;
pub use registry::ComponentRegistry;
