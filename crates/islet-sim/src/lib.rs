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

//! In-memory implementations of the platform host traits.
//!
//! Everything a real page would provide -- a DOM to query, an intersection
//! observer factory, network telemetry, idle periods, input events -- exists
//! here as a deterministic, manually-driven simulation. Tests (and headless
//! benchmarks) script the page: add elements, fire intersections, dispatch
//! events, advance idle periods, and observe what the scheduler does.

#![warn(missing_docs)]

mod dom;
mod input;
mod network;
mod viewport;

pub use dom::SimDom;
pub use input::{SimIdle, SimInput};
pub use network::StaticNetworkProbe;
pub use viewport::SimViewport;
