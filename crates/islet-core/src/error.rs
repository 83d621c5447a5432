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

//! Error types for the loading scheduler.
//!
//! Only two anomalies ever cross the registry boundary: asking for a
//! component that was never registered, and a component factory (or its
//! `init`) failing. Everything else the scheduler encounters -- conflicting
//! policies, out-of-range thresholds, missing platform APIs -- is normalized
//! to a warning plus a safe default, because availability is prioritized
//! over strict policy enforcement.

use std::fmt::Display;

/// A specialized `Result` type for scheduler operations.
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// An error that can occur within the loading scheduler.
#[derive(Debug)]
pub enum SchedulerError {
    /// `load()` was called for a name that was never registered.
    /// Fatal to that call only.
    NotFound(String),
    /// The component's factory or its `init` hook failed.
    ///
    /// Propagated to the caller of `load()`; for critical/eager auto-loads
    /// triggered inside `register()` the call site catches and logs it so a
    /// broken component cannot abort page initialization.
    Construction {
        /// Name of the component whose construction failed.
        name: String,
        /// The underlying factory or `init` error.
        source: anyhow::Error,
    },
}

impl Display for SchedulerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulerError::NotFound(name) => write!(f, "Component not registered: {name}"),
            SchedulerError::Construction { name, source } => {
                write!(f, "Construction of component '{name}' failed: {source}")
            }
        }
    }
}

impl std::error::Error for SchedulerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SchedulerError::NotFound(_) => None,
            SchedulerError::Construction { source, .. } => Some(source.as_ref()),
        }
    }
}
