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

//! The component registry: single source of truth mapping component name to
//! metadata and instantiation state.
//!
//! The registry owns the "load" operation: construct once, track as loaded,
//! emit a load event, record metrics. At-most-once instantiation per name is
//! enforced by checking the entry's `loaded` flag under the registry lock
//! before constructing; the lock is held across construction, so factories
//! must not call back into the registry.

use crate::validation;
use islet_core::event::EventBus;
use islet_core::{
    ComponentDescriptor, ComponentEvent, ComponentFactory, ComponentHandle, ComponentMetadata,
    PerformanceMetrics, SchedulerError, SchedulerResult, TriggerClass,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Registry-internal runtime state layered on a declaration.
struct RegistryEntry {
    descriptor: ComponentDescriptor,
    factory: ComponentFactory,
    loaded: bool,
    instance: Option<ComponentHandle>,
}

impl RegistryEntry {
    fn reported_class(&self) -> TriggerClass {
        if self.descriptor.critical {
            TriggerClass::Eager
        } else {
            self.descriptor.strategy.class()
        }
    }
}

#[derive(Default)]
struct RegistryState {
    entries: HashMap<String, RegistryEntry>,
    /// Insertion order of first registration; re-registering keeps the
    /// original position.
    order: Vec<String>,
    metrics: PerformanceMetrics,
}

/// Central registry for schedulable components.
///
/// One instance per process, constructed explicitly and shared by `Arc`.
/// All mutation happens behind a single lock, so the browser model's
/// check-then-act sequences stay safe even when a host drives the registry
/// from several threads.
pub struct ComponentRegistry {
    state: Mutex<RegistryState>,
    events: EventBus<ComponentEvent>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RegistryState::default()),
            events: EventBus::new(),
        }
    }

    /// Registers a component declaration. Idempotent by name: a repeat
    /// registration replaces the metadata (last write wins) but preserves
    /// any already-loaded instance.
    ///
    /// The declaration is normalized first; every policy violation becomes
    /// a warning, never an error. A `critical` component is loaded
    /// immediately, and a failure there is logged rather than propagated so
    /// a broken critical component cannot abort page initialization.
    pub fn register(&self, metadata: ComponentMetadata) {
        let ComponentMetadata { descriptor, factory } = metadata;
        let (descriptor, warnings) = validation::normalize(descriptor);
        for warning in &warnings {
            log::warn!("{warning}");
        }

        let name = descriptor.name.clone();
        let critical = descriptor.critical;
        {
            let mut state = self.state.lock().expect("registry lock poisoned");
            match state.entries.get_mut(&name) {
                Some(entry) => {
                    entry.descriptor = descriptor;
                    entry.factory = factory;
                }
                None => {
                    state.order.push(name.clone());
                    state.entries.insert(
                        name.clone(),
                        RegistryEntry {
                            descriptor,
                            factory,
                            loaded: false,
                            instance: None,
                        },
                    );
                }
            }
        }
        log::trace!("Registered component '{name}'");

        if critical {
            if let Err(e) = self.load(&name) {
                log::error!("Critical component '{name}' failed to load: {e}");
            }
        }
    }

    /// Loads a component by name, constructing it at most once.
    ///
    /// A repeat call returns the cached handle, counts a cache hit, and
    /// emits the load event with `from_cache: true`. Construction and
    /// `init` failures propagate to the caller; internal auto-load call
    /// sites catch and log them.
    pub fn load(&self, name: &str) -> SchedulerResult<ComponentHandle> {
        let (handle, event) = {
            let mut state = self.state.lock().expect("registry lock poisoned");
            let entry = state
                .entries
                .get(name)
                .ok_or_else(|| SchedulerError::NotFound(name.to_string()))?;

            if entry.loaded {
                let handle = entry
                    .instance
                    .as_ref()
                    .cloned()
                    .ok_or_else(|| SchedulerError::NotFound(name.to_string()))?;
                let event = ComponentEvent::Loaded {
                    name: name.to_string(),
                    load_time: Duration::ZERO,
                    strategy: entry.reported_class(),
                    from_cache: true,
                };
                state.metrics.record_cache_hit();
                (handle, event)
            } else {
                let start = Instant::now();
                let mut instance =
                    (entry.factory)().map_err(|source| SchedulerError::Construction {
                        name: name.to_string(),
                        source,
                    })?;
                instance
                    .init()
                    .map_err(|source| SchedulerError::Construction {
                        name: name.to_string(),
                        source,
                    })?;
                let elapsed = start.elapsed();

                let handle: ComponentHandle = Arc::new(Mutex::new(instance));
                let class = entry.reported_class();
                let entry = state
                    .entries
                    .get_mut(name)
                    .expect("entry vanished during load");
                entry.loaded = true;
                entry.instance = Some(handle.clone());
                state.metrics.record_load(elapsed);

                log::debug!("Loaded component '{name}' in {elapsed:?}");
                let event = ComponentEvent::Loaded {
                    name: name.to_string(),
                    load_time: elapsed,
                    strategy: class,
                    from_cache: false,
                };
                (handle, event)
            }
        };

        self.events.publish(event);
        Ok(handle)
    }

    /// Returns the descriptors of every component applicable to `template`:
    /// globally scoped, wildcard scoped, or named for it. Insertion order.
    pub fn get_by_template(&self, template: &str) -> Vec<ComponentDescriptor> {
        let state = self.state.lock().expect("registry lock poisoned");
        state
            .order
            .iter()
            .filter_map(|name| state.entries.get(name))
            .filter(|entry| entry.descriptor.templates.applies_to(template))
            .map(|entry| entry.descriptor.clone())
            .collect()
    }

    /// Returns a component's normalized descriptor, if registered.
    pub fn descriptor(&self, name: &str) -> Option<ComponentDescriptor> {
        let state = self.state.lock().expect("registry lock poisoned");
        state.entries.get(name).map(|e| e.descriptor.clone())
    }

    /// Returns `true` if the named component has been constructed.
    pub fn is_loaded(&self, name: &str) -> bool {
        let state = self.state.lock().expect("registry lock poisoned");
        state.entries.get(name).is_some_and(|e| e.loaded)
    }

    /// Number of registered components.
    pub fn len(&self) -> usize {
        self.state.lock().expect("registry lock poisoned").entries.len()
    }

    /// Returns `true` if no components are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A snapshot of the loading counters.
    pub fn metrics(&self) -> PerformanceMetrics {
        self.state
            .lock()
            .expect("registry lock poisoned")
            .metrics
            .clone()
    }

    /// Feeds the network counters; called by external consumers that own
    /// actual fetches (the registry itself never performs network requests).
    pub fn record_network_request(&self, bytes: u64) {
        self.state
            .lock()
            .expect("registry lock poisoned")
            .metrics
            .record_network_request(bytes);
    }

    /// The bus carrying `ComponentEvent`s, one per successful `load()`.
    pub fn events(&self) -> &EventBus<ComponentEvent> {
        &self.events
    }

    /// Destroys every loaded instance and clears all registry and metric
    /// state. Test isolation only; never part of the production flow.
    pub fn reset(&self) {
        let mut state = self.state.lock().expect("registry lock poisoned");
        for entry in state.entries.values_mut() {
            if let Some(handle) = entry.instance.take() {
                if let Ok(mut component) = handle.lock() {
                    component.destroy();
                }
            }
        }
        state.entries.clear();
        state.order.clear();
        state.metrics.reset();
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
