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

//! Pooled viewport observation.
//!
//! Many lazy components tend to share the same viewport options, and one
//! platform observer per component would proliferate quickly. The manager
//! pools observers by the canonical `(root_margin, threshold, root)` key:
//! at most one platform observer exists per distinct key, and per-element
//! callbacks are demultiplexed here. Lazy loading is one-shot, so a target
//! is removed and its element unobserved the moment it intersects, while
//! the pooled observer keeps running for the remaining targets.

use islet_core::metadata::{DEFAULT_LAZY_THRESHOLD, DEFAULT_ROOT_MARGIN};
use islet_core::platform::{
    DomHost, ElementHandle, IntersectionEntry, ObserverConfig, PlatformObserver, Selector,
    ViewportHost,
};
use islet_core::LoadingStrategy;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// One-shot completion callback for an observed element.
pub type ObservationCallback = Box<dyn FnOnce() + Send>;

/// Binds one element to a component, its pooling key, and its callback.
struct ObservationTarget {
    component: String,
    config_key: String,
    callback: ObservationCallback,
}

#[derive(Default)]
struct PoolState {
    /// At most one platform observer per canonical config key.
    observers: HashMap<String, Box<dyn PlatformObserver>>,
    /// Every target armed on an element. Several components may share one
    /// element (the document-root fallback makes this common), so an
    /// intersection fires all of them.
    targets: HashMap<ElementHandle, Vec<ObservationTarget>>,
}

/// Pooling layer over the platform's intersection primitive.
///
/// Constructed once per process around whatever [`ViewportHost`] the
/// environment provides and shared by `Arc`.
pub struct ObservationManager {
    host: Arc<dyn ViewportHost>,
    state: Arc<Mutex<PoolState>>,
}

impl ObservationManager {
    /// Creates a manager over the given viewport host.
    pub fn new(host: Arc<dyn ViewportHost>) -> Self {
        Self {
            host,
            state: Arc::new(Mutex::new(PoolState::default())),
        }
    }

    /// Derives the pooling configuration from a strategy's viewport options.
    /// Non-lazy strategies fall back to the defaults.
    pub fn viewport_config(strategy: &LoadingStrategy) -> ObserverConfig {
        match strategy {
            LoadingStrategy::Lazy {
                root_margin,
                threshold,
                ..
            } => ObserverConfig {
                root_margin: root_margin.clone(),
                threshold: *threshold,
                root: None,
            },
            _ => ObserverConfig {
                root_margin: DEFAULT_ROOT_MARGIN.to_string(),
                threshold: DEFAULT_LAZY_THRESHOLD,
                root: None,
            },
        }
    }

    /// Arms `callback` to fire once when `element` first intersects.
    ///
    /// Observers are pooled by the canonical key of `config`; equal
    /// configurations share one platform observer. When the platform lacks
    /// intersection support the callback fires synchronously and
    /// immediately -- the manager never silently refuses to load.
    pub fn observe(
        &self,
        element: ElementHandle,
        component: &str,
        config: &ObserverConfig,
        callback: ObservationCallback,
    ) {
        let key = config.canonical_key();
        {
            let mut state = self.state.lock().expect("observation lock poisoned");
            if !state.observers.contains_key(&key) {
                let dispatch_state = Arc::downgrade(&self.state);
                let dispatch_key = key.clone();
                let created = self.host.create_observer(
                    config,
                    Arc::new(move |entries| {
                        if let Some(state) = dispatch_state.upgrade() {
                            dispatch(&state, &dispatch_key, entries);
                        }
                    }),
                );
                match created {
                    Some(observer) => {
                        log::trace!("Created pooled observer for key '{key}'");
                        state.observers.insert(key.clone(), observer);
                    }
                    None => {
                        // Graceful degradation: no intersection support on
                        // this platform, load right away.
                        drop(state);
                        log::warn!(
                            "Viewport observation unsupported; loading component \
                             '{component}' immediately"
                        );
                        callback();
                        return;
                    }
                }
            }

            state.targets.entry(element).or_default().push(ObservationTarget {
                component: component.to_string(),
                config_key: key.clone(),
                callback,
            });
            if let Some(observer) = state.observers.get(&key) {
                observer.observe(element);
            }
        }
    }

    /// Arms a named component without an explicit element reference.
    ///
    /// Element discovery probes a small set of conventional selectors
    /// (`data-component`, class, id, then lower-cased variants). Component
    /// authors are not required to annotate markup precisely, so when
    /// nothing matches the manager falls back to observing the document
    /// root sentinel rather than never firing.
    pub fn observe_component(
        &self,
        component: &str,
        strategy: &LoadingStrategy,
        dom: &dyn DomHost,
        callback: Arc<dyn Fn() + Send + Sync>,
    ) {
        let config = Self::viewport_config(strategy);
        let mut elements = discover_elements(component, dom);
        if elements.is_empty() {
            log::debug!(
                "No candidate elements for component '{component}'; observing document root"
            );
            elements.push(dom.document_root());
        }
        for element in elements {
            let cb = callback.clone();
            self.observe(element, component, &config, Box::new(move || cb()));
        }
    }

    /// Cancels every target armed on `element`. The pooled observers
    /// survive; only the element stops being watched.
    pub fn unobserve(&self, element: ElementHandle) {
        let mut state = self.state.lock().expect("observation lock poisoned");
        if let Some(targets) = state.targets.remove(&element) {
            let keys: HashSet<&str> = targets.iter().map(|t| t.config_key.as_str()).collect();
            for key in keys {
                if let Some(observer) = state.observers.get(key) {
                    observer.unobserve(element);
                }
            }
            for target in &targets {
                log::trace!(
                    "Unobserved element {element:?} for component '{}'",
                    target.component
                );
            }
        }
    }

    /// Disconnects and evicts every pooled observer whose key has zero live
    /// targets. Called on navigation boundaries; defensive against hosts
    /// that drop components without unobserving, not a substitute for
    /// proper `unobserve`.
    pub fn cleanup(&self) {
        let mut state = self.state.lock().expect("observation lock poisoned");
        let live: HashSet<&str> = state
            .targets
            .values()
            .flatten()
            .map(|t| t.config_key.as_str())
            .collect();
        // Two passes over a temporary key list: retain() would borrow the
        // targets map mutably while we inspect it.
        let stale: Vec<String> = state
            .observers
            .keys()
            .filter(|key| !live.contains(key.as_str()))
            .cloned()
            .collect();
        for key in stale {
            if let Some(observer) = state.observers.remove(&key) {
                observer.disconnect();
                log::trace!("Evicted idle observer for key '{key}'");
            }
        }
    }

    /// Drops every target and disconnects every pooled observer.
    pub fn clear(&self) {
        let mut state = self.state.lock().expect("observation lock poisoned");
        state.targets.clear();
        for (_, observer) in state.observers.drain() {
            observer.disconnect();
        }
    }

    /// Number of live pooled observers.
    pub fn observer_count(&self) -> usize {
        self.state
            .lock()
            .expect("observation lock poisoned")
            .observers
            .len()
    }

    /// Number of armed observation targets, counting every component armed
    /// on a shared element.
    pub fn target_count(&self) -> usize {
        self.state
            .lock()
            .expect("observation lock poisoned")
            .targets
            .values()
            .map(Vec::len)
            .sum()
    }
}

/// Demultiplexes one intersection report from the pooled observer `key`.
///
/// Every target armed on an intersecting element under this key fires;
/// targets armed under other keys stay in place for their own observers.
/// Fired targets are removed and the element unobserved on this key before
/// any callback runs, so a second report for the same element cannot
/// double-fire. Callbacks run outside the lock; they are allowed to
/// re-enter the manager.
fn dispatch(state: &Arc<Mutex<PoolState>>, key: &str, entries: &[IntersectionEntry]) {
    let mut fired: Vec<(String, ObservationCallback)> = Vec::new();
    {
        let mut state = state.lock().expect("observation lock poisoned");
        for entry in entries {
            if !entry.is_intersecting {
                continue;
            }
            let Some(targets) = state.targets.remove(&entry.target) else {
                log::trace!(
                    "Intersection for untracked element {:?} on key '{key}'",
                    entry.target
                );
                continue;
            };
            let mut kept = Vec::new();
            let mut fired_here = 0usize;
            for target in targets {
                if target.config_key == key {
                    fired_here += 1;
                    fired.push((target.component, target.callback));
                } else {
                    kept.push(target);
                }
            }
            if fired_here > 0 {
                if let Some(observer) = state.observers.get(key) {
                    observer.unobserve(entry.target);
                }
            }
            if !kept.is_empty() {
                state.targets.insert(entry.target, kept);
            }
        }
    }
    for (component, callback) in fired {
        log::debug!("Lazy trigger fired for component '{component}'");
        callback();
    }
}

/// Probes the conventional selectors for a component's candidate elements:
/// `data-component`, class, and id, each in declared and lower-cased form.
/// Document order within each selector, first match wins on duplicates.
fn discover_elements(component: &str, dom: &dyn DomHost) -> Vec<ElementHandle> {
    let mut selectors = vec![
        Selector::DataComponent(component.to_string()),
        Selector::Class(component.to_string()),
        Selector::Id(component.to_string()),
    ];
    let lower = component.to_lowercase();
    if lower != component {
        selectors.push(Selector::DataComponent(lower.clone()));
        selectors.push(Selector::Class(lower.clone()));
        selectors.push(Selector::Id(lower));
    }

    let mut seen = HashSet::new();
    let mut found = Vec::new();
    for selector in &selectors {
        for element in dom.query(selector) {
            if seen.insert(element) {
                found.push(element);
            }
        }
    }
    found
}
