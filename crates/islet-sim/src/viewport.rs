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

//! A manually-fired intersection observer factory.

use islet_core::platform::{
    ElementHandle, IntersectionCallback, IntersectionEntry, ObserverConfig, PlatformObserver,
    ViewportHost,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

struct ObserverState {
    config: ObserverConfig,
    callback: IntersectionCallback,
    watched: Mutex<HashSet<ElementHandle>>,
    disconnected: AtomicBool,
}

struct SimObserver {
    state: Arc<ObserverState>,
}

impl PlatformObserver for SimObserver {
    fn observe(&self, element: ElementHandle) {
        self.state
            .watched
            .lock()
            .expect("sim viewport lock poisoned")
            .insert(element);
    }

    fn unobserve(&self, element: ElementHandle) {
        self.state
            .watched
            .lock()
            .expect("sim viewport lock poisoned")
            .remove(&element);
    }

    fn disconnect(&self) {
        self.state.disconnected.store(true, Ordering::SeqCst);
        self.state
            .watched
            .lock()
            .expect("sim viewport lock poisoned")
            .clear();
    }
}

/// Observer factory implementing [`ViewportHost`].
///
/// Nothing intersects on its own; tests call [`fire`](SimViewport::fire) to
/// simulate an element scrolling into (or out of) view, and every live
/// observer watching that element receives the report. Construct with
/// [`unsupported`](SimViewport::unsupported) to simulate a platform without
/// the intersection primitive.
pub struct SimViewport {
    supported: bool,
    observers: Mutex<Vec<Arc<ObserverState>>>,
}

impl SimViewport {
    /// A viewport with full intersection support.
    pub fn new() -> Self {
        Self {
            supported: true,
            observers: Mutex::new(Vec::new()),
        }
    }

    /// A viewport that refuses to create observers, exercising the
    /// graceful-degradation path.
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            observers: Mutex::new(Vec::new()),
        }
    }

    /// Reports one intersection change for `element` to every live observer
    /// watching it. Callbacks run outside the internal lock.
    pub fn fire(&self, element: ElementHandle, is_intersecting: bool) {
        let callbacks: Vec<IntersectionCallback> = {
            let observers = self.observers.lock().expect("sim viewport lock poisoned");
            observers
                .iter()
                .filter(|o| {
                    !o.disconnected.load(Ordering::SeqCst)
                        && o.watched
                            .lock()
                            .expect("sim viewport lock poisoned")
                            .contains(&element)
                })
                .map(|o| o.callback.clone())
                .collect()
        };
        for callback in callbacks {
            callback(&[IntersectionEntry {
                target: element,
                is_intersecting,
            }]);
        }
    }

    /// Total observers ever created, disconnected ones included.
    pub fn created_count(&self) -> usize {
        self.observers
            .lock()
            .expect("sim viewport lock poisoned")
            .len()
    }

    /// Observers created and not yet disconnected.
    pub fn live_observer_count(&self) -> usize {
        self.observers
            .lock()
            .expect("sim viewport lock poisoned")
            .iter()
            .filter(|o| !o.disconnected.load(Ordering::SeqCst))
            .count()
    }

    /// The configurations of every live observer, in creation order.
    pub fn live_configs(&self) -> Vec<ObserverConfig> {
        self.observers
            .lock()
            .expect("sim viewport lock poisoned")
            .iter()
            .filter(|o| !o.disconnected.load(Ordering::SeqCst))
            .map(|o| o.config.clone())
            .collect()
    }
}

impl Default for SimViewport {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportHost for SimViewport {
    fn create_observer(
        &self,
        config: &ObserverConfig,
        on_intersect: IntersectionCallback,
    ) -> Option<Box<dyn PlatformObserver>> {
        if !self.supported {
            return None;
        }
        let state = Arc::new(ObserverState {
            config: config.clone(),
            callback: on_intersect,
            watched: Mutex::new(HashSet::new()),
            disconnected: AtomicBool::new(false),
        });
        self.observers
            .lock()
            .expect("sim viewport lock poisoned")
            .push(state.clone());
        Some(Box::new(SimObserver { state }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    fn config() -> ObserverConfig {
        ObserverConfig {
            root_margin: "50px".to_string(),
            threshold: 0.1,
            root: None,
        }
    }

    #[test]
    fn fire_reaches_only_watching_observers() {
        let viewport = SimViewport::new();
        let hits = Arc::new(AtomicU32::new(0));
        let counter = hits.clone();

        let observer = viewport
            .create_observer(
                &config(),
                Arc::new(move |entries| {
                    assert_eq!(entries.len(), 1);
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .expect("supported");

        viewport.fire(ElementHandle(1), true);
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        observer.observe(ElementHandle(1));
        viewport.fire(ElementHandle(1), true);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn disconnected_observer_receives_nothing() {
        let viewport = SimViewport::new();
        let hits = Arc::new(AtomicU32::new(0));
        let counter = hits.clone();

        let observer = viewport
            .create_observer(
                &config(),
                Arc::new(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .expect("supported");
        observer.observe(ElementHandle(1));
        observer.disconnect();

        viewport.fire(ElementHandle(1), true);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(viewport.live_observer_count(), 0);
        assert_eq!(viewport.created_count(), 1);
    }

    #[test]
    fn unsupported_viewport_creates_no_observer() {
        let viewport = SimViewport::unsupported();
        assert!(viewport
            .create_observer(&config(), Arc::new(|_| {}))
            .is_none());
    }
}
