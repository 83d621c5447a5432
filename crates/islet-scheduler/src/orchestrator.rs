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

//! Template-driven page initialization.
//!
//! On page-ready the host determines the current template identifier (a
//! plain string; how it is derived from markup is out of scope) and hands
//! it to the orchestrator, which drives the registry: eager and critical
//! components load immediately, lazy components are armed in the
//! observation manager, idle and interaction components get their deferred
//! hooks. Firing an armed hook is the only way a deferred component
//! transitions to loaded.

use crate::observation::ObservationManager;
use crate::registry::ComponentRegistry;
use crate::resolver;
use islet_core::platform::{DomHost, IdleHost, InteractionHost, ListenerGuard, NetworkProbe};
use islet_core::{ComponentDescriptor, LoadingStrategy};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Drives the registry for one page's lifecycle.
///
/// Owns the platform hosts and the armed interaction guards; dropping the
/// orchestrator (or calling [`teardown`](PageOrchestrator::teardown))
/// cancels everything still pending.
pub struct PageOrchestrator {
    registry: Arc<ComponentRegistry>,
    observation: Arc<ObservationManager>,
    network: Arc<dyn NetworkProbe>,
    idle: Arc<dyn IdleHost>,
    interaction: Arc<dyn InteractionHost>,
    dom: Arc<dyn DomHost>,
    /// One guard per component name. Re-arming replaces (and thereby
    /// cancels) the previous listener instead of stacking a duplicate.
    guards: Mutex<HashMap<String, ListenerGuard>>,
}

impl PageOrchestrator {
    /// Assembles an orchestrator over explicit collaborators; nothing is
    /// looked up ambiently.
    pub fn new(
        registry: Arc<ComponentRegistry>,
        observation: Arc<ObservationManager>,
        network: Arc<dyn NetworkProbe>,
        idle: Arc<dyn IdleHost>,
        interaction: Arc<dyn InteractionHost>,
        dom: Arc<dyn DomHost>,
    ) -> Self {
        Self {
            registry,
            observation,
            network,
            idle,
            interaction,
            dom,
            guards: Mutex::new(HashMap::new()),
        }
    }

    /// Initializes every component applicable to `template`.
    ///
    /// Eager and critical components load now (failures are logged, never
    /// propagated -- one broken component must not abort the page); the
    /// deferred classes are armed on their respective triggers. Components
    /// already loaded (typically critical ones, loaded at registration)
    /// are skipped.
    pub fn initialize_for_template(&self, template: &str) {
        let descriptors = self.registry.get_by_template(template);
        log::info!(
            "Initializing template '{template}': {} applicable component(s)",
            descriptors.len()
        );
        let snapshot = self.network.sample();
        for descriptor in descriptors {
            if self.registry.is_loaded(&descriptor.name) {
                continue;
            }
            let effective = resolver::effective_strategy(&descriptor, snapshot.as_ref());
            self.arm(&descriptor, effective);
        }
    }

    /// Re-runs strategy resolution for not-yet-loaded network-aware
    /// components, using a fresh telemetry sample.
    ///
    /// Re-arming an already-armed component is harmless: the registry's
    /// at-most-once guarantee collapses duplicate triggers into cache hits.
    pub fn reevaluate(&self, template: &str) {
        let snapshot = self.network.sample();
        for descriptor in self.registry.get_by_template(template) {
            if self.registry.is_loaded(&descriptor.name) || !is_network_sensitive(&descriptor) {
                continue;
            }
            let effective = resolver::effective_strategy(&descriptor, snapshot.as_ref());
            log::debug!(
                "Re-resolved component '{}' to {:?}",
                descriptor.name,
                effective.class()
            );
            self.arm(&descriptor, effective);
        }
    }

    /// Subscribes re-evaluation of `template` to the probe's change signal.
    /// Hosts without a change signal make this a no-op. The subscription
    /// holds a weak reference, so it never keeps the orchestrator alive.
    pub fn watch_network(this: &Arc<Self>, template: impl Into<String>) {
        let weak = Arc::downgrade(this);
        let template = template.into();
        this.network.on_change(Box::new(move |snapshot| {
            if let Some(orchestrator) = weak.upgrade() {
                log::debug!("Connection changed ({snapshot:?}); re-evaluating '{template}'");
                orchestrator.reevaluate(&template);
            }
        }));
    }

    /// Navigation boundary: cancels armed interaction listeners, drops all
    /// observation targets, and disconnects the pooled observers.
    pub fn teardown(&self) {
        self.guards
            .lock()
            .expect("orchestrator lock poisoned")
            .clear();
        self.observation.clear();
        log::info!("Page orchestrator torn down");
    }

    fn arm(&self, descriptor: &ComponentDescriptor, effective: LoadingStrategy) {
        let name = descriptor.name.clone();
        match effective {
            LoadingStrategy::Eager => {
                if let Err(e) = self.registry.load(&name) {
                    log::error!("Eager load of component '{name}' failed: {e}");
                }
            }
            lazy @ LoadingStrategy::Lazy { .. } => {
                let registry = self.registry.clone();
                let component = name.clone();
                self.observation.observe_component(
                    &name,
                    &lazy,
                    self.dom.as_ref(),
                    Arc::new(move || {
                        if let Err(e) = registry.load(&component) {
                            log::error!("Lazy load of component '{component}' failed: {e}");
                        }
                    }),
                );
                if let LoadingStrategy::Lazy {
                    timeout: Some(timeout),
                    ..
                } = lazy
                {
                    self.arm_timeout(&name, timeout);
                }
            }
            LoadingStrategy::Idle { timeout } => {
                let registry = self.registry.clone();
                self.idle.request_idle(
                    timeout,
                    Box::new(move || {
                        if let Err(e) = registry.load(&name) {
                            log::error!("Idle load of component '{name}' failed: {e}");
                        }
                    }),
                );
            }
            LoadingStrategy::Interaction { events, timeout } => {
                let registry = self.registry.clone();
                let component = name.clone();
                let guard = self.interaction.listen_once(
                    &events,
                    Box::new(move || {
                        if let Err(e) = registry.load(&component) {
                            log::error!("Interaction load of component '{component}' failed: {e}");
                        }
                    }),
                );
                self.guards
                    .lock()
                    .expect("orchestrator lock poisoned")
                    .insert(name.clone(), guard);
                if let Some(timeout) = timeout {
                    self.arm_timeout(&name, timeout);
                }
            }
        }
    }

    /// Arms a deferred strategy's load-anyway upper bound through the idle
    /// host: the callback runs at the next idle period or once `timeout`
    /// elapses, whichever comes first. A primary trigger that already fired
    /// makes the fallback a no-op; a trigger firing afterwards collapses
    /// into a cache hit.
    fn arm_timeout(&self, name: &str, timeout: Duration) {
        let registry = self.registry.clone();
        let component = name.to_string();
        self.idle.request_idle(
            Some(timeout),
            Box::new(move || {
                if registry.is_loaded(&component) {
                    return;
                }
                log::debug!("Load timeout elapsed for component '{component}'");
                if let Err(e) = registry.load(&component) {
                    log::error!("Timeout load of component '{component}' failed: {e}");
                }
            }),
        );
    }
}

fn is_network_sensitive(descriptor: &ComponentDescriptor) -> bool {
    descriptor.network_aware
        || descriptor
            .conditions
            .iter()
            .any(|c| matches!(c, islet_core::Condition::Network(_)))
}
