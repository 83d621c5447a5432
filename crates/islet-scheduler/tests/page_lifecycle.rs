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

//! End-to-end scheduling scenarios driven through the simulated platform:
//! a whole page of components registered, initialized for a template, and
//! triggered by scripted viewport, input, idle, and network activity.

use islet_core::{
    Component, ComponentDescriptor, ComponentEvent, ComponentMetadata, Condition, EffectiveType,
    NetworkCondition, NetworkSnapshot, TriggerClass,
};
use islet_scheduler::{ComponentRegistry, ObservationManager, PageOrchestrator};
use islet_sim::{SimDom, SimIdle, SimInput, SimViewport, StaticNetworkProbe};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

struct Leaf;

impl Component for Leaf {
    fn init(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn destroy(&mut self) {}
}

fn counting(descriptor: ComponentDescriptor, constructed: &Arc<AtomicU32>) -> ComponentMetadata {
    let constructed = constructed.clone();
    ComponentMetadata::new(descriptor, move || {
        constructed.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(Leaf) as Box<dyn Component>)
    })
}

fn snapshot(rtt_ms: u32) -> NetworkSnapshot {
    NetworkSnapshot {
        effective_type: EffectiveType::FourG,
        downlink_mbps: 10.0,
        rtt_ms,
        save_data: false,
    }
}

struct Page {
    registry: Arc<ComponentRegistry>,
    orchestrator: Arc<PageOrchestrator>,
    viewport: Arc<SimViewport>,
    probe: Arc<StaticNetworkProbe>,
    idle: Arc<SimIdle>,
    input: Arc<SimInput>,
    dom: Arc<SimDom>,
}

fn page_with(viewport: SimViewport, probe: StaticNetworkProbe) -> Page {
    let _ = env_logger::builder().is_test(true).try_init();
    let registry = Arc::new(ComponentRegistry::new());
    let viewport = Arc::new(viewport);
    let observation = Arc::new(ObservationManager::new(viewport.clone()));
    let probe = Arc::new(probe);
    let idle = Arc::new(SimIdle::new());
    let input = Arc::new(SimInput::new());
    let dom = Arc::new(SimDom::new());
    let orchestrator = Arc::new(PageOrchestrator::new(
        registry.clone(),
        observation,
        probe.clone(),
        idle.clone(),
        input.clone(),
        dom.clone(),
    ));
    Page {
        registry,
        orchestrator,
        viewport,
        probe,
        idle,
        input,
        dom,
    }
}

fn page(probe: StaticNetworkProbe) -> Page {
    page_with(SimViewport::new(), probe)
}

#[test]
fn full_page_loads_each_component_on_its_own_trigger() {
    let page = page(StaticNetworkProbe::unavailable());
    let constructed = Arc::new(AtomicU32::new(0));

    page.registry.register(counting(
        ComponentDescriptor::builder("header_nav")
            .all_templates()
            .critical()
            .eager()
            .build(),
        &constructed,
    ));
    let gallery_element = page.dom.add_component_element("gallery");
    page.registry.register(counting(
        ComponentDescriptor::builder("gallery")
            .templates(["product"])
            .lazy("50px", 0.1)
            .build(),
        &constructed,
    ));
    page.registry.register(counting(
        ComponentDescriptor::builder("search")
            .on_interaction(["focus", "click"])
            .build(),
        &constructed,
    ));
    page.registry.register(counting(
        ComponentDescriptor::builder("prefetch").idle(Some(2000)).build(),
        &constructed,
    ));

    // Critical loads at registration, everything else waits.
    assert_eq!(constructed.load(Ordering::SeqCst), 1);

    page.orchestrator.initialize_for_template("product");
    assert_eq!(constructed.load(Ordering::SeqCst), 1);

    page.viewport.fire(gallery_element, true);
    assert!(page.registry.is_loaded("gallery"));

    page.input.dispatch("focus");
    assert!(page.registry.is_loaded("search"));

    page.idle.run_idle_period();
    assert!(page.registry.is_loaded("prefetch"));

    assert_eq!(constructed.load(Ordering::SeqCst), 4);
    assert_eq!(page.registry.metrics().components_loaded, 4);
}

#[test]
fn lazy_components_with_equal_options_share_one_observer() {
    let page = page(StaticNetworkProbe::unavailable());
    let constructed = Arc::new(AtomicU32::new(0));

    for name in ["gallery", "reviews", "related"] {
        page.dom.add_component_element(name);
        page.registry.register(counting(
            ComponentDescriptor::builder(name).lazy("50px", 0.1).build(),
            &constructed,
        ));
    }
    page.dom.add_component_element("hero_video");
    page.registry.register(counting(
        ComponentDescriptor::builder("hero_video")
            .lazy("200px", 0.5)
            .build(),
        &constructed,
    ));

    page.orchestrator.initialize_for_template("product");

    // Three equal configurations pool into one platform observer; the
    // distinct configuration gets its own.
    assert_eq!(page.viewport.created_count(), 2);
}

#[test]
fn duplicate_intersections_collapse_to_cache_hits() {
    let page = page(StaticNetworkProbe::unavailable());
    let constructed = Arc::new(AtomicU32::new(0));

    let first = page.dom.add_component_element("card");
    let second = page.dom.add_component_element("card");
    page.registry.register(counting(
        ComponentDescriptor::builder("card").lazy("50px", 0.1).build(),
        &constructed,
    ));

    page.orchestrator.initialize_for_template("product");
    page.viewport.fire(first, true);
    page.viewport.fire(second, true);

    assert_eq!(constructed.load(Ordering::SeqCst), 1);
    let metrics = page.registry.metrics();
    assert_eq!(metrics.components_loaded, 1);
    assert_eq!(metrics.cache_hits, 1);
}

#[test]
fn components_sharing_the_root_sentinel_each_load() {
    use islet_core::platform::DomHost;

    let page = page(StaticNetworkProbe::unavailable());
    let constructed = Arc::new(AtomicU32::new(0));

    // Neither component has matching markup, so both fall back to
    // observing the document root. One intersection must load them both.
    for name in ["newsletter", "cookie_banner"] {
        page.registry.register(counting(
            ComponentDescriptor::builder(name).lazy("50px", 0.1).build(),
            &constructed,
        ));
    }

    page.orchestrator.initialize_for_template("product");
    assert_eq!(constructed.load(Ordering::SeqCst), 0);

    page.viewport.fire(page.dom.document_root(), true);

    assert!(page.registry.is_loaded("newsletter"));
    assert!(page.registry.is_loaded("cookie_banner"));
    assert_eq!(constructed.load(Ordering::SeqCst), 2);
}

#[test]
fn slow_network_defers_lazy_component_to_interaction() {
    let page = page(StaticNetworkProbe::with(snapshot(400)));
    let constructed = Arc::new(AtomicU32::new(0));

    page.dom.add_component_element("recommendations");
    page.registry.register(counting(
        ComponentDescriptor::builder("recommendations")
            .network_aware()
            .condition(Condition::Network(NetworkCondition::slow_threshold(150)))
            .lazy("50px", 0.1)
            .build(),
        &constructed,
    ));

    page.orchestrator.initialize_for_template("product");

    // Deferred: no observer armed, an input listener instead.
    assert_eq!(page.viewport.created_count(), 0);
    assert_eq!(page.input.listener_count(), 1);
    assert_eq!(constructed.load(Ordering::SeqCst), 0);

    page.input.dispatch("click");
    assert!(page.registry.is_loaded("recommendations"));
}

#[test]
fn fast_network_promotes_lazy_component_to_eager() {
    let page = page(StaticNetworkProbe::with(snapshot(30)));
    let constructed = Arc::new(AtomicU32::new(0));

    page.dom.add_component_element("recommendations");
    page.registry.register(counting(
        ComponentDescriptor::builder("recommendations")
            .network_aware()
            .condition(Condition::Network(NetworkCondition::fast_threshold(100)))
            .lazy("50px", 0.1)
            .build(),
        &constructed,
    ));

    page.orchestrator.initialize_for_template("product");

    assert_eq!(constructed.load(Ordering::SeqCst), 1);
    assert_eq!(page.viewport.created_count(), 0);
}

#[test]
fn save_data_defers_to_interaction() {
    let live = NetworkSnapshot {
        save_data: true,
        ..snapshot(50)
    };
    let page = page(StaticNetworkProbe::with(live));
    let constructed = Arc::new(AtomicU32::new(0));

    page.registry.register(counting(
        ComponentDescriptor::builder("comments")
            .network_aware()
            .condition(Condition::Network(NetworkCondition::save_data()))
            .lazy("50px", 0.1)
            .build(),
        &constructed,
    ));

    page.orchestrator.initialize_for_template("article");
    assert_eq!(page.input.listener_count(), 1);
    assert_eq!(constructed.load(Ordering::SeqCst), 0);
}

#[test]
fn missing_telemetry_keeps_the_declared_lazy_strategy() {
    let page = page(StaticNetworkProbe::unavailable());
    let constructed = Arc::new(AtomicU32::new(0));

    let element = page.dom.add_component_element("recommendations");
    page.registry.register(counting(
        ComponentDescriptor::builder("recommendations")
            .network_aware()
            .condition(Condition::Network(NetworkCondition::fast_threshold(100)))
            .lazy("50px", 0.1)
            .build(),
        &constructed,
    ));

    page.orchestrator.initialize_for_template("product");

    // No probe data: neither promoted nor deferred, armed on the viewport.
    assert_eq!(page.viewport.created_count(), 1);
    assert_eq!(constructed.load(Ordering::SeqCst), 0);

    page.viewport.fire(element, true);
    assert_eq!(constructed.load(Ordering::SeqCst), 1);
}

#[test]
fn connection_change_reevaluates_pending_components() {
    let page = page(StaticNetworkProbe::with(snapshot(400)));
    let constructed = Arc::new(AtomicU32::new(0));

    page.registry.register(counting(
        ComponentDescriptor::builder("recommendations")
            .network_aware()
            .condition(Condition::Network(NetworkCondition::fast_threshold(100)))
            .condition(Condition::Network(NetworkCondition::slow_threshold(150)))
            .lazy("50px", 0.1)
            .build(),
        &constructed,
    ));

    PageOrchestrator::watch_network(&page.orchestrator, "product");
    page.orchestrator.initialize_for_template("product");
    assert_eq!(constructed.load(Ordering::SeqCst), 0);

    // Connection recovers; re-resolution promotes the pending component.
    page.probe.set_snapshot(snapshot(30));
    assert_eq!(constructed.load(Ordering::SeqCst), 1);
    assert!(page.registry.is_loaded("recommendations"));
}

#[test]
fn viewport_without_intersection_support_loads_immediately() {
    let page = page_with(SimViewport::unsupported(), StaticNetworkProbe::unavailable());
    let constructed = Arc::new(AtomicU32::new(0));

    page.dom.add_component_element("gallery");
    page.registry.register(counting(
        ComponentDescriptor::builder("gallery").lazy("50px", 0.1).build(),
        &constructed,
    ));

    page.orchestrator.initialize_for_template("product");
    assert_eq!(constructed.load(Ordering::SeqCst), 1);
}

#[test]
fn load_events_carry_trigger_class_and_cache_flag() {
    let page = page(StaticNetworkProbe::unavailable());
    let constructed = Arc::new(AtomicU32::new(0));
    let receiver = page.registry.events().receiver();

    let element = page.dom.add_component_element("gallery");
    page.registry.register(counting(
        ComponentDescriptor::builder("gallery").lazy("50px", 0.1).build(),
        &constructed,
    ));

    page.orchestrator.initialize_for_template("product");
    page.viewport.fire(element, true);
    page.registry.load("gallery").expect("cached load");

    let ComponentEvent::Loaded {
        name,
        strategy,
        from_cache,
        ..
    } = receiver.try_recv().expect("first load event");
    assert_eq!(name, "gallery");
    assert_eq!(strategy, TriggerClass::Lazy);
    assert!(!from_cache);

    let ComponentEvent::Loaded { from_cache, .. } =
        receiver.try_recv().expect("cache-hit event");
    assert!(from_cache);
}

#[test]
fn teardown_leaves_no_live_triggers() {
    let page = page(StaticNetworkProbe::unavailable());
    let constructed = Arc::new(AtomicU32::new(0));

    let element = page.dom.add_component_element("gallery");
    page.registry.register(counting(
        ComponentDescriptor::builder("gallery").lazy("50px", 0.1).build(),
        &constructed,
    ));
    page.registry.register(counting(
        ComponentDescriptor::builder("search")
            .on_interaction(["click"])
            .build(),
        &constructed,
    ));

    page.orchestrator.initialize_for_template("product");
    page.orchestrator.teardown();

    assert_eq!(page.viewport.live_observer_count(), 0);
    assert_eq!(page.input.listener_count(), 0);

    page.viewport.fire(element, true);
    page.input.dispatch("click");
    assert_eq!(constructed.load(Ordering::SeqCst), 0);
}
