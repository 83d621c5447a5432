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

//! The component declaration model: loading strategies, template scoping,
//! applicability conditions, and the descriptor builder.
//!
//! Declarations are plain data. A component author builds a
//! [`ComponentDescriptor`] at definition time and registers it together with
//! a factory; no instantiation happens at declaration time except for
//! strategies the registry resolves to eager.

use crate::network::NetworkCondition;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default intersection threshold applied when a declared lazy threshold
/// falls outside `[0, 1]`.
pub const DEFAULT_LAZY_THRESHOLD: f64 = 0.1;

/// Default root margin for lazy strategies, pre-loading slightly before the
/// element scrolls into view.
pub const DEFAULT_ROOT_MARGIN: &str = "50px";

/// Which page templates a component applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateScope {
    /// No scope declared: the component applies everywhere.
    Global,
    /// Explicit wildcard: the component applies to every template.
    All,
    /// The component applies only to the named templates, in declaration
    /// order.
    Named(Vec<String>),
}

impl TemplateScope {
    /// Returns `true` if a component with this scope applies to `template`.
    pub fn applies_to(&self, template: &str) -> bool {
        match self {
            TemplateScope::Global | TemplateScope::All => true,
            TemplateScope::Named(templates) => templates.iter().any(|t| t == template),
        }
    }
}

impl Default for TemplateScope {
    fn default() -> Self {
        TemplateScope::Global
    }
}

/// The broad trigger class of a strategy, independent of its parameters.
///
/// This is what the network-aware resolver produces and what the
/// `component:loaded` event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerClass {
    /// Load immediately upon registration/template match.
    Eager,
    /// Load upon first viewport intersection of an associated element.
    Lazy,
    /// Load when the main thread reports an idle period (or a timeout
    /// elapses first).
    Idle,
    /// Load upon first occurrence of any configured user-input event.
    Interaction,
}

/// A declared loading strategy with its trigger-specific parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LoadingStrategy {
    /// Load immediately, no condition gating.
    Eager,
    /// Load on first viewport intersection.
    Lazy {
        /// Margin around the viewport root, in CSS margin syntax.
        root_margin: String,
        /// Fraction of the element that must be visible, in `[0, 1]`.
        threshold: f64,
        /// Optional upper bound before loading anyway.
        timeout: Option<Duration>,
    },
    /// Load during an idle period.
    Idle {
        /// Optional upper bound before loading anyway.
        timeout: Option<Duration>,
    },
    /// Load on the first of the configured user-input events.
    Interaction {
        /// Event names that trigger the load (e.g. `click`, `focus`).
        events: Vec<String>,
        /// Optional upper bound before loading anyway.
        timeout: Option<Duration>,
    },
}

impl LoadingStrategy {
    /// A lazy strategy with the default viewport options.
    pub fn lazy() -> Self {
        LoadingStrategy::Lazy {
            root_margin: DEFAULT_ROOT_MARGIN.to_string(),
            threshold: DEFAULT_LAZY_THRESHOLD,
            timeout: None,
        }
    }

    /// The trigger class this strategy belongs to.
    pub fn class(&self) -> TriggerClass {
        match self {
            LoadingStrategy::Eager => TriggerClass::Eager,
            LoadingStrategy::Lazy { .. } => TriggerClass::Lazy,
            LoadingStrategy::Idle { .. } => TriggerClass::Idle,
            LoadingStrategy::Interaction { .. } => TriggerClass::Interaction,
        }
    }
}

impl Default for LoadingStrategy {
    fn default() -> Self {
        LoadingStrategy::lazy()
    }
}

/// A named applicability condition attached to a declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Resolve the effective strategy from live network telemetry.
    Network(NetworkCondition),
    /// Require a named platform feature to be present.
    Feature(String),
    /// An opaque, host-interpreted condition.
    Custom(String),
}

/// The cloneable policy record for one component type.
///
/// Identity plus everything the scheduler needs to decide *when* the
/// component loads. The factory lives separately in
/// [`ComponentMetadata`](crate::ComponentMetadata) so descriptors stay
/// cheap to clone and serialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    /// Unique component type name.
    pub name: String,
    /// Template applicability.
    #[serde(default)]
    pub templates: TemplateScope,
    /// Forces eager loading regardless of the declared strategy.
    #[serde(default)]
    pub critical: bool,
    /// The effective strategy must be recomputed from live network
    /// conditions.
    #[serde(default)]
    pub network_aware: bool,
    /// Applicability conditions, checked at resolution time.
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// The declared loading strategy.
    pub strategy: LoadingStrategy,
}

impl ComponentDescriptor {
    /// A descriptor with default policy: global scope, non-critical, lazy.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            templates: TemplateScope::Global,
            critical: false,
            network_aware: false,
            conditions: Vec::new(),
            strategy: LoadingStrategy::lazy(),
        }
    }

    /// Starts building a descriptor for the named component type.
    pub fn builder(name: impl Into<String>) -> DescriptorBuilder {
        DescriptorBuilder {
            descriptor: Self::new(name),
        }
    }
}

/// Fluent builder for [`ComponentDescriptor`].
///
/// This is the declaration-time API component authors call where the source
/// system used class decorators. Timing parameters are taken as unsigned
/// milliseconds, so negative delays are unrepresentable at this boundary.
#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
    descriptor: ComponentDescriptor,
}

impl DescriptorBuilder {
    /// Scopes the component to the given templates.
    pub fn templates<I, S>(mut self, templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.descriptor.templates =
            TemplateScope::Named(templates.into_iter().map(Into::into).collect());
        self
    }

    /// Explicitly scopes the component to every template (wildcard).
    pub fn all_templates(mut self) -> Self {
        self.descriptor.templates = TemplateScope::All;
        self
    }

    /// Marks the component critical: always eager, overriding the strategy.
    pub fn critical(mut self) -> Self {
        self.descriptor.critical = true;
        self
    }

    /// Requests strategy resolution from live network telemetry.
    pub fn network_aware(mut self) -> Self {
        self.descriptor.network_aware = true;
        self
    }

    /// Attaches an applicability condition.
    pub fn condition(mut self, condition: Condition) -> Self {
        self.descriptor.conditions.push(condition);
        self
    }

    /// Sets the full strategy variant directly.
    pub fn strategy(mut self, strategy: LoadingStrategy) -> Self {
        self.descriptor.strategy = strategy;
        self
    }

    /// Declares an eager strategy.
    pub fn eager(self) -> Self {
        self.strategy(LoadingStrategy::Eager)
    }

    /// Declares a lazy strategy with explicit viewport options.
    pub fn lazy(self, root_margin: impl Into<String>, threshold: f64) -> Self {
        self.strategy(LoadingStrategy::Lazy {
            root_margin: root_margin.into(),
            threshold,
            timeout: None,
        })
    }

    /// Declares an idle strategy with an optional timeout in milliseconds.
    pub fn idle(self, timeout_ms: Option<u64>) -> Self {
        self.strategy(LoadingStrategy::Idle {
            timeout: timeout_ms.map(Duration::from_millis),
        })
    }

    /// Declares an interaction strategy triggered by any of `events`.
    pub fn on_interaction<I, S>(self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.strategy(LoadingStrategy::Interaction {
            events: events.into_iter().map(Into::into).collect(),
            timeout: None,
        })
    }

    /// Finishes the declaration.
    ///
    /// No validation happens here; the registry normalizes policy conflicts
    /// at registration time so that every declaration path (builder or
    /// hand-written descriptor) goes through the same rules.
    pub fn build(self) -> ComponentDescriptor {
        self.descriptor
    }
}
