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

//! Network-aware strategy resolution.
//!
//! Pure decision functions: the same inputs always produce the same
//! trigger class. The rule order is fixed and favors constrained users --
//! without telemetry the resolver never silently promotes to eager.

use islet_core::{
    ComponentDescriptor, Condition, LoadingStrategy, NetworkCondition, NetworkSnapshot,
    TriggerClass,
};

/// Events armed when resolution defers a component to interaction but the
/// declaration carries no event list of its own.
pub const DEFAULT_INTERACTION_EVENTS: [&str; 3] = ["click", "touchstart", "keydown"];

/// Resolves one network condition against a live snapshot.
///
/// Rule order:
/// 1. save-data required and reported -> interaction
/// 2. RTT above the slow threshold -> interaction
/// 3. RTT below the fast threshold -> eager
/// 4. effective tier below the declared minimum -> interaction
/// 5. otherwise -> lazy (viewport-gated default)
///
/// With no snapshot (Network Information API unavailable) the answer is
/// always lazy.
pub fn resolve_condition(
    condition: &NetworkCondition,
    snapshot: Option<&NetworkSnapshot>,
) -> TriggerClass {
    let Some(live) = snapshot else {
        return TriggerClass::Lazy;
    };

    if condition.require_save_data && live.save_data {
        return TriggerClass::Interaction;
    }
    if let Some(slow) = condition.slow_threshold_ms {
        if live.rtt_ms > slow {
            return TriggerClass::Interaction;
        }
    }
    if let Some(fast) = condition.fast_threshold_ms {
        if live.rtt_ms < fast {
            return TriggerClass::Eager;
        }
    }
    if let Some(min_tier) = condition.min_effective_type {
        if live.effective_type < min_tier {
            return TriggerClass::Interaction;
        }
    }
    TriggerClass::Lazy
}

/// Resolves a declaration's condition list against a live snapshot.
///
/// Network conditions are evaluated in declaration order; the first one
/// that resolves to something other than the lazy default decides. Feature
/// and custom conditions are applicability gates for the host and do not
/// influence the trigger class.
pub fn resolve(conditions: &[Condition], snapshot: Option<&NetworkSnapshot>) -> TriggerClass {
    for condition in conditions {
        if let Condition::Network(network) = condition {
            let class = resolve_condition(network, snapshot);
            if class != TriggerClass::Lazy {
                return class;
            }
        }
    }
    TriggerClass::Lazy
}

/// Computes the strategy a component is actually armed with.
///
/// Critical always wins and yields eager. Resolution applies only when the
/// declaration opted in (`network_aware` or a network condition); otherwise
/// the declared strategy stands. When resolution changes the trigger class,
/// the declared strategy's parameters are preserved where they still apply.
pub fn effective_strategy(
    descriptor: &ComponentDescriptor,
    snapshot: Option<&NetworkSnapshot>,
) -> LoadingStrategy {
    if descriptor.critical {
        return LoadingStrategy::Eager;
    }

    let has_network_condition = descriptor
        .conditions
        .iter()
        .any(|c| matches!(c, Condition::Network(_)));
    if !descriptor.network_aware && !has_network_condition {
        return descriptor.strategy.clone();
    }

    let class = resolve(&descriptor.conditions, snapshot);
    if class == descriptor.strategy.class() {
        return descriptor.strategy.clone();
    }

    match class {
        TriggerClass::Eager => LoadingStrategy::Eager,
        TriggerClass::Lazy => match &descriptor.strategy {
            lazy @ LoadingStrategy::Lazy { .. } => lazy.clone(),
            _ => LoadingStrategy::lazy(),
        },
        TriggerClass::Idle => match &descriptor.strategy {
            idle @ LoadingStrategy::Idle { .. } => idle.clone(),
            _ => LoadingStrategy::Idle { timeout: None },
        },
        TriggerClass::Interaction => match &descriptor.strategy {
            interaction @ LoadingStrategy::Interaction { .. } => interaction.clone(),
            _ => LoadingStrategy::Interaction {
                events: DEFAULT_INTERACTION_EVENTS
                    .iter()
                    .map(|e| e.to_string())
                    .collect(),
                timeout: None,
            },
        },
    }
}
