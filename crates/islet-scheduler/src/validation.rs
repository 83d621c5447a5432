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

//! Registration-time policy normalization.
//!
//! Every rule here is recoverable: conflicts and out-of-range values are
//! rewritten to safe defaults and reported as warnings, never as errors.
//! The registry applies [`normalize`] to every declaration before storing
//! it, so builder-made and hand-written descriptors go through the same
//! rules. Negative delays are unrepresentable at this layer (timeouts are
//! unsigned `Duration`s, clamped at the builder boundary).

use islet_core::metadata::DEFAULT_LAZY_THRESHOLD;
use islet_core::{ComponentDescriptor, LoadingStrategy};
use std::fmt::Display;

/// A recoverable policy violation detected during normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum PolicyWarning {
    /// The component declared both `critical` and a lazy strategy.
    /// Critical wins; the component loads eagerly and is never armed into
    /// the observation manager.
    CriticalLazyConflict {
        /// The offending component.
        name: String,
    },
    /// A lazy threshold fell outside `[0, 1]` and was clamped to the
    /// documented default.
    ThresholdOutOfRange {
        /// The offending component.
        name: String,
        /// The threshold as declared.
        declared: f64,
    },
}

impl Display for PolicyWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyWarning::CriticalLazyConflict { name } => write!(
                f,
                "Component '{name}' is declared both critical and lazy; critical wins"
            ),
            PolicyWarning::ThresholdOutOfRange { name, declared } => write!(
                f,
                "Component '{name}' declares lazy threshold {declared} outside [0, 1]; \
                 clamped to {DEFAULT_LAZY_THRESHOLD}"
            ),
        }
    }
}

/// Normalizes a declaration, returning the adjusted descriptor and every
/// violation found.
///
/// The caller decides how to surface the warnings; the registry logs each
/// one with `log::warn!`.
pub fn normalize(mut descriptor: ComponentDescriptor) -> (ComponentDescriptor, Vec<PolicyWarning>) {
    let mut warnings = Vec::new();

    if descriptor.critical && matches!(descriptor.strategy, LoadingStrategy::Lazy { .. }) {
        warnings.push(PolicyWarning::CriticalLazyConflict {
            name: descriptor.name.clone(),
        });
    }

    if let LoadingStrategy::Lazy { threshold, .. } = &mut descriptor.strategy {
        if !(0.0..=1.0).contains(threshold) || threshold.is_nan() {
            warnings.push(PolicyWarning::ThresholdOutOfRange {
                name: descriptor.name.clone(),
                declared: *threshold,
            });
            *threshold = DEFAULT_LAZY_THRESHOLD;
        }
    }

    (descriptor, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use islet_core::TriggerClass;

    #[test]
    fn clean_declaration_passes_untouched() {
        let descriptor = ComponentDescriptor::builder("gallery")
            .lazy("50px", 0.5)
            .build();

        let (normalized, warnings) = normalize(descriptor.clone());
        assert_eq!(normalized, descriptor);
        assert!(warnings.is_empty());
    }

    #[test]
    fn critical_lazy_conflict_warns_once_naming_the_component() {
        let descriptor = ComponentDescriptor::builder("hero")
            .critical()
            .lazy("50px", 0.5)
            .build();

        let (normalized, warnings) = normalize(descriptor);
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0],
            PolicyWarning::CriticalLazyConflict {
                name: "hero".to_string()
            }
        );
        // The declaration itself is preserved; precedence is applied at
        // resolution time, where critical always yields eager.
        assert!(normalized.critical);
    }

    #[test]
    fn out_of_range_threshold_clamps_to_default() {
        let descriptor = ComponentDescriptor::builder("gallery")
            .lazy("50px", 1.5)
            .build();

        let (normalized, warnings) = normalize(descriptor);
        assert_eq!(warnings.len(), 1);
        match &normalized.strategy {
            LoadingStrategy::Lazy { threshold, .. } => {
                assert_eq!(*threshold, DEFAULT_LAZY_THRESHOLD)
            }
            other => panic!("expected lazy strategy, got {other:?}"),
        }
    }

    #[test]
    fn negative_threshold_also_clamps() {
        let descriptor = ComponentDescriptor::builder("gallery")
            .lazy("50px", -0.3)
            .build();

        let (normalized, warnings) = normalize(descriptor);
        assert_eq!(warnings.len(), 1);
        match &normalized.strategy {
            LoadingStrategy::Lazy { threshold, .. } => {
                assert_eq!(*threshold, DEFAULT_LAZY_THRESHOLD)
            }
            other => panic!("expected lazy strategy, got {other:?}"),
        }
    }

    #[test]
    fn in_range_boundaries_are_accepted() {
        for threshold in [0.0, 1.0] {
            let descriptor = ComponentDescriptor::builder("gallery")
                .lazy("50px", threshold)
                .build();
            let (_, warnings) = normalize(descriptor);
            assert!(warnings.is_empty(), "threshold {threshold} should be valid");
        }
    }

    #[test]
    fn critical_eager_is_not_a_conflict() {
        let descriptor = ComponentDescriptor::builder("header_nav")
            .critical()
            .eager()
            .build();

        let (normalized, warnings) = normalize(descriptor);
        assert!(warnings.is_empty());
        assert_eq!(normalized.strategy.class(), TriggerClass::Eager);
    }
}
