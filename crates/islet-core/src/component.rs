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

//! The leaf-consumer contract and the declaration-time metadata record.
//!
//! The scheduler never knows *what* a component does, only *when* its
//! constructor runs. Leaf components (gallery, dropdown, header nav, ...)
//! implement [`Component`] and are produced by a [`ComponentFactory`] stored
//! alongside the component's policy [`descriptor`](crate::ComponentDescriptor).

use crate::metadata::ComponentDescriptor;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

/// The lifecycle contract every schedulable UI component implements.
///
/// Instantiation happens through the factory; the registry then calls
/// [`init`](Component::init) exactly once. [`destroy`](Component::destroy)
/// runs when the scheduling system tears the instance down (currently only
/// on a registry-wide reset).
pub trait Component: Send {
    /// One-time setup after construction. A failure here counts as a
    /// construction failure for scheduling purposes.
    fn init(&mut self) -> anyhow::Result<()>;

    /// Tears the component down from the scheduler's point of view.
    fn destroy(&mut self);
}

impl Debug for dyn Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Component")
    }
}

/// A shared, thread-safe handle to a loaded component instance.
///
/// Ownership of the instance passes to the registry once created; callers
/// of `load()` receive clones of this handle.
pub type ComponentHandle = Arc<Mutex<Box<dyn Component>>>;

/// A zero-argument factory producing a component instance.
///
/// Arbitrary user errors surface through `anyhow`; the registry wraps them
/// in [`SchedulerError::Construction`](crate::SchedulerError::Construction).
pub type ComponentFactory = Box<dyn Fn() -> anyhow::Result<Box<dyn Component>> + Send + Sync>;

/// Identity and policy for one component type, bound to its factory.
///
/// Produced at component-definition time and handed to the registry; this is
/// the explicit, reflection-free stand-in for class-level annotations.
pub struct ComponentMetadata {
    /// The cloneable policy record (name, templates, strategy, conditions).
    pub descriptor: ComponentDescriptor,
    /// Factory invoked on first `load()`.
    pub factory: ComponentFactory,
}

impl ComponentMetadata {
    /// Binds a descriptor to the factory that will construct the component.
    pub fn new<F>(descriptor: ComponentDescriptor, factory: F) -> Self
    where
        F: Fn() -> anyhow::Result<Box<dyn Component>> + Send + Sync + 'static,
    {
        Self {
            descriptor,
            factory: Box::new(factory),
        }
    }
}

impl Debug for ComponentMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentMetadata")
            .field("descriptor", &self.descriptor)
            .field("factory", &"<factory>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    impl Component for Noop {
        fn init(&mut self) -> anyhow::Result<()> {
            Ok(())
        }

        fn destroy(&mut self) {}
    }

    #[test]
    fn metadata_invokes_factory() {
        let metadata = ComponentMetadata::new(ComponentDescriptor::new("noop"), || {
            Ok(Box::new(Noop) as Box<dyn Component>)
        });

        let mut instance = (metadata.factory)().expect("factory should succeed");
        assert!(instance.init().is_ok());
        assert_eq!(metadata.descriptor.name, "noop");
    }

    #[test]
    fn debug_does_not_expose_factory() {
        let metadata = ComponentMetadata::new(ComponentDescriptor::new("noop"), || {
            Ok(Box::new(Noop) as Box<dyn Component>)
        });
        assert!(format!("{metadata:?}").contains("<factory>"));
    }
}
