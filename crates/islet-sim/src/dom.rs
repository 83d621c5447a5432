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

//! A scriptable flat DOM.

use islet_core::platform::{DomHost, ElementHandle, Selector};
use std::sync::Mutex;

/// The reserved sentinel handle returned by
/// [`document_root`](DomHost::document_root).
pub(crate) const DOCUMENT_ROOT: ElementHandle = ElementHandle(0);

struct SimElement {
    handle: ElementHandle,
    data_component: Option<String>,
    classes: Vec<String>,
    id: Option<String>,
}

impl SimElement {
    fn matches(&self, selector: &Selector) -> bool {
        match selector {
            Selector::DataComponent(name) => self.data_component.as_deref() == Some(name),
            Selector::Class(class) => self.classes.iter().any(|c| c == class),
            Selector::Id(id) => self.id.as_deref() == Some(id),
        }
    }
}

#[derive(Default)]
struct DomState {
    next_id: u64,
    elements: Vec<SimElement>,
}

/// Flat element store implementing [`DomHost`].
///
/// Elements are added by tests with whatever attributes discovery should
/// find; queries return matches in insertion order, which stands in for
/// document order.
#[derive(Default)]
pub struct SimDom {
    state: Mutex<DomState>,
}

impl SimDom {
    /// An empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an element carrying a `data-component` attribute.
    pub fn add_component_element(&self, component: &str) -> ElementHandle {
        self.add(Some(component.to_string()), Vec::new(), None)
    }

    /// Adds an element carrying a single class.
    pub fn add_class_element(&self, class: &str) -> ElementHandle {
        self.add(None, vec![class.to_string()], None)
    }

    /// Adds an element carrying an id.
    pub fn add_id_element(&self, id: &str) -> ElementHandle {
        self.add(None, Vec::new(), Some(id.to_string()))
    }

    fn add(
        &self,
        data_component: Option<String>,
        classes: Vec<String>,
        id: Option<String>,
    ) -> ElementHandle {
        let mut state = self.state.lock().expect("sim dom lock poisoned");
        state.next_id += 1;
        // Handle 0 is the document root sentinel.
        let handle = ElementHandle(state.next_id);
        state.elements.push(SimElement {
            handle,
            data_component,
            classes,
            id,
        });
        handle
    }
}

impl DomHost for SimDom {
    fn query(&self, selector: &Selector) -> Vec<ElementHandle> {
        self.state
            .lock()
            .expect("sim dom lock poisoned")
            .elements
            .iter()
            .filter(|e| e.matches(selector))
            .map(|e| e.handle)
            .collect()
    }

    fn document_root(&self) -> ElementHandle {
        DOCUMENT_ROOT
    }
}
