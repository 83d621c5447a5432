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

//! Manually-driven idle periods and input events.

use islet_core::platform::{IdleHost, InteractionHost, ListenerGuard, TriggerCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Idle scheduler implementing [`IdleHost`].
///
/// Requests queue until a test grants an idle period with
/// [`run_idle_period`](SimIdle::run_idle_period); nothing runs on a real
/// clock, so timeouts are recorded but never elapse on their own.
#[derive(Default)]
pub struct SimIdle {
    queue: Mutex<Vec<(Option<Duration>, TriggerCallback)>>,
}

impl SimIdle {
    /// An idle scheduler with an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants one idle period: drains the queue and runs every pending
    /// callback, outside the internal lock.
    pub fn run_idle_period(&self) {
        let pending: Vec<(Option<Duration>, TriggerCallback)> = self
            .queue
            .lock()
            .expect("sim idle lock poisoned")
            .drain(..)
            .collect();
        for (_, callback) in pending {
            callback();
        }
    }

    /// Callbacks still waiting for an idle period.
    pub fn pending_count(&self) -> usize {
        self.queue.lock().expect("sim idle lock poisoned").len()
    }
}

impl IdleHost for SimIdle {
    fn request_idle(&self, timeout: Option<Duration>, callback: TriggerCallback) {
        self.queue
            .lock()
            .expect("sim idle lock poisoned")
            .push((timeout, callback));
    }
}

struct SimListener {
    id: u64,
    events: Vec<String>,
    callback: TriggerCallback,
}

#[derive(Default)]
struct InputState {
    next_id: u64,
    listeners: Vec<SimListener>,
}

/// Event source implementing [`InteractionHost`].
///
/// Tests dispatch named events; every armed listener matching the event
/// fires once and self-removes. Dropping a returned guard cancels its
/// listener if it has not fired.
#[derive(Default)]
pub struct SimInput {
    state: Arc<Mutex<InputState>>,
}

impl SimInput {
    /// An event source with no armed listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatches one event. Matching listeners are removed under the lock
    /// and their callbacks run after it is released.
    pub fn dispatch(&self, event: &str) {
        let fired: Vec<TriggerCallback> = {
            let mut state = self.state.lock().expect("sim input lock poisoned");
            let mut fired = Vec::new();
            let mut remaining = Vec::new();
            for listener in state.listeners.drain(..) {
                if listener.events.iter().any(|e| e == event) {
                    fired.push(listener.callback);
                } else {
                    remaining.push(listener);
                }
            }
            state.listeners = remaining;
            fired
        };
        for callback in fired {
            callback();
        }
    }

    /// Listeners currently armed.
    pub fn listener_count(&self) -> usize {
        self.state
            .lock()
            .expect("sim input lock poisoned")
            .listeners
            .len()
    }
}

impl InteractionHost for SimInput {
    fn listen_once(&self, events: &[String], callback: TriggerCallback) -> ListenerGuard {
        let id = {
            let mut state = self.state.lock().expect("sim input lock poisoned");
            state.next_id += 1;
            let id = state.next_id;
            state.listeners.push(SimListener {
                id,
                events: events.to_vec(),
                callback,
            });
            id
        };
        let state = self.state.clone();
        ListenerGuard::new(move || {
            state
                .lock()
                .expect("sim input lock poisoned")
                .listeners
                .retain(|l| l.id != id);
        })
    }
}
