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

//! Deferred-trigger primitives: idle callbacks and one-shot event listeners.
//!
//! "Waiting" in the scheduler is always an externally-triggered callback,
//! never a blocking call. Each deferred strategy arms exactly one callback
//! path through one of these traits.

use std::time::Duration;

/// A one-shot completion callback armed on a deferred trigger.
pub type TriggerCallback = Box<dyn FnOnce() + Send>;

/// Host capability for scheduling work into idle periods.
pub trait IdleHost: Send + Sync {
    /// Runs `callback` when the main thread reports an idle period, or when
    /// `timeout` elapses first. The callback runs exactly once.
    fn request_idle(&self, timeout: Option<Duration>, callback: TriggerCallback);
}

/// Cancels an armed one-shot listener when dropped.
///
/// Firing wins over cancellation: once the listener has fired, dropping the
/// guard is a no-op.
pub struct ListenerGuard {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl ListenerGuard {
    /// Wraps the host-specific cancellation action.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A guard for a listener that cannot be canceled (already fired, or
    /// the host fired it synchronously).
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    /// Keeps the listener armed past the guard's lifetime.
    pub fn forget(mut self) {
        self.cancel = None;
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

/// Host capability for listening to user-input events.
pub trait InteractionHost: Send + Sync {
    /// Arms `callback` on the first occurrence of any event in `events`.
    ///
    /// The listener self-removes after firing. Dropping the returned guard
    /// cancels the listener if it has not fired yet.
    fn listen_once(&self, events: &[String], callback: TriggerCallback) -> ListenerGuard;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn guard_cancels_on_drop() {
        let canceled = Arc::new(AtomicBool::new(false));
        let flag = canceled.clone();

        let guard = ListenerGuard::new(move || flag.store(true, Ordering::SeqCst));
        drop(guard);

        assert!(canceled.load(Ordering::SeqCst));
    }

    #[test]
    fn forget_keeps_listener_armed() {
        let canceled = Arc::new(AtomicBool::new(false));
        let flag = canceled.clone();

        let guard = ListenerGuard::new(move || flag.store(true, Ordering::SeqCst));
        guard.forget();

        assert!(!canceled.load(Ordering::SeqCst));
    }

    #[test]
    fn noop_guard_is_inert() {
        drop(ListenerGuard::noop());
    }
}
