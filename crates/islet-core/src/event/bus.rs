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

/// A generic, thread-safe MPSC event channel.
///
/// The bus is generic over the event type `T` so this crate stays decoupled
/// from the concrete events higher layers define. The registry owns one bus
/// for [`ComponentEvent`](super::ComponentEvent)s; hosts subscribe through
/// the receiver.
#[derive(Debug)]
pub struct EventBus<T: Clone + Send + Sync + 'static> {
    sender: flume::Sender<T>,
    receiver: flume::Receiver<T>,
}

impl<T: Clone + Send + Sync + 'static> EventBus<T> {
    /// Creates a new bus backed by an unbounded channel.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self { sender, receiver }
    }

    /// Attempts to send an event, logging an error if the receiver is
    /// disconnected. Observability must never make a load fail, so the
    /// error is not propagated.
    pub fn publish(&self, event: T) {
        if let Err(e) = self.sender.send(event) {
            log::error!("Failed to publish event: {e}. Receiver likely disconnected.");
        }
    }

    /// Returns a clone of the sender end of the channel, for parts of the
    /// system that publish without owning the bus.
    pub fn sender(&self) -> flume::Sender<T> {
        self.sender.clone()
    }

    /// Returns a reference to the receiver end of the channel. Intended for
    /// the subscriber processing events.
    pub fn receiver(&self) -> &flume::Receiver<T> {
        &self.receiver
    }
}

impl<T: Clone + Send + Sync + 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flume::TryRecvError;

    #[derive(Debug, Clone, PartialEq)]
    enum TestEvent {
        Armed { component: String },
        Fired,
    }

    #[test]
    fn bus_starts_empty() {
        let bus = EventBus::<TestEvent>::new();
        assert!(bus.receiver().is_empty());
    }

    #[test]
    fn publish_then_receive_in_order() {
        let bus = EventBus::<TestEvent>::new();

        bus.publish(TestEvent::Armed {
            component: "gallery".to_string(),
        });
        bus.publish(TestEvent::Fired);

        assert_eq!(
            bus.receiver().try_recv(),
            Ok(TestEvent::Armed {
                component: "gallery".to_string()
            })
        );
        assert_eq!(bus.receiver().try_recv(), Ok(TestEvent::Fired));
        assert_eq!(bus.receiver().try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn detached_sender_still_delivers() {
        let bus = EventBus::<TestEvent>::new();
        let sender = bus.sender();

        sender.send(TestEvent::Fired).expect("send should succeed");
        assert_eq!(bus.receiver().try_recv(), Ok(TestEvent::Fired));
    }

    #[test]
    fn publish_after_receiver_drop_does_not_panic() {
        let bus = EventBus::<TestEvent>::new();
        let sender = bus.sender();
        drop(bus);

        // publish() is unreachable without the bus, but the raw sender
        // surfaces the disconnect as an Err the bus would have logged.
        assert!(sender.send(TestEvent::Fired).is_err());
    }
}
