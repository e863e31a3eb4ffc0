//! # Simulation Events
//!
//! Fire-and-forget notifications from the simulation to external
//! collaborators (audio, UI). Uses bounded crossbeam channels so the
//! hot path never blocks and never allocates; when a consumer falls
//! behind, events are dropped rather than stalling the tick.

use arena_core::EntityId;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

/// Sounds the simulation can request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundKind {
    /// Step/jump sound, requested on jump start.
    Step,
}

/// Events that flow out of the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimEvent {
    /// Request to play a sound for an entity. The audio collaborator
    /// decides volume and mixing; the simulation does not wait.
    PlaySound {
        /// Entity the sound originates from.
        entity: EntityId,
        /// Which sound to play.
        sound: SoundKind,
    },
}

/// Event bus connecting the simulation to its consumers.
pub struct EventBus {
    sender: Sender<SimEvent>,
    receiver: Receiver<SimEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    ///
    /// `capacity` bounds the number of in-flight events; producers drop
    /// events beyond it.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Creates a sender handle (clone for multiple producers).
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Creates a receiver handle (clone for multiple consumers).
    #[must_use]
    pub fn receiver(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.receiver.clone(),
        }
    }
}

/// Handle for emitting events.
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<SimEvent>,
}

impl EventSender {
    /// Sends an event without blocking.
    ///
    /// Returns `false` if the event was dropped because the channel is
    /// full or the consumer side is gone.
    #[inline]
    pub fn send(&self, event: SimEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Handle for consuming events.
#[derive(Clone)]
pub struct EventReceiver {
    receiver: Receiver<SimEvent>,
}

impl EventReceiver {
    /// Receives the next pending event, if any.
    #[inline]
    #[must_use]
    pub fn try_recv(&self) -> Option<SimEvent> {
        self.receiver.try_recv().ok()
    }

    /// Drains all pending events into a vector.
    #[must_use]
    pub fn drain(&self) -> Vec<SimEvent> {
        let mut events = Vec::with_capacity(self.receiver.len());
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }
}
