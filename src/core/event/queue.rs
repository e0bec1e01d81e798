//=========================================================================
// Deferred Event Queue
//=========================================================================
//
// Cross-thread posting for a single-threaded dispatcher.
//
// Architecture:
//   any thread: EventSender::send(e) ──crossbeam──> EventQueue
//                                                      ↓ pump() (owner thread)
//                                               EventManager::dispatch(&e)
//
// Events are dispatched in send order. Each pump is bounded so a flood of
// posted events cannot starve the owner's frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TryRecvError, TrySendError};
use log::{trace, warn};

//=== Internal Dependencies ===============================================

use super::{Event, EventManager};

/// A posted event, already bound to its concrete dispatch type.
type Deferred = Box<dyn FnOnce(&EventManager) + Send>;

//=== EventQueueError =====================================================

/// Reasons a posted event was not queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventQueueError {
    /// The queue is bounded and currently full.
    Full { event: &'static str },

    /// The queue has been dropped; nothing will ever dispatch the event.
    Disconnected { event: &'static str },
}

impl fmt::Display for EventQueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full { event } => write!(f, "Event queue full, dropped {}", event),
            Self::Disconnected { event } => {
                write!(f, "Event queue disconnected, dropped {}", event)
            }
        }
    }
}

impl std::error::Error for EventQueueError {}

//=== EventSender =========================================================

/// Clonable, thread-safe handle for posting events to an [`EventQueue`].
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<Deferred>,
}

impl EventSender {
    /// Queues `event` for dispatch on the queue owner's thread.
    pub fn send<E: Event + Send>(&self, event: E) -> Result<(), EventQueueError> {
        let name = std::any::type_name::<E>();
        let deferred: Deferred = Box::new(move |manager: &EventManager| manager.dispatch(&event));

        self.sender.try_send(deferred).map_err(|e| match e {
            TrySendError::Full(_) => EventQueueError::Full { event: name },
            TrySendError::Disconnected(_) => EventQueueError::Disconnected { event: name },
        })
    }
}

impl fmt::Debug for EventSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSender")
            .field("pending", &self.sender.len())
            .finish()
    }
}

//=== EventQueue ==========================================================

/// Receives events posted through [`EventSender`]s and dispatches them
/// when pumped.
pub struct EventQueue {
    sender: Sender<Deferred>,
    receiver: Receiver<Deferred>,
    max_events_per_pump: usize,
}

impl EventQueue {
    /// Default bound on events dispatched by a single [`pump`](Self::pump).
    pub const DEFAULT_MAX_EVENTS_PER_PUMP: usize = 256;

    /// Creates a queue; `None` for unbounded, `Some(n)` to hold at most `n`
    /// pending events.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == Some(0)`.
    pub fn new(capacity: Option<usize>) -> Self {
        let (sender, receiver) = match capacity {
            Some(capacity) => {
                assert!(capacity > 0, "Queue capacity must be positive");
                bounded(capacity)
            }
            None => unbounded(),
        };

        Self {
            sender,
            receiver,
            max_events_per_pump: Self::DEFAULT_MAX_EVENTS_PER_PUMP,
        }
    }

    /// Limits how many events one [`pump`](Self::pump) dispatches.
    ///
    /// # Panics
    ///
    /// Panics if `max == 0`.
    pub fn with_max_events_per_pump(mut self, max: usize) -> Self {
        assert!(max > 0, "Max events per pump must be positive");
        self.max_events_per_pump = max;
        self
    }

    /// Returns a new sender for this queue.
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Dispatches pending events in FIFO order through `manager`.
    ///
    /// Stops after `max_events_per_pump` events; the rest stay queued for
    /// the next call. Returns the number dispatched.
    pub fn pump(&self, manager: &EventManager) -> usize {
        let mut dispatched = 0;

        while dispatched < self.max_events_per_pump {
            match self.receiver.try_recv() {
                Ok(deferred) => {
                    deferred(manager);
                    dispatched += 1;
                }
                // The queue holds its own sender, so it never disconnects.
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        if dispatched >= self.max_events_per_pump && !self.receiver.is_empty() {
            warn!(
                target: "events",
                "Event queue backlog: dispatched {} events, {} still pending",
                dispatched,
                self.receiver.len()
            );
        } else if dispatched > 0 {
            trace!(target: "events", "Pumped {} queued event(s)", dispatched);
        }

        dispatched
    }

    /// Number of events waiting to be pumped.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Returns true if nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new(None)
    }
}

impl fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventQueue")
            .field("pending", &self.receiver.len())
            .field("capacity", &self.receiver.capacity())
            .field("max_events_per_pump", &self.max_events_per_pump)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
