//=========================================================================
// Event System
//=========================================================================
//
// Type-indexed, priority-ordered synchronous event dispatch.
//
// Architecture:
//   Producer ──dispatch::<E>(&e)──> EventManager
//                                      │ HashMap<TypeId, Vec<Subscriber>>
//                                      ↓ (descending priority, FIFO ties)
//                       Handler<E> / MultiHandler callbacks
//                                      ↓
//                       true = consumed → stop propagation
//
// Subscribers only exist through `Handler<E>` and `MultiHandler` (or the
// low-level `EventManager::subscribe`). Both unregister on drop.
//
//=========================================================================

//=== Module Declarations =================================================

mod handler;
mod manager;
mod multi_handler;
pub mod queue;
pub mod types;

//=== External Dependencies ===============================================

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

//=== Public API ==========================================================

pub use handler::{bind, bind_mut, Handler};
pub use manager::{EventManager, SubscriberId};
pub use multi_handler::MultiHandler;
pub use queue::{EventQueue, EventQueueError, EventSender};
pub use types::*;

//=== Event Trait =========================================================

/// Marker trait for anything that can be dispatched.
///
/// Automatically implemented for all `'static` types, so modules can define
/// their own event records without touching a central list of tags.
pub trait Event: Any {}

// Blanket implementation
impl<T: Any> Event for T {}

//=== EventTypeId =========================================================

/// Stable per-type identifier used to key the subscriber registry.
///
/// Compares and hashes by `TypeId` only; the name is carried for logging.
#[derive(Clone, Copy)]
pub struct EventTypeId {
    id: TypeId,
    name: &'static str,
}

impl EventTypeId {
    /// Returns the identifier for event type `E`.
    pub fn of<E: Event>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: std::any::type_name::<E>(),
        }
    }

    /// Full type name of the event, as reported by the compiler.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn type_id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for EventTypeId {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EventTypeId {}

impl Hash for EventTypeId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for EventTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EventTypeId").field(&self.name).finish()
    }
}

//=== Priority ============================================================

/// Ordering key for subscribers of one event type.
///
/// Higher values run first. Subscribers with equal priority run in the
/// order they were registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Priority(pub i32);

impl Priority {
    /// Runs after ordinary subscribers.
    pub const LOW: Self = Self(-100);

    /// Default for subscribers that do not care about ordering.
    pub const NORMAL: Self = Self(0);

    /// Overlays and UI layers that may swallow input.
    pub const HIGH: Self = Self(100);

    /// Passive observers. Runs before everything else and must never
    /// consume, so it sees every event.
    pub const MONITOR: Self = Self(i32::MAX);
}

impl From<i32> for Priority {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

//=== EventHandler Trait ==================================================

/// Type-erased subscriber stored by the [`EventManager`].
///
/// `execute` receives the event as `&dyn Any`; implementations registered
/// under `EventTypeId::of::<E>()` are only ever handed an `E`. Returning
/// `true` marks the event consumed and stops propagation.
pub trait EventHandler {
    /// Handles one event. Returns `true` if the event was consumed.
    fn execute(&self, event: &dyn Any) -> bool;

    /// Position of this handler relative to others of the same event type.
    fn priority(&self) -> Priority;
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Clicked;
    struct Resized;

    #[test]
    fn event_type_id_equality_follows_type() {
        assert_eq!(EventTypeId::of::<Clicked>(), EventTypeId::of::<Clicked>());
        assert_ne!(EventTypeId::of::<Clicked>(), EventTypeId::of::<Resized>());
    }

    #[test]
    fn event_type_id_hashes_by_type() {
        let mut set = HashSet::new();
        set.insert(EventTypeId::of::<Clicked>());
        set.insert(EventTypeId::of::<Clicked>());
        set.insert(EventTypeId::of::<Resized>());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn event_type_id_carries_type_name() {
        let id = EventTypeId::of::<Clicked>();
        assert!(id.name().ends_with("Clicked"));
        assert!(format!("{:?}", id).contains("Clicked"));
    }

    #[test]
    fn priority_orders_numerically() {
        assert!(Priority::HIGH > Priority::NORMAL);
        assert!(Priority::NORMAL > Priority::LOW);
        assert!(Priority::MONITOR > Priority::HIGH);
        assert_eq!(Priority::default(), Priority::NORMAL);
        assert_eq!(Priority::from(7), Priority(7));
    }
}
