//=========================================================================
// Event Manager
//=========================================================================
//
// Registry of subscribers keyed by event type, and the dispatcher.
//
// Architecture:
//   subscribe()   → Bucket.entries.insert(upper-bound by priority)
//   unsubscribe() → mark inactive → remove by SubscriberId
//   dispatch()    → snapshot entries → release borrow → invoke in order
//
// The registry lives behind `Rc<RefCell<_>>` so callbacks can subscribe,
// unsubscribe and dispatch re-entrantly: no borrow is held while user
// code runs.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::{Event, EventHandler, EventTypeId, Priority};

//=== SubscriberId ========================================================

/// Identity of one registration in an [`EventManager`].
///
/// Ids are never reused within a manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(u64);

//=== Subscriber ==========================================================

/// One registration record: identity, priority and the erased handler.
struct Subscriber {
    id: SubscriberId,
    priority: Priority,
    active: Cell<bool>,
    handler: Rc<dyn EventHandler>,
}

/// Subscribers of a single event type, in non-increasing priority order.
struct Bucket {
    name: &'static str,
    entries: Vec<Rc<Subscriber>>,
}

impl Bucket {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: Vec::new(),
        }
    }
}

#[derive(Default)]
struct Registry {
    buckets: HashMap<TypeId, Bucket>,
    next_id: u64,
}

//=== EventManager ========================================================

/// Owner of the subscriber registry and authority for dispatch.
///
/// `EventManager` is a cheap, clonable handle: clones share one registry.
/// Independent managers never see each other's subscribers, which keeps
/// tests and subsystems isolated.
///
/// Dispatch is single-threaded and synchronous. Producers on other threads
/// go through [`EventQueue`](super::EventQueue).
///
/// # Ordering
///
/// Within an event type, subscribers run in descending [`Priority`].
/// Ties run in registration order.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use std::cell::Cell;
/// use zore::core::event::{EventManager, Handler, Priority};
///
/// struct Clicked { x: f32 }
///
/// let events = EventManager::new();
/// let seen = Rc::new(Cell::new(0.0));
///
/// let sink = seen.clone();
/// let _handler = Handler::with_callback(&events, move |e: &Clicked| {
///     sink.set(e.x);
///     true
/// }, Priority::NORMAL);
///
/// events.dispatch(&Clicked { x: 4.0 });
/// assert_eq!(seen.get(), 4.0);
/// ```
#[derive(Clone, Default)]
pub struct EventManager {
    registry: Rc<RefCell<Registry>>,
}

impl EventManager {
    /// Creates a manager with an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    //--- Registration -----------------------------------------------------

    /// Ensures a (possibly empty) subscriber list exists for `event_type`.
    pub fn reserve(&self, event_type: EventTypeId) {
        let mut registry = self.registry.borrow_mut();
        registry
            .buckets
            .entry(event_type.type_id())
            .or_insert_with(|| Bucket::new(event_type.name()));
    }

    /// Inserts `handler` into the list for `event_type`.
    ///
    /// The handler is placed before the first entry with a strictly lower
    /// priority, so equal priorities keep registration order.
    pub fn subscribe(
        &self,
        event_type: EventTypeId,
        handler: Rc<dyn EventHandler>,
    ) -> SubscriberId {
        let mut registry = self.registry.borrow_mut();

        let id = SubscriberId(registry.next_id);
        registry.next_id += 1;

        let priority = handler.priority();
        let bucket = registry
            .buckets
            .entry(event_type.type_id())
            .or_insert_with(|| Bucket::new(event_type.name()));

        let position = bucket.entries.partition_point(|s| s.priority >= priority);
        bucket.entries.insert(
            position,
            Rc::new(Subscriber {
                id,
                priority,
                active: Cell::new(true),
                handler,
            }),
        );

        debug!(
            target: "events",
            "Subscribed {:?} to {} at priority {} (position {})",
            id, bucket.name, priority.0, position
        );

        id
    }

    /// Removes the subscriber `id` from the list for `event_type`.
    ///
    /// Returns `false` (and changes nothing) if the type has no list or the
    /// id is not in it.
    pub fn unsubscribe(&self, event_type: EventTypeId, id: SubscriberId) -> bool {
        let removed = {
            let mut registry = self.registry.borrow_mut();
            let Some(bucket) = registry.buckets.get_mut(&event_type.type_id()) else {
                return false;
            };
            let Some(position) = bucket.entries.iter().position(|s| s.id == id) else {
                return false;
            };
            let removed = bucket.entries.remove(position);
            removed.active.set(false);
            debug!(target: "events", "Unsubscribed {:?} from {}", id, bucket.name);
            removed
        };

        // Dropped outside the borrow: the handler may own further
        // registrations that unsubscribe while being dropped.
        drop(removed);
        true
    }

    //--- Dispatch ---------------------------------------------------------

    /// Delivers `event` to every subscriber of `E`, highest priority first,
    /// stopping after the first subscriber that consumes it.
    pub fn dispatch<E: Event>(&self, event: &E) {
        self.dispatch_erased(EventTypeId::of::<E>(), event);
    }

    /// Dispatch by explicit type identifier.
    ///
    /// `event` must be of the type `event_type` names; handlers created by
    /// this crate ignore anything else.
    pub fn dispatch_erased(&self, event_type: EventTypeId, event: &dyn Any) {
        let snapshot: Vec<Rc<Subscriber>> = {
            let registry = self.registry.borrow();
            match registry.buckets.get(&event_type.type_id()) {
                Some(bucket) if !bucket.entries.is_empty() => bucket.entries.clone(),
                _ => return,
            }
        };

        trace!(
            target: "events",
            "Dispatching {} to {} subscriber(s)",
            event_type.name(),
            snapshot.len()
        );

        for subscriber in &snapshot {
            // Removed by an earlier callback of this same dispatch.
            if !subscriber.active.get() {
                continue;
            }

            if subscriber.handler.execute(event) {
                trace!(
                    target: "events",
                    "{} consumed by {:?}",
                    event_type.name(),
                    subscriber.id
                );
                break;
            }
        }
    }

    //--- Query API --------------------------------------------------------

    /// Number of live subscribers for `event_type`.
    pub fn subscriber_count(&self, event_type: EventTypeId) -> usize {
        self.registry
            .borrow()
            .buckets
            .get(&event_type.type_id())
            .map_or(0, |b| b.entries.len())
    }

    /// Returns true if any subscriber exists for `event_type`.
    pub fn has_subscribers(&self, event_type: EventTypeId) -> bool {
        self.subscriber_count(event_type) > 0
    }

    /// Returns true if a list exists for `event_type`, even an empty one.
    pub fn is_reserved(&self, event_type: EventTypeId) -> bool {
        self.registry
            .borrow()
            .buckets
            .contains_key(&event_type.type_id())
    }

    /// Subscribers of `event_type` in invocation order.
    pub fn subscribers(&self, event_type: EventTypeId) -> Vec<(SubscriberId, Priority)> {
        self.registry
            .borrow()
            .buckets
            .get(&event_type.type_id())
            .map(|b| b.entries.iter().map(|s| (s.id, s.priority)).collect())
            .unwrap_or_default()
    }

    //--- Internal Helpers -------------------------------------------------

    pub(super) fn downgrade(&self) -> WeakEventManager {
        WeakEventManager {
            registry: Rc::downgrade(&self.registry),
        }
    }
}

impl fmt::Debug for EventManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.registry.try_borrow() {
            Ok(registry) => {
                let subscribers: usize = registry.buckets.values().map(|b| b.entries.len()).sum();
                f.debug_struct("EventManager")
                    .field("event_types", &registry.buckets.len())
                    .field("subscribers", &subscribers)
                    .finish()
            }
            Err(_) => f.debug_struct("EventManager").finish_non_exhaustive(),
        }
    }
}

//=== WeakEventManager ====================================================

/// Non-owning handle held by handlers, so a registration never keeps the
/// registry alive on its own.
#[derive(Clone)]
pub(super) struct WeakEventManager {
    registry: Weak<RefCell<Registry>>,
}

impl WeakEventManager {
    pub(super) fn upgrade(&self) -> Option<EventManager> {
        self.registry.upgrade().map(|registry| EventManager { registry })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
