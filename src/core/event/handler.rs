//=========================================================================
// Typed Handlers
//=========================================================================
//
// Bridges strongly-typed callbacks into the erased `EventHandler` the
// manager stores, and owns the resulting registration.
//
// Architecture:
//   Fn(&E) -> bool ──Callback<E, F>──> Rc<dyn EventHandler>
//                                          │ subscribe()
//                                          ↓
//                                    Registration ──Drop──> unsubscribe()
//
// Handler state: UNREGISTERED ⇄ REGISTERED. Re-registering always
// unsubscribes first, then inserts at the new priority position.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use log::warn;

//=== Internal Dependencies ===============================================

use super::manager::WeakEventManager;
use super::{Event, EventHandler, EventManager, EventTypeId, Priority, SubscriberId};

//=== Callback Adapter ====================================================

/// Erases a typed callback behind [`EventHandler`].
struct Callback<E, F> {
    callback: F,
    priority: Priority,
    _event: PhantomData<fn(&E)>,
}

impl<E, F> EventHandler for Callback<E, F>
where
    E: Event,
    F: Fn(&E) -> bool + 'static,
{
    fn execute(&self, event: &dyn Any) -> bool {
        match event.downcast_ref::<E>() {
            Some(event) => (self.callback)(event),
            None => {
                warn!(
                    target: "events",
                    "Handler for {} received an event of another type",
                    std::any::type_name::<E>()
                );
                false
            }
        }
    }

    fn priority(&self) -> Priority {
        self.priority
    }
}

pub(super) fn erase<E, F>(callback: F, priority: Priority) -> Rc<dyn EventHandler>
where
    E: Event,
    F: Fn(&E) -> bool + 'static,
{
    Rc::new(Callback {
        callback,
        priority,
        _event: PhantomData,
    })
}

//=== Registration ========================================================

/// A live entry in a manager's registry, removed when dropped.
pub(super) struct Registration {
    manager: WeakEventManager,
    event_type: EventTypeId,
    id: SubscriberId,
    handler: Rc<dyn EventHandler>,
}

impl Registration {
    pub(super) fn new(
        manager: &EventManager,
        event_type: EventTypeId,
        handler: Rc<dyn EventHandler>,
    ) -> Self {
        let id = manager.subscribe(event_type, handler.clone());
        Self {
            manager: manager.downgrade(),
            event_type,
            id,
            handler,
        }
    }

    pub(super) fn id(&self) -> SubscriberId {
        self.id
    }

    pub(super) fn event_type(&self) -> EventTypeId {
        self.event_type
    }

    pub(super) fn priority(&self) -> Priority {
        self.handler.priority()
    }

    fn execute(&self, event: &dyn Any) -> bool {
        self.handler.execute(event)
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        // Manager already gone: nothing left to remove.
        if let Some(manager) = self.manager.upgrade() {
            manager.unsubscribe(self.event_type, self.id);
        }
    }
}

//=== Handler =============================================================

/// A single typed subscription to events of type `E`.
///
/// The handler owns its registration: dropping it, calling
/// [`unregister`](Self::unregister), or registering a new callback removes
/// the old entry from the manager. A handler is never registered twice.
///
/// `Handler` is not `Clone`. Moving it is fine; the registration follows.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use std::cell::Cell;
/// use zore::core::event::{EventManager, Handler, Priority};
///
/// struct Resized(u32);
///
/// let events = EventManager::new();
/// let width = Rc::new(Cell::new(0));
///
/// let mut handler = Handler::<Resized>::new(&events);
/// assert!(!handler.is_registered());
///
/// let sink = width.clone();
/// handler.register(move |e: &Resized| { sink.set(e.0); false }, Priority::NORMAL);
/// events.dispatch(&Resized(1280));
/// assert_eq!(width.get(), 1280);
///
/// drop(handler);
/// events.dispatch(&Resized(640));
/// assert_eq!(width.get(), 1280);
/// ```
pub struct Handler<E: Event> {
    manager: WeakEventManager,
    registration: Option<Registration>,
    _event: PhantomData<fn(&E)>,
}

impl<E: Event> Handler<E> {
    //--- Construction -----------------------------------------------------

    /// Creates an unregistered handler.
    ///
    /// Reserves the subscriber list for `E` so later dispatches find it.
    pub fn new(manager: &EventManager) -> Self {
        manager.reserve(EventTypeId::of::<E>());
        Self {
            manager: manager.downgrade(),
            registration: None,
            _event: PhantomData,
        }
    }

    /// Creates a handler and registers `callback` at `priority`.
    pub fn with_callback<F>(
        manager: &EventManager,
        callback: F,
        priority: impl Into<Priority>,
    ) -> Self
    where
        F: Fn(&E) -> bool + 'static,
    {
        let mut handler = Self::new(manager);
        handler.register(callback, priority);
        handler
    }

    //--- Registration -----------------------------------------------------

    /// Replaces the current callback.
    ///
    /// Any previous registration is removed first, then `callback` is
    /// inserted at the position `priority` dictates.
    pub fn register<F>(&mut self, callback: F, priority: impl Into<Priority>)
    where
        F: Fn(&E) -> bool + 'static,
    {
        self.unregister();

        let Some(manager) = self.manager.upgrade() else {
            warn!(
                target: "events",
                "Cannot register handler for {}: event manager dropped",
                std::any::type_name::<E>()
            );
            return;
        };

        let handler = erase::<E, F>(callback, priority.into());
        self.registration = Some(Registration::new(&manager, EventTypeId::of::<E>(), handler));
    }

    /// Removes the registration, if any. Idempotent.
    pub fn unregister(&mut self) {
        self.registration = None;
    }

    //--- Query API --------------------------------------------------------

    /// Returns true while a callback is registered.
    pub fn is_registered(&self) -> bool {
        self.registration.is_some()
    }

    /// Priority of the current registration.
    pub fn priority(&self) -> Option<Priority> {
        self.registration.as_ref().map(Registration::priority)
    }

    /// Id of the current registration.
    pub fn id(&self) -> Option<SubscriberId> {
        self.registration.as_ref().map(Registration::id)
    }

    //--- Invocation -------------------------------------------------------

    /// Invokes the registered callback directly, bypassing the manager.
    ///
    /// Returns `false` when unregistered.
    pub fn execute(&self, event: &E) -> bool {
        self.registration
            .as_ref()
            .is_some_and(|registration| registration.execute(event))
    }
}

impl<E: Event> fmt::Debug for Handler<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("event", &std::any::type_name::<E>())
            .field("id", &self.id())
            .field("priority", &self.priority())
            .finish()
    }
}

//=== Method Binding ======================================================

/// Binds `method` to `instance`, producing a callback for a handler.
///
/// Only a weak reference is kept: once the instance is dropped the
/// callback reports "not consumed" and does nothing.
///
/// ```
/// use std::rc::Rc;
/// use std::cell::Cell;
/// use zore::core::event::{bind, EventManager, Handler, Priority};
///
/// struct Quit;
/// struct App { running: Cell<bool> }
///
/// impl App {
///     fn on_quit(&self, _: &Quit) -> bool {
///         self.running.set(false);
///         true
///     }
/// }
///
/// let events = EventManager::new();
/// let app = Rc::new(App { running: Cell::new(true) });
/// let _h = Handler::with_callback(&events, bind(&app, App::on_quit), Priority::NORMAL);
///
/// events.dispatch(&Quit);
/// assert!(!app.running.get());
/// ```
pub fn bind<T, E, M>(instance: &Rc<T>, method: M) -> impl Fn(&E) -> bool + 'static
where
    T: 'static,
    E: Event,
    M: Fn(&T, &E) -> bool + 'static,
{
    let instance = Rc::downgrade(instance);
    move |event: &E| {
        instance
            .upgrade()
            .is_some_and(|instance| method(&instance, event))
    }
}

/// Like [`bind`], for methods taking `&mut self` on a `RefCell`-owned
/// instance.
///
/// If the instance is already borrowed (the event was dispatched from
/// inside one of its own methods), the call is skipped and logged.
pub fn bind_mut<T, E, M>(instance: &Rc<RefCell<T>>, method: M) -> impl Fn(&E) -> bool + 'static
where
    T: 'static,
    E: Event,
    M: Fn(&mut T, &E) -> bool + 'static,
{
    let instance = Rc::downgrade(instance);
    move |event: &E| {
        let Some(instance) = instance.upgrade() else {
            return false;
        };
        let Ok(mut target) = instance.try_borrow_mut() else {
            warn!(
                target: "events",
                "Skipping {} for {}: instance already borrowed",
                std::any::type_name::<E>(),
                std::any::type_name::<T>()
            );
            return false;
        };
        method(&mut target, event)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
