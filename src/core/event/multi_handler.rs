//=========================================================================
// Multi Handler
//=========================================================================
//
// One owner for many typed subscriptions.
//
// Architecture:
//   MultiHandler
//     ├─ default_priority
//     └─ registrations: Vec<Registration>   (any event type)
//
// Dropping or clearing the MultiHandler drops every Registration, and each
// one removes itself from the manager.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::handler::{erase, Registration};
use super::manager::WeakEventManager;
use super::{Event, EventManager, EventTypeId, Priority, SubscriberId};

//=== MultiHandler ========================================================

/// Lets one listener (an application, a UI layer) subscribe to several
/// event types with a single lifetime.
///
/// Callbacks registered without an explicit priority use the handler's
/// default priority.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use std::cell::RefCell;
/// use zore::core::event::{bind_mut, EventManager, MultiHandler, Priority};
///
/// struct KeyPressed(char);
/// struct Quit;
///
/// #[derive(Default)]
/// struct Console { typed: String, open: bool }
///
/// impl Console {
///     fn on_key(&mut self, e: &KeyPressed) -> bool { self.typed.push(e.0); true }
///     fn on_quit(&mut self, _: &Quit) -> bool { self.open = false; false }
/// }
///
/// let events = EventManager::new();
/// let console = Rc::new(RefCell::new(Console { open: true, ..Default::default() }));
///
/// let mut handlers = MultiHandler::with_priority(&events, Priority::HIGH);
/// handlers.register(bind_mut(&console, Console::on_key));
/// handlers.register(bind_mut(&console, Console::on_quit));
///
/// events.dispatch(&KeyPressed('z'));
/// events.dispatch(&Quit);
/// assert_eq!(console.borrow().typed, "z");
/// assert!(!console.borrow().open);
///
/// handlers.clear();
/// events.dispatch(&KeyPressed('x'));
/// assert_eq!(console.borrow().typed, "z");
/// ```
pub struct MultiHandler {
    manager: WeakEventManager,
    default_priority: Priority,
    registrations: Vec<Registration>,
}

impl MultiHandler {
    //--- Construction -----------------------------------------------------

    /// Creates an empty handler set using [`Priority::NORMAL`] by default.
    pub fn new(manager: &EventManager) -> Self {
        Self::with_priority(manager, Priority::NORMAL)
    }

    /// Creates an empty handler set with the given default priority.
    pub fn with_priority(manager: &EventManager, priority: impl Into<Priority>) -> Self {
        Self {
            manager: manager.downgrade(),
            default_priority: priority.into(),
            registrations: Vec::new(),
        }
    }

    //--- Configuration ----------------------------------------------------

    /// Priority applied by [`register`](Self::register).
    pub fn default_priority(&self) -> Priority {
        self.default_priority
    }

    /// Changes the default priority for future registrations.
    ///
    /// Existing registrations keep their position.
    pub fn set_default_priority(&mut self, priority: impl Into<Priority>) {
        self.default_priority = priority.into();
    }

    //--- Registration -----------------------------------------------------

    /// Subscribes `callback` to events of type `E` at the default priority.
    ///
    /// The event type is inferred from the callback's parameter. Returns
    /// `None` if the manager no longer exists.
    pub fn register<E, F>(&mut self, callback: F) -> Option<SubscriberId>
    where
        E: Event,
        F: Fn(&E) -> bool + 'static,
    {
        let priority = self.default_priority;
        self.register_at(callback, priority)
    }

    /// Subscribes `callback` to events of type `E` at `priority`.
    pub fn register_at<E, F>(
        &mut self,
        callback: F,
        priority: impl Into<Priority>,
    ) -> Option<SubscriberId>
    where
        E: Event,
        F: Fn(&E) -> bool + 'static,
    {
        let Some(manager) = self.manager.upgrade() else {
            warn!(
                target: "events",
                "Cannot register handler for {}: event manager dropped",
                std::any::type_name::<E>()
            );
            return None;
        };

        let handler = erase::<E, F>(callback, priority.into());
        let registration = Registration::new(&manager, EventTypeId::of::<E>(), handler);
        let id = registration.id();
        self.registrations.push(registration);
        Some(id)
    }

    /// Unregisters every owned subscription. Safe to call repeatedly.
    pub fn clear(&mut self) {
        if self.registrations.is_empty() {
            return;
        }

        let registrations = std::mem::take(&mut self.registrations);
        debug!(target: "events", "Clearing {} handler(s)", registrations.len());
        drop(registrations);
    }

    //--- Query API --------------------------------------------------------

    /// Number of owned subscriptions.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Returns true if a subscription for `E` is owned.
    pub fn handles<E: Event>(&self) -> bool {
        let event_type = EventTypeId::of::<E>();
        self.registrations
            .iter()
            .any(|registration| registration.event_type() == event_type)
    }
}

impl Drop for MultiHandler {
    fn drop(&mut self) {
        self.clear();
    }
}

impl fmt::Debug for MultiHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let event_types: Vec<&'static str> = self
            .registrations
            .iter()
            .map(|registration| registration.event_type().name())
            .collect();

        f.debug_struct("MultiHandler")
            .field("default_priority", &self.default_priority)
            .field("event_types", &event_types)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Clicked;
    struct Resized;
    struct Scrolled;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    fn record<E: Event>(
        tag: &'static str,
        consume: bool,
        log: &Log,
    ) -> impl Fn(&E) -> bool + 'static {
        let log = log.clone();
        move |_: &E| {
            log.borrow_mut().push(tag);
            consume
        }
    }

    #[test]
    fn new_multi_handler_is_empty() {
        let manager = EventManager::new();
        let handlers = MultiHandler::new(&manager);

        assert!(handlers.is_empty());
        assert_eq!(handlers.len(), 0);
        assert_eq!(handlers.default_priority(), Priority::NORMAL);
    }

    #[test]
    fn registers_several_event_types() {
        let manager = EventManager::new();
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut handlers = MultiHandler::new(&manager);

        handlers.register(record::<Clicked>("clicked", false, &log));
        handlers.register(record::<Resized>("resized", false, &log));

        assert_eq!(handlers.len(), 2);
        assert!(handlers.handles::<Clicked>());
        assert!(handlers.handles::<Resized>());
        assert!(!handlers.handles::<Scrolled>());

        manager.dispatch(&Resized);
        manager.dispatch(&Clicked);
        assert_eq!(*log.borrow(), vec!["resized", "clicked"]);
    }

    #[test]
    fn default_priority_applies_to_register() {
        let manager = EventManager::new();
        let log: Log = Rc::new(RefCell::new(Vec::new()));

        let mut game = MultiHandler::with_priority(&manager, Priority(1));
        let mut overlay = MultiHandler::with_priority(&manager, Priority(10));

        game.register(record::<Clicked>("game", false, &log));
        overlay.register(record::<Clicked>("overlay", false, &log));

        manager.dispatch(&Clicked);
        assert_eq!(*log.borrow(), vec!["overlay", "game"]);
    }

    #[test]
    fn explicit_priority_overrides_default() {
        let manager = EventManager::new();
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut handlers = MultiHandler::with_priority(&manager, Priority(1));

        handlers.register(record::<Clicked>("default", false, &log));
        handlers.register_at(record::<Clicked>("urgent", false, &log), Priority(50));

        manager.dispatch(&Clicked);
        assert_eq!(*log.borrow(), vec!["urgent", "default"]);
    }

    #[test]
    fn set_default_priority_affects_later_registrations() {
        let manager = EventManager::new();
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut handlers = MultiHandler::new(&manager);

        handlers.register(record::<Clicked>("before", false, &log));
        handlers.set_default_priority(Priority::HIGH);
        handlers.register(record::<Clicked>("after", false, &log));

        assert_eq!(handlers.default_priority(), Priority::HIGH);
        manager.dispatch(&Clicked);
        assert_eq!(*log.borrow(), vec!["after", "before"]);
    }

    #[test]
    fn drop_unregisters_everything() {
        let manager = EventManager::new();
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut handlers = MultiHandler::new(&manager);

        handlers.register(record::<Clicked>("clicked", false, &log));
        handlers.register(record::<Resized>("resized", false, &log));
        handlers.register(record::<Scrolled>("scrolled", false, &log));
        drop(handlers);

        manager.dispatch(&Clicked);
        manager.dispatch(&Resized);
        manager.dispatch(&Scrolled);

        assert!(log.borrow().is_empty());
        assert_eq!(manager.subscriber_count(EventTypeId::of::<Clicked>()), 0);
        assert_eq!(manager.subscriber_count(EventTypeId::of::<Resized>()), 0);
        assert_eq!(manager.subscriber_count(EventTypeId::of::<Scrolled>()), 0);
    }

    #[test]
    fn clear_is_repeatable_and_handler_is_reusable() {
        let manager = EventManager::new();
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut handlers = MultiHandler::new(&manager);

        handlers.register(record::<Clicked>("first", false, &log));
        handlers.clear();
        handlers.clear();
        assert!(handlers.is_empty());

        handlers.register(record::<Clicked>("second", false, &log));
        manager.dispatch(&Clicked);
        assert_eq!(*log.borrow(), vec!["second"]);
    }

    #[test]
    fn clear_leaves_other_subscribers_alone() {
        let manager = EventManager::new();
        let log: Log = Rc::new(RefCell::new(Vec::new()));

        let mut mine = MultiHandler::new(&manager);
        let mut theirs = MultiHandler::new(&manager);
        mine.register(record::<Clicked>("mine", false, &log));
        theirs.register(record::<Clicked>("theirs", false, &log));

        mine.clear();
        manager.dispatch(&Clicked);
        assert_eq!(*log.borrow(), vec!["theirs"]);
    }

    #[test]
    fn register_after_manager_dropped_returns_none() {
        let manager = EventManager::new();
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut handlers = MultiHandler::new(&manager);
        drop(manager);

        assert_eq!(handlers.register(record::<Clicked>("late", false, &log)), None);
        assert!(handlers.is_empty());
    }

    #[test]
    fn clearing_from_inside_a_callback_stops_remaining_handlers() {
        let manager = EventManager::new();
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let handlers = Rc::new(RefCell::new(MultiHandler::new(&manager)));

        let owner = handlers.clone();
        let inner_log = log.clone();
        let mut controller = MultiHandler::with_priority(&manager, Priority::HIGH);
        controller.register(move |_: &Clicked| {
            inner_log.borrow_mut().push("controller");
            owner.borrow_mut().clear();
            false
        });
        handlers.borrow_mut().register(record::<Clicked>("victim", false, &log));

        manager.dispatch(&Clicked);
        assert_eq!(*log.borrow(), vec!["controller"]);
        assert!(handlers.borrow().is_empty());
    }

    #[test]
    fn debug_lists_event_types() {
        let manager = EventManager::new();
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut handlers = MultiHandler::new(&manager);
        handlers.register(record::<Resized>("resized", false, &log));

        assert!(format!("{:?}", handlers).contains("Resized"));
    }
}
