//=========================================================================
// Zore Engine
//
// Main entry point and coordinator for the engine.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  [Winit loop]
//         │                          │
//         ├─ with_title()            ├─ events()   subscribe here
//         ├─ with_size()             ├─ sender()   post from any thread
//         ├─ with_queue_capacity()   └─ run()      blocks until exit
//         └─ with_max_events_per_frame()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use log::info;

//=== Internal Dependencies ===============================================

use crate::core::event::{EventManager, EventQueue, EventSender};
use crate::platform::{Platform, PlatformError};

//=== EngineConfig ========================================================

/// Settings collected by [`EngineBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Window title.
    pub title: String,

    /// Initial window width, logical pixels.
    pub width: u32,

    /// Initial window height, logical pixels.
    pub height: u32,

    /// Pending-event limit for the deferred queue (`None` = unbounded).
    pub queue_capacity: Option<usize>,

    /// Queued events dispatched per frame at most.
    pub max_events_per_frame: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "zore".to_string(),
            width: 800,
            height: 600,
            queue_capacity: None,
            max_events_per_frame: EventQueue::DEFAULT_MAX_EVENTS_PER_PUMP,
        }
    }
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Title**: `"zore"`
/// - **Size**: 800x600
/// - **Queue capacity**: unbounded
/// - **Max events per frame**: 256
///
/// # Examples
///
/// ```no_run
/// use zore::EngineBuilder;
///
/// EngineBuilder::new()
///     .with_title("Sandbox")
///     .with_size(1280, 720)
///     .with_queue_capacity(Some(1024))
///     .build()
///     .run()?;
/// # Ok::<(), zore::PlatformError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct EngineBuilder {
    config: EngineConfig,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    /// Sets the initial window size in logical pixels.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        assert!(
            width > 0 && height > 0,
            "Window size must be positive, got {}x{}",
            width,
            height
        );
        self.config.width = width;
        self.config.height = height;
        self
    }

    /// Bounds the cross-thread event queue. `None` leaves it unbounded;
    /// with a bound, [`EventSender::send`] fails once it is full.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == Some(0)`.
    pub fn with_queue_capacity(mut self, capacity: Option<usize>) -> Self {
        assert!(capacity != Some(0), "Queue capacity must be positive");
        self.config.queue_capacity = capacity;
        self
    }

    /// Limits how many queued events are dispatched per frame. The rest
    /// wait for the next frame.
    ///
    /// # Panics
    ///
    /// Panics if `max == 0`.
    pub fn with_max_events_per_frame(mut self, max: usize) -> Self {
        assert!(max > 0, "Max events per frame must be positive");
        self.config.max_events_per_frame = max;
        self
    }

    /// Builds the engine instance.
    pub fn build(self) -> Engine {
        info!(
            target: "engine",
            "Building engine ({:?}, {}x{}, queue: {:?})",
            self.config.title, self.config.width, self.config.height, self.config.queue_capacity
        );

        let queue = EventQueue::new(self.config.queue_capacity)
            .with_max_events_per_pump(self.config.max_events_per_frame);

        Engine {
            config: self.config,
            events: EventManager::new(),
            queue,
        }
    }
}

//=== Engine ==============================================================

/// Zore engine runtime.
///
/// Subscribe through [`events`](Self::events) before calling
/// [`run`](Self::run); handlers kept alive across the call receive every
/// event the window produces.
///
/// ```no_run
/// use zore::prelude::*;
///
/// let engine = EngineBuilder::new().build();
///
/// let _quit = Handler::with_callback(
///     engine.events(),
///     |e: &KeyPressed| {
///         println!("pressed {:?}", e.key);
///         false
///     },
///     Priority::NORMAL,
/// );
///
/// engine.run()?;
/// # Ok::<(), PlatformError>(())
/// ```
pub struct Engine {
    config: EngineConfig,
    events: EventManager,
    queue: EventQueue,
}

impl Engine {
    //--- Accessors --------------------------------------------------------

    /// The registry every engine event is dispatched through.
    pub fn events(&self) -> &EventManager {
        &self.events
    }

    /// A thread-safe handle for posting events from other threads. They
    /// are dispatched on the main thread at the next frame.
    pub fn sender(&self) -> EventSender {
        self.queue.sender()
    }

    /// Settings the engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    //--- Execution --------------------------------------------------------

    /// Opens the window and blocks until it closes.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the Winit event loop fails.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread on platforms that require it.
    pub fn run(self) -> Result<(), PlatformError> {
        info!(target: "engine", "Starting engine runtime ({:?})", self.events);

        let platform = Platform::new(self.config, self.events, self.queue);
        platform.run()?;

        info!(target: "engine", "Engine shutdown complete");
        Ok(())
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("events", &self.events)
            .field("queue", &self.queue)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::{Handler, Priority};
    use std::cell::Cell;
    use std::rc::Rc;

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.config.title, "zore");
        assert_eq!((builder.config.width, builder.config.height), (800, 600));
        assert_eq!(builder.config.queue_capacity, None);
        assert_eq!(builder.config.max_events_per_frame, 256);
    }

    #[test]
    fn builder_with_title_and_size() {
        let builder = EngineBuilder::new().with_title("Editor").with_size(1920, 1080);
        assert_eq!(builder.config.title, "Editor");
        assert_eq!((builder.config.width, builder.config.height), (1920, 1080));
    }

    #[test]
    #[should_panic(expected = "Window size must be positive")]
    fn builder_with_size_panics_on_zero() {
        EngineBuilder::new().with_size(0, 600);
    }

    #[test]
    fn builder_with_queue_capacity() {
        let builder = EngineBuilder::new().with_queue_capacity(Some(64));
        assert_eq!(builder.config.queue_capacity, Some(64));
    }

    #[test]
    #[should_panic(expected = "Queue capacity must be positive")]
    fn builder_with_queue_capacity_panics_on_zero() {
        EngineBuilder::new().with_queue_capacity(Some(0));
    }

    #[test]
    #[should_panic(expected = "Max events per frame must be positive")]
    fn builder_with_max_events_panics_on_zero() {
        EngineBuilder::new().with_max_events_per_frame(0);
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let engine = EngineBuilder::new()
            .with_title("Chained")
            .with_size(320, 240)
            .with_queue_capacity(Some(8))
            .with_max_events_per_frame(4)
            .build();

        let config = engine.config();
        assert_eq!(config.title, "Chained");
        assert_eq!((config.width, config.height), (320, 240));
        assert_eq!(config.queue_capacity, Some(8));
        assert_eq!(config.max_events_per_frame, 4);
    }

    //=====================================================================
    // Engine Tests
    //=====================================================================

    #[test]
    fn sender_feeds_the_engine_queue() {
        struct Tick;

        let engine = EngineBuilder::new().with_max_events_per_frame(1).build();
        let ticks = Rc::new(Cell::new(0));

        let count = ticks.clone();
        let _handler = Handler::with_callback(
            engine.events(),
            move |_: &Tick| {
                count.set(count.get() + 1);
                false
            },
            Priority::NORMAL,
        );

        let sender = engine.sender();
        sender.send(Tick).unwrap();
        sender.send(Tick).unwrap();

        assert_eq!(engine.queue.pump(engine.events()), 1);
        assert_eq!(engine.queue.pump(engine.events()), 1);
        assert_eq!(ticks.get(), 2);
    }

    #[test]
    fn bounded_engine_queue_rejects_overflow() {
        let engine = EngineBuilder::new().with_queue_capacity(Some(1)).build();
        let sender = engine.sender();

        sender.send(1u8).unwrap();
        assert!(sender.send(2u8).is_err());
    }
}
