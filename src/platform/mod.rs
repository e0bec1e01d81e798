//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the engine's event manager.
//
// Architecture:
// ```text
//  Main Thread:
//  ┌──────────────────────────────────────────────┐
//  │  Winit Event Loop                            │
//  │   ↓                                          │
//  │  InputTranslator ──dispatch──> EventManager  │
//  │   └─ Tracks modifiers          ↓             │
//  │                          subscribers (by     │
//  │  RedrawRequested         priority)           │
//  │   ├─ FrameStarted ──dispatch──┤              │
//  │   ├─ EventQueue::pump ─────────┤             │
//  │   └─ FrameEnded ───dispatch────┘             │
//  └──────────────────────────────────────────────┘
//             ↑
//     EventSender (any thread)
// ```
//
// Frame Boundary: RedrawRequested
//   → `FrameStarted` dispatched first (frame code reads input deltas)
//   → Events posted from other threads dispatched in send order
//   → `FrameEnded` dispatched last (per-frame state resets)
//   → Next redraw requested
//
// Responsibilities:
// - Create and manage OS window
// - Translate Winit events into engine events, dispatched immediately
// - Pump the deferred queue once per frame
// - Dispatch `WindowClosed` and exit on close
//
//=========================================================================

//=== Submodules ==========================================================

mod translator;

//=== External Crates =====================================================

use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::event::{
    EventManager, EventQueue, FrameEnded, FrameStarted, WindowClosed, WindowResized,
};
use crate::engine::EngineConfig;
use translator::InputTranslator;

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
///
/// These are typically fatal - if the event loop can't be created,
/// the engine cannot run.
#[derive(Debug)]
pub enum PlatformError {
    /// Failed to create event loop (rare, indicates OS-level issue).
    EventLoopCreation(winit::error::EventLoopError),

    /// Event loop execution error.
    EventLoopExecution(winit::error::EventLoopError),
}

//--- Trait Implementations -----------------------------------------------

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EventLoopCreation(e) => write!(f, "Event loop creation failed: {}", e),
            Self::EventLoopExecution(e) => write!(f, "Event loop error: {}", e),
        }
    }
}

impl std::error::Error for PlatformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::EventLoopCreation(e) | Self::EventLoopExecution(e) => Some(e),
        }
    }
}

//=== LoopControl =========================================================

/// Whether the event loop keeps running after handling a window event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

//=== Platform ============================================================

/// Window manager and event producer.
///
/// Runs on the main thread (Winit requirement on macOS/iOS). Every
/// subscriber callback runs on this thread, from inside the event loop.
///
/// # Lifecycle
///
/// 1. **Construction**: `Platform::new(config, events, queue)`
/// 2. **Execution**: `platform.run()` - starts event loop, blocks
/// 3. **Event processing**: Winit calls `ApplicationHandler` methods
/// 4. **Shutdown**: User closes window → `WindowClosed` dispatched → exit
///
/// # Fields
///
/// - `window`: Created lazily in `resumed()` (mobile compatibility)
/// - `translator`: Converts Winit events → engine events
/// - `queue`: Events posted from other threads, pumped each frame
pub(crate) struct Platform {
    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,

    /// Window title and size, queue limits.
    config: EngineConfig,

    /// Registry every translated event is dispatched through.
    events: EventManager,

    /// Deferred events from other threads.
    queue: EventQueue,

    /// Converts Winit events to engine events.
    translator: InputTranslator,

    /// Index of the next `FrameStarted`.
    frame: u64,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    /// Creates a new platform instance.
    ///
    /// Does not create window yet - that happens lazily in `resumed()`.
    pub(crate) fn new(config: EngineConfig, events: EventManager, queue: EventQueue) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            config,
            events,
            queue,
            translator: InputTranslator::new(),
            frame: 0,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the event loop until the window closes.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// terminates abnormally.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread (macOS/iOS Winit requirement).
    pub(crate) fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;

        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)?;

        info!(
            target: "platform",
            "Event loop finished after {} frame(s)",
            self.frame
        );
        Ok(())
    }

    //--- Event Handling ---------------------------------------------------

    /// Translates and dispatches one window event.
    pub(crate) fn handle_window_event(&mut self, event: &WindowEvent) -> LoopControl {
        match event {
            WindowEvent::RedrawRequested => {
                self.run_frame();

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
                LoopControl::Continue
            }

            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.translator.translate(event, &self.events);
                LoopControl::Exit
            }

            _ => {
                if !self.translator.translate(event, &self.events) {
                    trace!(target: "platform", "Unhandled window event: {:?}", event);
                }
                LoopControl::Continue
            }
        }
    }

    /// Frame boundary: announces the frame, drains posted events, then
    /// closes the frame.
    ///
    /// Returns the number of queued events dispatched.
    pub(crate) fn run_frame(&mut self) -> usize {
        let frame = self.frame;
        self.events.dispatch(&FrameStarted { frame });
        let pumped = self.queue.pump(&self.events);
        self.events.dispatch(&FrameEnded { frame });
        self.frame += 1;
        pumped
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Called when app becomes active (startup or mobile resume).
    ///
    /// Creates the window if it doesn't exist yet. On mobile, this may be
    /// called multiple times (suspend/resume cycle).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                let size = window.inner_size();
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    size.width,
                    size.height,
                    window.scale_factor()
                );
                // Subscribers learn the initial size without waiting for a resize.
                self.events.dispatch(&WindowResized::new(size.width, size.height));
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.events.dispatch(&WindowClosed);
                event_loop.exit();
            }
        }
    }

    /// Handles per-window events.
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.handle_window_event(&event) == LoopControl::Exit {
            event_loop.exit();
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::{bind, Handler, KeyCode, KeyPressed, Modifiers, Priority};
    use crate::core::input::InputState;
    use std::cell::RefCell;
    use std::rc::Rc;
    use winit::dpi::PhysicalSize;

    #[derive(Debug)]
    struct Posted(u32);

    fn platform() -> (Platform, EventManager) {
        let events = EventManager::new();
        let platform =
            Platform::new(EngineConfig::default(), events.clone(), EventQueue::default());
        (platform, events)
    }

    //=====================================================================
    // Construction Tests
    //=====================================================================

    #[test]
    fn platform_starts_without_window() {
        let (platform, _) = platform();
        assert!(platform.window().is_none());
        assert_eq!(platform.frame, 0);
    }

    #[test]
    fn error_display() {
        let error =
            PlatformError::EventLoopCreation(winit::error::EventLoopError::RecreationAttempt);
        assert!(error.to_string().starts_with("Event loop creation failed"));
        assert!(std::error::Error::source(&error).is_some());
    }

    //=====================================================================
    // Frame Boundary Tests
    //=====================================================================

    #[test]
    fn redraw_dispatches_frame_then_pumps_queue() {
        let (mut platform, events) = platform();
        let order = Rc::new(RefCell::new(Vec::new()));

        let sink = order.clone();
        let _frames = Handler::with_callback(
            &events,
            move |e: &FrameStarted| {
                sink.borrow_mut().push(format!("frame {}", e.frame));
                false
            },
            Priority::NORMAL,
        );
        let sink = order.clone();
        let _ended = Handler::with_callback(
            &events,
            move |e: &FrameEnded| {
                sink.borrow_mut().push(format!("end {}", e.frame));
                false
            },
            Priority::NORMAL,
        );
        let sink = order.clone();
        let _posted = Handler::with_callback(
            &events,
            move |e: &Posted| {
                sink.borrow_mut().push(format!("posted {}", e.0));
                false
            },
            Priority::NORMAL,
        );

        platform.queue.sender().send(Posted(7)).unwrap();
        let control = platform.handle_window_event(&WindowEvent::RedrawRequested);
        platform.handle_window_event(&WindowEvent::RedrawRequested);

        assert_eq!(control, LoopControl::Continue);
        assert_eq!(
            *order.borrow(),
            vec!["frame 0", "posted 7", "end 0", "frame 1", "end 1"]
        );
    }

    #[test]
    fn frame_subscribers_read_input_before_it_resets() {
        let (mut platform, events) = platform();
        let input = Rc::new(InputState::new(&events));
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = seen.clone();
        let _game = Handler::with_callback(
            &events,
            bind(&input, move |input: &InputState, _: &FrameStarted| {
                sink.borrow_mut().push(input.was_key_pressed(KeyCode::Space));
                false
            }),
            Priority::NORMAL,
        );

        events.dispatch(&KeyPressed {
            key: KeyCode::Space,
            modifiers: Modifiers::NONE,
        });
        platform.handle_window_event(&WindowEvent::RedrawRequested);
        platform.handle_window_event(&WindowEvent::RedrawRequested);

        assert_eq!(*seen.borrow(), vec![true, false]);
        assert!(input.is_key_down(KeyCode::Space));
    }

    #[test]
    fn run_frame_reports_pumped_count() {
        let (mut platform, _events) = platform();
        let sender = platform.queue.sender();
        sender.send(Posted(1)).unwrap();
        sender.send(Posted(2)).unwrap();

        assert_eq!(platform.run_frame(), 2);
        assert_eq!(platform.run_frame(), 0);
    }

    //=====================================================================
    // Window Event Tests
    //=====================================================================

    #[test]
    fn close_dispatches_window_closed_and_exits() {
        let (mut platform, events) = platform();
        let closed = Rc::new(RefCell::new(0));

        let sink = closed.clone();
        let _handler = Handler::with_callback(
            &events,
            move |_: &WindowClosed| {
                *sink.borrow_mut() += 1;
                false
            },
            Priority::NORMAL,
        );

        assert_eq!(
            platform.handle_window_event(&WindowEvent::CloseRequested),
            LoopControl::Exit
        );
        assert_eq!(*closed.borrow(), 1);
    }

    #[test]
    fn resize_is_translated_and_continues() {
        let (mut platform, events) = platform();
        let sizes = Rc::new(RefCell::new(Vec::new()));

        let sink = sizes.clone();
        let _handler = Handler::with_callback(
            &events,
            move |e: &WindowResized| {
                sink.borrow_mut().push((e.width, e.height));
                false
            },
            Priority::NORMAL,
        );

        let resized = WindowEvent::Resized(PhysicalSize::new(640, 480));
        let control = platform.handle_window_event(&resized);
        assert_eq!(control, LoopControl::Continue);
        assert_eq!(*sizes.borrow(), vec![(640, 480)]);
    }
}
