//=========================================================================
// Event Log Demo
//
// Opens a window and logs every engine event it produces.
//
// - A HIGH priority "overlay" swallows clicks in the top-left corner
// - `InputState` observes everything at MONITOR priority
// - A worker thread posts `Heartbeat` events through the queue
//
// Run with:
//   RUST_LOG=debug cargo run --example event_log
//
//=========================================================================

use std::cell::RefCell;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use log::{info, LevelFilter};
use zore::prelude::*;

//=== Events ==============================================================

/// Posted once a second from the worker thread.
#[derive(Debug)]
struct Heartbeat(u64);

//=== Console =============================================================

/// Application layer: logs input and tracks the cursor for the overlay.
#[derive(Default)]
struct Console {
    cursor: (f32, f32),
    clicks: u32,
}

impl Console {
    fn on_key(&mut self, event: &KeyPressed) -> bool {
        info!("Key {:?} ({:?})", event.key, event.modifiers);
        false
    }

    fn on_text(&mut self, event: &KeyTyped) -> bool {
        info!("Typed {:?}", event.character);
        false
    }

    fn on_moved(&mut self, event: &MouseMoved) -> bool {
        self.cursor = (event.x, event.y);
        false
    }

    fn on_click(&mut self, event: &MousePressed) -> bool {
        self.clicks += 1;
        info!(
            "Click #{} {:?} at ({:.0}, {:.0})",
            self.clicks, event.button, self.cursor.0, self.cursor.1
        );
        false
    }

    fn on_resize(&mut self, event: &WindowResized) -> bool {
        info!(
            "Resized to {}x{} (aspect {:.2})",
            event.width, event.height, event.aspect_ratio
        );
        false
    }

    fn on_heartbeat(&mut self, event: &Heartbeat) -> bool {
        info!("Heartbeat {} ({} click(s) so far)", event.0, self.clicks);
        false
    }
}

//=== Entry Point =========================================================

fn main() -> Result<(), PlatformError> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("winit", LevelFilter::Warn)
        .init();

    let engine = EngineBuilder::new()
        .with_title("zore - event log")
        .with_size(1024, 768)
        .build();
    let events = engine.events();

    //--- Subscribers ------------------------------------------------------

    let input = InputState::new(events);
    let console = Rc::new(RefCell::new(Console::default()));

    let mut handlers = MultiHandler::new(events);
    handlers.register(bind_mut(&console, Console::on_key));
    handlers.register(bind_mut(&console, Console::on_text));
    handlers.register(bind_mut(&console, Console::on_moved));
    handlers.register(bind_mut(&console, Console::on_click));
    handlers.register(bind_mut(&console, Console::on_resize));
    handlers.register(bind_mut(&console, Console::on_heartbeat));

    let overlay_input = Rc::new(input);
    let _overlay = Handler::with_callback(
        events,
        bind(&overlay_input, |input: &InputState, event: &MousePressed| {
            let (x, y) = input.cursor_position();
            let inside = x < 200.0 && y < 100.0;
            if inside {
                info!("Overlay swallowed {:?} click", event.button);
            }
            inside
        }),
        Priority::HIGH,
    );

    let _escape = Handler::with_callback(
        events,
        |event: &KeyPressed| {
            if event.key == KeyCode::Escape {
                info!("Escape pressed; close the window to exit");
            }
            false
        },
        Priority::LOW,
    );

    let _closed = Handler::with_callback(
        events,
        |_: &WindowClosed| {
            info!("Window closed");
            false
        },
        Priority::MONITOR,
    );

    //--- Worker Thread ----------------------------------------------------

    let sender = engine.sender();
    thread::spawn(move || {
        let mut beat = 0;
        // Ends once the engine (and its queue) is gone.
        while sender.send(Heartbeat(beat)).is_ok() {
            beat += 1;
            thread::sleep(Duration::from_secs(1));
        }
    });

    info!("Subscribed: {:?}", handlers);
    engine.run()
}
