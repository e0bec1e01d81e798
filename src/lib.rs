//=========================================================================
// Zore Engine - Library Root
//
// This crate defines the public API surface of the Zore engine.
//
// Responsibilities:
// - Expose the engine interface (`Engine`, `EngineBuilder`)
// - Expose the event system (`core::event`) and input observer
//   (`core::input`) for application code
// - Keep Winit integration (`platform`) hidden from end users
//
// Typical usage:
// ```no_run
// use zore::prelude::*;
//
// fn main() -> Result<(), PlatformError> {
//     EngineBuilder::new().with_title("Sandbox").build().run()
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the event dispatch system and the input observer built
// on it. Application code subscribes through `core::event`.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains the Winit event loop and window; it produces
// events but is not part of the public API surface.
//
// `engine` defines the main engine entry point and configuration.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder, EngineConfig};
pub use platform::PlatformError;
