//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use zore::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{Engine, EngineBuilder, EngineConfig};
pub use crate::platform::PlatformError;

// Event system
pub use crate::core::event::{
    bind, bind_mut, Event, EventHandler, EventManager, EventQueue, EventQueueError, EventSender,
    EventTypeId, Handler, MultiHandler, Priority, SubscriberId,
};

// Engine events
pub use crate::core::event::types::*;

// Input system
pub use crate::core::input::InputState;
