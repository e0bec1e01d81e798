//=========================================================================
// Core Systems
//
// - `event`: type-indexed, priority-ordered event dispatch
// - `input`: keyboard/mouse state observed from dispatched events
//
//=========================================================================

pub mod event;
pub mod input;
