//! Controller layer: UI events, user intents, and command orchestration.

pub mod actions;
pub mod events;
pub mod orchestration;
