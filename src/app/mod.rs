// Pickup Tracker - app/mod.rs
//
// Application layer: state management and the background import lifecycle.
// Dependencies: core, platform, util.
// Must NOT depend on: ui.

pub mod import;
pub mod state;
