// WolPanel - app/mod.rs
//
// Application layer: relay client, request sequencing, log polling and
// persistence, state management.
// Dependencies: core layer, util.
// Must NOT depend on: ui.

pub mod api;
pub mod config_sync;
pub mod controller;
pub mod log_manager;
pub mod log_poll;
pub mod log_store;
pub mod state;
