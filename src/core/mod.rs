// WolPanel - core/mod.rs
//
// Core business logic layer.
// Dependencies: serde, chrono, regex, csv only.
// Must NOT depend on: ui, platform, app, or any network/file I/O.

pub mod clients;
pub mod export;
pub mod filter;
pub mod model;
pub mod validate;
