// WolPanel - ui/panels/mod.rs

pub mod about;
pub mod clients;
pub mod confirm;
pub mod logs;
