// src/telemetry/mod.rs

pub mod collector;

pub use collector::{ProcessInfo, SystemInfoCollector, SystemInfoSnapshot};
