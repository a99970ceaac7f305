//! Progress clock - an elapsed-time display
//!
//! Counts seconds from `start` to `stop` and renders them as `HH:MM:SS`:
//! - in the browser (`wasm` feature) into the `#progress_time` element
//! - on the terminal (`cli` feature) via the `progress-clock` binary

pub mod core;
pub mod time;

#[cfg(all(feature = "cli", not(target_arch = "wasm32")))]
pub mod native;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub mod web;
