//! mediadesk - terminal admin console for a media catalog REST backend
//!
//! The binary in `main.rs` wires these modules to a crossterm terminal;
//! everything below is also usable (and tested) as a library.

pub mod api;
pub mod app;
pub mod config;
pub mod controller;
pub mod event;
pub mod resource;
pub mod stats;
pub mod ui;

/// Version injected at compile time via MEDIADESK_VERSION env var (set by CI/CD),
/// or the crate version for local builds.
pub const VERSION: &str = match option_env!("MEDIADESK_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};
