//! Chromium backend for the lineup engine, driven over the DevTools protocol.

pub mod backend;
pub mod cdp;
pub mod inject;

pub use backend::ChromiumBackend;
pub use cdp::LaunchOptions;
