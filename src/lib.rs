// Library target exists for the integration tests in tests/.
// The binary entry point is main.rs; this file re-declares the module tree
// so tests can import types via `qwertype::course::*` / `qwertype::session::*`.
// Most code is only exercised through the binary, so suppress dead_code warnings.
#![allow(dead_code)]

// Public: exercised directly by integration tests
pub mod course;
pub mod session;
pub mod store;
pub mod sync;

// Private: required transitively (won't compile without them)
mod app;
mod config;
mod event;
mod generator;
mod keyboard;
mod ui;

rust_i18n::i18n!("locales", fallback = "en");
