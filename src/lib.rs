// Library target for integration tests under tests/.
// The binary entry point is main.rs; this file re-declares the module tree so
// tests can drive the session and store through `quizr::session::*` / `quizr::store::*`.
// Some items are only reached from the binary, so suppress dead_code warnings here.
#![allow(dead_code)]

pub mod app;
pub mod bank;
pub mod config;
pub mod error;
pub mod event;
pub mod session;
pub mod store;
pub mod ui;
