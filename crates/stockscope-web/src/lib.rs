//! HTTP surface for stockscope: configuration, routing, and the embedded
//! dashboard page. The binary in `main.rs` is a thin wrapper around
//! [`api::app_router`] and [`state::build_state`].

pub mod api;
pub mod config;
pub mod error;
pub mod state;

pub use state::{build_state, init_tracing, AppState};
