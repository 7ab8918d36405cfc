//! warden library
//!
//! The binary is a thin clap front end; everything it does lives here so
//! integration tests can drive it.

pub mod app_state;
pub mod commands;
pub mod fixture;
pub mod init_tracing;
pub mod settings;

pub use app_state::AppState;
