//! Routescore CLI library.
//!
//! Argument parsing helpers, input loading, output rendering and logging
//! setup for the `routescore` binary. Command handlers live in
//! [`commands`].

pub mod commands;
pub mod input;
pub mod logging;
pub mod output;
