//! Startup wiring.

pub mod state;
