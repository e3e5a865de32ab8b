//! Terminal reader components.
//!
//! The binary wires these together; they are a library so the dispatch
//! logic can be tested without a terminal or network.

pub mod browse;
pub mod logging;
pub mod message;
pub mod playback;
pub mod render;
pub mod runtime;
pub mod settings;
pub mod state;
pub mod update;
