//! Core game module containing shared components, resources, events, and constants.

mod board;
mod components;
mod config;
mod constants;
mod events;
mod resources;

pub use board::*;
pub use components::*;
pub use config::*;
pub use constants::*;
pub use events::*;
pub use resources::*;
