//! Client-side game systems
//!
//! Organized into submodules for maintainability.

mod controller;
mod player;
mod world;

// Re-export everything for easy access from main.rs
pub use controller::*;
pub use player::*;
pub use world::*;
