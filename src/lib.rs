//! Chomper game library crate.

pub mod constants;
pub mod direction;
pub mod ecs;
pub mod error;
pub mod game;
pub mod maze;
pub mod physics;
pub mod systems;
pub mod texture;
