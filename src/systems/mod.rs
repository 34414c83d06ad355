//! The per-tick gameplay systems.
//!
//! Input, AI and Movement keep private interest sets, resynchronized
//! incrementally from the store's change log instead of rescanning every
//! entity each tick. Collision resolution is event-driven and works from
//! the physics adapter's contact list; spawn owns the entity factories and
//! the game-over teardown; render is a thin pass over Position+Drawable.

pub mod ai;
pub mod collision;
pub mod input;
pub mod movement;
pub mod render;
pub mod spawn;

pub use ai::AiSystem;
pub use collision::{resolve, Outcome};
pub use input::{InputSystem, KeySource};
pub use movement::MovementSystem;
