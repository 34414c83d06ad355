//! The bespoke entity/component store.
//!
//! Entities are opaque ids; what an entity *is* is defined entirely by the
//! set of components attached to it, summarized in a per-entity capability
//! mask. The mask doubles as the tag set used by collision classification.

use std::fmt;

use bitflags::bitflags;
use glam::Vec2;
use sdl2::keyboard::Scancode;
use sdl2::rect::Rect;

use crate::direction::Direction;
use crate::physics::BodyHandle;

mod store;

pub use store::{AddedMask, Attach, Component, Store, Table};

/// An opaque entity id. Ids are never reused; destroying an entity
/// invalidates its id immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(pub(crate) u32);

impl Entity {
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

bitflags! {
    /// Capability mask: one bit per component type.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Components: u16 {
        const POSITION = 1 << 0;
        const DRAWABLE = 1 << 1;
        const COLLIDER = 1 << 2;
        const INPUT = 1 << 3;
        const INTENT = 1 << 4;
        const PELLET = 1 << 5;
        const PLAYER_STATS = 1 << 6;
        const PLAYER_CONTROLLED = 1 << 7;
        const GHOST = 1 << 8;
        const WALL = 1 << 9;
        const BACKGROUND = 1 << 10;
    }
}

/// World-space position plus sprite rotation in degrees.
///
/// Written back from the physics body after every step; collision
/// resolution also nudges it when backing an entity out of a wall.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub point: Vec2,
    pub angle: f32,
}

/// A rectangular region of the sprite atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteRegion {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl SpriteRegion {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

/// Two alternating sprite frames plus a render size and the frame counter
/// advanced by the render system.
///
/// The counter is also read by the AI system (decision timing) and by
/// collision resolution (perpendicular-redirect parity tie-break).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drawable {
    pub frames: [SpriteRegion; 2],
    pub size: Vec2,
    pub frame: u32,
}

/// The physics body backing this entity. Every entity carrying this
/// component owns exactly one live body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collider {
    pub body: BodyHandle,
}

/// The player's configured movement keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Input {
    pub up: Scancode,
    pub down: Scancode,
    pub left: Scancode,
    pub right: Scancode,
}

impl Default for Input {
    fn default() -> Self {
        Input {
            up: Scancode::Up,
            down: Scancode::Down,
            left: Scancode::Left,
            right: Scancode::Right,
        }
    }
}

/// Desired movement direction plus per-direction wall locks.
///
/// At most one desired flag is true at a time. A blocked flag records that
/// the matching direction is currently obstructed by a wall; movement
/// ignores desired directions that are blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Intent {
    desired: [bool; 4],
    blocked: [bool; 4],
}

impl Intent {
    /// The single active desired direction, if any.
    pub fn active(&self) -> Option<Direction> {
        Direction::ALL.into_iter().find(|d| self.desired[d.index()])
    }

    /// Replaces the desired direction. Blocked flags are untouched.
    pub fn set_direction(&mut self, direction: Direction) {
        self.desired = [false; 4];
        self.desired[direction.index()] = true;
    }

    pub fn clear_direction(&mut self, direction: Direction) {
        self.desired[direction.index()] = false;
    }

    pub fn is_desired(&self, direction: Direction) -> bool {
        self.desired[direction.index()]
    }

    /// True when the direction is desired and not wall-locked.
    pub fn moving(&self, direction: Direction) -> bool {
        self.desired[direction.index()] && !self.blocked[direction.index()]
    }

    pub fn is_blocked(&self, direction: Direction) -> bool {
        self.blocked[direction.index()]
    }

    pub fn set_blocked(&mut self, direction: Direction) {
        self.blocked[direction.index()] = true;
    }

    pub fn clear_all_blocked(&mut self) {
        self.blocked = [false; 4];
    }

    /// Clears the blocked flags of every direction except `keep`, releasing
    /// stale locks while still respecting the wall on the leading edge.
    pub fn clear_blocked_except(&mut self, keep: Direction) {
        for direction in Direction::ALL {
            if direction != keep {
                self.blocked[direction.index()] = false;
            }
        }
    }
}

/// What kind of pellet an entity is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PelletKind {
    Normal,
    Power,
}

impl PelletKind {
    pub fn points(&self) -> u32 {
        match self {
            PelletKind::Normal => crate::constants::NORMAL_PELLET_POINTS,
            PelletKind::Power => crate::constants::POWER_PELLET_POINTS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pellet {
    pub kind: PelletKind,
}

/// Score and remaining lives. Only the player entity carries this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerStats {
    pub score: u32,
    pub lives: u32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        PlayerStats { score: 0, lives: 3 }
    }
}

/// Tag component for the player-controlled entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerControlled;

/// Tag component for ghost entities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ghost;

/// Wall marker, carrying the wall's full extents for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub size: Vec2,
}

/// Tag component for the static backdrop, which survives game over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Background;
