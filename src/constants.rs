//! This module contains all the constants used in the game.

use std::time::Duration;

use crate::ecs::SpriteRegion;

/// Wall-clock period of one tick (60 Hz).
pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);
/// Fixed physics timestep, matching the tick rate.
pub const TICK_DT: f32 = 1.0 / 60.0;
/// Fixed velocity-solver iteration count for the physics step.
pub const SOLVER_ITERATIONS: usize = 4;

pub const WINDOW_WIDTH: u32 = 1280;
pub const WINDOW_HEIGHT: u32 = 800;

/// The size of each board cell, in pixels.
pub const CELL_SIZE: f32 = 40.0;
/// The size of the game board, in cells.
pub const BOARD_WIDTH: usize = 32;
pub const BOARD_HEIGHT: usize = 20;

/// Speed of the player and ghosts along either axis, in pixels per second.
pub const MOVE_SPEED: f32 = 120.0;
/// How far an entity is pushed back out of a wall it just touched, in pixels.
/// Keeps the next tick's broad phase from re-reporting the same contact.
pub const WALL_BACKOFF: f32 = 2.0;

/// Collision radius of the player and ghosts, in pixels. Smaller than half a
/// cell so actors can slide past wall corners.
pub const ACTOR_RADIUS: f32 = 14.0;
/// On-screen sprite size of the player and ghosts, in pixels.
pub const ACTOR_SIZE: f32 = 32.0;
pub const PELLET_RADIUS: f32 = 4.0;
pub const POWER_PELLET_RADIUS: f32 = 8.0;

/// A ghost picks a fresh random direction whenever its animation frame
/// counter is a multiple of this.
pub const GHOST_DECISION_INTERVAL: u32 = 30;
/// How many ticks each of the two sprite frames is shown for.
pub const FRAME_PERIOD: u32 = 8;

/// Points awarded for a normal and a power pellet.
pub const NORMAL_PELLET_POINTS: u32 = 10;
pub const POWER_PELLET_POINTS: u32 = 50;

/// The raw layout of the game board.
///
/// `#` wall, `.` pellet, `o` power pellet, `0` player spawn, `1`-`4` ghost
/// spawns, space empty.
pub const RAW_BOARD: [&str; BOARD_HEIGHT] = [
    "################################",
    "#..............................#",
    "#.####.#####.######.#####.####.#",
    "#o####.#####.######.#####.####o#",
    "#..............................#",
    "#.####.##.############.##.####.#",
    "#......##..............##......#",
    "######.####.########.####.######",
    "#......#...####  ####...#......#",
    "#......#...# 12  34 #...#......#",
    "#......#...##########...#......#",
    "#......#................#......#",
    "######.####.########.####.######",
    "#......##..............##......#",
    "#.####.##.############.##.####.#",
    "#..............0...............#",
    "#.####.#####.######.#####.####.#",
    "#o####.#####.######.#####.####o#",
    "#..............................#",
    "################################",
];

/// Dimensions of the runtime-built sprite atlas, in pixels.
pub const ATLAS_WIDTH: u32 = 512;
pub const ATLAS_HEIGHT: u32 = 32;

/// The player's two chomp frames.
pub const PLAYER_TEX: [SpriteRegion; 2] = [
    SpriteRegion { x: 0, y: 0, w: 32, h: 32 },
    SpriteRegion { x: 32, y: 0, w: 32, h: 32 },
];

/// Per-ghost two-frame leg-wiggle sprites.
pub const GHOST_TEX: [[SpriteRegion; 2]; 4] = [
    [
        SpriteRegion { x: 64, y: 0, w: 32, h: 32 },
        SpriteRegion { x: 96, y: 0, w: 32, h: 32 },
    ],
    [
        SpriteRegion { x: 128, y: 0, w: 32, h: 32 },
        SpriteRegion { x: 160, y: 0, w: 32, h: 32 },
    ],
    [
        SpriteRegion { x: 192, y: 0, w: 32, h: 32 },
        SpriteRegion { x: 224, y: 0, w: 32, h: 32 },
    ],
    [
        SpriteRegion { x: 256, y: 0, w: 32, h: 32 },
        SpriteRegion { x: 288, y: 0, w: 32, h: 32 },
    ],
];

pub const PELLET_TEX: SpriteRegion = SpriteRegion { x: 384, y: 0, w: 8, h: 8 };
pub const POWER_PELLET_TEX: SpriteRegion = SpriteRegion { x: 384, y: 16, w: 16, h: 16 };
pub const WALL_TEX: SpriteRegion = SpriteRegion { x: 416, y: 0, w: 32, h: 32 };
pub const BACKGROUND_TEX: SpriteRegion = SpriteRegion { x: 448, y: 0, w: 32, h: 32 };
