//! This module contains the main game state and the tick scheduler.

use rand::rngs::StdRng;
use rand::SeedableRng;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use tracing::{debug, info};

use crate::constants::{GHOST_TEX, RAW_BOARD};
use crate::ecs::{PlayerStats, Store};
use crate::error::GameResult;
use crate::maze::MazeLayout;
use crate::physics::PhysicsWorld;
use crate::systems::{render, resolve, spawn, AiSystem, InputSystem, KeySource, MovementSystem, Outcome};
use crate::texture::build_atlas;

/// High-level game state. `GameOver` is terminal: the loop keeps rendering
/// whatever survived the teardown but runs no further gameplay updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    GameOver,
}

/// Owns the store, the physics world and the systems, and runs them in the
/// fixed per-tick order.
pub struct Game {
    store: Store,
    physics: PhysicsWorld,
    layout: MazeLayout,
    input: InputSystem,
    ai: AiSystem,
    movement: MovementSystem,
    rng: StdRng,
    state: GameState,
    atlas: Texture,
}

impl Game {
    /// Builds the world: backdrop, maze walls, pellets, the player and four
    /// ghosts, plus the sprite atlas.
    pub fn new(canvas: &mut Canvas<Window>, texture_creator: &TextureCreator<WindowContext>) -> GameResult<Game> {
        info!("building world");
        let atlas = build_atlas(canvas, texture_creator)?;
        let layout = MazeLayout::parse(&RAW_BOARD)?;

        let mut store = Store::new();
        let mut physics = PhysicsWorld::new();

        spawn::spawn_background(&mut store)?;
        for segment in &layout.walls {
            spawn::spawn_wall(&mut store, &mut physics, segment)?;
        }
        for pellet in &layout.pellets {
            spawn::spawn_pellet(&mut store, &mut physics, pellet.position, pellet.kind)?;
        }
        spawn::spawn_player(&mut store, &mut physics, layout.player_spawn, PlayerStats::default())?;
        for (ghost, spawn_point) in layout.ghost_spawns.iter().enumerate() {
            spawn::spawn_ghost(&mut store, &mut physics, *spawn_point, GHOST_TEX[ghost])?;
        }
        debug!(
            walls = layout.walls.len(),
            pellets = layout.pellets.len(),
            "world ready"
        );

        Ok(Game {
            store,
            physics,
            layout,
            input: InputSystem::new(),
            ai: AiSystem::new(),
            movement: MovementSystem::new(),
            rng: StdRng::from_os_rng(),
            state: GameState::Playing,
            atlas,
        })
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Runs one fixed tick: interest-set sync, change-log clear, then
    /// input → AI → movement → physics step → transform read-back →
    /// collision resolution.
    ///
    /// Syncs run before the log is cleared so that entities created
    /// mid-tick (respawns) stay logged for the next tick's sync.
    pub fn tick(&mut self, keys: &impl KeySource) -> GameResult<()> {
        if self.state == GameState::GameOver {
            return Ok(());
        }

        self.input.sync(&self.store);
        self.ai.sync(&self.store);
        self.movement.sync(&self.store);
        self.store.clear_added();

        self.input.run(&mut self.store, keys)?;
        self.ai.run(&mut self.store, &mut self.rng)?;
        self.movement.run(&mut self.store, &mut self.physics)?;

        let contacts = self.physics.step();
        self.physics.sync_transforms(&mut self.store)?;
        if resolve(&mut self.store, &mut self.physics, &self.layout, &contacts)? == Outcome::GameOver {
            self.state = GameState::GameOver;
        }
        Ok(())
    }

    pub fn draw(&mut self, canvas: &mut Canvas<Window>) -> GameResult<()> {
        render::render_system(&mut self.store, canvas, &self.atlas)
    }
}
