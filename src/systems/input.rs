//! Keyboard input → player intent.

use sdl2::keyboard::Scancode;

use crate::direction::Direction;
use crate::ecs::{Components, Entity, Input, Intent, Store};
use crate::error::GameResult;

/// Instantaneous key-down state, indexable by scancode.
///
/// The seam that keeps the simulation testable without SDL: the real
/// implementation is `sdl2`'s `KeyboardState`, tests use a `HashSet`.
pub trait KeySource {
    fn is_pressed(&self, scancode: Scancode) -> bool;
}

impl KeySource for sdl2::keyboard::KeyboardState<'_> {
    fn is_pressed(&self, scancode: Scancode) -> bool {
        self.is_scancode_pressed(scancode)
    }
}

impl KeySource for std::collections::HashSet<Scancode> {
    fn is_pressed(&self, scancode: Scancode) -> bool {
        self.contains(&scancode)
    }
}

/// Reads key state for every player-controlled entity and updates its
/// intent.
///
/// At most one desired direction is active at a time, picked by fixed
/// priority (up > down > left > right) among the pressed keys whose
/// direction is not wall-blocked. Choosing a *new* direction releases all
/// four blocked flags. With no eligible key pressed the intent is left
/// alone, so the entity keeps gliding.
#[derive(Default)]
pub struct InputSystem {
    entities: Vec<Entity>,
}

impl InputSystem {
    const REQUIRED: Components = Components::INPUT
        .union(Components::INTENT)
        .union(Components::PLAYER_CONTROLLED);

    pub fn new() -> InputSystem {
        InputSystem::default()
    }

    /// Adds newly-qualifying entities from the change log.
    pub fn sync(&mut self, store: &Store) {
        for record in store.added() {
            if !record.prev.contains(Self::REQUIRED) && record.next.contains(Self::REQUIRED) {
                self.entities.push(record.entity);
            }
        }
    }

    /// Entities currently tracked by this system's interest set.
    pub fn tracked(&self) -> usize {
        self.entities.len()
    }

    pub fn run(&mut self, store: &mut Store, keys: &impl KeySource) -> GameResult<()> {
        let mut i = 0;
        while i < self.entities.len() {
            let entity = self.entities[i];
            if !store.is_alive(entity) || !store.has(entity, Self::REQUIRED)? {
                self.entities.swap_remove(i);
                continue;
            }

            let bindings = *store.get::<Input>(entity)?;
            let intent = store.get_mut::<Intent>(entity)?;

            let pressed = [
                (Direction::Up, bindings.up),
                (Direction::Down, bindings.down),
                (Direction::Left, bindings.left),
                (Direction::Right, bindings.right),
            ];
            let choice = pressed
                .iter()
                .find(|(direction, scancode)| keys.is_pressed(*scancode) && !intent.is_blocked(*direction))
                .map(|(direction, _)| *direction);

            if let Some(direction) = choice {
                if intent.active() != Some(direction) {
                    intent.set_direction(direction);
                    intent.clear_all_blocked();
                }
            }

            i += 1;
        }
        Ok(())
    }
}
