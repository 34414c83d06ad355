//! Intent → velocity commands on the physics bodies.

use glam::Vec2;

use crate::constants::MOVE_SPEED;
use crate::direction::Direction;
use crate::ecs::{Collider, Components, Entity, Intent, Store};
use crate::error::GameResult;
use crate::physics::PhysicsWorld;

/// Converts each entity's unblocked intent into a velocity command.
///
/// For the player the system also turns the body to face the active
/// direction and releases the blocked flags of the three non-active
/// directions. That is what allows an immediate reversal while the wall on
/// the current leading edge stays locked.
#[derive(Default)]
pub struct MovementSystem {
    entities: Vec<Entity>,
}

impl MovementSystem {
    const REQUIRED: Components = Components::INTENT
        .union(Components::COLLIDER)
        .union(Components::POSITION);

    pub fn new() -> MovementSystem {
        MovementSystem::default()
    }

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

    pub fn run(&mut self, store: &mut Store, physics: &mut PhysicsWorld) -> GameResult<()> {
        let mut i = 0;
        while i < self.entities.len() {
            let entity = self.entities[i];
            if !store.is_alive(entity) || !store.has(entity, Self::REQUIRED)? {
                self.entities.swap_remove(i);
                continue;
            }

            let intent = *store.get::<Intent>(entity)?;
            let body = store.get::<Collider>(entity)?.body;

            let x = if intent.moving(Direction::Left) {
                -MOVE_SPEED
            } else if intent.moving(Direction::Right) {
                MOVE_SPEED
            } else {
                0.0
            };
            let y = if intent.moving(Direction::Up) {
                -MOVE_SPEED
            } else if intent.moving(Direction::Down) {
                MOVE_SPEED
            } else {
                0.0
            };
            physics.set_velocity(body, Vec2::new(x, y));

            if store.has(entity, Components::PLAYER_CONTROLLED)? {
                if let Some(active) = intent.active() {
                    physics.set_rotation(body, active.angle());
                    store.get_mut::<Intent>(entity)?.clear_blocked_except(active);
                }
            }

            i += 1;
        }
        Ok(())
    }
}
