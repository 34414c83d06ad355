//! Ghost decision making.
//!
//! There is no pathfinding: every [`GHOST_DECISION_INTERVAL`] animation
//! frames a ghost discards its intent and picks one of the four cardinal
//! directions uniformly at random. Wall contacts (see the collision system)
//! are what keep the result corridor-shaped.

use rand::Rng;

use crate::constants::GHOST_DECISION_INTERVAL;
use crate::direction::Direction;
use crate::ecs::{Components, Drawable, Entity, Intent, Store};
use crate::error::GameResult;

#[derive(Default)]
pub struct AiSystem {
    entities: Vec<Entity>,
}

impl AiSystem {
    const REQUIRED: Components = Components::GHOST
        .union(Components::INTENT)
        .union(Components::DRAWABLE);

    pub fn new() -> AiSystem {
        AiSystem::default()
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

    pub fn run(&mut self, store: &mut Store, rng: &mut impl Rng) -> GameResult<()> {
        let mut i = 0;
        while i < self.entities.len() {
            let entity = self.entities[i];
            if !store.is_alive(entity) || !store.has(entity, Self::REQUIRED)? {
                self.entities.swap_remove(i);
                continue;
            }

            let frame = store.get::<Drawable>(entity)?.frame;
            if frame % GHOST_DECISION_INTERVAL == 0 {
                let direction = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
                store.get_mut::<Intent>(entity)?.set_direction(direction);
            }

            i += 1;
        }
        Ok(())
    }
}
