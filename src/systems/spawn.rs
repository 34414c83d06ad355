//! Entity factories and the paired destroy path.
//!
//! Every factory attaches the full component set and creates the matching
//! physics body in one place, so the "one live body per Collider" invariant
//! has a single owner. `despawn` is the only way entities with bodies are
//! destroyed.

use glam::Vec2;
use tracing::{debug, info};

use crate::constants::{
    ACTOR_RADIUS, ACTOR_SIZE, BACKGROUND_TEX, PELLET_RADIUS, PELLET_TEX, PLAYER_TEX, POWER_PELLET_RADIUS,
    POWER_PELLET_TEX, WALL_TEX, WINDOW_HEIGHT, WINDOW_WIDTH,
};
use crate::ecs::{
    Background, Collider, Components, Drawable, Entity, Ghost, Input, Intent, Pellet, PelletKind, PlayerControlled,
    PlayerStats, Position, SpriteRegion, Store, Wall,
};
use crate::error::GameResult;
use crate::maze::WallSegment;
use crate::physics::{BodyKind, BodyShape, PhysicsWorld};

pub fn spawn_player(
    store: &mut Store,
    physics: &mut PhysicsWorld,
    position: Vec2,
    stats: PlayerStats,
) -> GameResult<Entity> {
    let entity = store.create();
    let body = physics.create_body(entity, BodyKind::Kinematic, position, BodyShape::Circle(ACTOR_RADIUS), true);
    store.attach(
        entity,
        (
            Position { point: position, angle: 0.0 },
            Drawable {
                frames: PLAYER_TEX,
                size: Vec2::splat(ACTOR_SIZE),
                frame: 0,
            },
            Collider { body },
            Input::default(),
            Intent::default(),
            stats,
            PlayerControlled,
        ),
    )?;
    debug!(%entity, ?position, lives = stats.lives, "spawned player");
    Ok(entity)
}

pub fn spawn_ghost(
    store: &mut Store,
    physics: &mut PhysicsWorld,
    position: Vec2,
    frames: [SpriteRegion; 2],
) -> GameResult<Entity> {
    let entity = store.create();
    let body = physics.create_body(entity, BodyKind::Kinematic, position, BodyShape::Circle(ACTOR_RADIUS), true);
    store.attach(
        entity,
        (
            Position { point: position, angle: 0.0 },
            Drawable {
                frames,
                size: Vec2::splat(ACTOR_SIZE),
                frame: 0,
            },
            Collider { body },
            Intent::default(),
            Ghost,
        ),
    )?;
    debug!(%entity, ?position, "spawned ghost");
    Ok(entity)
}

pub fn spawn_pellet(
    store: &mut Store,
    physics: &mut PhysicsWorld,
    position: Vec2,
    kind: PelletKind,
) -> GameResult<Entity> {
    let (radius, region) = match kind {
        PelletKind::Normal => (PELLET_RADIUS, PELLET_TEX),
        PelletKind::Power => (POWER_PELLET_RADIUS, POWER_PELLET_TEX),
    };
    let entity = store.create();
    let body = physics.create_body(entity, BodyKind::Static, position, BodyShape::Circle(radius), true);
    store.attach(
        entity,
        (
            Position { point: position, angle: 0.0 },
            Drawable {
                frames: [region, region],
                size: Vec2::splat(radius * 2.0),
                frame: 0,
            },
            Collider { body },
            Pellet { kind },
        ),
    )?;
    Ok(entity)
}

pub fn spawn_wall(store: &mut Store, physics: &mut PhysicsWorld, segment: &WallSegment) -> GameResult<Entity> {
    let entity = store.create();
    let body = physics.create_body(entity, BodyKind::Static, segment.center, BodyShape::Box(segment.half), true);
    store.attach(
        entity,
        (
            Position { point: segment.center, angle: 0.0 },
            Drawable {
                frames: [WALL_TEX, WALL_TEX],
                size: segment.size(),
                frame: 0,
            },
            Collider { body },
            Wall { size: segment.size() },
        ),
    )?;
    Ok(entity)
}

/// The backdrop has no body and survives game over.
pub fn spawn_background(store: &mut Store) -> GameResult<Entity> {
    let entity = store.create();
    store.attach(
        entity,
        (
            Position {
                point: Vec2::new(WINDOW_WIDTH as f32 / 2.0, WINDOW_HEIGHT as f32 / 2.0),
                angle: 0.0,
            },
            Drawable {
                frames: [BACKGROUND_TEX, BACKGROUND_TEX],
                size: Vec2::new(WINDOW_WIDTH as f32, WINDOW_HEIGHT as f32),
                frame: 0,
            },
            Background,
        ),
    )?;
    Ok(entity)
}

/// Destroys an entity and, if it owns a body, the body with it: paired and
/// immediate, never deferred.
pub fn despawn(store: &mut Store, physics: &mut PhysicsWorld, entity: Entity) -> GameResult<()> {
    if store.has(entity, Components::COLLIDER)? {
        let body = store.get::<Collider>(entity)?.body;
        physics.destroy_body(body);
    }
    store.destroy(entity)?;
    Ok(())
}

/// Game-over teardown: destroys every collider-owning entity that is not
/// tagged as background, in ascending id order.
pub fn clear_board(store: &mut Store, physics: &mut PhysicsWorld) -> GameResult<()> {
    let mut doomed = Vec::new();
    for entity in store.entities() {
        let mask = store.mask(entity)?;
        if mask.contains(Components::COLLIDER) && !mask.contains(Components::BACKGROUND) {
            doomed.push(entity);
        }
    }
    info!(count = doomed.len(), "clearing the board");
    for entity in doomed {
        despawn(store, physics, entity)?;
    }
    Ok(())
}
