//! Contact resolution, the core state machine.
//!
//! Consumes the tick's contact begin-events, classifies each pair by the
//! participants' capability masks and applies the gameplay rules in
//! priority order: wall-vs-wall (ignored), wall-vs-mover (corridor lock),
//! player-vs-ghost (life loss, respawn or game over), player-vs-pellet
//! (scoring).
//!
//! The event list is a snapshot taken at step time. Destruction is
//! immediate, so an event naming an entity destroyed by an earlier event in
//! the same list is stale; it is skipped locally rather than propagated as
//! an error.

use tracing::{debug, info, trace};

use crate::constants::WALL_BACKOFF;
use crate::ecs::{Collider, Components, Drawable, Entity, Intent, Pellet, PlayerStats, Position, Store};
use crate::error::GameResult;
use crate::maze::MazeLayout;
use crate::physics::{ContactEvent, PhysicsWorld};
use crate::systems::spawn;

/// What the rest of the tick should do after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// The player is out of lives; the board has been torn down and the
    /// remainder of the event list was not processed.
    GameOver,
}

const MOVER: Components = Components::INTENT.union(Components::COLLIDER);

/// Resolves one tick's worth of contact events.
pub fn resolve(
    store: &mut Store,
    physics: &mut PhysicsWorld,
    layout: &MazeLayout,
    contacts: &[ContactEvent],
) -> GameResult<Outcome> {
    for contact in contacts {
        let (a, b) = (contact.a, contact.b);
        if !store.is_alive(a) || !store.is_alive(b) {
            trace!(%a, %b, "skipping stale contact");
            continue;
        }
        let mask_a = store.mask(a)?;
        let mask_b = store.mask(b)?;

        // Rule 1: wall-vs-wall has no gameplay effect.
        if mask_a.contains(Components::WALL) && mask_b.contains(Components::WALL) {
            continue;
        }

        // Rule 2: a wall locks the mover's current direction.
        if let Some((_, mover)) = split(a, mask_a, b, mask_b, Components::WALL, MOVER) {
            let mover_mask = store.mask(mover)?;
            if mover_mask.intersects(Components::PLAYER_CONTROLLED | Components::GHOST) {
                block_mover(store, physics, mover)?;
            }
            continue;
        }

        // Rule 3: a ghost catches the player.
        if let Some((player, ghost)) = split(a, mask_a, b, mask_b, Components::PLAYER_CONTROLLED, Components::GHOST) {
            if catch_player(store, physics, layout, player, ghost)? == Outcome::GameOver {
                return Ok(Outcome::GameOver);
            }
            continue;
        }

        // Rule 4: the player eats a pellet.
        if let Some((player, pellet)) = split(a, mask_a, b, mask_b, Components::PLAYER_CONTROLLED, Components::PELLET)
        {
            eat_pellet(store, physics, player, pellet)?;
        }
    }
    Ok(Outcome::Continue)
}

/// Orders a pair so the entity tagged `left` comes first and the entity
/// tagged `right` second, whichever side each arrived on.
fn split(
    a: Entity,
    mask_a: Components,
    b: Entity,
    mask_b: Components,
    left: Components,
    right: Components,
) -> Option<(Entity, Entity)> {
    if mask_a.contains(left) && mask_b.contains(right) {
        Some((a, b))
    } else if mask_b.contains(left) && mask_a.contains(right) {
        Some((b, a))
    } else {
        None
    }
}

/// Locks the mover's active direction and backs it out of the wall.
///
/// A ghost is additionally forced onto a perpendicular course; the choice
/// between the two perpendicular options is the low bit of its animation
/// frame counter, deterministic for a given frame parity and deliberately
/// not re-randomized.
fn block_mover(store: &mut Store, physics: &mut PhysicsWorld, mover: Entity) -> GameResult<()> {
    let Some(active) = store.get::<Intent>(mover)?.active() else {
        // Already stopped against this wall; nothing to lock.
        return Ok(());
    };

    {
        let intent = store.get_mut::<Intent>(mover)?;
        intent.set_blocked(active);
        intent.clear_direction(active);
    }

    let body = store.get::<Collider>(mover)?.body;
    let backoff = -active.offset() * WALL_BACKOFF;
    physics.nudge(body, backoff);
    store.get_mut::<Position>(mover)?.point += backoff;
    debug!(%mover, direction = ?active, "wall contact locked direction");

    if store.has(mover, Components::GHOST)? {
        let frame = store.get::<Drawable>(mover)?.frame;
        let options = active.perpendicular();
        let redirect = options[(frame & 1) as usize];
        store.get_mut::<Intent>(mover)?.set_direction(redirect);
        trace!(%mover, ?redirect, "ghost bounced perpendicular");
    }
    Ok(())
}

/// Applies a life loss: either respawn both actors or end the game.
fn catch_player(
    store: &mut Store,
    physics: &mut PhysicsWorld,
    layout: &MazeLayout,
    player: Entity,
    ghost: Entity,
) -> GameResult<Outcome> {
    let stats = *store.get::<PlayerStats>(player)?;
    let lives = stats.lives.saturating_sub(1);
    if lives == 0 {
        info!(score = stats.score, "out of lives, game over");
        spawn::clear_board(store, physics)?;
        return Ok(Outcome::GameOver);
    }

    info!(lives, "player caught, respawning");
    let frames = store.get::<Drawable>(ghost)?.frames;
    spawn::despawn(store, physics, ghost)?;
    spawn::despawn(store, physics, player)?;
    spawn::spawn_ghost(store, physics, layout.ghost_house, frames)?;
    spawn::spawn_player(
        store,
        physics,
        layout.player_spawn,
        PlayerStats { score: stats.score, lives },
    )?;
    Ok(Outcome::Continue)
}

fn eat_pellet(store: &mut Store, physics: &mut PhysicsWorld, player: Entity, pellet: Entity) -> GameResult<()> {
    let kind = store.get::<Pellet>(pellet)?.kind;
    let stats = store.get_mut::<PlayerStats>(player)?;
    stats.score += kind.points();
    info!(score = stats.score, ?kind, "pellet eaten");
    spawn::despawn(store, physics, pellet)?;
    Ok(())
}
