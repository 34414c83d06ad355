use chomper::constants::GHOST_TEX;
use chomper::ecs::{Collider, PlayerStats, Store};
use chomper::error::{EcsError, GameError};
use chomper::physics::PhysicsWorld;
use chomper::systems::{spawn, AiSystem, InputSystem, MovementSystem};
use glam::Vec2;

#[test]
fn despawn_frees_the_body_exactly_once() {
    let mut store = Store::new();
    let mut physics = PhysicsWorld::new();
    let player = spawn::spawn_player(&mut store, &mut physics, Vec2::new(100.0, 100.0), PlayerStats::default()).unwrap();
    let body = store.get::<Collider>(player).unwrap().body;
    assert_eq!(physics.body_count(), 1);

    spawn::despawn(&mut store, &mut physics, player).unwrap();
    assert_eq!(physics.body_count(), 0);
    assert!(physics.transform(body).is_none());

    // A second despawn is an invalid-entity error, and the stale handle is
    // ignored by the adapter rather than double-freed.
    assert!(matches!(
        spawn::despawn(&mut store, &mut physics, player),
        Err(GameError::Ecs(EcsError::InvalidEntity(_)))
    ));
    physics.destroy_body(body);
    assert_eq!(physics.body_count(), 0);
}

#[test]
fn destroyed_entities_leave_every_interest_set_within_one_tick() {
    let mut store = Store::new();
    let mut physics = PhysicsWorld::new();
    let player = spawn::spawn_player(&mut store, &mut physics, Vec2::new(100.0, 100.0), PlayerStats::default()).unwrap();
    let ghost = spawn::spawn_ghost(&mut store, &mut physics, Vec2::new(200.0, 200.0), GHOST_TEX[0]).unwrap();

    let mut input = InputSystem::new();
    let mut movement = MovementSystem::new();
    let mut ai = AiSystem::new();
    input.sync(&store);
    movement.sync(&store);
    ai.sync(&store);
    store.clear_added();

    assert_eq!(input.tracked(), 1);
    assert_eq!(movement.tracked(), 2);
    assert_eq!(ai.tracked(), 1);

    spawn::despawn(&mut store, &mut physics, player).unwrap();
    spawn::despawn(&mut store, &mut physics, ghost).unwrap();

    let keys = std::collections::HashSet::new();
    let mut rng = <rand::rngs::StdRng as rand::SeedableRng>::seed_from_u64(1);
    input.run(&mut store, &keys).unwrap();
    movement.run(&mut store, &mut physics).unwrap();
    ai.run(&mut store, &mut rng).unwrap();

    assert_eq!(input.tracked(), 0);
    assert_eq!(movement.tracked(), 0);
    assert_eq!(ai.tracked(), 0);
}

#[test]
fn respawned_entities_rejoin_interest_sets_through_the_change_log() {
    let mut store = Store::new();
    let mut physics = PhysicsWorld::new();
    let player = spawn::spawn_player(&mut store, &mut physics, Vec2::new(100.0, 100.0), PlayerStats::default()).unwrap();

    let mut input = InputSystem::new();
    input.sync(&store);
    store.clear_added();
    assert_eq!(input.tracked(), 1);

    // Mid-tick: the player dies and a replacement is spawned. The spawn
    // lands in the change log that the next tick's sync will drain.
    spawn::despawn(&mut store, &mut physics, player).unwrap();
    let replacement =
        spawn::spawn_player(&mut store, &mut physics, Vec2::new(100.0, 100.0), PlayerStats { score: 10, lives: 2 })
            .unwrap();

    input.sync(&store);
    store.clear_added();
    let keys = std::collections::HashSet::new();
    input.run(&mut store, &keys).unwrap();

    assert_eq!(input.tracked(), 1);
    assert!(store.is_alive(replacement));
}
