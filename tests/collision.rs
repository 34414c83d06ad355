use chomper::constants::{GHOST_TEX, RAW_BOARD, WALL_BACKOFF};
use chomper::direction::Direction;
use chomper::ecs::{
    Components, Drawable, Entity, Intent, Pellet, PelletKind, PlayerStats, Position, Store,
};
use chomper::error::EcsError;
use chomper::maze::MazeLayout;
use chomper::physics::{ContactEvent, PhysicsWorld};
use chomper::systems::{resolve, spawn, Outcome};
use glam::Vec2;
use pretty_assertions::assert_eq;

struct Fixture {
    store: Store,
    physics: PhysicsWorld,
    layout: MazeLayout,
}

impl Fixture {
    fn new() -> Fixture {
        Fixture {
            store: Store::new(),
            physics: PhysicsWorld::new(),
            layout: MazeLayout::parse(&RAW_BOARD).unwrap(),
        }
    }

    fn player(&mut self, lives: u32, score: u32) -> Entity {
        spawn::spawn_player(
            &mut self.store,
            &mut self.physics,
            self.layout.player_spawn,
            PlayerStats { score, lives },
        )
        .unwrap()
    }

    fn ghost(&mut self, index: usize) -> Entity {
        spawn::spawn_ghost(
            &mut self.store,
            &mut self.physics,
            self.layout.ghost_spawns[index],
            GHOST_TEX[index],
        )
        .unwrap()
    }

    fn wall(&mut self) -> Entity {
        let segment = self.layout.walls[0];
        spawn::spawn_wall(&mut self.store, &mut self.physics, &segment).unwrap()
    }

    fn resolve(&mut self, contacts: &[ContactEvent]) -> Outcome {
        resolve(&mut self.store, &mut self.physics, &self.layout, contacts).unwrap()
    }

    fn count_with(&self, required: Components) -> usize {
        self.store
            .entities()
            .filter(|e| self.store.mask(*e).unwrap().contains(required))
            .count()
    }

    fn find_with(&self, required: Components) -> Option<Entity> {
        self.store
            .entities()
            .find(|e| self.store.mask(*e).unwrap().contains(required))
    }
}

#[test]
fn wall_contact_locks_the_active_direction() {
    let mut fx = Fixture::new();
    let wall = fx.wall();
    let player = fx.player(3, 0);
    fx.store.get_mut::<Intent>(player).unwrap().set_direction(Direction::Up);
    let before = fx.store.get::<Position>(player).unwrap().point;

    let outcome = fx.resolve(&[ContactEvent { a: wall, b: player }]);
    assert_eq!(outcome, Outcome::Continue);

    let intent = *fx.store.get::<Intent>(player).unwrap();
    assert!(intent.is_blocked(Direction::Up));
    assert!(!intent.is_desired(Direction::Up));
    assert!(!intent.is_blocked(Direction::Down));
    assert!(!intent.is_blocked(Direction::Left));
    assert!(!intent.is_blocked(Direction::Right));

    // Backed off opposite the direction of travel (up is -y, so +y).
    let after = fx.store.get::<Position>(player).unwrap().point;
    assert_eq!(after, before + Vec2::new(0.0, WALL_BACKOFF));
}

#[test]
fn wall_contact_with_no_active_direction_is_a_no_op() {
    let mut fx = Fixture::new();
    let wall = fx.wall();
    let player = fx.player(3, 0);

    fx.resolve(&[ContactEvent { a: player, b: wall }]);

    let intent = *fx.store.get::<Intent>(player).unwrap();
    for direction in Direction::ALL {
        assert!(!intent.is_blocked(direction));
        assert!(!intent.is_desired(direction));
    }
}

#[test]
fn blocked_ghost_bounces_perpendicular_by_frame_parity() {
    let mut fx = Fixture::new();
    let wall = fx.wall();

    // Even frame counter picks the first perpendicular option (left).
    let ghost = fx.ghost(0);
    fx.store.get_mut::<Intent>(ghost).unwrap().set_direction(Direction::Up);
    fx.store.get_mut::<Drawable>(ghost).unwrap().frame = 4;
    fx.resolve(&[ContactEvent { a: wall, b: ghost }]);
    let intent = *fx.store.get::<Intent>(ghost).unwrap();
    assert_eq!(intent.active(), Some(Direction::Left));
    assert!(intent.is_blocked(Direction::Up));

    // Odd frame counter picks the second option (right).
    let ghost = fx.ghost(1);
    fx.store.get_mut::<Intent>(ghost).unwrap().set_direction(Direction::Up);
    fx.store.get_mut::<Drawable>(ghost).unwrap().frame = 5;
    fx.resolve(&[ContactEvent { a: wall, b: ghost }]);
    assert_eq!(fx.store.get::<Intent>(ghost).unwrap().active(), Some(Direction::Right));

    // A horizontal block redirects vertically.
    let ghost = fx.ghost(2);
    fx.store.get_mut::<Intent>(ghost).unwrap().set_direction(Direction::Left);
    fx.store.get_mut::<Drawable>(ghost).unwrap().frame = 0;
    fx.resolve(&[ContactEvent { a: wall, b: ghost }]);
    assert_eq!(fx.store.get::<Intent>(ghost).unwrap().active(), Some(Direction::Up));
}

#[test]
fn wall_vs_wall_contact_is_ignored() {
    let mut fx = Fixture::new();
    let first = fx.wall();
    let second = {
        let segment = fx.layout.walls[1];
        spawn::spawn_wall(&mut fx.store, &mut fx.physics, &segment).unwrap()
    };
    let masks_before: Vec<Components> = fx.store.entities().map(|e| fx.store.mask(e).unwrap()).collect();

    let outcome = fx.resolve(&[ContactEvent { a: first, b: second }]);

    assert_eq!(outcome, Outcome::Continue);
    let masks_after: Vec<Components> = fx.store.entities().map(|e| fx.store.mask(e).unwrap()).collect();
    assert_eq!(masks_before, masks_after);
}

#[test]
fn eating_a_normal_pellet_scores_ten_and_destroys_it() {
    let mut fx = Fixture::new();
    let player = fx.player(3, 0);
    let pellet_a = spawn::spawn_pellet(&mut fx.store, &mut fx.physics, Vec2::new(100.0, 100.0), PelletKind::Normal)
        .unwrap();
    for (i, kind) in [PelletKind::Normal, PelletKind::Power, PelletKind::Power].iter().enumerate() {
        spawn::spawn_pellet(&mut fx.store, &mut fx.physics, Vec2::new(140.0 + 40.0 * i as f32, 100.0), *kind).unwrap();
    }

    let outcome = fx.resolve(&[ContactEvent { a: player, b: pellet_a }]);

    assert_eq!(outcome, Outcome::Continue);
    assert_eq!(fx.store.get::<PlayerStats>(player).unwrap().score, 10);
    assert_eq!(fx.count_with(Components::PELLET), 3);
    assert_eq!(
        fx.store.get::<Pellet>(pellet_a),
        Err(EcsError::InvalidEntity(pellet_a))
    );
}

#[test]
fn eating_a_power_pellet_scores_fifty() {
    let mut fx = Fixture::new();
    let player = fx.player(3, 30);
    let pellet = spawn::spawn_pellet(&mut fx.store, &mut fx.physics, Vec2::new(100.0, 100.0), PelletKind::Power)
        .unwrap();

    fx.resolve(&[ContactEvent { a: pellet, b: player }]);

    assert_eq!(fx.store.get::<PlayerStats>(player).unwrap().score, 80);
}

#[test]
fn ghost_catch_with_lives_left_respawns_both_actors() {
    let mut fx = Fixture::new();
    let player = fx.player(3, 120);
    let ghost = fx.ghost(2);
    let bodies_before = fx.physics.body_count();

    let outcome = fx.resolve(&[ContactEvent { a: ghost, b: player }]);
    assert_eq!(outcome, Outcome::Continue);

    // Both original ids are gone...
    assert!(!fx.store.is_alive(player));
    assert!(!fx.store.is_alive(ghost));

    // ...and exactly one of each was recreated.
    assert_eq!(fx.count_with(Components::PLAYER_CONTROLLED), 1);
    assert_eq!(fx.count_with(Components::GHOST), 1);
    assert_eq!(fx.physics.body_count(), bodies_before);

    let new_player = fx.find_with(Components::PLAYER_CONTROLLED).unwrap();
    let stats = fx.store.get::<PlayerStats>(new_player).unwrap();
    assert_eq!(stats.lives, 2);
    assert_eq!(stats.score, 120, "the score survives a lost life");
    assert_eq!(fx.store.get::<Position>(new_player).unwrap().point, fx.layout.player_spawn);

    let new_ghost = fx.find_with(Components::GHOST).unwrap();
    assert_eq!(fx.store.get::<Position>(new_ghost).unwrap().point, fx.layout.ghost_house);
    assert_eq!(
        fx.store.get::<Drawable>(new_ghost).unwrap().frames,
        GHOST_TEX[2],
        "the eaten ghost keeps its sprite"
    );
}

#[test]
fn ghost_catch_on_the_last_life_tears_the_board_down() {
    let mut fx = Fixture::new();
    spawn::spawn_background(&mut fx.store).unwrap();
    let wall = fx.wall();
    spawn::spawn_pellet(&mut fx.store, &mut fx.physics, Vec2::new(60.0, 60.0), PelletKind::Normal).unwrap();
    let player = fx.player(1, 500);
    let ghost = fx.ghost(0);

    let outcome = fx.resolve(&[ContactEvent { a: player, b: ghost }]);
    assert_eq!(outcome, Outcome::GameOver);

    // Nothing with a collider survives; the backdrop does.
    assert_eq!(fx.count_with(Components::COLLIDER), 0);
    assert_eq!(fx.count_with(Components::BACKGROUND), 1);
    assert_eq!(fx.physics.body_count(), 0);
    assert!(!fx.store.is_alive(wall));
}

#[test]
fn game_over_stops_processing_the_rest_of_the_event_list() {
    let mut fx = Fixture::new();
    let player = fx.player(1, 0);
    let ghost = fx.ghost(0);
    let pellet = spawn::spawn_pellet(&mut fx.store, &mut fx.physics, Vec2::new(60.0, 60.0), PelletKind::Normal)
        .unwrap();

    let outcome = fx.resolve(&[
        ContactEvent { a: player, b: ghost },
        ContactEvent { a: player, b: pellet },
    ]);

    assert_eq!(outcome, Outcome::GameOver);
    // The pellet event was never applied; the pellet died in the teardown.
    assert!(!fx.store.is_alive(pellet));
}

#[test]
fn stale_events_after_a_respawn_are_skipped() {
    let mut fx = Fixture::new();
    let player = fx.player(3, 0);
    let ghost = fx.ghost(0);

    // The same pair reported twice in one tick: the second reference is
    // stale once the first resolution despawned both.
    let outcome = fx.resolve(&[
        ContactEvent { a: player, b: ghost },
        ContactEvent { a: player, b: ghost },
    ]);

    assert_eq!(outcome, Outcome::Continue);
    let survivor = fx.find_with(Components::PLAYER_CONTROLLED).unwrap();
    assert_eq!(
        fx.store.get::<PlayerStats>(survivor).unwrap().lives,
        2,
        "only one life may be lost per actual catch"
    );
    assert_eq!(fx.count_with(Components::GHOST), 1);
}

#[test]
fn ghost_vs_pellet_contact_has_no_effect() {
    let mut fx = Fixture::new();
    let ghost = fx.ghost(0);
    let pellet = spawn::spawn_pellet(&mut fx.store, &mut fx.physics, Vec2::new(60.0, 60.0), PelletKind::Normal)
        .unwrap();

    fx.resolve(&[ContactEvent { a: ghost, b: pellet }]);

    assert!(fx.store.is_alive(pellet));
    assert!(fx.store.is_alive(ghost));
}
