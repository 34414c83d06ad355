//! rapier2d physics integration.
//!
//! [`PhysicsWorld`] wraps the rapier simulation behind the narrow interface
//! the game needs: body/shape creation for entities, a fixed-timestep step
//! that yields the tick's contact begin-events, per-body transform
//! read-back, and synchronous body destruction. The adapter relays data and
//! events only; it applies no gameplay rules.
//!
//! Contact events name collider handles; rapier user-data is not used.
//! Instead the adapter owns an explicit handle↔entity mapping, so a stale
//! handle simply fails to resolve rather than dangling.

use std::collections::HashMap;
use std::num::NonZeroUsize;

use glam::Vec2;
use rapier2d::na;
use rapier2d::prelude::{
    ActiveCollisionTypes, ActiveEvents, CCDSolver, ChannelEventCollector, ColliderBuilder, ColliderHandle,
    ColliderSet, CollisionEvent, ContactForceEvent, DefaultBroadPhase, ImpulseJointSet, IntegrationParameters,
    IslandManager, MultibodyJointSet, NarrowPhase, PhysicsPipeline, Real, RigidBodyBuilder, RigidBodyHandle,
    RigidBodySet,
};
use smallvec::SmallVec;
use tracing::trace;

use crate::constants::{SOLVER_ITERATIONS, TICK_DT};
use crate::ecs::{self, Components, Entity, Position, Store};
use crate::error::GameResult;

/// Opaque handle to a physics body, stored in the `Collider` component.
pub type BodyHandle = RigidBodyHandle;

/// How a body reacts to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Immovable scene geometry (walls, pellets).
    Static,
    /// Moved by velocity commands, unaffected by forces (player, ghosts).
    Kinematic,
}

/// Collider shape attached to a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyShape {
    /// Circle with the given radius.
    Circle(f32),
    /// Axis-aligned box with the given half-extents.
    Box(Vec2),
}

/// A contact begin-event between two entities, already resolved through the
/// adapter's mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    pub a: Entity,
    pub b: Entity,
}

/// The rapier2d world plus the handle↔entity maps.
pub struct PhysicsWorld {
    pipeline: PhysicsPipeline,
    gravity: na::Vector2<Real>,
    integration_params: IntegrationParameters,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    body_to_entity: HashMap<RigidBodyHandle, Entity>,
    collider_to_entity: HashMap<ColliderHandle, Entity>,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Creates a zero-gravity world with the fixed tick timestep and solver
    /// iteration count.
    pub fn new() -> PhysicsWorld {
        let mut integration_params = IntegrationParameters::default();
        integration_params.dt = TICK_DT;
        integration_params.num_solver_iterations =
            NonZeroUsize::new(SOLVER_ITERATIONS).unwrap_or(NonZeroUsize::MIN);

        PhysicsWorld {
            pipeline: PhysicsPipeline::new(),
            gravity: na::Vector2::new(0.0, 0.0),
            integration_params,
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            body_to_entity: HashMap::new(),
            collider_to_entity: HashMap::new(),
        }
    }

    /// Creates a body with a single collider for `entity` and records the
    /// handle↔entity association both ways.
    pub fn create_body(
        &mut self,
        entity: Entity,
        kind: BodyKind,
        position: Vec2,
        shape: BodyShape,
        sensor: bool,
    ) -> BodyHandle {
        let builder = match kind {
            BodyKind::Static => RigidBodyBuilder::fixed(),
            BodyKind::Kinematic => RigidBodyBuilder::kinematic_velocity_based(),
        };
        let body = builder.translation(na::Vector2::new(position.x, position.y)).build();
        let handle = self.bodies.insert(body);

        let builder = match shape {
            BodyShape::Circle(radius) => ColliderBuilder::ball(radius),
            BodyShape::Box(half) => ColliderBuilder::cuboid(half.x, half.y),
        };
        // Actors are kinematic, geometry is fixed; enable the pair types the
        // default (dynamic-centric) filter would skip.
        let collider = builder
            .sensor(sensor)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .active_collision_types(
                ActiveCollisionTypes::default()
                    | ActiveCollisionTypes::KINEMATIC_KINEMATIC
                    | ActiveCollisionTypes::KINEMATIC_FIXED,
            )
            .build();
        let collider_handle = self.colliders.insert_with_parent(collider, handle, &mut self.bodies);

        self.body_to_entity.insert(handle, entity);
        self.collider_to_entity.insert(collider_handle, entity);
        handle
    }

    /// Commands the body's linear velocity.
    pub fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_linvel(na::Vector2::new(velocity.x, velocity.y), true);
        }
    }

    /// Sets the body's facing rotation, in degrees.
    pub fn set_rotation(&mut self, handle: BodyHandle, degrees: f32) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_rotation(na::UnitComplex::new(degrees.to_radians()), true);
        }
    }

    /// Translates the body by `delta` without touching its velocity. Used to
    /// back an entity out of a wall it just contacted.
    pub fn nudge(&mut self, handle: BodyHandle, delta: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle) {
            let translation = body.translation() + na::Vector2::new(delta.x, delta.y);
            body.set_translation(translation, true);
        }
    }

    /// The body's current position and rotation (degrees, normalized to
    /// `[0, 360)`), or `None` for a stale handle.
    pub fn transform(&self, handle: BodyHandle) -> Option<(Vec2, f32)> {
        let body = self.bodies.get(handle)?;
        let translation = body.translation();
        let degrees = body.rotation().angle().to_degrees().rem_euclid(360.0);
        Some((Vec2::new(translation.x, translation.y), degrees))
    }

    /// The body's current linear velocity, or `None` for a stale handle.
    pub fn velocity(&self, handle: BodyHandle) -> Option<Vec2> {
        let body = self.bodies.get(handle)?;
        let linvel = body.linvel();
        Some(Vec2::new(linvel.x, linvel.y))
    }

    /// Steps the world one fixed tick and returns the contact begin-events,
    /// resolved to entity pairs and sorted by (min id, max id) so resolution
    /// order does not depend on rapier's internal channel delivery order.
    pub fn step(&mut self) -> SmallVec<[ContactEvent; 16]> {
        let (collision_send, collision_recv) = rapier2d::crossbeam::channel::unbounded::<CollisionEvent>();
        let (force_send, _force_recv) = rapier2d::crossbeam::channel::unbounded::<ContactForceEvent>();
        let event_handler = ChannelEventCollector::new(collision_send, force_send);

        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &event_handler,
        );

        let mut contacts: SmallVec<[ContactEvent; 16]> = SmallVec::new();
        while let Ok(event) = collision_recv.try_recv() {
            if let CollisionEvent::Started(first, second, _flags) = event {
                let a = self.collider_to_entity.get(&first).copied();
                let b = self.collider_to_entity.get(&second).copied();
                if let (Some(a), Some(b)) = (a, b) {
                    contacts.push(ContactEvent { a, b });
                }
            }
        }
        contacts.sort_by_key(|contact| (contact.a.min(contact.b), contact.a.max(contact.b)));
        trace!(count = contacts.len(), "physics step produced contacts");
        contacts
    }

    /// Destroys the body and its collider immediately and forgets both map
    /// entries. A second call with the same handle is a no-op, so a body is
    /// never freed twice.
    pub fn destroy_body(&mut self, handle: BodyHandle) {
        if let Some(entity) = self.body_to_entity.remove(&handle) {
            self.collider_to_entity.retain(|_, owner| *owner != entity);
            self.bodies.remove(
                handle,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            );
            trace!(%entity, "destroyed body");
        }
    }

    /// Number of live bodies.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Copies every body's transform into its entity's `Position` component.
    /// Runs right after the step, before collision resolution.
    pub fn sync_transforms(&self, store: &mut Store) -> GameResult<()> {
        let synced: Vec<Entity> = store.entities().collect();
        for entity in synced {
            if !store.has(entity, Components::POSITION | Components::COLLIDER)? {
                continue;
            }
            let handle = store.get::<ecs::Collider>(entity)?.body;
            if let Some((point, angle)) = self.transform(handle) {
                let position = store.get_mut::<Position>(entity)?;
                position.point = point;
                position.angle = angle;
            }
        }
        Ok(())
    }
}
