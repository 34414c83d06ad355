//! Entity storage: masks, typed component tables, and the per-tick change log.

use tracing::trace;

use super::{
    Background, Collider, Components, Drawable, Entity, Ghost, Input, Intent, Pellet, PlayerControlled, PlayerStats,
    Position, Wall,
};
use crate::error::EcsError;

/// One component-set transition. Appended for every attach and destroy,
/// drained by systems maintaining interest sets, cleared once per tick by
/// the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddedMask {
    pub entity: Entity,
    pub prev: Components,
    pub next: Components,
}

/// Per-type component arena, indexed by entity id.
pub struct Table<T> {
    slots: Vec<Option<T>>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Table { slots: Vec::new() }
    }
}

impl<T> Table<T> {
    fn set(&mut self, entity: Entity, value: T) {
        let index = entity.index();
        if self.slots.len() <= index {
            self.slots.resize_with(index + 1, || None);
        }
        self.slots[index] = Some(value);
    }

    fn get(&self, entity: Entity) -> Option<&T> {
        self.slots.get(entity.index()).and_then(|slot| slot.as_ref())
    }

    fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.slots.get_mut(entity.index()).and_then(|slot| slot.as_mut())
    }

    fn remove(&mut self, entity: Entity) -> Option<T> {
        self.slots.get_mut(entity.index()).and_then(|slot| slot.take())
    }
}

/// A type that can live in the store, tied to its mask bit and table.
///
/// Implemented by the `components!` invocation below; the typed-table
/// lookup avoids both virtual dispatch and `TypeId` maps.
pub trait Component: Sized {
    const FLAG: Components;
    const NAME: &'static str;

    #[doc(hidden)]
    fn table(store: &Store) -> &Table<Self>;
    #[doc(hidden)]
    fn table_mut(store: &mut Store) -> &mut Table<Self>;
}

/// One component or a tuple of components, attached atomically.
pub trait Attach {
    fn flags() -> Components;
    fn insert(self, store: &mut Store, entity: Entity);
}

impl<T: Component> Attach for T {
    fn flags() -> Components {
        T::FLAG
    }

    fn insert(self, store: &mut Store, entity: Entity) {
        T::table_mut(store).set(entity, self);
    }
}

macro_rules! attach_tuple {
    ($($name:ident),+) => {
        impl<$($name: Component),+> Attach for ($($name,)+) {
            fn flags() -> Components {
                Components::empty()$(.union($name::FLAG))+
            }

            #[allow(non_snake_case)]
            fn insert(self, store: &mut Store, entity: Entity) {
                let ($($name,)+) = self;
                $( $name::table_mut(store).set(entity, $name); )+
            }
        }
    };
}

attach_tuple!(A);
attach_tuple!(A, B);
attach_tuple!(A, B, C);
attach_tuple!(A, B, C, D);
attach_tuple!(A, B, C, D, E);
attach_tuple!(A, B, C, D, E, F);
attach_tuple!(A, B, C, D, E, F, G);
attach_tuple!(A, B, C, D, E, F, G, H);

macro_rules! components {
    ($($field:ident: $ty:ty => $flag:ident),+ $(,)?) => {
        #[derive(Default)]
        struct Tables {
            $($field: Table<$ty>,)+
        }

        $(
            impl Component for $ty {
                const FLAG: Components = Components::$flag;
                const NAME: &'static str = stringify!($flag);

                fn table(store: &Store) -> &Table<Self> {
                    &store.tables.$field
                }

                fn table_mut(store: &mut Store) -> &mut Table<Self> {
                    &mut store.tables.$field
                }
            }
        )+

        impl Store {
            fn free_components(&mut self, entity: Entity, mask: Components) {
                $(
                    if mask.contains(Components::$flag) {
                        self.tables.$field.remove(entity);
                    }
                )+
            }
        }
    };
}

components! {
    positions: Position => POSITION,
    drawables: Drawable => DRAWABLE,
    colliders: Collider => COLLIDER,
    inputs: Input => INPUT,
    intents: Intent => INTENT,
    pellets: Pellet => PELLET,
    player_stats: PlayerStats => PLAYER_STATS,
    player_controlled: PlayerControlled => PLAYER_CONTROLLED,
    ghosts: Ghost => GHOST,
    walls: Wall => WALL,
    backgrounds: Background => BACKGROUND,
}

/// The entity/component store.
///
/// Owns entity identity, the per-entity capability masks, one arena per
/// component type, and the per-tick change log. Single-owner mutable state;
/// there is exactly one `Store` per game and one thread touching it.
#[derive(Default)]
pub struct Store {
    masks: Vec<Components>,
    alive: Vec<bool>,
    added: Vec<AddedMask>,
    tables: Tables,
}

impl Store {
    pub fn new() -> Store {
        Store::default()
    }

    /// Creates a fresh entity with a zero mask. Ids ascend and are never
    /// reused, even after the entity is destroyed.
    pub fn create(&mut self) -> Entity {
        let entity = Entity(self.masks.len() as u32);
        self.masks.push(Components::empty());
        self.alive.push(true);
        trace!(%entity, "created entity");
        entity
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.get(entity.index()).copied().unwrap_or(false)
    }

    /// The entity's capability mask.
    pub fn mask(&self, entity: Entity) -> Result<Components, EcsError> {
        if self.is_alive(entity) {
            Ok(self.masks[entity.index()])
        } else {
            Err(EcsError::InvalidEntity(entity))
        }
    }

    /// Tests the entity's mask against a required set of bits.
    pub fn has(&self, entity: Entity, required: Components) -> Result<bool, EcsError> {
        Ok(self.mask(entity)?.contains(required))
    }

    /// Attaches one component or a tuple of components atomically: the mask
    /// is updated once and a single change record captures the transition.
    /// Components already present are overwritten without duplicating mask
    /// bits.
    pub fn attach<B: Attach>(&mut self, entity: Entity, bundle: B) -> Result<(), EcsError> {
        let prev = self.mask(entity)?;
        bundle.insert(self, entity);
        let next = prev.union(B::flags());
        self.masks[entity.index()] = next;
        self.added.push(AddedMask { entity, prev, next });
        Ok(())
    }

    pub fn get<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        if !self.mask(entity)?.contains(T::FLAG) {
            return Err(EcsError::MissingComponent { entity, component: T::NAME });
        }
        T::table(self)
            .get(entity)
            .ok_or(EcsError::MissingComponent { entity, component: T::NAME })
    }

    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        if !self.mask(entity)?.contains(T::FLAG) {
            return Err(EcsError::MissingComponent { entity, component: T::NAME });
        }
        T::table_mut(self)
            .get_mut(entity)
            .ok_or(EcsError::MissingComponent { entity, component: T::NAME })
    }

    /// Destroys the entity: clears its mask, frees its component storage and
    /// invalidates the id, all synchronously. The transition is logged so
    /// interest sets can drop the entity on their next pass.
    pub fn destroy(&mut self, entity: Entity) -> Result<(), EcsError> {
        let prev = self.mask(entity)?;
        self.free_components(entity, prev);
        self.masks[entity.index()] = Components::empty();
        self.alive[entity.index()] = false;
        self.added.push(AddedMask { entity, prev, next: Components::empty() });
        trace!(%entity, "destroyed entity");
        Ok(())
    }

    /// Change records accumulated since the last [`Self::clear_added`].
    pub fn added(&self) -> &[AddedMask] {
        &self.added
    }

    /// Clears the change log. Called once per tick by the scheduler, after
    /// every interested system has drained the log.
    pub fn clear_added(&mut self) {
        self.added.clear();
    }

    /// Live entities in ascending id order. This ordering is the canonical
    /// tie-break for any pairwise processing.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(index, _)| Entity(index as u32))
    }
}
