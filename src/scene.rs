//! Minimal entity/component scene the physics manager drives.
//!
//! Entities update in spawn order and their components in attachment order.
//! Lifecycle calls take the [`PhysicsManager`] explicitly so rigid bodies and
//! colliders can create or queue their backend objects.

use std::fmt;

use glam::Vec2;
use log::debug;

use crate::{
    core::{
        behaviour::PhysicsBehaviour, collider::Collider, rigidbody::RigidBody, types::Transform,
    },
    error::{PhysicsError, PhysicsResult},
    utils::allocator::{Arena, EntityId},
    world::PhysicsManager,
};

/// Identifier of a component, unique within a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub u64);

/// Everything that can be attached to an entity.
pub enum Component {
    RigidBody(RigidBody),
    Collider(Collider),
    Behaviour(Box<dyn PhysicsBehaviour>),
}

impl Component {
    pub fn behaviour(behaviour: impl PhysicsBehaviour + 'static) -> Self {
        Component::Behaviour(Box::new(behaviour))
    }

    fn kind(&self) -> &'static str {
        match self {
            Component::RigidBody(_) => "RigidBody",
            Component::Collider(_) => "Collider",
            Component::Behaviour(_) => "Behaviour",
        }
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::RigidBody(body) => f.debug_tuple("RigidBody").field(body).finish(),
            Component::Collider(collider) => f.debug_tuple("Collider").field(collider).finish(),
            Component::Behaviour(_) => f.write_str("Behaviour(..)"),
        }
    }
}

impl From<RigidBody> for Component {
    fn from(body: RigidBody) -> Self {
        Component::RigidBody(body)
    }
}

impl From<Collider> for Component {
    fn from(collider: Collider) -> Self {
        Component::Collider(collider)
    }
}

impl From<Box<dyn PhysicsBehaviour>> for Component {
    fn from(behaviour: Box<dyn PhysicsBehaviour>) -> Self {
        Component::Behaviour(behaviour)
    }
}

#[derive(Debug)]
pub struct ComponentSlot {
    pub(crate) id: ComponentId,
    pub(crate) enabled: bool,
    pub(crate) component: Component,
}

impl ComponentSlot {
    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn component(&self) -> &Component {
        &self.component
    }
}

/// Mutable split of an entity: its rigid body next to the colliders it manages.
pub(crate) struct RigidBodyParts<'a> {
    pub entity: EntityId,
    pub rigid_body: &'a mut RigidBody,
    pub transform: &'a mut Transform,
    pub colliders: Vec<(ComponentId, &'a mut Collider)>,
}

#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    name: String,
    pub(crate) transform: Transform,
    pub(crate) components: Vec<ComponentSlot>,
}

impl Entity {
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn components(&self) -> &[ComponentSlot] {
        &self.components
    }

    pub fn rigid_body(&self) -> Option<&RigidBody> {
        self.components.iter().find_map(|slot| match &slot.component {
            Component::RigidBody(body) => Some(body),
            _ => None,
        })
    }

    pub fn collider(&self, id: ComponentId) -> Option<&Collider> {
        self.components
            .iter()
            .filter(|slot| slot.id == id)
            .find_map(|slot| match &slot.component {
                Component::Collider(collider) => Some(collider),
                _ => None,
            })
    }

    pub fn colliders(&self) -> impl Iterator<Item = (ComponentId, &Collider)> + '_ {
        self.components
            .iter()
            .filter_map(|slot| match &slot.component {
                Component::Collider(collider) => Some((slot.id, collider)),
                _ => None,
            })
    }

    fn position_of(&self, id: ComponentId) -> Option<usize> {
        self.components.iter().position(|slot| slot.id == id)
    }

    fn rigid_body_index(&self) -> Option<usize> {
        self.components
            .iter()
            .position(|slot| matches!(slot.component, Component::RigidBody(_)))
    }

    pub(crate) fn rigid_body_parts(&mut self) -> Option<RigidBodyParts<'_>> {
        let index = self.rigid_body_index()?;
        let (before, rest) = self.components.split_at_mut(index);
        let (slot, after) = rest.split_first_mut()?;
        let Component::RigidBody(rigid_body) = &mut slot.component else {
            return None;
        };

        let colliders = before
            .iter_mut()
            .chain(after.iter_mut())
            .filter_map(|other| {
                let ComponentSlot { id, component, .. } = other;
                match component {
                    Component::Collider(collider) => Some((*id, collider)),
                    _ => None,
                }
            })
            .collect();

        Some(RigidBodyParts {
            entity: self.id,
            rigid_body,
            transform: &mut self.transform,
            colliders,
        })
    }
}

/// Ordered collection of entities.
#[derive(Debug, Default)]
pub struct Scene {
    entities: Arena<Entity>,
    order: Vec<EntityId>,
    next_component: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, name: impl Into<String>, transform: Transform) -> EntityId {
        let id = EntityId(self.entities.insert(Entity {
            id: EntityId::default(),
            name: name.into(),
            transform,
            components: Vec::new(),
        }));
        if let Some(entity) = self.entities.get_mut(id.0) {
            entity.id = id;
        }
        self.order.push(id);
        id
    }

    /// Convenience for an entity of `size` with its lower-left corner at `position`.
    pub fn spawn_at(&mut self, name: impl Into<String>, position: Vec2, size: Vec2) -> EntityId {
        self.spawn(name, Transform::new(position, size))
    }

    /// Detaches every component, rigid body first, then removes the entity.
    pub fn despawn(&mut self, entity: EntityId, physics: &mut PhysicsManager) -> PhysicsResult<()> {
        let ids: Vec<ComponentId> = {
            let target = self.entity(entity).ok_or(PhysicsError::UnknownEntity(entity))?;
            let rigid_body = target.rigid_body_index().map(|index| target.components[index].id);
            rigid_body
                .into_iter()
                .chain(
                    target
                        .components
                        .iter()
                        .map(|slot| slot.id)
                        .filter(|id| Some(*id) != rigid_body),
                )
                .collect()
        };
        for id in ids {
            self.remove_component(entity, id, physics)?;
        }

        self.entities.remove(entity.0);
        self.order.retain(|id| *id != entity);
        debug!("despawned {entity:?}");
        Ok(())
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.entities.contains(entity.0)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn entity(&self, entity: EntityId) -> Option<&Entity> {
        self.entities.get(entity.0)
    }

    pub(crate) fn entity_mut(&mut self, entity: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(entity.0)
    }

    /// Entities in update order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.entities.get(id.0))
    }

    pub(crate) fn for_each_entity_mut(&mut self, mut f: impl FnMut(&mut Entity)) {
        for id in &self.order {
            if let Some(entity) = self.entities.get_mut(id.0) {
                f(entity);
            }
        }
    }

    pub fn transform(&self, entity: EntityId) -> Option<&Transform> {
        self.entity(entity).map(|entity| &entity.transform)
    }

    pub fn transform_mut(&mut self, entity: EntityId) -> Option<&mut Transform> {
        self.entity_mut(entity).map(|entity| &mut entity.transform)
    }

    pub fn rigid_body(&self, entity: EntityId) -> Option<&RigidBody> {
        self.entity(entity).and_then(Entity::rigid_body)
    }

    /// Attaches `component` to `entity`.
    ///
    /// A rigid body creates its backend body immediately; a collider gets its
    /// fixture immediately when the entity already has a body. A second rigid
    /// body is rejected before anything is created.
    pub fn add_component(
        &mut self,
        entity: EntityId,
        component: impl Into<Component>,
        physics: &mut PhysicsManager,
    ) -> PhysicsResult<ComponentId> {
        let component = component.into();
        let next = ComponentId(self.next_component);
        let target = self
            .entities
            .get_mut(entity.0)
            .ok_or(PhysicsError::UnknownEntity(entity))?;

        if matches!(component, Component::RigidBody(_)) && target.rigid_body_index().is_some() {
            return Err(PhysicsError::DuplicateRigidBody(entity));
        }

        self.next_component += 1;
        let kind = component.kind();
        let is_rigid_body = matches!(component, Component::RigidBody(_));
        let is_collider = matches!(component, Component::Collider(_));
        target.components.push(ComponentSlot {
            id: next,
            enabled: true,
            component,
        });
        debug!("attached {kind} {next:?} to {entity:?}");

        if is_rigid_body {
            if let Some(mut parts) = target.rigid_body_parts() {
                parts.rigid_body.attach(
                    parts.entity,
                    parts.transform,
                    &mut parts.colliders,
                    physics.world_mut(),
                );
            }
        } else if is_collider {
            if let Some(parts) = target.rigid_body_parts() {
                let size = parts.transform.size;
                if let Some((_, collider)) = parts.colliders.into_iter().find(|(id, _)| *id == next)
                {
                    parts
                        .rigid_body
                        .collider_added(next, collider, size, physics.world_mut());
                }
            }
        }
        Ok(next)
    }

    /// Detaches a component and hands it back.
    ///
    /// Removing the rigid body queues its body for destruction; removing a
    /// tracked collider destroys only its fixture.
    pub fn remove_component(
        &mut self,
        entity: EntityId,
        id: ComponentId,
        physics: &mut PhysicsManager,
    ) -> PhysicsResult<Component> {
        let target = self
            .entities
            .get_mut(entity.0)
            .ok_or(PhysicsError::UnknownEntity(entity))?;
        let index = target
            .position_of(id)
            .ok_or(PhysicsError::UnknownComponent {
                entity,
                component: id,
            })?;

        let is_rigid_body = matches!(target.components[index].component, Component::RigidBody(_));
        let is_collider = matches!(target.components[index].component, Component::Collider(_));

        if is_rigid_body {
            if let Some(parts) = target.rigid_body_parts() {
                let colliders = parts.colliders.into_iter().map(|(_, collider)| collider);
                parts.rigid_body.detach(colliders, physics.garbage_mut());
            }
        } else if is_collider {
            if let Some(parts) = target.rigid_body_parts() {
                if let Some((_, collider)) =
                    parts.colliders.into_iter().find(|(other, _)| *other == id)
                {
                    parts
                        .rigid_body
                        .collider_removed(id, collider, physics.world_mut());
                }
            }
        }

        let slot = target.components.remove(index);
        debug!("detached {} {id:?} from {entity:?}", slot.component.kind());
        Ok(slot.component)
    }

    /// Disabled components receive no fixed updates and no contact callbacks.
    pub fn set_component_enabled(
        &mut self,
        entity: EntityId,
        id: ComponentId,
        enabled: bool,
    ) -> PhysicsResult<()> {
        let slot = self
            .entity_mut(entity)
            .ok_or(PhysicsError::UnknownEntity(entity))?
            .components
            .iter_mut()
            .find(|slot| slot.id == id)
            .ok_or(PhysicsError::UnknownComponent {
                entity,
                component: id,
            })?;
        slot.enabled = enabled;
        Ok(())
    }
}
