//! Body bookkeeping
//!
//! The [`BodyTable`] links each simulated body to the entity that owns it and
//! keeps the motion state the synchronization pass reads from.

use rapier3d::prelude::{Isometry, Real, RigidBody, RigidBodyHandle};
use sable_core::Entity;

/// Opaque handle to a body in the physics world
///
/// A handle is tied to the initialization that created it. After
/// `shutdown` and a new `initialize`, older handles resolve to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle {
    raw: RigidBodyHandle,
    epoch: u32,
}

impl BodyHandle {
    pub(crate) fn new(raw: RigidBodyHandle, epoch: u32) -> Self {
        Self { raw, epoch }
    }

    /// Raw solver handle
    pub fn raw(&self) -> RigidBodyHandle {
        self.raw
    }

    /// Initialization the handle belongs to
    pub fn epoch(&self) -> u32 {
        self.epoch
    }
}

/// Pose captured at the end of the last completed step
#[derive(Debug, Clone, Copy)]
pub(crate) struct MotionState {
    pub(crate) pose: Isometry<Real>,
}

impl MotionState {
    pub(crate) fn at_rest(pose: Isometry<Real>) -> Self {
        Self { pose }
    }

    pub(crate) fn capture(body: &RigidBody) -> Self {
        Self {
            pose: *body.position(),
        }
    }
}

/// One entry of the body table
#[derive(Debug, Clone, Copy)]
pub(crate) struct BodyEntry {
    pub(crate) entity: Entity,
    pub(crate) handle: BodyHandle,
    pub(crate) motion: MotionState,
}

/// Bidirectional association between bodies and entities
#[derive(Debug, Default)]
pub struct BodyTable {
    entries: Vec<BodyEntry>,
}

impl BodyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a body; returns false if the handle is already present
    pub(crate) fn insert(
        &mut self,
        entity: Entity,
        handle: BodyHandle,
        motion: MotionState,
    ) -> bool {
        if self.contains(handle) {
            return false;
        }
        self.entries.push(BodyEntry {
            entity,
            handle,
            motion,
        });
        true
    }

    pub(crate) fn remove(&mut self, handle: BodyHandle) -> Option<BodyEntry> {
        let index = self.entries.iter().position(|e| e.handle == handle)?;
        Some(self.entries.swap_remove(index))
    }

    pub(crate) fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut BodyEntry> {
        self.entries.iter_mut().find(|e| e.handle == handle)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &BodyEntry> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut BodyEntry> {
        self.entries.iter_mut()
    }

    pub(crate) fn drain(&mut self) -> impl Iterator<Item = BodyEntry> + '_ {
        self.entries.drain(..)
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    /// Entity that owns a body
    pub fn entity_of(&self, handle: BodyHandle) -> Option<Entity> {
        self.entries.iter().find(|e| e.handle == handle).map(|e| e.entity)
    }

    /// Body owned by an entity
    pub fn body_of(&self, entity: Entity) -> Option<BodyHandle> {
        self.entries.iter().find(|e| e.entity == entity).map(|e| e.handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sable_core::Scene;

    fn handle(index: u32) -> BodyHandle {
        BodyHandle::new(RigidBodyHandle::from_raw_parts(index, 0), 1)
    }

    #[test]
    fn test_table_links_both_ways() {
        let mut scene = Scene::new("Bodies");
        let a = scene.create_entity("A");
        let b = scene.create_entity("B");

        let mut table = BodyTable::new();
        let rest = MotionState::at_rest(Isometry::identity());
        assert!(table.insert(a, handle(0), rest));
        assert!(table.insert(b, handle(1), rest));

        assert_eq!(table.entity_of(handle(1)), Some(b));
        assert_eq!(table.body_of(a), Some(handle(0)));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_duplicate_handle_is_rejected() {
        let mut scene = Scene::new("Bodies");
        let a = scene.create_entity("A");

        let mut table = BodyTable::new();
        let rest = MotionState::at_rest(Isometry::identity());
        assert!(table.insert(a, handle(3), rest));
        assert!(!table.insert(a, handle(3), rest));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut scene = Scene::new("Bodies");
        let a = scene.create_entity("A");

        let mut table = BodyTable::new();
        table.insert(a, handle(0), MotionState::at_rest(Isometry::identity()));

        assert!(table.remove(handle(0)).is_some());
        assert!(table.remove(handle(0)).is_none());
        assert!(table.is_empty());
        assert_eq!(table.entity_of(handle(0)), None);
    }

    #[test]
    fn test_handles_from_another_epoch_do_not_match() {
        let mut scene = Scene::new("Bodies");
        let a = scene.create_entity("A");

        let mut table = BodyTable::new();
        table.insert(a, handle(0), MotionState::at_rest(Isometry::identity()));

        let stale = BodyHandle::new(RigidBodyHandle::from_raw_parts(0, 0), 0);
        assert_ne!(stale, handle(0));
        assert!(!table.contains(stale));
        assert_eq!(table.entity_of(stale), None);
        assert!(table.remove(stale).is_none());
        assert_eq!(table.len(), 1);
    }
}
