//! Configurations: loose objects of the run plus an ordered list of constructed objects.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::GenerationError;
use crate::registry::{ObjectRecord, ObjectRegistry};

use super::types::{ObjectId, ObjectType, TypeCounts};

/// The loose objects of one run, in slot order. Shared by every configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LooseObjects {
    ids: Vec<ObjectId>,
    types: Vec<ObjectType>,
}

impl LooseObjects {
    pub(crate) fn push(&mut self, id: ObjectId, ty: ObjectType) {
        self.ids.push(id);
        self.types.push(ty);
    }
    pub fn ids(&self) -> &[ObjectId] {
        &self.ids
    }
    /// Type of each slot.
    pub fn types(&self) -> &[ObjectType] {
        &self.types
    }
    pub fn len(&self) -> usize {
        self.ids.len()
    }
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
    pub fn type_counts(&self) -> TypeCounts {
        let mut c = TypeCounts::default();
        for ty in &self.types {
            c.increment(*ty);
        }
        c
    }
}

/// Objects of a configuration grouped by type, each group in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectInventory {
    by_type: [Vec<ObjectId>; ObjectType::COUNT],
}

impl ObjectInventory {
    pub fn of(&self, ty: ObjectType) -> &[ObjectId] {
        &self.by_type[ty.index()]
    }
    pub fn contains(&self, ty: ObjectType, id: ObjectId) -> bool {
        self.of(ty).contains(&id)
    }
    fn insert(&mut self, ty: ObjectType, id: ObjectId) {
        self.by_type[ty.index()].push(id);
    }
}

/// Immutable snapshot once built; children are derived with `with_object`.
#[derive(Clone, Debug)]
pub struct Configuration {
    loose: Arc<LooseObjects>,
    constructed: Vec<ObjectId>,
    inventory: ObjectInventory,
}

impl Configuration {
    pub fn from_loose(loose: Arc<LooseObjects>) -> Self {
        let mut inventory = ObjectInventory::default();
        for (id, ty) in loose.ids().iter().zip(loose.types()) {
            inventory.insert(*ty, *id);
        }
        Self {
            loose,
            constructed: Vec::new(),
            inventory,
        }
    }

    /// Append an interned object while building an initial configuration.
    /// Its arguments must already be present and it must not be present itself.
    pub fn push_constructed(
        &mut self,
        registry: &ObjectRegistry,
        id: ObjectId,
    ) -> Result<(), GenerationError> {
        let object = match registry.record(id) {
            Some(ObjectRecord::Constructed(object)) => object,
            Some(ObjectRecord::Loose { .. }) => {
                return Err(GenerationError::configuration(format!(
                    "{id} is loose and cannot be appended"
                )))
            }
            None => return Err(GenerationError::Constructibility { object: id }),
        };
        if self.inventory.contains(object.ty, id) {
            return Err(GenerationError::configuration(format!("{id} is already present")));
        }
        for arg in object.arguments.objects() {
            let present = registry
                .object_type(arg)
                .is_some_and(|ty| self.inventory.contains(ty, arg));
            if !present {
                return Err(GenerationError::Constructibility { object: arg });
            }
        }
        self.constructed.push(id);
        self.inventory.insert(object.ty, id);
        Ok(())
    }

    /// Child snapshot with one more object appended.
    pub(crate) fn with_object(&self, id: ObjectId, ty: ObjectType) -> Self {
        let mut next = self.clone();
        next.constructed.push(id);
        next.inventory.insert(ty, id);
        next
    }

    pub fn loose(&self) -> &Arc<LooseObjects> {
        &self.loose
    }

    /// Constructed objects in dependency order.
    pub fn constructed(&self) -> &[ObjectId] {
        &self.constructed
    }

    pub fn inventory(&self) -> &ObjectInventory {
        &self.inventory
    }

    pub fn contains(&self, ty: ObjectType, id: ObjectId) -> bool {
        self.inventory.contains(ty, id)
    }

    pub fn object_count(&self) -> usize {
        self.loose.len() + self.constructed.len()
    }

    /// One pass over the constructed objects in order: every argument is loose
    /// or earlier in the list, and nothing appears twice.
    pub fn validate(&self, registry: &ObjectRegistry) -> Result<(), GenerationError> {
        let mut available: HashSet<ObjectId> = HashSet::with_capacity(self.object_count());
        for (id, ty) in self.loose.ids().iter().zip(self.loose.types()) {
            match registry.record(*id) {
                Some(ObjectRecord::Loose { ty: actual, .. }) if actual == ty => {}
                _ => {
                    return Err(GenerationError::configuration(format!(
                        "{id} is not a loose {ty} of this registry"
                    )))
                }
            }
            if !available.insert(*id) {
                return Err(GenerationError::configuration(format!("{id} appears twice")));
            }
        }
        for id in &self.constructed {
            let object = match registry.record(*id) {
                Some(ObjectRecord::Constructed(object)) => object,
                Some(ObjectRecord::Loose { .. }) => {
                    return Err(GenerationError::configuration(format!(
                        "{id} is loose but listed as constructed"
                    )))
                }
                None => return Err(GenerationError::Constructibility { object: *id }),
            };
            if let Some(arg) = object.arguments.objects().find(|a| !available.contains(a)) {
                return Err(GenerationError::Constructibility { object: arg });
            }
            if !available.insert(*id) {
                return Err(GenerationError::configuration(format!("{id} appears twice")));
            }
        }
        Ok(())
    }
}
