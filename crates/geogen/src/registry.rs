//! Object registry: content-addressed interning of constructed objects.
//!
//! A candidate is rendered to a structural key (construction, output index,
//! arguments with set children sorted) and looked up; the first occurrence of
//! a key receives the next sequential id, later ones resolve to it.
//! One registry lives for one generation run and is owned by the driver.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::GenerationError;
use crate::objects::{Catalog, ConstructedObject, LooseObjects, ObjectId, ObjectType};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObjectRecord {
    Loose {
        ty: ObjectType,
        slot: usize,
        label: String,
    },
    Constructed(ConstructedObject),
}

impl ObjectRecord {
    pub fn ty(&self) -> ObjectType {
        match self {
            Self::Loose { ty, .. } => *ty,
            Self::Constructed(object) => object.ty,
        }
    }
}

/// Result of interning: the permanent id and whether it was assigned just now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interned {
    pub id: ObjectId,
    pub fresh: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ObjectRegistry {
    records: Vec<ObjectRecord>,
    index: HashMap<String, ObjectId>,
    loose: LooseObjects,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a loose object. Loose objects are fixed before anything is constructed.
    pub fn add_loose(
        &mut self,
        ty: ObjectType,
        label: impl Into<String>,
    ) -> Result<ObjectId, GenerationError> {
        if self.records.len() != self.loose.len() {
            return Err(GenerationError::configuration(
                "loose objects must be added before constructed ones",
            ));
        }
        let id = ObjectId(self.records.len());
        let slot = self.loose.len();
        self.records.push(ObjectRecord::Loose {
            ty,
            slot,
            label: label.into(),
        });
        self.loose.push(id, ty);
        Ok(id)
    }

    pub fn loose_objects(&self) -> Arc<LooseObjects> {
        Arc::new(self.loose.clone())
    }

    /// Structural key of a candidate. Fails if an argument has no id.
    pub fn structural_key(&self, candidate: &ConstructedObject) -> Result<String, GenerationError> {
        let args = candidate.arguments.try_render(|id, out| {
            if id.0 < self.records.len() {
                out.push_str(&id.to_string());
                Ok(())
            } else {
                Err(GenerationError::Constructibility { object: id })
            }
        })?;
        Ok(format!("{}:{}{}", candidate.construction, candidate.output, args))
    }

    pub fn intern(&mut self, mut candidate: ConstructedObject) -> Result<Interned, GenerationError> {
        if let Some(id) = candidate.id {
            return Err(GenerationError::DuplicateObject { object: id });
        }
        let key = self.structural_key(&candidate)?;
        if let Some(&id) = self.index.get(&key) {
            return Ok(Interned { id, fresh: false });
        }
        let id = ObjectId(self.records.len());
        candidate.id = Some(id);
        self.records.push(ObjectRecord::Constructed(candidate));
        self.index.insert(key, id);
        tracing::trace!(id = id.0, "object_interned");
        Ok(Interned { id, fresh: true })
    }

    pub fn record(&self, id: ObjectId) -> Option<&ObjectRecord> {
        self.records.get(id.0)
    }

    pub fn object_type(&self, id: ObjectId) -> Option<ObjectType> {
        self.record(id).map(ObjectRecord::ty)
    }

    /// Number of registered objects, loose included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Human-readable form such as `Midpoint({A,B})`.
    pub fn describe(&self, id: ObjectId, catalog: &Catalog) -> String {
        match self.record(id) {
            None => id.to_string(),
            Some(ObjectRecord::Loose { label, .. }) if !label.is_empty() => label.clone(),
            Some(ObjectRecord::Loose { .. }) => id.to_string(),
            Some(ObjectRecord::Constructed(object)) => {
                let name = catalog
                    .get(object.construction)
                    .map_or_else(|| object.construction.to_string(), |c| c.name.clone());
                let multi = catalog
                    .get(object.construction)
                    .is_some_and(|c| c.outputs.len() > 1);
                let args: Result<String, std::convert::Infallible> =
                    object.arguments.try_render(|arg, out| {
                        out.push_str(&self.describe(arg, catalog));
                        Ok(())
                    });
                let args = match args {
                    Ok(s) => s,
                    Err(never) => match never {},
                };
                if multi {
                    format!("{name}{args}[{}]", object.output)
                } else {
                    format!("{name}{args}")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{ArgumentTree, ConstructionId, Param};

    fn setup() -> (ObjectRegistry, Catalog, ConstructionId, [ObjectId; 3]) {
        let mut registry = ObjectRegistry::new();
        let a = registry.add_loose(ObjectType::Point, "A").unwrap();
        let b = registry.add_loose(ObjectType::Point, "B").unwrap();
        let c = registry.add_loose(ObjectType::Point, "C").unwrap();
        let mut catalog = Catalog::new();
        let mid = catalog
            .add(
                "Midpoint",
                vec![Param::set(Param::Object(ObjectType::Point), 2)],
                vec![ObjectType::Point],
            )
            .unwrap();
        (registry, catalog, mid, [a, b, c])
    }

    fn midpoint(
        registry: &ObjectRegistry,
        catalog: &Catalog,
        mid: ConstructionId,
        x: ObjectId,
        y: ObjectId,
    ) -> ConstructedObject {
        let mut args = ArgumentTree::new();
        let p = args.object(x);
        let q = args.object(y);
        let s = args.set([p, q]);
        args.push_root(s);
        catalog
            .candidate(mid, args, 0, |id| registry.object_type(id))
            .unwrap()
    }

    #[test]
    fn structurally_equal_candidates_share_an_id() {
        let (mut registry, catalog, mid, [a, b, c]) = setup();
        let first = registry.intern(midpoint(&registry, &catalog, mid, a, b)).unwrap();
        let second = registry.intern(midpoint(&registry, &catalog, mid, b, a)).unwrap();
        assert!(first.fresh);
        assert!(!second.fresh);
        assert_eq!(first.id, second.id);

        let other = registry.intern(midpoint(&registry, &catalog, mid, a, c)).unwrap();
        assert!(other.fresh);
        assert_ne!(other.id, first.id);
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn ids_are_sequential_after_loose_objects() {
        let (mut registry, catalog, mid, [a, b, _]) = setup();
        let m = registry.intern(midpoint(&registry, &catalog, mid, a, b)).unwrap();
        assert_eq!(m.id, ObjectId(3));
        assert_eq!(registry.object_type(m.id), Some(ObjectType::Point));
    }

    #[test]
    fn candidate_with_id_is_a_duplicate() {
        let (mut registry, catalog, mid, [a, b, _]) = setup();
        let mut cand = midpoint(&registry, &catalog, mid, a, b);
        cand.id = Some(ObjectId(7));
        assert_eq!(
            registry.intern(cand),
            Err(GenerationError::DuplicateObject {
                object: ObjectId(7)
            })
        );
    }

    #[test]
    fn uninterned_argument_is_not_constructible() {
        let (mut registry, _catalog, mid, [a, _, _]) = setup();
        let mut args = ArgumentTree::new();
        let p = args.object(a);
        let q = args.object(ObjectId(99));
        let s = args.set([p, q]);
        args.push_root(s);
        // Bypasses the catalog check to reach the registry directly.
        let cand = ConstructedObject {
            construction: mid,
            arguments: args,
            output: 0,
            ty: ObjectType::Point,
            id: None,
        };
        assert_eq!(
            registry.intern(cand),
            Err(GenerationError::Constructibility {
                object: ObjectId(99)
            })
        );
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn loose_objects_cannot_follow_constructed_ones() {
        let (mut registry, catalog, mid, [a, b, _]) = setup();
        registry.intern(midpoint(&registry, &catalog, mid, a, b)).unwrap();
        assert!(registry.add_loose(ObjectType::Line, "l").is_err());
        assert_eq!(registry.loose_objects().len(), 3);
    }

    #[test]
    fn describe_uses_labels_and_names() {
        let (mut registry, catalog, mid, [a, b, c]) = setup();
        let m = registry.intern(midpoint(&registry, &catalog, mid, b, a)).unwrap();
        assert_eq!(registry.describe(m.id, &catalog), "Midpoint({A,B})");
        let n = registry.intern(midpoint(&registry, &catalog, mid, m.id, c)).unwrap();
        assert_eq!(registry.describe(n.id, &catalog), "Midpoint({C,Midpoint({A,B})})");
    }
}
