//! Canonical forms for isomorph rejection.
//!
//! Purpose
//! - Two configurations that differ only by a type-preserving relabeling of
//!   their loose objects must get the same key; all others different keys.
//! - The key is the lexicographically smallest serialization over every
//!   type-preserving bijection of the loose objects (`k!` of them per type).
//!
//! Incremental use
//! - `Canonicalizer::initial_state` builds the per-bijection ordered sets for a
//!   root configuration; `Canonicalizer::extend` derives a child's state from
//!   its parent's with one insertion per bijection.
//! - The bijection list is computed once per loose-object layout (`BijectionCache`).
//!
//! Scale
//! - Cost is exponential in the number of loose objects of one type. Groups
//!   above `LARGE_GROUP` are logged; no bound is enforced.

mod bijection;
mod form;

pub use bijection::{type_preserving_bijections, Bijection, BijectionCache, LARGE_GROUP};
pub use form::{CanonicalForm, CanonicalState, Canonicalizer};

use std::collections::HashMap;

use crate::error::GenerationError;
use crate::objects::{ConstructedObject, Configuration, ObjectId};
use crate::registry::{ObjectRecord, ObjectRegistry};

/// Apply `bijection` to the loose objects of `configuration` and re-intern every
/// constructed object with its arguments substituted, in order.
pub fn relabel_configuration(
    registry: &mut ObjectRegistry,
    configuration: &Configuration,
    bijection: &Bijection,
) -> Result<Configuration, GenerationError> {
    let loose = configuration.loose();
    let mut map: HashMap<ObjectId, ObjectId> = HashMap::new();
    for (slot, id) in loose.ids().iter().enumerate() {
        let target = loose
            .ids()
            .get(bijection.image(slot))
            .copied()
            .ok_or_else(|| GenerationError::configuration("bijection leaves the loose objects"))?;
        map.insert(*id, target);
    }
    let mut relabeled = Configuration::from_loose(loose.clone());
    for id in configuration.constructed() {
        let object = match registry.record(*id) {
            Some(ObjectRecord::Constructed(object)) => object,
            _ => return Err(GenerationError::Constructibility { object: *id }),
        };
        let candidate = ConstructedObject {
            construction: object.construction,
            arguments: object
                .arguments
                .map_objects(|arg| map.get(&arg).copied().unwrap_or(arg)),
            output: object.output,
            ty: object.ty,
            id: None,
        };
        let new_id = registry.intern(candidate)?.id;
        map.insert(*id, new_id);
        relabeled.push_constructed(registry, new_id)?;
    }
    Ok(relabeled)
}
