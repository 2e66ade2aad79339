//! Type-preserving bijections of the loose objects and their run-wide cache.

use std::collections::HashMap;
use std::sync::Arc;

use crate::combinatorics::{for_each_product, permutations};
use crate::objects::{LooseObjects, ObjectType};

/// Group sizes above this (8!) get a warning; the search stays exhaustive.
pub const LARGE_GROUP: usize = 40_320;

/// Map from loose slot to loose slot that sends every type to itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Bijection(Vec<usize>);

impl Bijection {
    pub fn identity(n: usize) -> Self {
        Self((0..n).collect())
    }
    /// Image of `slot`; slots outside the domain are fixed.
    #[inline]
    pub fn image(&self, slot: usize) -> usize {
        self.0.get(slot).copied().unwrap_or(slot)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(i, &j)| i == j)
    }
}

/// All bijections of the slots of `types` that map each type to itself.
/// The identity comes first; an empty slot list yields just the identity.
pub fn type_preserving_bijections(types: &[ObjectType]) -> Vec<Bijection> {
    let classes: Vec<Vec<usize>> = ObjectType::ALL
        .into_iter()
        .map(|ty| {
            types
                .iter()
                .enumerate()
                .filter(|&(_, t)| *t == ty)
                .map(|(slot, _)| slot)
                .collect::<Vec<_>>()
        })
        .filter(|class| !class.is_empty())
        .collect();
    let arrangements: Vec<Vec<Vec<usize>>> = classes.iter().map(|c| permutations(c)).collect();
    let sizes: Vec<usize> = arrangements.iter().map(Vec::len).collect();
    let mut out = Vec::with_capacity(sizes.iter().product());
    for_each_product(&sizes, |choice| {
        let mut map: Vec<usize> = (0..types.len()).collect();
        for ((class, perms), &i) in classes.iter().zip(&arrangements).zip(choice) {
            for (&from, &to) in class.iter().zip(&perms[i]) {
                map[from] = to;
            }
        }
        out.push(Bijection(map));
    });
    out
}

/// Bijection lists keyed by the slot-type sequence of the loose objects.
#[derive(Clone, Debug, Default)]
pub struct BijectionCache {
    groups: HashMap<Vec<ObjectType>, Arc<[Bijection]>>,
}

impl BijectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bijections(&mut self, loose: &LooseObjects) -> Arc<[Bijection]> {
        if let Some(group) = self.groups.get(loose.types()) {
            return Arc::clone(group);
        }
        let group: Arc<[Bijection]> = type_preserving_bijections(loose.types()).into();
        if group.len() > LARGE_GROUP {
            tracing::warn!(
                loose = loose.len(),
                bijections = group.len(),
                "large_relabeling_group"
            );
        } else {
            tracing::debug!(loose = loose.len(), bijections = group.len(), "relabeling_group");
        }
        self.groups.insert(loose.types().to_vec(), Arc::clone(&group));
        group
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
