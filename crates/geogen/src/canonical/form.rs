//! Canonical forms and the incremental per-bijection state.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::error::GenerationError;
use crate::objects::{ConstructedObject, Configuration, ObjectId};
use crate::registry::{ObjectRecord, ObjectRegistry};

use super::bijection::{Bijection, BijectionCache};

/// Isomorphism key of a configuration: the smallest relabeled serialization
/// over all type-preserving bijections of the loose objects.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalForm(String);

impl CanonicalForm {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per bijection, the ordered set of relabeled object strings of one configuration.
/// A child clones its parent's state and inserts one string per bijection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalState {
    per_bijection: Vec<BTreeSet<Arc<str>>>,
}

impl CanonicalState {
    /// Number of distinct constructed objects recorded.
    pub fn object_count(&self) -> usize {
        self.per_bijection.first().map_or(0, BTreeSet::len)
    }
}

/// Computes canonical forms for one run's loose objects.
///
/// Relabeled strings are memoized per object (one entry per bijection), since
/// the relabeling of an interned object does not depend on the configuration.
#[derive(Clone, Debug)]
pub struct Canonicalizer {
    bijections: Arc<[Bijection]>,
    relabeled: HashMap<ObjectId, Arc<[Arc<str>]>>,
}

impl Canonicalizer {
    pub fn new(bijections: Arc<[Bijection]>) -> Self {
        Self {
            bijections,
            relabeled: HashMap::new(),
        }
    }

    pub fn for_configuration(cache: &mut BijectionCache, configuration: &Configuration) -> Self {
        Self::new(cache.bijections(configuration.loose()))
    }

    pub fn bijections(&self) -> &[Bijection] {
        &self.bijections
    }

    /// Relabeled strings of `id`, one per bijection, in bijection order.
    pub fn relabeled(
        &mut self,
        registry: &ObjectRegistry,
        id: ObjectId,
    ) -> Result<Arc<[Arc<str>]>, GenerationError> {
        if let Some(done) = self.relabeled.get(&id) {
            return Ok(Arc::clone(done));
        }
        // post-order over the dependency tree of `id`
        let mut stack = vec![(id, false)];
        while let Some((current, expanded)) = stack.pop() {
            if self.relabeled.contains_key(&current) {
                continue;
            }
            let record = registry
                .record(current)
                .ok_or(GenerationError::Constructibility { object: current })?;
            let strings: Arc<[Arc<str>]> = match record {
                ObjectRecord::Loose { ty, slot, .. } => self
                    .bijections
                    .iter()
                    .map(|b| Arc::from(format!("{}{}", ty.tag(), b.image(*slot))))
                    .collect(),
                ObjectRecord::Constructed(object) => {
                    if !expanded {
                        stack.push((current, true));
                        stack.extend(
                            object
                                .arguments
                                .objects()
                                .filter(|arg| !self.relabeled.contains_key(arg))
                                .map(|arg| (arg, false)),
                        );
                        continue;
                    }
                    self.render_constructed(object)?
                }
            };
            self.relabeled.insert(current, strings);
        }
        self.relabeled
            .get(&id)
            .cloned()
            .ok_or(GenerationError::Constructibility { object: id })
    }

    fn render_constructed(&self, object: &ConstructedObject) -> Result<Arc<[Arc<str>]>, GenerationError> {
        (0..self.bijections.len())
            .map(|b| -> Result<Arc<str>, GenerationError> {
                let args = object.arguments.try_render(|arg, out| {
                    let strings = self
                        .relabeled
                        .get(&arg)
                        .ok_or(GenerationError::Constructibility { object: arg })?;
                    out.push_str(&strings[b]);
                    Ok(())
                })?;
                Ok(Arc::from(format!("{}.{}{}", object.construction, object.output, args)))
            })
            .collect()
    }

    /// State of a configuration built from scratch.
    pub fn initial_state(
        &mut self,
        registry: &ObjectRegistry,
        configuration: &Configuration,
    ) -> Result<CanonicalState, GenerationError> {
        let mut state = CanonicalState {
            per_bijection: vec![BTreeSet::new(); self.bijections.len()],
        };
        for id in configuration.constructed() {
            let strings = self.relabeled(registry, *id)?;
            for (set, s) in state.per_bijection.iter_mut().zip(strings.iter()) {
                set.insert(Arc::clone(s));
            }
        }
        Ok(state)
    }

    /// State of the parent's configuration with `added` appended.
    pub fn extend(
        &mut self,
        registry: &ObjectRegistry,
        parent: &CanonicalState,
        added: ObjectId,
    ) -> Result<CanonicalState, GenerationError> {
        let strings = self.relabeled(registry, added)?;
        let mut state = parent.clone();
        for (set, s) in state.per_bijection.iter_mut().zip(strings.iter()) {
            set.insert(Arc::clone(s));
        }
        Ok(state)
    }

    /// Smallest joined serialization over all bijections.
    pub fn form(&self, state: &CanonicalState) -> CanonicalForm {
        let mut best: Option<String> = None;
        for set in &state.per_bijection {
            let mut joined = String::new();
            for (i, s) in set.iter().enumerate() {
                if i > 0 {
                    joined.push(';');
                }
                joined.push_str(s);
            }
            if best.as_ref().map_or(true, |b| joined < *b) {
                best = Some(joined);
            }
        }
        CanonicalForm(best.unwrap_or_default())
    }

    /// Canonical form of a configuration without any lineage reuse.
    pub fn canonical_form(
        &mut self,
        registry: &ObjectRegistry,
        configuration: &Configuration,
    ) -> Result<CanonicalForm, GenerationError> {
        let state = self.initial_state(registry, configuration)?;
        Ok(self.form(&state))
    }
}
