//! Layer expansion: every legal one-object extension of a configuration.
//!
//! `Expansion` walks the catalog lazily, one child per call, so the driver can
//! keep one in-progress expansion per depth. `LayerExpander::expand` drains one
//! layer eagerly.

use std::sync::Arc;

use crate::driver::GeneratedConfiguration;
use crate::error::GenerationError;
use crate::matcher::{can_be_matched, match_all};
use crate::objects::{ArgumentTree, Catalog, ConstructionId, ObjectId, TypeLimits};
use crate::registry::ObjectRegistry;

/// Candidates discarded while expanding one configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExpansionCounters {
    /// Interned id already present in the parent configuration.
    pub verbatim_duplicates: u64,
    /// Output type already at its limit.
    pub capped: u64,
}

/// Catalog plus per-type limits; shared by every expansion of a run.
#[derive(Clone, Debug)]
pub struct LayerExpander {
    catalog: Arc<Catalog>,
    limits: TypeLimits,
}

impl LayerExpander {
    pub fn new(catalog: Arc<Catalog>, limits: TypeLimits) -> Self {
        Self { catalog, limits }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn limits(&self) -> &TypeLimits {
        &self.limits
    }

    /// Lazy expansion of `parent`.
    pub fn expansion(&self, parent: Arc<GeneratedConfiguration>) -> Expansion {
        Expansion {
            parent,
            next_construction: 0,
            construction: ConstructionId(0),
            pending: Vec::new().into_iter(),
            current: None,
            counters: ExpansionCounters::default(),
        }
    }

    /// All children of `parent`, in catalog order.
    pub fn expand(
        &self,
        registry: &mut ObjectRegistry,
        parent: &Arc<GeneratedConfiguration>,
    ) -> Result<Vec<Arc<GeneratedConfiguration>>, GenerationError> {
        let mut expansion = self.expansion(Arc::clone(parent));
        let mut children = Vec::new();
        while let Some(child) = expansion.next(self, registry)? {
            children.push(child);
        }
        Ok(children)
    }
}

/// In-progress expansion of one configuration.
#[derive(Debug)]
pub struct Expansion {
    parent: Arc<GeneratedConfiguration>,
    next_construction: usize,
    construction: ConstructionId,
    pending: std::vec::IntoIter<ArgumentTree>,
    /// Argument tree being turned into candidates, and its next output index.
    current: Option<(ArgumentTree, usize)>,
    counters: ExpansionCounters,
}

impl Expansion {
    pub fn counters(&self) -> ExpansionCounters {
        self.counters
    }

    /// Next child, or `None` once every construction has been tried.
    pub fn next(
        &mut self,
        expander: &LayerExpander,
        registry: &mut ObjectRegistry,
    ) -> Result<Option<Arc<GeneratedConfiguration>>, GenerationError> {
        Ok(self.next_child(expander, registry)?.map(|(_, child)| child))
    }

    /// Like `next`, also returning the id of the appended object.
    pub(crate) fn next_child(
        &mut self,
        expander: &LayerExpander,
        registry: &mut ObjectRegistry,
    ) -> Result<Option<(ObjectId, Arc<GeneratedConfiguration>)>, GenerationError> {
        loop {
            if let Some((tree, output)) = &mut self.current {
                let construction = expander
                    .catalog
                    .get(self.construction)
                    .ok_or_else(|| GenerationError::mismatch(self.construction, "not in the catalog"))?;
                if let Some(&ty) = construction.outputs.get(*output) {
                    let index = *output;
                    *output += 1;
                    if !expander.limits.allows_another(ty, self.parent.added_by_type()) {
                        self.counters.capped += 1;
                        continue;
                    }
                    let candidate = expander.catalog.candidate(
                        self.construction,
                        tree.clone(),
                        index,
                        |id| registry.object_type(id),
                    )?;
                    let interned = registry.intern(candidate)?;
                    if self.parent.configuration().contains(ty, interned.id) {
                        self.counters.verbatim_duplicates += 1;
                        continue;
                    }
                    return Ok(Some((
                        interned.id,
                        GeneratedConfiguration::child(&self.parent, interned.id, ty),
                    )));
                }
                self.current = None;
            }

            if let Some(tree) = self.pending.next() {
                self.current = Some((tree, 0));
                continue;
            }

            let Some(construction) = expander.catalog.get(ConstructionId(self.next_construction))
            else {
                return Ok(None);
            };
            self.next_construction += 1;
            let added = self.parent.added_by_type();
            if construction
                .outputs
                .iter()
                .all(|ty| !expander.limits.allows_another(*ty, added))
            {
                continue;
            }
            let inventory = self.parent.configuration().inventory();
            if !can_be_matched(&construction.signature, inventory) {
                continue;
            }
            let trees = match_all(&construction.signature, inventory);
            tracing::debug!(
                construction = %construction.name,
                matches = trees.len(),
                "construction_matched"
            );
            self.construction = construction.id;
            self.pending = trees.into_iter();
        }
    }
}
