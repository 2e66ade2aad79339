//! Depth-first generation with isomorph rejection.
//!
//! Purpose
//! - Enumerate every configuration reachable from an initial one by appending
//!   at most `iterations` constructed objects, one representative per
//!   isomorphism class.
//!
//! Why this design
//! - No recursion: the driver keeps an explicit stack with one in-progress
//!   `Expansion` per depth, so the maximum depth never touches the call stack.
//! - Output is a lazy iterator. Each child is canonicalized against its
//!   parent's state, checked against the run-wide `seen` set, then the
//!   acceptance predicate; survivors are yielded, and expanded only below the
//!   maximum depth.
//! - The root is the caller's input and is never yielded.
//! - An invariant violation is yielded once as `Err`; the iterator is fused after.

mod types;

pub use types::{
    AcceptancePredicate, GeneratedConfiguration, GenerationSettings, GenerationStats, StopFlag,
};

use std::collections::HashSet;
use std::iter::FusedIterator;
use std::sync::Arc;

use crate::canonical::{BijectionCache, CanonicalForm, CanonicalState, Canonicalizer};
use crate::error::GenerationError;
use crate::expander::{Expansion, LayerExpander};
use crate::objects::{Catalog, Configuration};
use crate::registry::ObjectRegistry;

struct Frame {
    expansion: Expansion,
    /// Canonical state of the configuration being expanded.
    state: CanonicalState,
}

/// Lazy stream of generated configurations.
pub struct Generator {
    expander: LayerExpander,
    registry: ObjectRegistry,
    canonicalizer: Canonicalizer,
    seen: HashSet<CanonicalForm>,
    stack: Vec<Frame>,
    settings: GenerationSettings,
    predicate: Option<AcceptancePredicate>,
    stats: GenerationStats,
    root: Arc<GeneratedConfiguration>,
    finished: bool,
}

impl Generator {
    /// Validate inputs and prepare the root frame. Nothing is expanded until
    /// the first call to `next`.
    pub fn new(
        catalog: Arc<Catalog>,
        registry: ObjectRegistry,
        initial: Configuration,
        settings: GenerationSettings,
    ) -> Result<Self, GenerationError> {
        settings.validate()?;
        if initial.loose().is_empty() {
            return Err(GenerationError::configuration("no loose objects"));
        }
        initial.validate(&registry)?;

        let mut cache = BijectionCache::new();
        let mut canonicalizer = Canonicalizer::for_configuration(&mut cache, &initial);
        let state = canonicalizer.initial_state(&registry, &initial)?;
        let mut seen = HashSet::new();
        seen.insert(canonicalizer.form(&state));

        tracing::info!(
            iterations = settings.iterations,
            loose = initial.loose().len(),
            constructed = initial.constructed().len(),
            constructions = catalog.len(),
            bijections = canonicalizer.bijections().len(),
            "generation_started"
        );

        let root = GeneratedConfiguration::root(initial);
        let expander = LayerExpander::new(catalog, settings.limits);
        let stack = vec![Frame {
            expansion: expander.expansion(Arc::clone(&root)),
            state,
        }];
        Ok(Self {
            expander,
            registry,
            canonicalizer,
            seen,
            stack,
            settings,
            predicate: None,
            stats: GenerationStats {
                expanded: 1,
                ..GenerationStats::default()
            },
            root,
            finished: false,
        })
    }

    /// Install an acceptance predicate; without one every child is accepted.
    pub fn with_predicate(mut self, predicate: impl FnMut(&Configuration) -> bool + 'static) -> Self {
        self.predicate = Some(Box::new(predicate));
        self
    }

    pub fn root(&self) -> &Arc<GeneratedConfiguration> {
        &self.root
    }

    /// Registry shared by every yielded configuration; grows as the run proceeds.
    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        self.expander.catalog()
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn stats(&self) -> &GenerationStats {
        &self.stats
    }

    /// Number of distinct canonical forms seen, the root included.
    pub fn distinct_forms(&self) -> usize {
        self.seen.len()
    }

    /// Drain the run, returning the registry alongside the results.
    pub fn run_to_end(
        mut self,
    ) -> Result<(Vec<Arc<GeneratedConfiguration>>, ObjectRegistry, GenerationStats), GenerationError>
    {
        let mut out = Vec::new();
        for item in self.by_ref() {
            out.push(item?);
        }
        Ok((out, self.registry, self.stats))
    }

    fn step(&mut self) -> Result<Option<Arc<GeneratedConfiguration>>, GenerationError> {
        loop {
            if self.settings.stopped() {
                tracing::info!(depth = self.stack.len(), "generation_stopped");
                self.stack.clear();
                return Ok(None);
            }
            // children of the top frame sit at depth `stack.len()`
            let depth = self.stack.len();
            let Some(frame) = self.stack.last_mut() else {
                return Ok(None);
            };
            let Some((added, child)) = frame.expansion.next_child(&self.expander, &mut self.registry)?
            else {
                if let Some(done) = self.stack.pop() {
                    let counters = done.expansion.counters();
                    self.stats.verbatim_duplicates += counters.verbatim_duplicates;
                    self.stats.capped += counters.capped;
                }
                tracing::debug!(depth, "layer_exhausted");
                continue;
            };
            let state = self.canonicalizer.extend(&self.registry, &frame.state, added)?;
            if !self.seen.insert(self.canonicalizer.form(&state)) {
                self.stats.isomorphic += 1;
                continue;
            }
            if let Some(accept) = self.predicate.as_mut() {
                if !accept(child.configuration()) {
                    self.stats.rejected_by_predicate += 1;
                    continue;
                }
            }
            self.stats.record_yield(child.depth());
            if depth < self.settings.iterations {
                self.stats.expanded += 1;
                self.stack.push(Frame {
                    expansion: self.expander.expansion(Arc::clone(&child)),
                    state,
                });
                tracing::debug!(depth = depth + 1, object = %added, "layer_pushed");
            } else {
                tracing::trace!(depth, object = %added, "configuration_accepted");
            }
            return Ok(Some(child));
        }
    }
}

impl Iterator for Generator {
    type Item = Result<Arc<GeneratedConfiguration>, GenerationError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.step() {
            Ok(Some(child)) => Some(Ok(child)),
            Ok(None) => {
                self.finished = true;
                tracing::info!(
                    yielded = self.stats.yielded(),
                    isomorphic = self.stats.isomorphic,
                    rejected = self.stats.rejected_by_predicate,
                    objects = self.registry.len(),
                    "generation_finished"
                );
                None
            }
            Err(err) => {
                self.finished = true;
                self.stack.clear();
                tracing::error!(error = %err, "generation_aborted");
                Some(Err(err))
            }
        }
    }
}

impl FusedIterator for Generator {}

/// Convenience: build a generator and collect every configuration.
pub fn generate(
    catalog: Arc<Catalog>,
    registry: ObjectRegistry,
    initial: Configuration,
    settings: GenerationSettings,
) -> Result<Vec<Arc<GeneratedConfiguration>>, GenerationError> {
    Generator::new(catalog, registry, initial, settings)?.collect()
}
