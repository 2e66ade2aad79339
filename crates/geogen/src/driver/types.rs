//! Types shared between the driver and its callers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::GenerationError;
use crate::objects::{Configuration, ObjectId, ObjectType, TypeCounts, TypeLimits};

/// A configuration produced during generation, linked to the one it was expanded from.
#[derive(Debug)]
pub struct GeneratedConfiguration {
    configuration: Configuration,
    parent: Option<Arc<GeneratedConfiguration>>,
    added: Option<ObjectId>,
    depth: usize,
    /// Objects added since the root, by type.
    added_by_type: TypeCounts,
}

impl GeneratedConfiguration {
    /// Depth-0 node wrapping the initial configuration.
    pub fn root(configuration: Configuration) -> Arc<Self> {
        Arc::new(Self {
            configuration,
            parent: None,
            added: None,
            depth: 0,
            added_by_type: TypeCounts::default(),
        })
    }

    pub(crate) fn child(parent: &Arc<Self>, id: ObjectId, ty: ObjectType) -> Arc<Self> {
        let mut added_by_type = parent.added_by_type;
        added_by_type.increment(ty);
        Arc::new(Self {
            configuration: parent.configuration.with_object(id, ty),
            parent: Some(Arc::clone(parent)),
            added: Some(id),
            depth: parent.depth + 1,
            added_by_type,
        })
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn parent(&self) -> Option<&Arc<Self>> {
        self.parent.as_ref()
    }

    /// Object appended to the parent; `None` for the root.
    pub fn added(&self) -> Option<ObjectId> {
        self.added
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn added_by_type(&self) -> &TypeCounts {
        &self.added_by_type
    }

    /// This node followed by its ancestors up to the root.
    pub fn lineage(&self) -> impl Iterator<Item = &GeneratedConfiguration> {
        std::iter::successors(Some(self), |node| node.parent.as_deref())
    }

    /// Objects added since the root, oldest first.
    pub fn added_objects(&self) -> Vec<ObjectId> {
        let mut ids: Vec<ObjectId> = self.lineage().filter_map(|n| n.added).collect();
        ids.reverse();
        ids
    }
}

/// Cooperative cancellation shared with the caller; checked before every step.
#[derive(Clone, Debug, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Run parameters.
#[derive(Clone, Debug)]
pub struct GenerationSettings {
    /// Maximum depth; configurations at this depth are yielded but not expanded.
    pub iterations: usize,
    /// Per-type caps on objects added since the root. Absent caps are unlimited.
    pub limits: TypeLimits,
    pub stop: Option<StopFlag>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            iterations: 1,
            limits: TypeLimits::unlimited(),
            stop: None,
        }
    }
}

impl GenerationSettings {
    pub fn with_iterations(iterations: usize) -> Self {
        Self {
            iterations,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.iterations == 0 {
            return Err(GenerationError::settings("iterations must be at least 1"));
        }
        Ok(())
    }

    pub(crate) fn stopped(&self) -> bool {
        self.stop.as_ref().is_some_and(StopFlag::is_stopped)
    }
}

/// Counters accumulated over one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Index `d` holds the number of configurations yielded at depth `d + 1`.
    pub yielded_per_depth: Vec<usize>,
    /// Children whose canonical form was already seen.
    pub isomorphic: u64,
    pub rejected_by_predicate: u64,
    /// Candidates equal to an object already in the parent.
    pub verbatim_duplicates: u64,
    /// Candidates whose output type was at its limit.
    pub capped: u64,
    /// Configurations whose children were enumerated.
    pub expanded: u64,
}

impl GenerationStats {
    pub fn yielded(&self) -> usize {
        self.yielded_per_depth.iter().sum()
    }

    pub(crate) fn record_yield(&mut self, depth: usize) {
        if self.yielded_per_depth.len() < depth {
            self.yielded_per_depth.resize(depth, 0);
        }
        if let Some(slot) = depth.checked_sub(1).and_then(|d| self.yielded_per_depth.get_mut(d)) {
            *slot += 1;
        }
    }
}

/// Filter applied to each non-isomorphic child; rejected children are neither
/// yielded nor expanded.
pub type AcceptancePredicate = Box<dyn FnMut(&Configuration) -> bool>;
