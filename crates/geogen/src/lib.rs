//! Exhaustive generation of geometric configurations up to relabeling.
//!
//! A run starts from loose objects (free points, lines, circles) and a catalog
//! of constructions. Each step appends one constructed object; configurations
//! that differ only by a type-preserving relabeling of the loose objects are
//! emitted once.
//!
//! Layout
//! - `objects`: ids, types, argument trees, signatures, catalog, configurations.
//! - `registry`: content-addressed interning of constructed objects.
//! - `matcher`: every way a signature can be filled from an inventory.
//! - `expander`: one-step extensions of a configuration.
//! - `canonical`: relabeling-invariant keys.
//! - `driver`: the non-recursive depth-first generator.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API.

pub mod canonical;
pub mod combinatorics;
pub mod driver;
pub mod error;
pub mod expander;
pub mod matcher;
pub mod objects;
pub mod registry;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use driver::{generate, GeneratedConfiguration, GenerationSettings, GenerationStats, Generator};
pub use error::GenerationError;

/// Common exports for callers assembling a run.
pub mod prelude {
    pub use crate::canonical::{BijectionCache, CanonicalForm, Canonicalizer};
    pub use crate::driver::{
        generate, GeneratedConfiguration, GenerationSettings, GenerationStats, Generator, StopFlag,
    };
    pub use crate::error::GenerationError;
    pub use crate::objects::{
        ArgumentTree, Catalog, Configuration, ObjectId, ObjectType, Param, TypeLimits,
    };
    pub use crate::registry::ObjectRegistry;
}
