//! Data model: object types and ids, argument trees, signatures, the
//! construction catalog, and configurations.
//!
//! Purpose
//! - Keep every structural type in one place so the registry, matcher,
//!   expander and canonicalizer share a single vocabulary.
//! - Argument trees live in a flat arena addressed by small handles; set
//!   arguments compare by their sorted child keys.

mod argument;
mod configuration;
mod construction;
mod signature;
mod types;

pub use argument::{ArgNode, ArgRef, ArgumentTree};
pub use configuration::{Configuration, LooseObjects, ObjectInventory};
pub use construction::{Catalog, ConstructedObject, Construction};
pub use signature::{Param, Signature};
pub use types::{ConstructionId, ObjectId, ObjectType, TypeCounts, TypeLimits};

#[cfg(test)]
mod tests;
