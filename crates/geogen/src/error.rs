//! Error type shared by every stage of the engine.
//!
//! The first three variants are invariant violations: once one surfaces the
//! run is aborted, since the shared id space can no longer be trusted. The
//! `Invalid*` variants report bad inputs caught while building a catalog, an
//! initial configuration or the generation settings.

use crate::objects::{ConstructionId, ObjectId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// An argument tree references an object that carries no id yet
    /// (or that is not available where it is used).
    #[error("object {object} is referenced before it was constructed")]
    Constructibility { object: ObjectId },
    /// A candidate was submitted to the registry while already carrying an id.
    #[error("object {object} was already interned")]
    DuplicateObject { object: ObjectId },
    /// An argument tree is not shaped like the construction's signature.
    #[error("arguments do not fit construction {construction}: {reason}")]
    SignatureMismatch {
        construction: ConstructionId,
        reason: String,
    },
    #[error("invalid catalog: {reason}")]
    InvalidCatalog { reason: String },
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },
    #[error("invalid generation settings: {reason}")]
    InvalidSettings { reason: String },
}

impl GenerationError {
    pub(crate) fn mismatch(construction: ConstructionId, reason: impl Into<String>) -> Self {
        Self::SignatureMismatch {
            construction,
            reason: reason.into(),
        }
    }

    pub(crate) fn catalog(reason: impl Into<String>) -> Self {
        Self::InvalidCatalog {
            reason: reason.into(),
        }
    }

    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    pub(crate) fn settings(reason: impl Into<String>) -> Self {
        Self::InvalidSettings {
            reason: reason.into(),
        }
    }

    /// Invariant violations abort a run; `Invalid*` errors are input problems.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::Constructibility { .. }
                | Self::DuplicateObject { .. }
                | Self::SignatureMismatch { .. }
        )
    }
}
