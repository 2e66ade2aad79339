//! Constructions, the catalog that owns them, and constructed-object candidates.

use crate::error::GenerationError;

use super::argument::ArgumentTree;
use super::signature::{Param, ShapeError, Signature};
use super::types::{ConstructionId, ObjectId, ObjectType};

/// A signature plus its ordered output types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Construction {
    pub id: ConstructionId,
    pub name: String,
    pub signature: Signature,
    pub outputs: Vec<ObjectType>,
}

/// An object obtained by applying a construction to already available objects.
///
/// Candidates are built with `id: None`; the registry assigns the id on first
/// structural occurrence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstructedObject {
    pub construction: ConstructionId,
    pub arguments: ArgumentTree,
    pub output: usize,
    pub ty: ObjectType,
    pub id: Option<ObjectId>,
}

/// Ordered collection of constructions; `ConstructionId` is the position.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    constructions: Vec<Construction>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        name: impl Into<String>,
        params: Vec<Param>,
        outputs: Vec<ObjectType>,
    ) -> Result<ConstructionId, GenerationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(GenerationError::catalog("construction name is empty"));
        }
        if self.by_name(&name).is_some() {
            return Err(GenerationError::catalog(format!("duplicate construction `{name}`")));
        }
        if outputs.is_empty() {
            return Err(GenerationError::catalog(format!("`{name}` has no outputs")));
        }
        let signature =
            Signature::new(params).map_err(|e| GenerationError::catalog(format!("`{name}`: {e}")))?;
        let id = ConstructionId(self.constructions.len());
        self.constructions.push(Construction {
            id,
            name,
            signature,
            outputs,
        });
        Ok(id)
    }

    pub fn get(&self, id: ConstructionId) -> Option<&Construction> {
        self.constructions.get(id.0)
    }

    pub fn by_name(&self, name: &str) -> Option<&Construction> {
        self.constructions.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Construction> {
        self.constructions.iter()
    }

    pub fn len(&self) -> usize {
        self.constructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructions.is_empty()
    }

    /// Build a candidate for output `output` of `construction`, checking the
    /// argument tree against the signature. `type_of` resolves ids known to
    /// the caller; unresolved ids are a constructibility violation.
    pub fn candidate(
        &self,
        construction: ConstructionId,
        arguments: ArgumentTree,
        output: usize,
        type_of: impl Fn(ObjectId) -> Option<ObjectType>,
    ) -> Result<ConstructedObject, GenerationError> {
        let c = self
            .get(construction)
            .ok_or_else(|| GenerationError::mismatch(construction, "not in the catalog"))?;
        let ty = *c.outputs.get(output).ok_or_else(|| {
            GenerationError::mismatch(
                construction,
                format!("output {output} of {} outputs", c.outputs.len()),
            )
        })?;
        c.signature
            .check(&arguments, type_of)
            .map_err(|e| match e {
                ShapeError::Shape(reason) => GenerationError::mismatch(construction, reason),
                ShapeError::Unknown(object) => GenerationError::Constructibility { object },
            })?;
        Ok(ConstructedObject {
            construction,
            arguments,
            output,
            ty,
            id: None,
        })
    }
}
