//! Construction signatures: typed, possibly nested, unordered argument shapes.

use serde::{Deserialize, Serialize};

use super::argument::{ArgNode, ArgRef, ArgumentTree};
use super::types::{ObjectId, ObjectType, TypeCounts};

/// One parameter node of a signature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Param {
    /// A single object of the given type.
    Object(ObjectType),
    /// `count` arguments shaped like `of`, compared as an unordered collection.
    Set { of: Box<Param>, count: usize },
}

impl Param {
    pub fn set(of: Param, count: usize) -> Self {
        Self::Set {
            of: Box::new(of),
            count,
        }
    }
}

/// Why an argument tree does not fit a signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ShapeError {
    Shape(String),
    Unknown(ObjectId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    params: Vec<Param>,
    required: TypeCounts,
    interchangeable: [bool; ObjectType::COUNT],
}

impl Signature {
    pub fn new(params: Vec<Param>) -> Result<Self, String> {
        if params.is_empty() {
            return Err("signature has no parameters".into());
        }
        let mut required = TypeCounts::default();
        let mut groups = TypeCounts::default();
        let mut split = [false; ObjectType::COUNT];
        // (param, multiplicity, below a set of sets)
        let mut stack: Vec<(&Param, usize, bool)> = params.iter().map(|p| (p, 1, false)).collect();
        while let Some((param, mult, nested)) = stack.pop() {
            match param {
                Param::Object(ty) => {
                    required.add(*ty, mult);
                    groups.increment(*ty);
                    split[ty.index()] |= nested;
                }
                Param::Set { of, count } => {
                    if *count == 0 {
                        return Err("set parameter with count 0".into());
                    }
                    match of.as_ref() {
                        Param::Object(ty) => {
                            required.add(*ty, mult * count);
                            groups.increment(*ty);
                            split[ty.index()] |= nested;
                        }
                        inner => stack.push((inner, mult * count, true)),
                    }
                }
            }
        }
        let mut interchangeable = [false; ObjectType::COUNT];
        for ty in ObjectType::ALL {
            interchangeable[ty.index()] = !split[ty.index()] && groups.get(ty) <= 1;
        }
        Ok(Self {
            params,
            required,
            interchangeable,
        })
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Flattened number of required objects per type.
    pub fn required(&self) -> &TypeCounts {
        &self.required
    }

    /// True when every slot of `ty` sits in one flat set (or there is at most
    /// one slot), so any assignment order of a chosen pool gives the same tree.
    pub fn slots_interchangeable(&self, ty: ObjectType) -> bool {
        self.interchangeable[ty.index()]
    }

    /// Check the tree against this signature. `type_of` resolves object types
    /// and returns `None` for objects without an id.
    pub(crate) fn check(
        &self,
        tree: &ArgumentTree,
        type_of: impl Fn(ObjectId) -> Option<ObjectType>,
    ) -> Result<(), ShapeError> {
        tree.check_structure().map_err(ShapeError::Shape)?;
        if tree.roots().len() != self.params.len() {
            return Err(ShapeError::Shape(format!(
                "expected {} arguments, found {}",
                self.params.len(),
                tree.roots().len()
            )));
        }
        let mut stack: Vec<(&Param, ArgRef)> =
            self.params.iter().zip(tree.roots().iter().copied()).collect();
        while let Some((param, r)) = stack.pop() {
            let node = tree
                .node(r)
                .ok_or_else(|| ShapeError::Shape(format!("missing node {}", r.index())))?;
            match (param, node) {
                (Param::Object(expected), ArgNode::Object(id)) => {
                    let actual = type_of(*id).ok_or(ShapeError::Unknown(*id))?;
                    if actual != *expected {
                        return Err(ShapeError::Shape(format!(
                            "{id} is a {actual}, expected a {expected}"
                        )));
                    }
                }
                (Param::Set { of, count }, ArgNode::Set(children)) => {
                    if children.len() != *count {
                        return Err(ShapeError::Shape(format!(
                            "set of {} arguments, expected {count}",
                            children.len()
                        )));
                    }
                    stack.extend(children.iter().map(|c| (of.as_ref(), *c)));
                }
                (Param::Object(expected), ArgNode::Set(_)) => {
                    return Err(ShapeError::Shape(format!("expected a {expected}, found a set")));
                }
                (Param::Set { .. }, ArgNode::Object(id)) => {
                    return Err(ShapeError::Shape(format!("expected a set, found {id}")));
                }
            }
        }
        Ok(())
    }
}
