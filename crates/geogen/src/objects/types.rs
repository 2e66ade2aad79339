//! Identifier and per-type counting types.
//!
//! - `ObjectType`: closed set of geometric object kinds.
//! - `ObjectId`, `ConstructionId`: dense integer handles.
//! - `TypeCounts`, `TypeLimits`: small fixed arrays indexed by `ObjectType`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a geometric object. Signatures and objects are typed by this set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Point,
    Line,
    Circle,
}

impl ObjectType {
    pub const COUNT: usize = 3;
    pub const ALL: [ObjectType; Self::COUNT] = [Self::Point, Self::Line, Self::Circle];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Self::Point => 0,
            Self::Line => 1,
            Self::Circle => 2,
        }
    }

    /// One-letter tag used in relabeled serializations.
    #[inline]
    pub fn tag(self) -> char {
        match self {
            Self::Point => 'P',
            Self::Line => 'L',
            Self::Circle => 'C',
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Point => "point",
            Self::Line => "line",
            Self::Circle => "circle",
        };
        f.write_str(name)
    }
}

/// Registry-assigned object identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub usize);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Position of a construction inside its `Catalog`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConstructionId(pub usize);

impl fmt::Display for ConstructionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Count per `ObjectType`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TypeCounts([usize; ObjectType::COUNT]);

impl TypeCounts {
    #[inline]
    pub fn get(&self, ty: ObjectType) -> usize {
        self.0[ty.index()]
    }
    #[inline]
    pub fn add(&mut self, ty: ObjectType, n: usize) {
        self.0[ty.index()] += n;
    }
    #[inline]
    pub fn increment(&mut self, ty: ObjectType) {
        self.add(ty, 1);
    }
    /// Types with a non-zero count, in `ObjectType::ALL` order.
    pub fn present(&self) -> impl Iterator<Item = (ObjectType, usize)> + '_ {
        ObjectType::ALL
            .into_iter()
            .map(|ty| (ty, self.get(ty)))
            .filter(|&(_, n)| n > 0)
    }
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }
}

/// Optional per-type maximum of objects added relative to the root configuration.
/// `None` means unlimited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TypeLimits([Option<usize>; ObjectType::COUNT]);

impl TypeLimits {
    pub fn unlimited() -> Self {
        Self::default()
    }
    pub fn with(mut self, ty: ObjectType, max: usize) -> Self {
        self.0[ty.index()] = Some(max);
        self
    }
    #[inline]
    pub fn max(&self, ty: ObjectType) -> Option<usize> {
        self.0[ty.index()]
    }
    /// Whether one more object of `ty` fits when `added` have been added so far.
    #[inline]
    pub fn allows_another(&self, ty: ObjectType, added: &TypeCounts) -> bool {
        self.max(ty).map_or(true, |max| added.get(ty) < max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_all_order() {
        for (i, ty) in ObjectType::ALL.into_iter().enumerate() {
            assert_eq!(ty.index(), i);
        }
    }

    #[test]
    fn limits_cap_only_configured_types() {
        let limits = TypeLimits::unlimited().with(ObjectType::Point, 1);
        let mut added = TypeCounts::default();
        assert!(limits.allows_another(ObjectType::Point, &added));
        added.increment(ObjectType::Point);
        assert!(!limits.allows_another(ObjectType::Point, &added));
        added.add(ObjectType::Line, 50);
        assert!(limits.allows_another(ObjectType::Line, &added));
    }

    #[test]
    fn present_skips_zero_counts() {
        let mut c = TypeCounts::default();
        c.add(ObjectType::Circle, 2);
        let v: Vec<_> = c.present().collect();
        assert_eq!(v, vec![(ObjectType::Circle, 2)]);
        assert_eq!(c.total(), 2);
    }
}
