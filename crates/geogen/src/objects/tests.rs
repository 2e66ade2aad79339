//! Configuration building and validation against a registry.

use super::*;
use crate::error::GenerationError;
use crate::registry::ObjectRegistry;

fn triangle_with_midpoint() -> (ObjectRegistry, Catalog, [ObjectId; 4]) {
    let mut registry = ObjectRegistry::new();
    let a = registry.add_loose(ObjectType::Point, "A").unwrap();
    let b = registry.add_loose(ObjectType::Point, "B").unwrap();
    let c = registry.add_loose(ObjectType::Point, "C").unwrap();
    let mut catalog = Catalog::new();
    let mid = catalog
        .add(
            "Midpoint",
            vec![Param::set(Param::Object(ObjectType::Point), 2)],
            vec![ObjectType::Point],
        )
        .unwrap();
    let mut args = ArgumentTree::new();
    let p = args.object(a);
    let q = args.object(b);
    let s = args.set([p, q]);
    args.push_root(s);
    let cand = catalog
        .candidate(mid, args, 0, |id| registry.object_type(id))
        .unwrap();
    let m = registry.intern(cand).unwrap().id;
    (registry, catalog, [a, b, c, m])
}

#[test]
fn from_loose_fills_inventory() {
    let (registry, _, [a, b, c, _]) = triangle_with_midpoint();
    let config = Configuration::from_loose(registry.loose_objects());
    assert_eq!(config.inventory().of(ObjectType::Point), &[a, b, c]);
    assert!(config.inventory().of(ObjectType::Line).is_empty());
    assert_eq!(config.object_count(), 3);
    assert!(config.validate(&registry).is_ok());
}

#[test]
fn push_constructed_checks_dependencies_and_duplicates() {
    let (registry, _, [a, _, _, m]) = triangle_with_midpoint();
    let mut config = Configuration::from_loose(registry.loose_objects());
    config.push_constructed(&registry, m).unwrap();
    assert_eq!(config.constructed(), &[m]);
    assert!(config.contains(ObjectType::Point, m));
    assert!(matches!(
        config.push_constructed(&registry, m),
        Err(GenerationError::InvalidConfiguration { .. })
    ));
    assert!(matches!(
        config.push_constructed(&registry, a),
        Err(GenerationError::InvalidConfiguration { .. })
    ));
    assert_eq!(
        config.push_constructed(&registry, ObjectId(50)),
        Err(GenerationError::Constructibility {
            object: ObjectId(50)
        })
    );
    assert!(config.validate(&registry).is_ok());
}

#[test]
fn validate_rejects_dependency_order_violation() {
    let (mut registry, catalog, [_, _, c, m]) = triangle_with_midpoint();
    let mid = catalog.by_name("Midpoint").unwrap().id;
    let mut args = ArgumentTree::new();
    let p = args.object(m);
    let q = args.object(c);
    let s = args.set([p, q]);
    args.push_root(s);
    let cand = catalog
        .candidate(mid, args, 0, |id| registry.object_type(id))
        .unwrap();
    let n = registry.intern(cand).unwrap().id;

    // `n` depends on `m`, which is missing from the configuration.
    let mut config = Configuration::from_loose(registry.loose_objects());
    assert_eq!(
        config.push_constructed(&registry, n),
        Err(GenerationError::Constructibility { object: m })
    );
    let bad = config.with_object(n, ObjectType::Point);
    assert_eq!(
        bad.validate(&registry),
        Err(GenerationError::Constructibility { object: m })
    );

    config.push_constructed(&registry, m).unwrap();
    config.push_constructed(&registry, n).unwrap();
    assert!(config.validate(&registry).is_ok());
}
