//! Signature matching against a configuration's per-type inventory.
//!
//! `can_be_matched` is the cheap necessary check; `match_all` enumerates every
//! distinct argument tree. Per type it takes k-combinations of the available
//! objects. When the signature spreads one type over several parameters or
//! nested sets, the orderings of each combination are enumerated as well and
//! the resulting trees are de-duplicated by their structural rendering.

use std::collections::HashSet;

use crate::combinatorics::{combinations, for_each_product, permutations};
use crate::objects::{ArgRef, ArgumentTree, ObjectId, ObjectInventory, ObjectType, Param, Signature};

/// Every type in the signature is available at least as often as required.
pub fn can_be_matched(signature: &Signature, inventory: &ObjectInventory) -> bool {
    signature
        .required()
        .present()
        .all(|(ty, n)| inventory.of(ty).len() >= n)
}

/// All distinct argument trees for `signature` drawn from `inventory`.
pub fn match_all(signature: &Signature, inventory: &ObjectInventory) -> Vec<ArgumentTree> {
    if !can_be_matched(signature, inventory) {
        return Vec::new();
    }
    let needed: Vec<(ObjectType, usize)> = signature.required().present().collect();
    if needed.is_empty() {
        return Vec::new();
    }
    let mut dimension_of = [usize::MAX; ObjectType::COUNT];
    let mut pools: Vec<Vec<Vec<ObjectId>>> = Vec::with_capacity(needed.len());
    let mut ordered = false;
    for (dim, &(ty, k)) in needed.iter().enumerate() {
        dimension_of[ty.index()] = dim;
        let combos = combinations(inventory.of(ty), k);
        if signature.slots_interchangeable(ty) {
            pools.push(combos);
        } else {
            ordered = true;
            pools.push(combos.iter().flat_map(|c| permutations(c)).collect());
        }
    }

    let sizes: Vec<usize> = pools.iter().map(Vec::len).collect();
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    for_each_product(&sizes, |choice| {
        let chosen: Vec<&[ObjectId]> = choice
            .iter()
            .zip(&pools)
            .map(|(&i, pool)| pool[i].as_slice())
            .collect();
        let mut cursors = vec![0usize; chosen.len()];
        let mut tree = ArgumentTree::new();
        for param in signature.params() {
            let r = place(param, &mut tree, &chosen, &mut cursors, &dimension_of);
            tree.push_root(r);
        }
        if !ordered || seen.insert(tree.render_ids()) {
            out.push(tree);
        }
    });
    out
}

/// Assign the next objects of each type to the leaves of `param`, left to right.
fn place(
    param: &Param,
    tree: &mut ArgumentTree,
    chosen: &[&[ObjectId]],
    cursors: &mut [usize],
    dimension_of: &[usize; ObjectType::COUNT],
) -> ArgRef {
    match param {
        Param::Object(ty) => {
            let dim = dimension_of[ty.index()];
            let id = chosen[dim][cursors[dim]];
            cursors[dim] += 1;
            tree.object(id)
        }
        Param::Set { of, count } => {
            let children: Vec<ArgRef> = (0..*count)
                .map(|_| place(of, tree, chosen, cursors, dimension_of))
                .collect();
            tree.set(children)
        }
    }
}
