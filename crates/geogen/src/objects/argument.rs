//! Argument trees stored in a flat arena.
//!
//! Nodes are addressed by `ArgRef` handles. A set node may only refer to
//! nodes created before it, so a well-formed tree is in post-order and
//! cannot contain cycles. Top-level arguments are kept in `roots`, in
//! signature order.

use super::types::ObjectId;

/// Handle of a node inside one `ArgumentTree`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArgRef(u32);

impl ArgRef {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArgNode {
    /// Reference to an object.
    Object(ObjectId),
    /// Unordered fixed-arity collection of arguments.
    Set(Vec<ArgRef>),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArgumentTree {
    nodes: Vec<ArgNode>,
    roots: Vec<ArgRef>,
}

impl ArgumentTree {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, node: ArgNode) -> ArgRef {
        let r = ArgRef(self.nodes.len() as u32);
        self.nodes.push(node);
        r
    }

    pub fn object(&mut self, id: ObjectId) -> ArgRef {
        self.push(ArgNode::Object(id))
    }

    pub fn set(&mut self, children: impl IntoIterator<Item = ArgRef>) -> ArgRef {
        let children = children.into_iter().collect();
        self.push(ArgNode::Set(children))
    }

    /// Append a top-level argument.
    pub fn push_root(&mut self, r: ArgRef) {
        self.roots.push(r);
    }

    pub fn roots(&self) -> &[ArgRef] {
        &self.roots
    }

    pub fn node(&self, r: ArgRef) -> Option<&ArgNode> {
        self.nodes.get(r.index())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Object leaves in node order.
    pub fn objects(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.nodes.iter().filter_map(|n| match n {
            ArgNode::Object(id) => Some(*id),
            ArgNode::Set(_) => None,
        })
    }

    /// Same shape with every object leaf replaced through `f`.
    pub fn map_objects(&self, mut f: impl FnMut(ObjectId) -> ObjectId) -> ArgumentTree {
        let nodes = self
            .nodes
            .iter()
            .map(|n| match n {
                ArgNode::Object(id) => ArgNode::Object(f(*id)),
                ArgNode::Set(children) => ArgNode::Set(children.clone()),
            })
            .collect();
        ArgumentTree {
            nodes,
            roots: self.roots.clone(),
        }
    }

    /// Post-order check of the arena: sets are non-empty, children precede
    /// their parent, and every node is used exactly once (by a parent or as a root).
    pub fn check_structure(&self) -> Result<(), String> {
        let n = self.nodes.len();
        let mut uses = vec![0usize; n];
        for (i, node) in self.nodes.iter().enumerate() {
            if let ArgNode::Set(children) = node {
                if children.is_empty() {
                    return Err(format!("set node {i} has no children"));
                }
                for c in children {
                    if c.index() >= i {
                        return Err(format!("node {i} refers forward to node {}", c.index()));
                    }
                    uses[c.index()] += 1;
                }
            }
        }
        for r in &self.roots {
            if r.index() >= n {
                return Err(format!("root refers to missing node {}", r.index()));
            }
            uses[r.index()] += 1;
        }
        if let Some(i) = uses.iter().position(|&u| u != 1) {
            return Err(format!("node {i} is used {} times", uses[i]));
        }
        Ok(())
    }

    /// Render the tree with a caller-supplied rendering for object leaves.
    ///
    /// Set children are rendered first, sorted, then joined, so the result
    /// never depends on the order children were supplied in.
    pub fn try_render<E>(
        &self,
        mut leaf: impl FnMut(ObjectId, &mut String) -> Result<(), E>,
    ) -> Result<String, E> {
        let mut keys: Vec<String> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let key = match node {
                ArgNode::Object(id) => {
                    let mut s = String::new();
                    leaf(*id, &mut s)?;
                    s
                }
                ArgNode::Set(children) => {
                    let mut parts: Vec<&str> = children
                        .iter()
                        .map(|c| keys.get(c.index()).map_or("", String::as_str))
                        .collect();
                    parts.sort_unstable();
                    let mut s = String::with_capacity(parts.iter().map(|p| p.len() + 1).sum::<usize>() + 2);
                    s.push('{');
                    s.push_str(&parts.join(","));
                    s.push('}');
                    s
                }
            };
            keys.push(key);
        }
        let mut out = String::from("(");
        for (i, r) in self.roots.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(keys.get(r.index()).map_or("", String::as_str));
        }
        out.push(')');
        Ok(out)
    }

    /// Render with object leaves as their ids.
    pub fn render_ids(&self) -> String {
        let rendered: Result<String, std::convert::Infallible> = self.try_render(|id, out| {
            out.push_str(&id.to_string());
            Ok(())
        });
        match rendered {
            Ok(s) => s,
            Err(never) => match never {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(a: usize, b: usize) -> ArgumentTree {
        let mut t = ArgumentTree::new();
        let x = t.object(ObjectId(a));
        let y = t.object(ObjectId(b));
        let s = t.set([x, y]);
        t.push_root(s);
        t
    }

    #[test]
    fn set_rendering_ignores_order() {
        assert_eq!(pair(0, 1).render_ids(), pair(1, 0).render_ids());
        assert_eq!(pair(0, 1).render_ids(), "({#0,#1})");
        assert_ne!(pair(0, 1).render_ids(), pair(0, 2).render_ids());
    }

    #[test]
    fn top_level_order_is_kept() {
        let mut a = ArgumentTree::new();
        let x = a.object(ObjectId(3));
        let y = a.object(ObjectId(4));
        a.push_root(x);
        a.push_root(y);
        let mut b = ArgumentTree::new();
        let y = b.object(ObjectId(4));
        let x = b.object(ObjectId(3));
        b.push_root(y);
        b.push_root(x);
        assert_ne!(a.render_ids(), b.render_ids());
    }

    #[test]
    fn structure_check_rejects_shared_and_dangling_nodes() {
        let mut t = ArgumentTree::new();
        let x = t.object(ObjectId(0));
        t.push_root(x);
        t.push_root(x);
        assert!(t.check_structure().is_err());

        let mut t = ArgumentTree::new();
        let _unused = t.object(ObjectId(0));
        let y = t.object(ObjectId(1));
        t.push_root(y);
        assert!(t.check_structure().is_err());

        assert!(pair(2, 5).check_structure().is_ok());
    }

    #[test]
    fn nested_sets_render_canonically() {
        let build = |order: [usize; 4]| {
            let mut t = ArgumentTree::new();
            let a = t.object(ObjectId(order[0]));
            let b = t.object(ObjectId(order[1]));
            let s1 = t.set([a, b]);
            let c = t.object(ObjectId(order[2]));
            let d = t.object(ObjectId(order[3]));
            let s2 = t.set([c, d]);
            let outer = t.set([s2, s1]);
            t.push_root(outer);
            t
        };
        assert_eq!(build([0, 1, 2, 3]).render_ids(), build([3, 2, 1, 0]).render_ids());
        assert_ne!(build([0, 1, 2, 3]).render_ids(), build([0, 2, 1, 3]).render_ids());
    }
}
