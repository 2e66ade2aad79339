//! JSON problem files: loose objects, catalog, pre-constructed objects, run settings.
//!
//! ```json
//! {
//!   "loose": [{"label": "A", "type": "point"}, {"label": "B", "type": "point"}],
//!   "constructions": [
//!     {"name": "Midpoint", "params": [{"set": {"of": {"object": "point"}, "count": 2}}],
//!      "outputs": ["point"]}
//!   ],
//!   "constructed": [{"label": "M", "construction": "Midpoint", "args": [["A", "B"]]}],
//!   "iterations": 2,
//!   "limits": {"point": 1}
//! }
//! ```

use anyhow::{anyhow, bail, Context, Result};
use geogen::objects::{
    ArgRef, ArgumentTree, Catalog, Configuration, ObjectId, ObjectType, Param, TypeLimits,
};
use geogen::registry::ObjectRegistry;
use geogen::GenerationSettings;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Problem {
    pub loose: Vec<LooseSpec>,
    pub constructions: Vec<ConstructionSpec>,
    #[serde(default)]
    pub constructed: Vec<ConstructedSpec>,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    #[serde(default)]
    pub limits: LimitsSpec,
}

fn default_iterations() -> usize {
    1
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LooseSpec {
    pub label: String,
    #[serde(rename = "type")]
    pub ty: ObjectType,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConstructionSpec {
    pub name: String,
    pub params: Vec<Param>,
    pub outputs: Vec<ObjectType>,
}

/// An object built before generation starts; may reference loose objects and
/// earlier entries by label.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConstructedSpec {
    pub label: String,
    pub construction: String,
    pub args: Vec<ArgSpec>,
    #[serde(default)]
    pub output: usize,
}

/// A label, or an unordered set of nested arguments.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ArgSpec {
    Label(String),
    Set(Vec<ArgSpec>),
}

/// Maximum number of added objects per type; missing entries are unlimited.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsSpec {
    pub point: Option<usize>,
    pub line: Option<usize>,
    pub circle: Option<usize>,
}

/// Everything `Generator::new` needs.
pub struct Prepared {
    pub catalog: Arc<Catalog>,
    pub registry: ObjectRegistry,
    pub initial: Configuration,
    pub settings: GenerationSettings,
}

impl Problem {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
    }

    /// Build catalog, registry and initial configuration. `iterations` overrides the file.
    pub fn prepare(&self, iterations: Option<usize>) -> Result<Prepared> {
        let mut catalog = Catalog::new();
        for c in &self.constructions {
            catalog
                .add(c.name.clone(), c.params.clone(), c.outputs.clone())
                .with_context(|| format!("construction {}", c.name))?;
        }

        let mut registry = ObjectRegistry::new();
        let mut labels: HashMap<String, ObjectId> = HashMap::new();
        for l in &self.loose {
            let id = registry.add_loose(l.ty, l.label.clone())?;
            if labels.insert(l.label.clone(), id).is_some() {
                bail!("duplicate label {}", l.label);
            }
        }

        let mut initial = Configuration::from_loose(registry.loose_objects());
        for spec in &self.constructed {
            let construction = catalog
                .by_name(&spec.construction)
                .ok_or_else(|| anyhow!("unknown construction {}", spec.construction))?;
            let mut tree = ArgumentTree::new();
            for arg in &spec.args {
                let root = push_arg(&mut tree, arg, &labels)?;
                tree.push_root(root);
            }
            let candidate = catalog
                .candidate(construction.id, tree, spec.output, |id| registry.object_type(id))
                .with_context(|| format!("object {}", spec.label))?;
            let id = registry.intern(candidate)?.id;
            initial
                .push_constructed(&registry, id)
                .with_context(|| format!("object {}", spec.label))?;
            if labels.insert(spec.label.clone(), id).is_some() {
                bail!("duplicate label {}", spec.label);
            }
        }

        let mut limits = TypeLimits::unlimited();
        for (ty, max) in [
            (ObjectType::Point, self.limits.point),
            (ObjectType::Line, self.limits.line),
            (ObjectType::Circle, self.limits.circle),
        ] {
            if let Some(max) = max {
                limits = limits.with(ty, max);
            }
        }

        Ok(Prepared {
            catalog: Arc::new(catalog),
            registry,
            initial,
            settings: GenerationSettings {
                iterations: iterations.unwrap_or(self.iterations),
                limits,
                stop: None,
            },
        })
    }
}

fn push_arg(
    tree: &mut ArgumentTree,
    arg: &ArgSpec,
    labels: &HashMap<String, ObjectId>,
) -> Result<ArgRef> {
    match arg {
        ArgSpec::Label(label) => {
            let id = labels
                .get(label)
                .ok_or_else(|| anyhow!("unknown label {label}"))?;
            Ok(tree.object(*id))
        }
        ArgSpec::Set(children) => {
            let refs = children
                .iter()
                .map(|c| push_arg(tree, c, labels))
                .collect::<Result<Vec<_>>>()?;
            Ok(tree.set(refs))
        }
    }
}
