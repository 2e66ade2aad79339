//! Results table: one row per generated configuration.

use anyhow::{bail, Context, Result};
use geogen::canonical::{BijectionCache, Canonicalizer};
use geogen::objects::Catalog;
use geogen::registry::ObjectRegistry;
use geogen::GeneratedConfiguration;
use polars::prelude::*;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Columns: `index`, `depth`, `parent` (null for children of the root),
/// `object`, `object_type`, `objects`, `canonical_form`.
pub fn build_table(
    configs: &[Arc<GeneratedConfiguration>],
    registry: &ObjectRegistry,
    catalog: &Catalog,
) -> Result<DataFrame> {
    let positions: HashMap<*const GeneratedConfiguration, u32> = configs
        .iter()
        .enumerate()
        .map(|(i, c)| (Arc::as_ptr(c), i as u32))
        .collect();

    let mut cache = BijectionCache::new();
    let mut canon = configs
        .first()
        .map(|c| Canonicalizer::for_configuration(&mut cache, c.configuration()));

    let n = configs.len();
    let mut index = Vec::with_capacity(n);
    let mut depth = Vec::with_capacity(n);
    let mut parent: Vec<Option<u32>> = Vec::with_capacity(n);
    let mut object = Vec::with_capacity(n);
    let mut object_type = Vec::with_capacity(n);
    let mut objects = Vec::with_capacity(n);
    let mut canonical_form = Vec::with_capacity(n);
    for (i, c) in configs.iter().enumerate() {
        index.push(i as u32);
        depth.push(c.depth() as u32);
        parent.push(
            c.parent()
                .and_then(|p| positions.get(&Arc::as_ptr(p)).copied()),
        );
        let added = c.added().context("generated configuration without an added object")?;
        object.push(registry.describe(added, catalog));
        object_type.push(
            registry
                .object_type(added)
                .map_or_else(String::new, |ty| ty.to_string()),
        );
        objects.push(c.configuration().object_count() as u32);
        let form = match canon.as_mut() {
            Some(canon) => canon.canonical_form(registry, c.configuration())?.to_string(),
            None => String::new(),
        };
        canonical_form.push(form);
    }

    let df = df!(
        "index" => index,
        "depth" => depth,
        "parent" => parent,
        "object" => object,
        "object_type" => object_type,
        "objects" => objects,
        "canonical_form" => canonical_form,
    )?;
    Ok(df)
}

/// Write `df` as CSV or Parquet, chosen by the file extension.
pub fn write_table(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" => {
            let mut file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            CsvWriter::new(&mut file).include_header(true).finish(df)?;
        }
        "parquet" => {
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            ParquetWriter::new(file).finish(df)?;
        }
        other => bail!("unsupported output format `{other}` (expected csv or parquet)"),
    }
    tracing::info!(rows = df.height(), path = %path.display(), "results_written");
    Ok(())
}
