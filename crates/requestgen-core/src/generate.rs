//! Generation orchestration: fan out per-type pipelines and merge output.
//!
//! Each requested type runs introspection → classification → rule
//! resolution → emission on its own tokio task. A failing type is reported
//! and dropped; it never contaminates the output of its siblings, and no
//! partial unit is appended for it. Units are merged back in requested
//! order regardless of completion order.

use crate::config::Config;
use crate::declaration::Registry;
use crate::emit::CodeEmitter;
use crate::error::{Error, Result};
use crate::field::GeneratedUnit;
use crate::imports::ImportResolver;
use crate::introspect::introspect;
use crate::rules::resolve;

/// One type that failed to generate.
#[derive(Debug, Clone)]
pub struct TypeFailure {
    pub type_name: String,
    pub error: String,
}

/// The outcome of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// The merged output buffer (header, imports, units).
    pub output: String,
    /// Completed units in requested order.
    pub units: Vec<GeneratedUnit>,
    /// Types that were dropped, with their errors.
    pub failures: Vec<TypeFailure>,
}

impl GenerationReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run generation for every type named in the config.
pub async fn generate(registry: &Registry, config: &Config) -> Result<GenerationReport> {
    config.validate()?;

    let mut handles = Vec::new();
    for type_name in &config.types {
        let registry = registry.clone();
        let config = config.clone();
        let type_name = type_name.clone();
        handles.push((
            type_name.clone(),
            tokio::spawn(async move { generate_type(&registry, &config, &type_name) }),
        ));
    }

    let mut units = Vec::new();
    let mut failures = Vec::new();
    for (type_name, handle) in handles {
        let result = handle
            .await
            .map_err(|e| Error::config(format!("generation task for {type_name} failed: {e}")))?;
        match result {
            Ok(unit) => {
                log::debug!("generated companion for {type_name}");
                units.push(unit);
            }
            Err(err) => {
                log::error!("skipping {type_name}: {err}");
                failures.push(TypeFailure {
                    type_name,
                    error: err.to_string(),
                });
            }
        }
    }

    let output = merge(config, &units);
    Ok(GenerationReport {
        output,
        units,
        failures,
    })
}

fn generate_type(registry: &Registry, config: &Config, type_name: &str) -> Result<GeneratedUnit> {
    let raw = introspect(registry, type_name)?;
    let descriptor = resolve(registry, config, &raw)?;
    let resolver = ImportResolver::new(registry.imports(), registry.type_names());
    let emitter = CodeEmitter::new()?;
    emitter.emit(&descriptor, resolver)
}

/// Merge completed units into the final buffer.
fn merge(config: &Config, units: &[GeneratedUnit]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "// Code generated by \"requestgen --types {}\"; DO NOT EDIT.\n",
        config.types.join(",")
    ));

    let mut imports: Vec<&String> = units
        .iter()
        .flat_map(|u| u.imports.iter())
        .collect();
    imports.sort();
    imports.dedup();
    if !imports.is_empty() {
        out.push('\n');
        for line in imports {
            out.push_str(line);
            out.push('\n');
        }
    }

    for unit in units {
        for block in &unit.blocks {
            out.push('\n');
            out.push_str(block);
            out.push('\n');
        }
    }
    out
}
