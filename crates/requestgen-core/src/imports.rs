//! Import resolution for emitted code.
//!
//! During emission every externally-referenced item is funneled through the
//! [`ImportResolver`]; finalization renders a minimal, sorted `use` list.
//! Names that collide with a type declared in the target package are
//! re-qualified under an alias derived from their crate name. A referenced
//! crate that is missing from the declaration set's import table is worth a
//! warning but never an error — the emitted line still names the crate.

use std::collections::{BTreeMap, BTreeSet};

use crate::utils;

#[derive(Debug)]
pub struct ImportResolver {
    /// alias → crate path, from the declaration set.
    table: BTreeMap<String, String>,
    /// Type names declared in the target package.
    locals: BTreeSet<String>,
    /// crate path → imported items (possibly `Item as Alias`).
    uses: BTreeMap<String, BTreeSet<String>>,
    warned: BTreeSet<String>,
}

impl ImportResolver {
    pub fn new(table: &BTreeMap<String, String>, locals: impl IntoIterator<Item = String>) -> Self {
        Self {
            table: table.clone(),
            locals: locals.into_iter().collect(),
            uses: BTreeMap::new(),
            warned: BTreeSet::new(),
        }
    }

    /// Record that emitted code references `item` from `path` and return the
    /// token the code should use.
    pub fn use_item(&mut self, path: &str, item: &str) -> String {
        if !self.table.values().any(|p| p == path) && self.warned.insert(path.to_string()) {
            log::warn!("crate {path} is not in the declaration import table, using default name");
        }

        let (entry, token) = if self.locals.contains(item) {
            // Collides with a local declaration, re-qualify under the
            // crate-derived alias.
            let alias = format!(
                "{}{}",
                utils::to_upper_camel_case(self.crate_name(path)),
                item
            );
            (format!("{item} as {alias}"), alias)
        } else {
            (item.to_string(), item.to_string())
        };
        self.uses.entry(path.to_string()).or_default().insert(entry);
        token
    }

    /// Preferred short name for a crate path: the declaration set's alias
    /// when one exists, otherwise the path's last segment.
    fn crate_name<'a>(&'a self, path: &'a str) -> &'a str {
        self.table
            .iter()
            .find(|(_, p)| p.as_str() == path)
            .map(|(alias, _)| alias.as_str())
            .unwrap_or_else(|| utils::last_path_segment(path))
    }

    /// Render the sorted `use` lines for everything recorded so far.
    pub fn finalize(&self) -> BTreeSet<String> {
        self.uses
            .iter()
            .map(|(path, items)| {
                if items.len() == 1 {
                    let item = items.iter().next().expect("non-empty item set");
                    format!("use {path}::{item};")
                } else {
                    let list = items.iter().cloned().collect::<Vec<_>>().join(", ");
                    format!("use {path}::{{{list}}};")
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> BTreeMap<String, String> {
        BTreeMap::from([("client".to_string(), "requestgen_client".to_string())])
    }

    #[test]
    fn test_grouped_sorted_use_lines() {
        let mut resolver = ImportResolver::new(&table(), Vec::new());
        assert_eq!(resolver.use_item("requestgen_client", "Params"), "Params");
        assert_eq!(
            resolver.use_item("requestgen_client", "ParamError"),
            "ParamError"
        );
        assert_eq!(resolver.use_item("chrono", "Utc"), "Utc");

        let lines: Vec<_> = resolver.finalize().into_iter().collect();
        assert_eq!(
            lines,
            vec![
                "use chrono::Utc;".to_string(),
                "use requestgen_client::{ParamError, Params};".to_string(),
            ]
        );
    }

    #[test]
    fn test_duplicate_items_collapse() {
        let mut resolver = ImportResolver::new(&table(), Vec::new());
        resolver.use_item("requestgen_client", "Params");
        resolver.use_item("requestgen_client", "Params");
        assert_eq!(
            resolver.finalize().into_iter().collect::<Vec<_>>(),
            vec!["use requestgen_client::Params;".to_string()]
        );
    }

    #[test]
    fn test_local_collision_is_aliased() {
        let mut resolver = ImportResolver::new(&table(), vec!["Response".to_string()]);
        let token = resolver.use_item("requestgen_client", "Response");
        assert_eq!(token, "ClientResponse");
        assert_eq!(
            resolver.finalize().into_iter().collect::<Vec<_>>(),
            vec!["use requestgen_client::Response as ClientResponse;".to_string()]
        );
    }

    #[test]
    fn test_unlisted_crate_still_imports() {
        let mut resolver = ImportResolver::new(&table(), Vec::new());
        let token = resolver.use_item("serde_json", "Value");
        assert_eq!(token, "Value");
        assert!(resolver
            .finalize()
            .iter()
            .any(|l| l == "use serde_json::Value;"));
    }
}
