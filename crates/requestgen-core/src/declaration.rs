//! Declaration sets: the type-resolution boundary of the generator.
//!
//! The generator does not parse arbitrary source. It consumes a *declaration
//! set* — a YAML or JSON document carrying already-resolved type
//! declarations, the package's import table and its constant catalog. The
//! [`Registry`] wraps a loaded set and memoizes per-name lookups, so repeated
//! resolution of the same type during a run is answered from cache.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One declared field of a struct-like type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawField {
    /// Declared names. More than one name means the declaration is a
    /// grouped list; such fields are skipped wholesale.
    pub names: Vec<String>,
    /// Declared type expression, `Option<T>` marking optionality.
    #[serde(rename = "type")]
    pub ty: String,
    /// Primary field directive: `key,option,option,...`
    #[serde(default)]
    pub param: Option<String>,
    /// Literal fallback for required fields left at their zero value.
    #[serde(default)]
    pub default: Option<String>,
    /// Generated-at-build-time fallback: `now()` or `uuid()`.
    #[serde(default, rename = "defaultValuer")]
    pub default_valuer: Option<String>,
    /// Comma-separated admissible values.
    #[serde(default, rename = "validValues")]
    pub valid_values: Option<String>,
    /// Named time layout for Time-kind fields.
    #[serde(default, rename = "timeFormat")]
    pub time_format: Option<String>,
}

/// One struct-like (or named scalar) type declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    /// Receiver variable name used in generated code; defaults derived
    /// from the type name when absent.
    #[serde(default)]
    pub receiver: Option<String>,
    /// Owning package, empty for the declaration set's own package.
    #[serde(default)]
    pub package: Option<String>,
    /// Underlying scalar for named scalar types (`string`, `int`).
    #[serde(default)]
    pub kind: Option<String>,
    /// Capability names this type implements (`Validate`, `DynamicPath`,
    /// `Unmarshal`).
    #[serde(default)]
    pub implements: Vec<String>,
    #[serde(default)]
    pub fields: Vec<RawField>,
}

impl TypeDecl {
    pub fn implements(&self, capability: &str) -> bool {
        self.implements.iter().any(|c| c == capability)
    }
}

/// A loaded declaration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclarationSet {
    /// Target package name for generated code.
    pub package: String,
    /// Alias → path table of the package's own imports.
    #[serde(default)]
    pub imports: BTreeMap<String, String>,
    /// Ordered type declarations.
    pub types: Vec<TypeDecl>,
    /// Constant catalog: named literal groups keyed by exact argument type.
    #[serde(default)]
    pub constants: BTreeMap<String, Vec<String>>,
}

impl DeclarationSet {
    /// Load a declaration set from a local file or an http(s) URL.
    pub async fn from_file_or_url(path_or_url: &str) -> Result<Self> {
        let content = if path_or_url.starts_with("http://") || path_or_url.starts_with("https://")
        {
            log::debug!("Fetching declaration set from URL: {path_or_url}");
            reqwest::get(path_or_url).await?.text().await?
        } else {
            log::debug!("Reading declaration set from file: {path_or_url}");
            tokio::fs::read_to_string(Path::new(path_or_url)).await?
        };
        Self::parse_content(&content)
    }

    /// Parse declaration content, trying JSON first and falling back to YAML.
    pub fn parse_content(content: &str) -> Result<Self> {
        match serde_json::from_str::<DeclarationSet>(content) {
            Ok(set) => Ok(set),
            Err(json_err) => {
                log::debug!("JSON parse failed ({json_err}), trying YAML");
                let set: DeclarationSet = serde_yaml::from_str(content)?;
                Ok(set)
            }
        }
    }
}

/// Memoizing lookup handle over a declaration set.
///
/// Lookups are keyed by (package, type name); an empty package means the
/// set's own package. The registry is cheap to clone and share across the
/// per-type generation tasks.
#[derive(Debug, Clone)]
pub struct Registry {
    set: Arc<DeclarationSet>,
    cache: Arc<RwLock<HashMap<(String, String), Arc<TypeDecl>>>>,
}

impl Registry {
    pub fn new(set: DeclarationSet) -> Self {
        Self {
            set: Arc::new(set),
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn package(&self) -> &str {
        &self.set.package
    }

    pub fn imports(&self) -> &BTreeMap<String, String> {
        &self.set.imports
    }

    pub fn constants(&self) -> &BTreeMap<String, Vec<String>> {
        &self.set.constants
    }

    /// Resolve a type by name within the given package.
    pub fn resolve(&self, package: &str, name: &str) -> Result<Arc<TypeDecl>> {
        let key = (package.to_string(), name.to_string());
        if let Some(decl) = self.cache.read().expect("registry cache poisoned").get(&key) {
            return Ok(decl.clone());
        }

        let decl = self
            .set
            .types
            .iter()
            .find(|t| {
                t.name == name && t.package.as_deref().unwrap_or("") == package
            })
            .cloned()
            .map(Arc::new)
            .ok_or_else(|| {
                Error::declaration(format!(
                    "type {name} not found in package {package:?}",
                    package = if package.is_empty() {
                        self.set.package.as_str()
                    } else {
                        package
                    }
                ))
            })?;

        self.cache
            .write()
            .expect("registry cache poisoned")
            .insert(key, decl.clone());
        Ok(decl)
    }

    /// Resolve a type in the declaration set's own package.
    pub fn resolve_local(&self, name: &str) -> Result<Arc<TypeDecl>> {
        self.resolve("", name)
    }

    /// Names of the types declared in the set's own package.
    pub fn type_names(&self) -> Vec<String> {
        self.set
            .types
            .iter()
            .filter(|t| t.package.as_deref().unwrap_or("").is_empty())
            .map(|t| t.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO_YAML: &str = r#"
package: exchange
imports:
  client: requestgen_client
types:
  - name: SideType
    kind: string
  - name: PlaceOrderRequest
    fields:
      - names: [symbol]
        type: String
        param: "symbol,required"
      - names: [side]
        type: SideType
        param: side
constants:
  SideType: ["buy", "sell"]
"#;

    #[test]
    fn test_parse_yaml() {
        let set = DeclarationSet::parse_content(DEMO_YAML).unwrap();
        assert_eq!(set.package, "exchange");
        assert_eq!(set.types.len(), 2);
        assert_eq!(
            set.imports.get("client").map(String::as_str),
            Some("requestgen_client")
        );
        assert_eq!(set.constants["SideType"], vec!["buy", "sell"]);
    }

    #[test]
    fn test_parse_json_first() {
        let json = r#"{"package":"exchange","types":[{"name":"A","fields":[]}]}"#;
        let set = DeclarationSet::parse_content(json).unwrap();
        assert_eq!(set.package, "exchange");
        assert_eq!(set.types[0].name, "A");
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(DeclarationSet::parse_content(": not : valid : at all [").is_err());
    }

    #[test]
    fn test_registry_resolves_and_memoizes() {
        let set = DeclarationSet::parse_content(DEMO_YAML).unwrap();
        let registry = Registry::new(set);

        let first = registry.resolve_local("PlaceOrderRequest").unwrap();
        let second = registry.resolve_local("PlaceOrderRequest").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.fields.len(), 2);
    }

    #[test]
    fn test_registry_unknown_type() {
        let set = DeclarationSet::parse_content(DEMO_YAML).unwrap();
        let registry = Registry::new(set);
        let err = registry.resolve_local("Missing").unwrap_err();
        assert!(err.to_string().contains("Missing"));
    }

    #[tokio::test]
    async fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decls.yaml");
        tokio::fs::write(&path, DEMO_YAML).await.unwrap();

        let set = DeclarationSet::from_file_or_url(path.to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(set.package, "exchange");
    }
}
