//! The parameter map built by generated parameter-builder methods.
//!
//! Keys are ordered (BTreeMap) so that JSON and query renderings are
//! reproducible across runs, which generated tests rely on.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::ParamError;

/// Query parameters in append order.
pub type QueryParams = Vec<(String, String)>;

/// Key → value mapping produced by a generated parameter builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(BTreeMap<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a scalar value under the given parameter key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Insert an arbitrary serializable value under the given key.
    ///
    /// Generated code uses this for non-scalar argument kinds and for
    /// repeatable (list) fields.
    pub fn try_set<T: Serialize + ?Sized>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<(), ParamError> {
        let value = serde_json::to_value(value)?;
        self.0.insert(key.into(), value);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Render the map as a JSON object value (body payload form).
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    /// Render the map as a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }

    /// Convert the map into query form.
    ///
    /// Keys listed in `repeated` were classified as repeatable at generation
    /// time; their array elements are appended one pair each under `key[]`.
    /// No runtime type sniffing happens here — a repeatable key holding a
    /// non-array value falls through to the scalar path.
    pub fn to_query(&self, repeated: &[&str]) -> QueryParams {
        let mut query = QueryParams::new();
        for (key, value) in &self.0 {
            match value {
                Value::Array(items) if repeated.contains(&key.as_str()) => {
                    for item in items {
                        query.push((format!("{key}[]"), scalar_string(item)));
                    }
                }
                _ => query.push((key.clone(), scalar_string(value))),
            }
        }
        query
    }

    /// Convert the map into plain string form (used for slug substitution).
    pub fn to_string_map(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), scalar_string(v)))
            .collect()
    }
}

/// URL-encode query parameters into a query string.
pub fn encode_query(query: &QueryParams) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in query {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
