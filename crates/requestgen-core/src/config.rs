//! Generation configuration.
//!
//! A [`Config`] captures one generation run: which declaration set to load,
//! which types to generate for, and the request metadata (method, URL,
//! response shape) attached to the generated dispatch method. It is built
//! programmatically or loaded from a YAML file and passed explicitly through
//! the pipeline; the library keeps no global state.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for a generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Declaration-set location: a local file path or an http(s) URL
    pub schema: String,
    /// Names of the request types to generate companions for
    pub types: Vec<String>,
    /// HTTP method attached to generated dispatch methods
    #[serde(default = "default_method")]
    pub method: String,
    /// Static URL template (may contain `:slug` tokens)
    #[serde(default)]
    pub url: Option<String>,
    /// Resolve the path at runtime through the type's DynamicPath capability
    #[serde(default)]
    pub dynamic_path: bool,
    /// Response envelope type decoded by the dispatch method
    #[serde(default)]
    pub response_type: Option<String>,
    /// Inner payload type unwrapped out of the response envelope
    #[serde(default)]
    pub response_data_type: Option<String>,
    /// Envelope field holding the inner payload
    #[serde(default)]
    pub response_data_field: Option<String>,
    /// Output file; defaults to `<snake_case_type>_requestgen.rs`
    #[serde(default)]
    pub output: Option<PathBuf>,
}

fn default_method() -> String {
    "GET".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema: String::new(),
            types: Vec::new(),
            method: default_method(),
            url: None,
            dynamic_path: false,
            response_type: None,
            response_data_type: None,
            response_data_field: None,
            output: None,
        }
    }
}

impl Config {
    /// Load a configuration from a YAML file
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a YAML file
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        tokio::fs::write(path.as_ref(), content).await?;
        Ok(())
    }

    /// Check that the run is minimally specified
    pub fn validate(&self) -> Result<()> {
        if self.schema.is_empty() {
            return Err(Error::config("schema path is required"));
        }
        if self.types.is_empty() {
            return Err(Error::config("at least one target type is required"));
        }
        if self.url.is_some() && self.dynamic_path {
            return Err(Error::config(
                "url and dynamic_path are mutually exclusive",
            ));
        }
        if self.response_data_type.is_some() && self.response_data_field.is_none() {
            return Err(Error::config(
                "response_data_type requires response_data_field",
            ));
        }
        Ok(())
    }

    /// Default output file name for a generated type
    pub fn output_path_for(&self, type_name: &str) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => PathBuf::from(format!(
                "{}_requestgen.rs",
                crate::utils::to_snake_case(type_name)
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> Config {
        Config {
            schema: "demo.yaml".to_string(),
            types: vec!["PlaceOrderRequest".to_string()],
            ..Config::default()
        }
    }

    #[test]
    fn test_validate_requires_schema_and_types() {
        assert!(Config::default().validate().is_err());
        assert!(minimal().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_url_with_dynamic_path() {
        let mut config = minimal();
        config.url = Some("/api/v3/orders".to_string());
        config.dynamic_path = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_data_type_without_field() {
        let mut config = minimal();
        config.response_data_type = Some("Order".to_string());
        assert!(config.validate().is_err());
        config.response_data_field = Some("data".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_output_name() {
        let config = minimal();
        assert_eq!(
            config.output_path_for("PlaceOrderRequest"),
            PathBuf::from("place_order_request_requestgen.rs")
        );
    }

    #[tokio::test]
    async fn test_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("requestgen.yaml");

        let mut config = minimal();
        config.method = "POST".to_string();
        config.url = Some("/api/v3/orders".to_string());
        config.save(&path).await.unwrap();

        let loaded = Config::from_file(&path).await.unwrap();
        assert_eq!(loaded.method, "POST");
        assert_eq!(loaded.types, vec!["PlaceOrderRequest".to_string()]);
    }
}
