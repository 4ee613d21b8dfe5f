//! Type introspection: from a declaration to an ordered raw field list.
//!
//! Introspection answers "what fields does this request type have" without
//! interpreting any annotations. It strips the `Option` indirection, erases
//! named scalars to their underlying built-in, skips grouped (multi-name)
//! field declarations, and picks out the embedded client capability field.

use std::sync::Arc;

use crate::declaration::{RawField, Registry, TypeDecl};
use crate::error::{Error, Result};
use crate::field::{ClientField, ClientKind};
use crate::utils;

/// One introspected field, annotations still raw.
#[derive(Debug, Clone)]
pub struct IntrospectedField {
    pub name: String,
    /// Declared type expression with `Option` stripped.
    pub declared: String,
    /// Underlying built-in type after named-scalar resolution.
    pub resolved: String,
    /// Exact declared argument type name, for constant-catalog lookup.
    pub catalog_key: String,
    pub optional: bool,
    pub raw: RawField,
}

/// A request type with its raw fields in declaration order.
#[derive(Debug, Clone)]
pub struct RawType {
    pub name: String,
    pub receiver: String,
    pub fields: Vec<IntrospectedField>,
    pub client: Option<ClientField>,
    pub decl: Arc<TypeDecl>,
}

/// Resolve `type_name` through the registry and introspect its fields.
pub fn introspect(registry: &Registry, type_name: &str) -> Result<RawType> {
    let decl = registry.resolve_local(type_name)?;
    if decl.kind.is_some() {
        return Err(Error::declaration(format!(
            "type {type_name} is a named scalar, not a struct-like declaration"
        )));
    }

    let receiver = decl
        .receiver
        .clone()
        .unwrap_or_else(|| default_receiver(&decl.name));

    let mut fields = Vec::new();
    let mut client = None;

    for raw in &decl.fields {
        if raw.names.len() != 1 {
            log::debug!(
                "{type_name}: skipping grouped field declaration {:?}",
                raw.names
            );
            continue;
        }
        let name = raw.names[0].clone();

        if let Some(kind) = client_kind(&raw.ty) {
            client = Some(ClientField { name, kind });
            continue;
        }

        let (inner, optional) = match utils::strip_option(&raw.ty) {
            Some(inner) => (inner.to_string(), true),
            None => (raw.ty.clone(), false),
        };
        // List fields key the constant catalog on their element type.
        let catalog_base = utils::strip_vec(&inner).unwrap_or(inner.as_str());
        let catalog_key = utils::last_path_segment(catalog_base).to_string();
        let resolved = resolve_scalar(registry, &inner, &catalog_key)?;

        fields.push(IntrospectedField {
            name,
            declared: inner,
            resolved,
            catalog_key,
            optional,
            raw: raw.clone(),
        });
    }

    Ok(RawType {
        name: decl.name.clone(),
        receiver,
        fields,
        client,
        decl,
    })
}

/// Detect the client capability field by its declared type.
fn client_kind(ty: &str) -> Option<ClientKind> {
    if ty.contains("AuthenticatedApiClient") {
        Some(ClientKind::Authenticated)
    } else if ty.contains("ApiClient") {
        Some(ClientKind::Public)
    } else {
        None
    }
}

/// Erase a named scalar to its underlying built-in type.
///
/// A bare type name declared in the set with `kind: string` or `kind: int`
/// resolves to `String` / `i64`; anything else passes through unchanged.
fn resolve_scalar(registry: &Registry, ty: &str, catalog_key: &str) -> Result<String> {
    if ty != catalog_key {
        // Qualified or generic expression, never a local named scalar.
        return Ok(ty.to_string());
    }
    match registry.resolve_local(catalog_key) {
        Ok(decl) => match decl.kind.as_deref() {
            Some("string") => Ok("String".to_string()),
            Some("int") => Ok("i64".to_string()),
            Some(other) => Err(Error::declaration(format!(
                "named scalar {catalog_key} has unsupported kind {other:?}"
            ))),
            None => Ok(ty.to_string()),
        },
        Err(_) => Ok(ty.to_string()),
    }
}

fn default_receiver(type_name: &str) -> String {
    type_name
        .chars()
        .next()
        .map(|c| c.to_lowercase().to_string())
        .unwrap_or_else(|| "r".to_string())
}
