//! Rule resolution: classified fields + run config → a [`TypeDescriptor`].
//!
//! This is where per-field results are aggregated, descriptor-level
//! consistency is checked, and the request metadata (method, URL, response
//! shape, capabilities) is attached. After this stage the descriptor is
//! immutable; setter, parameter and dispatch emission all read from it
//! independently.

use crate::classify::classify;
use crate::config::Config;
use crate::declaration::Registry;
use crate::error::{Error, Result};
use crate::field::{ArgKind, Field, RequestMeta, TimeEncoding, TypeDescriptor};
use crate::introspect::RawType;
use crate::utils;

/// Build the final descriptor for one introspected type.
pub fn resolve(registry: &Registry, config: &Config, raw: &RawType) -> Result<TypeDescriptor> {
    let mut fields = Vec::new();
    for introspected in &raw.fields {
        let Some(field) = classify(registry, introspected)? else {
            continue;
        };
        check_field(&raw.name, &field)?;
        fields.push(field);
    }

    let dynamic_path = config.dynamic_path || raw.decl.implements("DynamicPath");
    let (response_validates, response_unmarshals) = match config.response_type.as_deref() {
        Some(name) => match registry.resolve_local(utils::last_path_segment(name)) {
            Ok(decl) => (decl.implements("Validate"), decl.implements("Unmarshal")),
            Err(_) => (false, false),
        },
        None => (false, false),
    };

    Ok(TypeDescriptor {
        name: raw.name.clone(),
        receiver: raw.receiver.clone(),
        fields,
        client: raw.client.clone(),
        meta: RequestMeta {
            method: config.method.clone(),
            url: config.url.clone(),
            dynamic_path,
            response_type: config.response_type.clone(),
            response_data_type: config.response_data_type.clone(),
            response_data_field: config.response_data_field.clone(),
            response_validates,
            response_unmarshals,
        },
    })
}

/// Descriptor-level consistency checks the classifier cannot make alone.
fn check_field(type_name: &str, field: &Field) -> Result<()> {
    if field.repeatable {
        // List fields serialize whole; scalar defaulting and encoding have
        // no meaning for them, and valid values are ignored at emission.
        if field.default.is_some() || field.default_valuer.is_some() {
            return Err(Error::annotation(format!(
                "{type_name}.{name}: defaults are not supported on list fields",
                name = field.name
            )));
        }
        if field.time_encoding != TimeEncoding::None {
            return Err(Error::annotation(format!(
                "{type_name}.{name}: time encodings are not supported on list fields",
                name = field.name
            )));
        }
        return Ok(());
    }

    if let Some(default) = &field.default {
        match field.kind {
            ArgKind::String => {}
            ArgKind::Int => {
                if default.parse::<i64>().is_err() {
                    return Err(Error::annotation(format!(
                        "{type_name}.{name}: default {default:?} is not an integer literal",
                        name = field.name
                    )));
                }
            }
            ArgKind::Time | ArgKind::Other => {
                return Err(Error::annotation(format!(
                    "{type_name}.{name}: literal defaults require a string or integer field",
                    name = field.name
                )));
            }
        }
    }

    if !field.valid_values.is_empty() && !matches!(field.kind, ArgKind::String | ArgKind::Int) {
        return Err(Error::annotation(format!(
            "{type_name}.{name}: valid values require a string or integer field",
            name = field.name
        )));
    }

    if field.kind == ArgKind::Int {
        for value in &field.valid_values {
            if value.parse::<i64>().is_err() {
                return Err(Error::annotation(format!(
                    "{type_name}.{name}: valid value {value:?} is not an integer literal",
                    name = field.name
                )));
            }
        }
    }

    Ok(())
}
