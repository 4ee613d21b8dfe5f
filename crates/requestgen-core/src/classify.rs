//! Field classification: annotations → a typed [`Field`] descriptor.
//!
//! Classification interprets the `param` directive and its companion
//! annotations. Unannotated fields are skipped. Contradictory annotations
//! (a time encoding on a non-time field, an unknown default valuer) are
//! fatal for the whole type, since emitting around them would silently
//! change semantics.

use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::declaration::Registry;
use crate::error::{Error, Result};
use crate::field::{ArgKind, DefaultValuer, Field, Role, TimeEncoding};
use crate::introspect::IntrospectedField;
use crate::utils;

/// Named time layouts accepted by the `timeFormat` annotation.
static NAMED_LAYOUTS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["rfc3339", "rfc2822", "date", "datetime"].into_iter().collect());

/// Built-in integer types recognized as Int-kind arguments.
static INT_TYPES: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["i8", "i16", "i32", "i64", "isize"].into_iter().collect());

/// Classify one introspected field.
///
/// Returns `Ok(None)` for fields without a `param` directive; those carry no
/// generated behavior at all.
pub fn classify(registry: &Registry, field: &IntrospectedField) -> Result<Option<Field>> {
    let Some(param) = field.raw.param.as_deref() else {
        return Ok(None);
    };

    let mut tokens = param.split(',').map(str::trim);
    let key_override = tokens.next().unwrap_or("");
    let key = if key_override.is_empty() {
        utils::to_lower_camel_case(&field.name)
    } else {
        key_override.to_string()
    };

    let mut required = false;
    let mut query = false;
    let mut slug = false;
    let mut millis = false;
    let mut seconds = false;
    for option in tokens {
        match option {
            "required" => required = true,
            "query" => query = true,
            "slug" => slug = true,
            "milliseconds" => millis = true,
            "seconds" => seconds = true,
            // `private` is accepted vocabulary with no behavior attached.
            "" | "private" => {}
            other => {
                log::debug!(
                    "{name}: ignoring unknown param option {other:?}",
                    name = field.name
                );
            }
        }
    }

    let (base, repeatable) = match utils::strip_vec(&field.resolved) {
        Some(inner) => (inner.to_string(), true),
        None => (field.resolved.clone(), false),
    };
    let kind = arg_kind(&base);

    let time_encoding = time_encoding(field, kind, millis, seconds)?;
    let default_valuer = default_valuer(field, kind)?;
    let valid_values = valid_values(registry, field);

    let role = if slug {
        Role::Slug
    } else if query {
        Role::Query
    } else {
        Role::Body
    };

    Ok(Some(Field {
        name: field.name.clone(),
        key,
        setter: utils::to_snake_case(&field.name),
        arg_type: field.resolved.clone(),
        role,
        kind,
        optional: field.optional,
        required,
        repeatable,
        valid_values,
        default: field.raw.default.clone(),
        default_valuer,
        time_encoding,
    }))
}

fn arg_kind(base: &str) -> ArgKind {
    if base == "String" {
        ArgKind::String
    } else if INT_TYPES.contains(base) {
        ArgKind::Int
    } else if utils::last_path_segment(base) == "DateTime" {
        ArgKind::Time
    } else {
        ArgKind::Other
    }
}

fn time_encoding(
    field: &IntrospectedField,
    kind: ArgKind,
    millis: bool,
    seconds: bool,
) -> Result<TimeEncoding> {
    let named = field.raw.time_format.as_deref();
    let requested = millis || seconds || named.is_some();
    if requested && kind != ArgKind::Time {
        return Err(Error::annotation(format!(
            "{name}: time encoding requested on non-time type {ty}",
            name = field.name,
            ty = field.declared
        )));
    }
    if millis && seconds {
        return Err(Error::annotation(format!(
            "{name}: milliseconds and seconds are mutually exclusive",
            name = field.name
        )));
    }
    if let Some(layout) = named {
        if millis || seconds {
            return Err(Error::annotation(format!(
                "{name}: timeFormat cannot be combined with an epoch encoding",
                name = field.name
            )));
        }
        if !NAMED_LAYOUTS.contains(layout) {
            return Err(Error::annotation(format!(
                "{name}: unknown time layout {layout:?}",
                name = field.name
            )));
        }
        return Ok(TimeEncoding::Named(layout.to_string()));
    }
    if millis {
        Ok(TimeEncoding::Milliseconds)
    } else if seconds {
        Ok(TimeEncoding::Seconds)
    } else {
        Ok(TimeEncoding::None)
    }
}

fn default_valuer(field: &IntrospectedField, kind: ArgKind) -> Result<Option<DefaultValuer>> {
    let Some(expr) = field.raw.default_valuer.as_deref() else {
        return Ok(None);
    };
    match expr {
        "now()" => {
            if kind != ArgKind::Time {
                return Err(Error::annotation(format!(
                    "{name}: now() valuer requires a time-typed field",
                    name = field.name
                )));
            }
            Ok(Some(DefaultValuer::Now))
        }
        "uuid()" => {
            if kind != ArgKind::String {
                return Err(Error::annotation(format!(
                    "{name}: uuid() valuer requires a string-typed field",
                    name = field.name
                )));
            }
            Ok(Some(DefaultValuer::Uuid))
        }
        other => Err(Error::annotation(format!(
            "{name}: unknown default valuer {other:?}",
            name = field.name
        ))),
    }
}

/// Explicit `validValues` list, or the constant catalog group keyed by the
/// exact argument type name.
fn valid_values(registry: &Registry, field: &IntrospectedField) -> Vec<String> {
    if let Some(list) = field.raw.valid_values.as_deref() {
        return list
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect();
    }
    registry
        .constants()
        .get(&field.catalog_key)
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::DeclarationSet;
    use crate::introspect::introspect;

    const DEMO: &str = r#"
package: exchange
types:
  - name: SideType
    kind: string
  - name: Req
    fields:
      - names: [plain]
        type: String
      - names: [symbol]
        type: String
        param: "symbol,required"
      - names: [client_order_id]
        type: "Option<String>"
        param: "clientOid,required"
        defaultValuer: "uuid()"
      - names: [page]
        type: "Option<i64>"
        param: ",query"
      - names: [order_id]
        type: String
        param: "orderId,slug,query"
      - names: [side]
        type: SideType
        param: side
      - names: [ids]
        type: "Vec<i64>"
        param: "ids,query"
      - names: [start_time]
        type: "Option<DateTime<Utc>>"
        param: "startTime,milliseconds"
        defaultValuer: "now()"
      - names: [secret]
        type: String
        param: "secret,private"
constants:
  SideType: ["buy", "sell"]
"#;

    fn classified() -> Vec<Option<Field>> {
        let registry = Registry::new(DeclarationSet::parse_content(DEMO).unwrap());
        let raw = introspect(&registry, "Req").unwrap();
        raw.fields
            .iter()
            .map(|f| classify(&registry, f).unwrap())
            .collect()
    }

    fn get(name: &str) -> Field {
        classified()
            .into_iter()
            .flatten()
            .find(|f| f.name == name)
            .unwrap()
    }

    #[test]
    fn test_unannotated_field_is_skipped() {
        assert!(classified()[0].is_none());
    }

    #[test]
    fn test_key_override_and_flags() {
        let f = get("client_order_id");
        assert_eq!(f.key, "clientOid");
        assert!(f.required);
        assert!(f.optional);
        assert_eq!(f.default_valuer, Some(DefaultValuer::Uuid));
    }

    #[test]
    fn test_default_key_is_lower_camel() {
        let f = get("page");
        assert_eq!(f.key, "page");
        assert_eq!(f.role, Role::Query);
        assert_eq!(f.kind, ArgKind::Int);
    }

    #[test]
    fn test_slug_outranks_query() {
        let f = get("order_id");
        assert_eq!(f.role, Role::Slug);
    }

    #[test]
    fn test_constant_catalog_fallback() {
        let f = get("side");
        assert_eq!(f.valid_values, vec!["buy", "sell"]);
        assert_eq!(f.kind, ArgKind::String);
        assert_eq!(f.arg_type, "String");
    }

    #[test]
    fn test_vec_field_is_repeatable() {
        let f = get("ids");
        assert!(f.repeatable);
        assert_eq!(f.kind, ArgKind::Int);
    }

    #[test]
    fn test_time_field_with_millis_and_valuer() {
        let f = get("start_time");
        assert_eq!(f.time_encoding, TimeEncoding::Milliseconds);
        assert_eq!(f.default_valuer, Some(DefaultValuer::Now));
        assert_eq!(f.kind, ArgKind::Time);
    }

    #[test]
    fn test_private_option_is_inert() {
        let f = get("secret");
        assert!(!f.required);
        assert_eq!(f.role, Role::Body);
    }

    #[test]
    fn test_time_encoding_on_string_is_fatal() {
        let yaml = r#"
package: p
types:
  - name: Bad
    fields:
      - names: [label]
        type: String
        param: "label,milliseconds"
"#;
        let registry = Registry::new(DeclarationSet::parse_content(yaml).unwrap());
        let raw = introspect(&registry, "Bad").unwrap();
        let err = classify(&registry, &raw.fields[0]).unwrap_err();
        assert!(err.to_string().contains("non-time"));
    }

    #[test]
    fn test_unknown_valuer_is_fatal() {
        let yaml = r#"
package: p
types:
  - name: Bad
    fields:
      - names: [oid]
        type: "Option<String>"
        param: oid
        defaultValuer: "random()"
"#;
        let registry = Registry::new(DeclarationSet::parse_content(yaml).unwrap());
        let raw = introspect(&registry, "Bad").unwrap();
        let err = classify(&registry, &raw.fields[0]).unwrap_err();
        assert!(err.to_string().contains("random()"));
    }

    #[test]
    fn test_unknown_layout_is_fatal() {
        let yaml = r#"
package: p
types:
  - name: Bad
    fields:
      - names: [at]
        type: "DateTime<Utc>"
        param: at
        timeFormat: "stardate"
"#;
        let registry = Registry::new(DeclarationSet::parse_content(yaml).unwrap());
        let raw = introspect(&registry, "Bad").unwrap();
        let err = classify(&registry, &raw.fields[0]).unwrap_err();
        assert!(err.to_string().contains("stardate"));
    }
}
