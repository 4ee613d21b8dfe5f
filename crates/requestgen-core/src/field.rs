//! Generation-time data model: classified fields and type descriptors.
//!
//! Everything here is immutable once built. The emitter consumes these
//! descriptors independently for setter, parameter-builder and dispatch
//! emission, so no stage mutates what another stage reads.

use std::collections::BTreeSet;

/// Where a parameter ends up in the outgoing request.
///
/// Precedence when multiple placement options appear: Slug > Query > Body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Body,
    Query,
    Slug,
}

/// Coarse argument kind driving validation and encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// `String` or a named scalar over it.
    String,
    /// Any built-in signed integer or a named scalar over one.
    Int,
    /// `DateTime<Utc>`.
    Time,
    /// Everything else; serialized through the parameter map as-is.
    Other,
}

/// How a Time-kind argument is rendered into the parameter map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeEncoding {
    None,
    Milliseconds,
    Seconds,
    /// One of the fixed named layouts (`rfc3339`, `rfc2822`, `date`,
    /// `datetime`).
    Named(String),
}

/// Generated-at-build-time default for absent optional fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValuer {
    Now,
    Uuid,
}

/// Which client capability the dispatch method builds requests through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientKind {
    Public,
    Authenticated,
}

/// A fully classified parameter field.
#[derive(Debug, Clone)]
pub struct Field {
    /// Declared field name (snake_case).
    pub name: String,
    /// Parameter key in the emitted map.
    pub key: String,
    /// Setter method name.
    pub setter: String,
    /// Argument type accepted by the setter (`Option` stripped).
    pub arg_type: String,
    pub role: Role,
    pub kind: ArgKind,
    /// Declared behind `Option<T>`.
    pub optional: bool,
    pub required: bool,
    /// Declared as `Vec<T>`; expands to `key[]` pairs in query form.
    pub repeatable: bool,
    pub valid_values: Vec<String>,
    /// Literal fallback substituted when a required field is at its zero
    /// value, or assigned to an absent optional field.
    pub default: Option<String>,
    pub default_valuer: Option<DefaultValuer>,
    pub time_encoding: TimeEncoding,
}

impl Field {
    pub fn is_string(&self) -> bool {
        self.kind == ArgKind::String
    }

    pub fn is_int(&self) -> bool {
        self.kind == ArgKind::Int
    }

    pub fn is_time(&self) -> bool {
        self.kind == ArgKind::Time
    }
}

/// Request metadata attached to the generated dispatch method.
#[derive(Debug, Clone)]
pub struct RequestMeta {
    pub method: String,
    /// Static URL template; `None` means the DynamicPath capability is used.
    pub url: Option<String>,
    pub dynamic_path: bool,
    pub response_type: Option<String>,
    pub response_data_type: Option<String>,
    pub response_data_field: Option<String>,
    /// Whether the response type carries the Validate capability.
    pub response_validates: bool,
    /// Whether the response type decodes itself (Unmarshal capability)
    /// instead of taking the default JSON path.
    pub response_unmarshals: bool,
}

/// A request type after introspection and classification.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    pub name: String,
    /// Receiver variable name used in generated doc text.
    pub receiver: String,
    /// Classified parameter fields in declaration order.
    pub fields: Vec<Field>,
    /// Client capability field, when the type embeds one.
    pub client: Option<ClientField>,
    pub meta: RequestMeta,
}

/// The embedded client capability field.
#[derive(Debug, Clone)]
pub struct ClientField {
    pub name: String,
    pub kind: ClientKind,
}

impl TypeDescriptor {
    pub fn fields_with_role(&self, role: Role) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(move |f| f.role == role)
    }

    /// Keys of repeatable body fields, for query-form conversion.
    pub fn repeated_body_keys(&self) -> Vec<String> {
        self.fields_with_role(Role::Body)
            .filter(|f| f.repeatable)
            .map(|f| f.key.clone())
            .collect()
    }

    pub fn has_slug_fields(&self) -> bool {
        self.fields.iter().any(|f| f.role == Role::Slug)
    }
}

/// One type's rendered output: method texts plus the imports they need.
#[derive(Debug, Clone)]
pub struct GeneratedUnit {
    pub type_name: String,
    /// Rendered impl blocks in emission order.
    pub blocks: Vec<String>,
    /// Fully rendered `use` lines.
    pub imports: BTreeSet<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, role: Role, repeatable: bool) -> Field {
        Field {
            name: name.to_string(),
            key: name.to_string(),
            setter: name.to_string(),
            arg_type: "String".to_string(),
            role,
            kind: ArgKind::String,
            optional: false,
            required: false,
            repeatable,
            valid_values: Vec::new(),
            default: None,
            default_valuer: None,
            time_encoding: TimeEncoding::None,
        }
    }

    #[test]
    fn test_fields_with_role_preserves_order() {
        let descriptor = TypeDescriptor {
            name: "T".to_string(),
            receiver: "t".to_string(),
            fields: vec![
                field("a", Role::Body, false),
                field("b", Role::Query, false),
                field("c", Role::Body, true),
            ],
            client: None,
            meta: RequestMeta {
                method: "GET".to_string(),
                url: None,
                dynamic_path: false,
                response_type: None,
                response_data_type: None,
                response_data_field: None,
                response_validates: false,
                response_unmarshals: false,
            },
        };

        let body: Vec<_> = descriptor
            .fields_with_role(Role::Body)
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(body, vec!["a", "c"]);
        assert_eq!(descriptor.repeated_body_keys(), vec!["c".to_string()]);
        assert!(!descriptor.has_slug_fields());
    }
}
