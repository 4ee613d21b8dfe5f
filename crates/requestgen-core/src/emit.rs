//! Code emission: type descriptors → Rust source text.
//!
//! Templates are a fixed embedded set, registered on a bare `Tera` instance
//! at method granularity; impl blocks are assembled around the rendered
//! methods. Per-field pipeline text is precomputed here because its shape
//! depends on the full classification (presence, required check, valid
//! values, encoding), not on anything a template loop could decide.

use tera::{Context, Tera};

use crate::error::Result;
use crate::field::{
    ArgKind, ClientKind, DefaultValuer, Field, GeneratedUnit, Role, TimeEncoding, TypeDescriptor,
};
use crate::imports::ImportResolver;

const RUNTIME_CRATE: &str = "requestgen_client";

const TEMPLATES: &[(&str, &str)] = &[
    ("setter.tera", include_str!("../templates/setter.tera")),
    ("builder.tera", include_str!("../templates/builder.tera")),
    (
        "builder_empty.tera",
        include_str!("../templates/builder_empty.tera"),
    ),
    ("converters.tera", include_str!("../templates/converters.tera")),
    ("slugs_map.tera", include_str!("../templates/slugs_map.tera")),
    ("get_path.tera", include_str!("../templates/get_path.tera")),
    ("dispatch.tera", include_str!("../templates/dispatch.tera")),
];

pub struct CodeEmitter {
    tera: Tera,
}

impl CodeEmitter {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        for (name, source) in TEMPLATES {
            tera.add_raw_template(name, source)?;
        }
        Ok(Self { tera })
    }

    /// Emit the full companion unit for one type.
    ///
    /// The unit is all-or-nothing: any render failure drops the whole type,
    /// never a partially emitted impl block.
    pub fn emit(
        &self,
        descriptor: &TypeDescriptor,
        mut resolver: ImportResolver,
    ) -> Result<GeneratedUnit> {
        let mut blocks = Vec::new();
        if let Some(setters) = self.emit_setters(descriptor, &mut resolver)? {
            blocks.push(setters);
        }
        blocks.push(self.emit_builders(descriptor, &mut resolver)?);
        if let Some(dispatch) = self.emit_dispatch(descriptor, &mut resolver)? {
            blocks.push(dispatch);
        }
        Ok(GeneratedUnit {
            type_name: descriptor.name.clone(),
            blocks,
            imports: resolver.finalize(),
        })
    }

    fn render(&self, template: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template, context)?)
    }

    fn emit_setters(
        &self,
        descriptor: &TypeDescriptor,
        resolver: &mut ImportResolver,
    ) -> Result<Option<String>> {
        if descriptor.fields.is_empty() {
            return Ok(None);
        }

        let mut methods = Vec::new();
        for field in &descriptor.fields {
            if field.kind == ArgKind::Time {
                resolver.use_item("chrono", "DateTime");
                resolver.use_item("chrono", "Utc");
            }
            let mut context = Context::new();
            context.insert("setter", &field.setter);
            context.insert("name", &field.name);
            context.insert("arg_type", &field.arg_type);
            let set_expr = if field.optional {
                format!("Some({})", field.name)
            } else {
                field.name.clone()
            };
            context.insert("set_expr", &set_expr);
            methods.push(self.render("setter.tera", &context)?);
        }
        Ok(Some(impl_block(&descriptor.name, &methods)))
    }

    fn emit_builders(
        &self,
        descriptor: &TypeDescriptor,
        resolver: &mut ImportResolver,
    ) -> Result<String> {
        resolver.use_item(RUNTIME_CRATE, "ParamError");
        resolver.use_item(RUNTIME_CRATE, "Params");
        resolver.use_item(RUNTIME_CRATE, "QueryParams");

        let mut methods = Vec::new();
        for (role, fn_name, doc) in [
            (
                Role::Body,
                "get_parameters",
                "Builds and checks the body parameters and returns the result map.",
            ),
            (
                Role::Query,
                "get_query_parameters",
                "Builds and checks the query parameters and returns the result map.",
            ),
            (
                Role::Slug,
                "get_slug_parameters",
                "Builds and checks the slug parameters and returns the result map.",
            ),
        ] {
            let pipelines: Vec<String> = descriptor
                .fields_with_role(role)
                .map(|f| pipeline(f, resolver))
                .collect();

            let mut context = Context::new();
            context.insert("fn_name", fn_name);
            context.insert("doc", doc);
            if pipelines.is_empty() {
                methods.push(self.render("builder_empty.tera", &context)?);
            } else {
                context.insert("pipelines", &pipelines.join("\n\n"));
                methods.push(self.render("builder.tera", &context)?);
            }
        }

        let mut context = Context::new();
        context.insert("repeated", &key_slice(&descriptor.repeated_body_keys()));
        methods.push(self.render("converters.tera", &context)?);

        if descriptor.has_slug_fields() {
            methods.push(self.render("slugs_map.tera", &Context::new())?);
        }

        if let Some(url) = &descriptor.meta.url {
            let mut context = Context::new();
            context.insert("url", url);
            methods.push(self.render("get_path.tera", &context)?);
        }

        Ok(impl_block(&descriptor.name, &methods))
    }

    fn emit_dispatch(
        &self,
        descriptor: &TypeDescriptor,
        resolver: &mut ImportResolver,
    ) -> Result<Option<String>> {
        let Some(client) = &descriptor.client else {
            return Ok(None);
        };
        let meta = &descriptor.meta;
        if meta.url.is_none() && !meta.dynamic_path {
            log::debug!(
                "{name}: client field present but no URL or dynamic path, skipping dispatch",
                name = descriptor.name
            );
            return Ok(None);
        }

        resolver.use_item(RUNTIME_CRATE, "RequestError");

        let body_fields = descriptor.fields_with_role(Role::Body).count() > 0;
        let query_fields = descriptor.fields_with_role(Role::Query).count() > 0;
        let is_get = meta.method.eq_ignore_ascii_case("GET");

        let body_expr = if !is_get && body_fields {
            "Some(self.get_parameters()?.to_value())"
        } else {
            "None"
        };

        let repeated_query: Vec<String> = descriptor
            .fields_with_role(Role::Query)
            .filter(|f| f.repeatable)
            .map(|f| f.key.clone())
            .collect();
        let query_expr = if query_fields {
            format!(
                "self.get_query_parameters()?.to_query({})",
                key_slice(&repeated_query)
            )
        } else if is_get && body_fields {
            // GET requests carry no JSON body; the body map degrades into
            // the query string.
            "self.get_parameters_query()?".to_string()
        } else {
            "QueryParams::new()".to_string()
        };

        let mut url_stmts = String::new();
        if meta.dynamic_path {
            resolver.use_item(RUNTIME_CRATE, "DynamicPath");
            url_stmts.push_str("        let url = self.dynamic_path()?;\n");
        } else if let Some(url) = &meta.url {
            url_stmts.push_str(&format!("        let url = {url:?}.to_string();\n"));
            if descriptor.has_slug_fields() {
                resolver.use_item(RUNTIME_CRATE, "slugs");
                url_stmts
                    .push_str("        let url = slugs::apply(&url, &self.slugs_map()?);\n");
            }
        }

        let builder_fn = match client.kind {
            ClientKind::Public => "new_request",
            ClientKind::Authenticated => "new_authenticated_request",
        };

        let mut decode_stmts = String::new();
        let return_type = match &meta.response_type {
            None => {
                decode_stmts
                    .push_str("        let api_response: serde_json::Value = response.decode_json()?;\n");
                decode_stmts.push_str("        Ok(api_response)\n");
                "serde_json::Value".to_string()
            }
            Some(response_type) => {
                if meta.response_unmarshals {
                    resolver.use_item(RUNTIME_CRATE, "ResponseUnmarshaler");
                    decode_stmts.push_str(&format!(
                        "        let api_response = {response_type}::unmarshal(&response.body)?;\n"
                    ));
                } else {
                    decode_stmts.push_str(&format!(
                        "        let api_response: {response_type} = response.decode_json()?;\n"
                    ));
                }
                if meta.response_validates {
                    resolver.use_item(RUNTIME_CRATE, "ResponseValidator");
                    decode_stmts.push_str("        api_response.validate()?;\n");
                }
                match (&meta.response_data_type, &meta.response_data_field) {
                    (Some(data_type), Some(data_field)) => {
                        decode_stmts.push_str(&format!(
                            "        let data: {data_type} = serde_json::from_value(api_response.{data_field}.clone())?;\n"
                        ));
                        decode_stmts.push_str("        Ok(data)\n");
                        data_type.clone()
                    }
                    _ => {
                        decode_stmts.push_str("        Ok(api_response)\n");
                        response_type.clone()
                    }
                }
            }
        };

        let mut context = Context::new();
        context.insert("type_name", &descriptor.name);
        context.insert("return_type", &return_type);
        context.insert("body_expr", body_expr);
        context.insert("query_expr", &query_expr);
        context.insert("url_stmts", &url_stmts);
        context.insert("client", &client.name);
        context.insert("builder_fn", builder_fn);
        context.insert("method", &meta.method.to_uppercase());
        context.insert("decode_stmts", &decode_stmts);
        Ok(Some(self.render("dispatch.tera", &context)?))
    }
}

/// Wrap rendered methods into one impl block, blank line between methods.
fn impl_block(type_name: &str, methods: &[String]) -> String {
    let body = methods
        .iter()
        .map(|m| m.trim_end())
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("impl {type_name} {{\n{body}\n}}")
}

/// Render a `&[...]` key-slice literal for query-form conversion.
fn key_slice(keys: &[String]) -> String {
    if keys.is_empty() {
        "&[]".to_string()
    } else {
        let list = keys
            .iter()
            .map(|k| format!("{k:?}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!("&[{list}]")
    }
}

/// Pre-render one field's check-and-assign pipeline at method indent.
fn pipeline(field: &Field, resolver: &mut ImportResolver) -> String {
    let name = &field.name;
    let key = &field.key;
    let mutable = field.required
        && field.default.is_some()
        && matches!(field.kind, ArgKind::String | ArgKind::Int);

    let mut inner: Vec<String> = Vec::new();
    let src = if field.optional {
        name.clone()
    } else {
        format!("self.{name}")
    };
    let mut_kw = if mutable { "mut " } else { "" };
    inner.push(format!("let {mut_kw}{name} = {src}.clone();"));

    // List fields serialize whole; the scalar zero-check and valid-values
    // match apply to elements of the kind, never to the Vec itself.
    if field.required && !field.repeatable {
        match field.kind {
            ArgKind::String => {
                inner.push(format!("if {name}.is_empty() {{"));
                if mutable {
                    inner.push(format!("    {name} = {};", default_expr(field)));
                } else {
                    inner.push(format!("    return Err(ParamError::required_empty({key:?}));"));
                }
                inner.push("}".to_string());
            }
            ArgKind::Int => {
                inner.push(format!("if {name} == 0 {{"));
                if mutable {
                    inner.push(format!("    {name} = {};", default_expr(field)));
                } else {
                    inner.push(format!("    return Err(ParamError::required_zero({key:?}));"));
                }
                inner.push("}".to_string());
            }
            // No zero value to test for on other kinds.
            ArgKind::Time | ArgKind::Other => {}
        }
    }

    if !field.valid_values.is_empty() && !field.repeatable {
        let arms = match field.kind {
            ArgKind::String => field
                .valid_values
                .iter()
                .map(|v| format!("{v:?}"))
                .collect::<Vec<_>>()
                .join(" | "),
            _ => field.valid_values.join(" | "),
        };
        let match_expr = if field.kind == ArgKind::String {
            format!("{name}.as_str()")
        } else {
            name.clone()
        };
        inner.push(format!("match {match_expr} {{"));
        inner.push(format!("    {arms} => {{"));
        inner.push(format!("        params.set({key:?}, {name}.clone());"));
        inner.push("    }".to_string());
        inner.push("    _ => {".to_string());
        inner.push(format!(
            "        return Err(ParamError::invalid_value({key:?}, &{name}));"
        ));
        inner.push("    }".to_string());
        inner.push("}".to_string());
    }

    inner.extend(assign_lines(field, resolver));

    let else_lines: Vec<String> = if !field.optional {
        Vec::new()
    } else if let Some(valuer) = field.default_valuer {
        let expr = match valuer {
            DefaultValuer::Now => "valuers::now()",
            DefaultValuer::Uuid => "valuers::uuid()",
        };
        resolver.use_item(RUNTIME_CRATE, "valuers");
        let mut lines = vec![format!("let {name} = {expr};")];
        lines.extend(assign_lines(field, resolver));
        lines
    } else if field.default.is_some() {
        let mut lines = vec![format!("let {name} = {};", default_expr(field))];
        lines.extend(assign_lines(field, resolver));
        lines
    } else {
        Vec::new()
    };

    let mut out = String::new();
    out.push_str(&format!("        // {name} -> {key:?}\n"));
    if field.optional {
        out.push_str(&format!("        if let Some({name}) = &self.{name} {{\n"));
        for line in &inner {
            out.push_str(&format!("            {line}\n"));
        }
        if else_lines.is_empty() {
            out.push_str("        }");
        } else {
            out.push_str("        } else {\n");
            for line in &else_lines {
                out.push_str(&format!("            {line}\n"));
            }
            out.push_str("        }");
        }
    } else {
        out.push_str("        {\n");
        for line in &inner {
            out.push_str(&format!("            {line}\n"));
        }
        out.push_str("        }");
    }
    out
}

/// The statement(s) placing the checked value into the parameter map.
fn assign_lines(field: &Field, resolver: &mut ImportResolver) -> Vec<String> {
    let name = &field.name;
    let key = &field.key;

    if field.repeatable || field.kind == ArgKind::Other {
        return vec![format!("params.try_set({key:?}, &{name})?;")];
    }

    match field.kind {
        ArgKind::String | ArgKind::Int => vec![format!("params.set({key:?}, {name});")],
        ArgKind::Time => match &field.time_encoding {
            TimeEncoding::Milliseconds => {
                resolver.use_item(RUNTIME_CRATE, "valuers");
                vec![format!("params.set({key:?}, valuers::unix_millis(&{name}));")]
            }
            TimeEncoding::Seconds => {
                resolver.use_item(RUNTIME_CRATE, "valuers");
                vec![format!("params.set({key:?}, valuers::unix_seconds(&{name}));")]
            }
            TimeEncoding::Named(layout) => {
                resolver.use_item(RUNTIME_CRATE, "valuers");
                vec![format!(
                    "params.set({key:?}, valuers::format_named(&{name}, {layout:?}));"
                )]
            }
            TimeEncoding::None => vec![format!("params.try_set({key:?}, &{name})?;")],
        },
        ArgKind::Other => unreachable!("handled above"),
    }
}

/// Literal default expression matched to the argument kind.
fn default_expr(field: &Field) -> String {
    let default = field.default.as_deref().unwrap_or_default();
    match field.kind {
        ArgKind::String => format!("{default:?}.to_string()"),
        _ => default.to_string(),
    }
}
