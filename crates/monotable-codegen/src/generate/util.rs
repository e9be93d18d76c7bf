use heck::ToSnakeCase;

use crate::component::KeyComponent;

/// Maps a schema type token onto the Rust type generated records use.
/// Unknown tokens pass through verbatim.
pub(crate) fn rust_type(token: &str) -> String {
    match token {
        "string" => "String".to_string(),
        "number" => "f64".to_string(),
        "boolean" => "bool".to_string(),
        other => other.to_string(),
    }
}

/// The deduplicated field references of a component list, in first-use
/// order, as Rust field names.
pub(crate) fn field_refs(components: &[KeyComponent]) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    for component in components {
        if let KeyComponent::Field(field) = component {
            let rust_name = field.to_snake_case();
            if !fields.contains(&rust_name) {
                fields.push(rust_name);
            }
        }
    }
    fields
}

/// Emits a `key(...)` call whose closure derives the ordered components.
/// `indent` is the column of the closing `})`; the body sits one level in.
pub(crate) fn key_call(
    attribute: &str,
    params_type: &str,
    components: &[KeyComponent],
    indent: usize,
) -> String {
    let reads_fields = components
        .iter()
        .any(|component| matches!(component, KeyComponent::Field(_)));
    let param = if reads_fields { "fields" } else { "_fields" };

    let exprs: Vec<String> = components
        .iter()
        .map(|component| match component {
            KeyComponent::Literal(literal) => format!("\"{literal}\".to_string()"),
            KeyComponent::Field(field) => format!("fields.{}.clone()", field.to_snake_case()),
        })
        .collect();

    let body_pad = " ".repeat(indent + 4);
    let close_pad = " ".repeat(indent);

    format!(
        "key(\"{attribute}\", |{param}: &{params_type}| {{\n{body_pad}vec![{}]\n{close_pad}}})",
        exprs.join(", ")
    )
}

/// Emits a `#[derive(Debug, Clone)]` key-params struct with one `String`
/// field per input-field reference.
pub(crate) fn params_struct(params_type: &str, input_fields: &[String]) -> String {
    if input_fields.is_empty() {
        return format!("#[derive(Debug, Clone)]\npub struct {params_type};");
    }

    let mut out = String::new();
    out.push_str("#[derive(Debug, Clone)]\n");
    out.push_str(&format!("pub struct {params_type} {{\n"));
    for field in input_fields {
        out.push_str(&format!("    pub {field}: String,\n"));
    }
    out.push('}');
    out
}
