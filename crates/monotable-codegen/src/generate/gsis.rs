use super::{
    util::{key_call, params_struct},
    GsiIr, TableIr,
};
use crate::component::KeyComponent;

/// Partition and sort params structs per GSI, in declaration order. A GSI
/// key derives from the single attribute it projects.
pub(crate) fn params_structs(table: &TableIr) -> Vec<String> {
    let mut blocks = Vec::new();
    for gsi in &table.gsis {
        blocks.push(params_struct(
            &gsi.pk_params(),
            &[snake_field(&gsi.partition_attribute)],
        ));
        blocks.push(params_struct(
            &gsi.sk_params(),
            &[snake_field(&gsi.sort_attribute)],
        ));
    }
    blocks
}

/// The `gsis` bundle struct, keyed by GSI name. Empty when the table
/// declares no GSIs (the bundle is omitted entirely).
pub(crate) fn bundle_struct(table: &TableIr) -> Option<String> {
    if table.gsis.is_empty() {
        return None;
    }

    let mut out = String::new();
    out.push_str(&format!("pub struct {}Gsis {{\n", table.type_name));
    for gsi in &table.gsis {
        out.push_str(&format!(
            "    pub {}: GsiKeys<{}, {}, {}>,\n",
            gsi.field_name,
            gsi.pk_params(),
            gsi.sk_params(),
            gsi.produced
        ));
    }
    out.push('}');
    Some(out)
}

/// The `gsis:` field of the table constructor's struct literal.
pub(crate) fn literal_lines(table: &TableIr) -> Vec<String> {
    let mut lines = vec![format!("        gsis: {}Gsis {{", table.type_name)];
    for gsi in &table.gsis {
        lines.push(format!("            {}: GsiKeys {{", gsi.field_name));
        lines.push(format!(
            "                gsi: Gsi::new(\"{}\", \"{}\", \"{}\"),",
            gsi.name, gsi.partition_attribute, gsi.sort_attribute
        ));
        lines.push(format!(
            "                pk: {},",
            gsi_key_call(&gsi.partition_attribute, &gsi.pk_params())
        ));
        lines.push(format!(
            "                sk: {},",
            gsi_key_call(&gsi.sort_attribute, &gsi.sk_params())
        ));
        lines.push("            },".to_string());
    }
    lines.push("        },".to_string());
    lines
}

fn gsi_key_call(attribute: &str, params_type: &str) -> String {
    let components = vec![KeyComponent::Field(attribute.to_string())];
    key_call(attribute, params_type, &components, 16)
}

fn snake_field(attribute: &str) -> String {
    use heck::ToSnakeCase;
    attribute.to_snake_case()
}
