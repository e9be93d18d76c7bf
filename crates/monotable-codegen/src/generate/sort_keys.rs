use super::{
    util::{key_call, params_struct},
    TableIr, SORT_KEY_NAME,
};

/// One params struct per model's sort key, in declaration order.
pub(crate) fn params_structs(table: &TableIr) -> Vec<String> {
    table
        .sort_keys
        .iter()
        .map(|sort_key| params_struct(&sort_key.params_type, &sort_key.input_fields))
        .collect()
}

/// The `sk` bundle struct, keyed by model name. Each sort key produces
/// exactly its own model.
pub(crate) fn bundle_struct(table: &TableIr) -> String {
    let mut out = String::new();
    out.push_str(&format!("pub struct {}Sk {{\n", table.type_name));
    for sort_key in &table.sort_keys {
        out.push_str(&format!(
            "    pub {}: Key<{}, {}>,\n",
            sort_key.field_name, sort_key.params_type, sort_key.type_name
        ));
    }
    out.push('}');
    out
}

/// The `sk:` field of the table constructor's struct literal.
pub(crate) fn literal_lines(table: &TableIr) -> Vec<String> {
    let mut lines = vec![format!("        sk: {}Sk {{", table.type_name)];
    for sort_key in &table.sort_keys {
        lines.push(format!(
            "            {}: {},",
            sort_key.field_name,
            key_call(SORT_KEY_NAME, &sort_key.params_type, &sort_key.components, 12)
        ));
    }
    lines.push("        },".to_string());
    lines
}
