use super::{gsis, partition_keys, sort_keys, TableIr, PARTITION_KEY_NAME, SORT_KEY_NAME};

/// The pk/sk/gsis bundle structs plus the table definition struct.
pub(crate) fn bundle_structs(table: &TableIr) -> Vec<String> {
    let mut blocks = vec![
        partition_keys::bundle_struct(table),
        sort_keys::bundle_struct(table),
    ];
    blocks.extend(gsis::bundle_struct(table));

    let mut out = String::new();
    out.push_str(&format!("pub struct {} {{\n", table.type_name));
    out.push_str("    pub table: Table,\n");
    out.push_str(&format!("    pub pk: {}Pk,\n", table.type_name));
    out.push_str(&format!("    pub sk: {}Sk,\n", table.type_name));
    if !table.gsis.is_empty() {
        out.push_str(&format!("    pub gsis: {}Gsis,\n", table.type_name));
    }
    out.push('}');
    blocks.push(out);

    blocks
}

/// The constructor wiring the runtime table (with its blacklist side
/// effects) to the typed key definitions.
pub(crate) fn constructor_fn(table: &TableIr) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "pub fn {}() -> {} {{",
        table.fn_name, table.type_name
    ));

    let binding = if table.blacklist_extras.is_empty() {
        "let table"
    } else {
        "let mut table"
    };
    lines.push(format!(
        "    {binding} = Table::new(\"{}\", \"{PARTITION_KEY_NAME}\", \"{SORT_KEY_NAME}\");",
        table.def.name
    ));
    for extra in &table.blacklist_extras {
        lines.push(format!(
            "    table.add_to_encryption_blacklist(\"{extra}\");"
        ));
    }
    lines.push(String::new());

    lines.push(format!("    {} {{", table.type_name));
    lines.extend(partition_keys::literal_lines(table));
    lines.extend(sort_keys::literal_lines(table));
    if !table.gsis.is_empty() {
        lines.extend(gsis::literal_lines(table));
    }
    lines.push("        table,".to_string());
    lines.push("    }".to_string());
    lines.push("}".to_string());

    lines.join("\n")
}
