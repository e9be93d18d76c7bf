use super::{
    util::{key_call, params_struct},
    TableIr, PARTITION_KEY_NAME,
};

/// One params struct per partition, in grouping order.
pub(crate) fn params_structs(table: &TableIr) -> Vec<String> {
    table
        .partitions
        .iter()
        .map(|partition| params_struct(&partition.params_type, &partition.input_fields))
        .collect()
}

/// The `pk` bundle struct, keyed by partition name.
pub(crate) fn bundle_struct(table: &TableIr) -> String {
    let mut out = String::new();
    out.push_str(&format!("pub struct {}Pk {{\n", table.type_name));
    for partition in &table.partitions {
        out.push_str(&format!(
            "    pub {}: Key<{}, {}>,\n",
            partition.field_name, partition.params_type, partition.produced
        ));
    }
    out.push('}');
    out
}

/// The `pk:` field of the table constructor's struct literal.
pub(crate) fn literal_lines(table: &TableIr) -> Vec<String> {
    let mut lines = vec![format!("        pk: {}Pk {{", table.type_name)];
    for partition in &table.partitions {
        lines.push(format!(
            "            {}: {},",
            partition.field_name,
            key_call(
                PARTITION_KEY_NAME,
                &partition.params_type,
                &partition.components,
                12,
            )
        ));
    }
    lines.push("        },".to_string());
    lines
}
