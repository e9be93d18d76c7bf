use super::TableIr;

/// The discriminant enum, spanning every model of every table in the
/// schema, in declaration order. Variants serialize as the model name, the
/// exact string stored in the discriminant attribute.
pub(crate) fn model_type_enum(tables: &[TableIr]) -> String {
    let mut out = String::new();
    out.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]\n");
    out.push_str("pub enum ModelType {\n");
    for table in tables {
        for model in &table.models {
            // The stored discriminant is the model's declared name, even
            // when the variant identifier had to be re-cased.
            if model.type_name != model.name {
                out.push_str(&format!("    #[serde(rename = \"{}\")]\n", model.name));
            }
            out.push_str(&format!("    {},\n", model.type_name));
        }
    }
    out.push('}');
    out
}
