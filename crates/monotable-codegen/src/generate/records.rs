use super::{FieldIr, ModelIr, TableIr};

/// One record struct, its fields payload, its constructor helper, and its
/// `Entity` impl.
pub(crate) fn record_blocks(model: &ModelIr) -> Vec<String> {
    vec![
        record_struct(model),
        fields_struct(model),
        helper_fn(model),
        entity_impl(model),
    ]
}

fn record_struct(model: &ModelIr) -> String {
    let mut out = String::new();
    out.push_str("#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]\n");
    out.push_str(&format!("pub struct {} {{\n", model.type_name));
    out.push_str("    pub model: ModelType,\n");
    push_record_fields(&mut out, &model.fields, "    ", true, "pub ");
    out.push('}');
    out
}

fn fields_struct(model: &ModelIr) -> String {
    if model.fields.is_empty() {
        return format!(
            "#[derive(Debug, Clone, PartialEq)]\npub struct {};",
            model.fields_type
        );
    }

    let mut out = String::new();
    out.push_str("#[derive(Debug, Clone, PartialEq)]\n");
    out.push_str(&format!("pub struct {} {{\n", model.fields_type));
    push_record_fields(&mut out, &model.fields, "    ", false, "pub ");
    out.push('}');
    out
}

fn helper_fn(model: &ModelIr) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "pub fn {}(fields: {}) -> {} {{\n",
        model.helper_fn, model.fields_type, model.type_name
    ));
    out.push_str(&format!("    {} {{\n", model.type_name));
    out.push_str(&format!("        model: ModelType::{},\n", model.type_name));
    for field in &model.fields {
        out.push_str(&format!(
            "        {}: fields.{},\n",
            field.rust_name, field.rust_name
        ));
    }
    out.push_str("    }\n");
    out.push('}');
    out
}

fn entity_impl(model: &ModelIr) -> String {
    let mut out = String::new();
    out.push_str(&format!("impl Entity for {} {{\n", model.type_name));
    out.push_str(&format!("    type Fields = {};\n", model.fields_type));
    out.push('\n');
    out.push_str(&format!(
        "    fn create(fields: {}) -> {} {{\n",
        model.fields_type, model.type_name
    ));
    out.push_str(&format!("        {}(fields)\n", model.helper_fn));
    out.push_str("    }\n");
    out.push('}');
    out
}

/// The partition-union enum, tagged by the discriminant attribute. Only
/// emitted when the table holds more than one model.
pub(crate) fn item_enum_block(table: &TableIr) -> Option<String> {
    let item_enum = table.item_enum.as_ref()?;

    let mut out = String::new();
    out.push_str("#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]\n");
    out.push_str("#[serde(tag = \"model\")]\n");
    out.push_str(&format!("pub enum {item_enum} {{\n"));
    for model in &table.models {
        if model.type_name != model.name {
            out.push_str(&format!("    #[serde(rename = \"{}\")]\n", model.name));
        }
        if model.fields.is_empty() {
            out.push_str(&format!("    {},\n", model.type_name));
            continue;
        }
        out.push_str(&format!("    {} {{\n", model.type_name));
        // Enum variant fields take no visibility qualifier.
        push_record_fields(&mut out, &model.fields, "        ", true, "");
        out.push_str("    },\n");
    }
    out.push('}');
    Some(out)
}

fn push_record_fields(out: &mut String, fields: &[FieldIr], indent: &str, serde: bool, vis: &str) {
    for field in fields {
        if serde && field.rust_name != field.name {
            out.push_str(&format!("{indent}#[serde(rename = \"{}\")]\n", field.name));
        }
        out.push_str(&format!("{indent}{vis}{}: {},\n", field.rust_name, field.ty));
    }
}
