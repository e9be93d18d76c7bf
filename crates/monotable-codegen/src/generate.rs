mod gsis;
mod model_types;
mod partition_keys;
mod records;
mod sort_keys;
mod table;
mod util;

use heck::{ToSnakeCase, ToUpperCamelCase};
use indexmap::IndexMap;

use crate::{
    component::{parse_components, KeyComponent},
    error::SchemaError,
    schema::{Schema, TableDef},
};

/// Attribute names the runtime seeds into every table's encryption
/// blacklist; a GSI key source matching one of these never needs an
/// explicit blacklist addition in generated code.
const PARTITION_KEY_NAME: &str = "pk";
const SORT_KEY_NAME: &str = "sk";
const DISCRIMINANT_ATTRIBUTE: &str = "model";
const CIPHER_METADATA_ATTRIBUTE: &str = "__cipher__metadata";

/// Compiles a schema tree into Rust source text.
///
/// Output is deterministic: identical input yields byte-identical source,
/// with models, partitions, and fields appearing in declaration order.
pub fn generate(schema: &Schema) -> Result<String, SchemaError> {
    let tables = schema
        .tables
        .iter()
        .map(TableIr::build)
        .collect::<Result<Vec<_>, _>>()?;

    let has_gsis = tables.iter().any(|table| !table.gsis.is_empty());

    let mut blocks = Vec::new();
    blocks.push(imports(has_gsis));
    blocks.push(model_types::model_type_enum(&tables));

    for table in &tables {
        for model in &table.models {
            blocks.extend(records::record_blocks(model));
        }
        blocks.extend(records::item_enum_block(table));
        blocks.extend(partition_keys::params_structs(table));
        blocks.extend(sort_keys::params_structs(table));
        blocks.extend(gsis::params_structs(table));
        blocks.extend(table::bundle_structs(table));
        blocks.push(table::constructor_fn(table));
    }

    Ok(blocks.join("\n\n") + "\n")
}

fn imports(has_gsis: bool) -> String {
    let runtime = if has_gsis {
        "use monotable::{key, Entity, Gsi, GsiKeys, Key, Table};"
    } else {
        "use monotable::{key, Entity, Key, Table};"
    };

    format!("{runtime}\nuse serde::{{Deserialize, Serialize}};")
}

/// One table, resolved and grouped, ready for emission.
pub(crate) struct TableIr<'a> {
    pub(crate) def: &'a TableDef,
    /// e.g. `LibraryTable`
    pub(crate) type_name: String,
    /// e.g. `library_table`
    pub(crate) fn_name: String,
    /// The partition-union enum name, present when the table has more than
    /// one model.
    pub(crate) item_enum: Option<String>,
    pub(crate) models: Vec<ModelIr<'a>>,
    pub(crate) partitions: Vec<PartitionIr>,
    pub(crate) sort_keys: Vec<SortKeyIr>,
    pub(crate) gsis: Vec<GsiIr>,
    /// GSI key-source attributes that are not already seeded into the
    /// runtime blacklist, in declaration order.
    pub(crate) blacklist_extras: Vec<String>,
}

pub(crate) struct ModelIr<'a> {
    pub(crate) name: &'a str,
    pub(crate) type_name: String,
    pub(crate) fields_type: String,
    pub(crate) helper_fn: String,
    pub(crate) fields: Vec<FieldIr>,
}

pub(crate) struct FieldIr {
    pub(crate) name: String,
    pub(crate) rust_name: String,
    pub(crate) ty: String,
}

pub(crate) struct PartitionIr {
    pub(crate) field_name: String,
    pub(crate) params_type: String,
    pub(crate) components: Vec<KeyComponent>,
    pub(crate) input_fields: Vec<String>,
    pub(crate) produced: String,
}

pub(crate) struct SortKeyIr {
    pub(crate) type_name: String,
    pub(crate) field_name: String,
    pub(crate) params_type: String,
    pub(crate) components: Vec<KeyComponent>,
    pub(crate) input_fields: Vec<String>,
}

pub(crate) struct GsiIr {
    pub(crate) name: String,
    pub(crate) field_name: String,
    pub(crate) params_base: String,
    pub(crate) partition_attribute: String,
    pub(crate) sort_attribute: String,
    pub(crate) produced: String,
}

impl GsiIr {
    pub(crate) fn pk_params(&self) -> String {
        format!("{}PartitionKey", self.params_base)
    }

    pub(crate) fn sk_params(&self) -> String {
        format!("{}SortKey", self.params_base)
    }
}

impl<'a> TableIr<'a> {
    fn build(def: &'a TableDef) -> Result<Self, SchemaError> {
        let table_camel = def.name.to_upper_camel_case();
        let item_enum = (def.models.len() > 1).then(|| format!("{table_camel}Item"));

        let models: Vec<ModelIr<'a>> = def
            .models
            .iter()
            .map(|(name, model)| ModelIr {
                name: name.as_str(),
                type_name: name.to_upper_camel_case(),
                fields_type: format!("{}Fields", name.to_upper_camel_case()),
                helper_fn: name.to_snake_case(),
                fields: model
                    .fields
                    .iter()
                    .map(|(field, ty)| FieldIr {
                        name: field.clone(),
                        rust_name: field.to_snake_case(),
                        ty: util::rust_type(ty),
                    })
                    .collect(),
            })
            .collect();

        // Group models by declared partition, preserving first-appearance
        // order so output is stable across runs.
        let mut groups: IndexMap<&str, Vec<&str>> = IndexMap::new();
        for (name, model) in &def.models {
            groups
                .entry(model.partition.as_str())
                .or_default()
                .push(name.as_str());
        }

        let mut partitions = Vec::new();
        for (partition_name, group) in &groups {
            let Some(tokens) = def.partitions.get(*partition_name) else {
                return Err(SchemaError::UnknownPartition {
                    model: group[0].to_string(),
                    partition: partition_name.to_string(),
                });
            };

            let context = format!("partition `{partition_name}` of table `{}`", def.name);
            let components = parse_components(tokens, &context)?;

            let produced = if group.len() > 1 {
                item_enum.clone().expect("multi-model group implies a multi-model table")
            } else {
                group[0].to_upper_camel_case()
            };

            partitions.push(PartitionIr {
                field_name: partition_name.to_snake_case(),
                params_type: format!("{}PartitionKey", partition_name.to_upper_camel_case()),
                input_fields: util::field_refs(&components),
                components,
                produced,
            });
        }

        let mut sort_keys = Vec::new();
        for (name, model) in &def.models {
            let context = format!("sort key of model `{name}`");
            let components = parse_components(&model.sort, &context)?;

            sort_keys.push(SortKeyIr {
                type_name: name.to_upper_camel_case(),
                field_name: name.to_snake_case(),
                params_type: format!("{}SortKey", name.to_upper_camel_case()),
                input_fields: util::field_refs(&components),
                components,
            });
        }

        let gsi_produced = match &item_enum {
            Some(item_enum) => item_enum.clone(),
            None => models
                .first()
                .map(|model| model.type_name.clone())
                .unwrap_or_else(|| "()".to_string()),
        };

        let gsis = def
            .gsis
            .iter()
            .map(|(name, gsi)| GsiIr {
                name: name.clone(),
                field_name: name.to_snake_case(),
                params_base: name.to_upper_camel_case(),
                partition_attribute: gsi.partition.clone(),
                sort_attribute: gsi.sort.clone(),
                produced: gsi_produced.clone(),
            })
            .collect();

        let seeded = [
            PARTITION_KEY_NAME,
            SORT_KEY_NAME,
            DISCRIMINANT_ATTRIBUTE,
            CIPHER_METADATA_ATTRIBUTE,
        ];
        let mut blacklist_extras: Vec<String> = Vec::new();
        for gsi in def.gsis.values() {
            for attribute in [&gsi.partition, &gsi.sort] {
                if !seeded.contains(&attribute.as_str())
                    && !blacklist_extras.iter().any(|extra| extra == attribute)
                {
                    blacklist_extras.push(attribute.clone());
                }
            }
        }

        Ok(TableIr {
            def,
            type_name: format!("{table_camel}Table"),
            fn_name: format!("{}_table", def.name.to_snake_case()),
            item_enum,
            models,
            partitions,
            sort_keys,
            gsis,
            blacklist_extras,
        })
    }
}
