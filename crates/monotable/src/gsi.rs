use crate::{
    key::{Key, KeyValue},
    model::KeySource,
    table::Table,
};

/// A global secondary index: its own partition/sort attribute pair plus the
/// entity variants it projects.
#[derive(Debug, Clone)]
pub struct Gsi {
    name: String,
    partition_key_name: String,
    sort_key_name: String,
    model_types: Vec<String>,
}

impl Gsi {
    pub fn new(
        name: impl Into<String>,
        partition_key_name: impl Into<String>,
        sort_key_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            partition_key_name: partition_key_name.into(),
            sort_key_name: sort_key_name.into(),
            model_types: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn partition_key_name(&self) -> &str {
        &self.partition_key_name
    }

    pub fn sort_key_name(&self) -> &str {
        &self.sort_key_name
    }

    pub fn model_types(&self) -> &[String] {
        &self.model_types
    }

    /// Resolves this index's partition key from a raw attribute value.
    pub fn key(&self, value: impl Into<String>) -> KeyValue {
        KeyValue::new(&self.partition_key_name, value)
    }
}

/// First index-registration step: the participating models.
pub struct GsiBuilder<'t> {
    table: &'t mut Table,
    name: String,
}

impl<'t> GsiBuilder<'t> {
    pub(crate) fn new(table: &'t mut Table, name: String) -> Self {
        Self { table, name }
    }

    pub fn models(self, models: &[&dyn KeySource]) -> GsiPartitionKeyBuilder<'t> {
        GsiPartitionKeyBuilder {
            table: self.table,
            name: self.name,
            model_types: models
                .iter()
                .map(|model| model.model_type().to_string())
                .collect(),
        }
    }
}

/// Second index-registration step: the partition attribute.
pub struct GsiPartitionKeyBuilder<'t> {
    table: &'t mut Table,
    name: String,
    model_types: Vec<String>,
}

impl<'t> GsiPartitionKeyBuilder<'t> {
    pub fn partition_key(self, attribute: impl Into<String>) -> GsiSortKeyBuilder<'t> {
        GsiSortKeyBuilder {
            table: self.table,
            name: self.name,
            model_types: self.model_types,
            partition_key_name: attribute.into(),
        }
    }
}

/// Final index-registration step: the sort attribute. Completing it adds the
/// index's key-source attributes to the table's encryption blacklist so they
/// stay queryable.
pub struct GsiSortKeyBuilder<'t> {
    table: &'t mut Table,
    name: String,
    model_types: Vec<String>,
    partition_key_name: String,
}

impl GsiSortKeyBuilder<'_> {
    pub fn sort_key(self, attribute: impl Into<String>) -> Gsi {
        let sort_key_name = attribute.into();

        self.table
            .add_to_encryption_blacklist(self.partition_key_name.clone());
        self.table.add_to_encryption_blacklist(sort_key_name.clone());

        Gsi {
            name: self.name,
            partition_key_name: self.partition_key_name,
            sort_key_name,
            model_types: self.model_types,
        }
    }
}

/// A generated index definition: the index descriptor plus its typed key
/// projectors.
pub struct GsiKeys<PI, SI, M> {
    pub gsi: Gsi,
    pub pk: Key<PI, M>,
    pub sk: Key<SI, M>,
}
