use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};

use crate::{
    item::key_source_field,
    key::{KeyValue, PartitionAndSortKey},
    Result, COMPONENT_DELIMITER,
};

/// A record type that can live in a table: serializable to the flat item
/// shape, with a factory that stamps the discriminant onto a fields payload.
pub trait Entity: Serialize + DeserializeOwned {
    /// The record's fields without the discriminant.
    type Fields;

    /// Stamps the discriminant and returns the record.
    fn create(fields: Self::Fields) -> Self;
}

/// How a model derives one physical key: a literal prefix followed by the
/// value of one source field.
#[derive(Debug, Clone)]
pub struct KeySpec {
    pub(crate) prefix: String,
    pub(crate) field: String,
}

impl KeySpec {
    pub(crate) fn resolve(&self, fields: &serde_json::Value) -> Result<String> {
        let value = key_source_field(fields, &self.field)?;
        Ok([self.prefix.as_str(), value.as_str()].join(COMPONENT_DELIMITER))
    }
}

/// First registration phase: only a partition-key selector is accepted.
pub struct PartitionKeyBuilder<T: Entity> {
    model_type: String,
    partition_key_name: String,
    sort_key_name: String,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> PartitionKeyBuilder<T> {
    pub(crate) fn new(
        model_type: String,
        partition_key_name: String,
        sort_key_name: String,
    ) -> Self {
        Self {
            model_type,
            partition_key_name,
            sort_key_name,
            _entity: PhantomData,
        }
    }

    pub fn partition_key(
        self,
        prefix: impl Into<String>,
        field: impl Into<String>,
    ) -> SortKeyBuilder<T> {
        SortKeyBuilder {
            builder: self,
            partition_spec: KeySpec {
                prefix: prefix.into(),
                field: field.into(),
            },
        }
    }
}

/// Second registration phase: only a sort-key selector is accepted.
pub struct SortKeyBuilder<T: Entity> {
    builder: PartitionKeyBuilder<T>,
    partition_spec: KeySpec,
}

impl<T: Entity> SortKeyBuilder<T> {
    pub fn sort_key(self, prefix: impl Into<String>, field: impl Into<String>) -> Model<T> {
        Model {
            model_type: self.builder.model_type,
            partition_key_name: self.builder.partition_key_name,
            sort_key_name: self.builder.sort_key_name,
            partition_spec: self.partition_spec,
            sort_spec: KeySpec {
                prefix: prefix.into(),
                field: field.into(),
            },
            _entity: PhantomData,
        }
    }
}

/// A registered entity variant: its discriminant, its partition-key spec,
/// and its sort-key spec.
pub struct Model<T: Entity> {
    model_type: String,
    partition_key_name: String,
    sort_key_name: String,
    partition_spec: KeySpec,
    sort_spec: KeySpec,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> Model<T> {
    pub fn model_type(&self) -> &str {
        &self.model_type
    }

    /// Stamps the discriminant and returns the record.
    pub fn create(&self, fields: T::Fields) -> T {
        T::create(fields)
    }

    /// Resolves the partition and sort key for the given fields. `fields`
    /// may be the full record or any value carrying the key source fields.
    pub fn key<F: Serialize>(&self, fields: &F) -> Result<PartitionAndSortKey<T>> {
        let fields = serde_json::to_value(fields)?;

        Ok(PartitionAndSortKey::new(
            KeyValue::new(&self.partition_key_name, self.partition_spec.resolve(&fields)?),
            KeyValue::new(&self.sort_key_name, self.sort_spec.resolve(&fields)?),
        ))
    }

    /// The literal prefix of this model's sort key, for begins-with query
    /// conditions spanning every record of the variant.
    pub fn sort_key_prefix(&self) -> KeyValue {
        KeyValue::new(&self.sort_key_name, &self.sort_spec.prefix)
    }
}

/// Object-safe view of a registered model's key layout, used when grouping
/// heterogeneous models into partitions and indexes.
pub trait KeySource {
    fn model_type(&self) -> &str;
    fn partition_key_name(&self) -> &str;
    fn partition_spec(&self) -> &KeySpec;
}

impl<T: Entity> KeySource for Model<T> {
    fn model_type(&self) -> &str {
        &self.model_type
    }

    fn partition_key_name(&self) -> &str {
        &self.partition_key_name
    }

    fn partition_spec(&self) -> &KeySpec {
        &self.partition_spec
    }
}
