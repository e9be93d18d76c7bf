use std::marker::PhantomData;

use serde::Serialize;

use crate::{
    key::KeyValue,
    model::{KeySource, KeySpec},
    Result,
};

/// One or more entity variants sharing a partition key.
///
/// The key spec is taken from the first grouped model; the runtime does not
/// verify that the groups' serialized key spaces are disjoint (collision
/// avoidance is the schema author's responsibility).
pub struct Partition<M> {
    partition_key_name: String,
    spec: KeySpec,
    model_types: Vec<String>,
    _produces: PhantomData<fn() -> M>,
}

impl<M> Partition<M> {
    pub(crate) fn new(first: &dyn KeySource, rest: &[&dyn KeySource]) -> Self {
        let mut model_types = vec![first.model_type().to_string()];
        model_types.extend(rest.iter().map(|model| model.model_type().to_string()));

        Self {
            partition_key_name: first.partition_key_name().to_string(),
            spec: first.partition_spec().clone(),
            model_types,
            _produces: PhantomData,
        }
    }

    /// Discriminants of the grouped variants, in registration order.
    pub fn model_types(&self) -> &[String] {
        &self.model_types
    }

    /// Resolves the shared partition key for the given fields.
    pub fn key<F: Serialize>(&self, fields: &F) -> Result<KeyValue> {
        let fields = serde_json::to_value(fields)?;

        Ok(KeyValue::new(
            &self.partition_key_name,
            self.spec.resolve(&fields)?,
        ))
    }
}
