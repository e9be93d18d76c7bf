use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::{
    cipher::{decrypt_or_pass_through, encrypt_or_pass_through, FieldCipher},
    item::{from_item, to_item},
    key::{KeyValue, PartitionAndSortKey},
    query::QueryBuilder,
    storage::{BatchGetRequest, GetRequest, PutRequest, Storage},
    table::Table,
    Result,
};

/// The persistence facade: key-addressed reads and writes with the
/// field-level encryption transform applied around the storage collaborator.
///
/// Construction consumes the [`Table`], freezing its blacklist; the facade
/// holds only shared immutable state and is safe for unsynchronized
/// concurrent use. Within each call, key resolution precedes the encryption
/// transform, which precedes the network call.
pub struct Store {
    table: Arc<Table>,
    storage: Arc<dyn Storage>,
    cipher: Option<Arc<dyn FieldCipher>>,
}

impl Store {
    pub fn new(table: Table, storage: impl Storage + 'static) -> Self {
        Self {
            table: Arc::new(table),
            storage: Arc::new(storage),
            cipher: None,
        }
    }

    /// Configures the field cipher. Without one, every transform is a
    /// pass-through.
    pub fn with_cipher(mut self, cipher: impl FieldCipher + 'static) -> Self {
        self.cipher = Some(Arc::new(cipher));
        self
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub(crate) fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub(crate) fn cipher(&self) -> Option<&Arc<dyn FieldCipher>> {
        self.cipher.as_ref()
    }

    /// Retrieves the item stored under an exact key pair. Absence is
    /// `Ok(None)`, never an error.
    pub async fn get<T: DeserializeOwned>(
        &self,
        keys: &PartitionAndSortKey<T>,
    ) -> Result<Option<T>> {
        let response = self
            .storage
            .get_item(GetRequest {
                table: self.table.name().to_string(),
                key: keys.item_key(),
            })
            .await?;

        match response {
            Some(item) => {
                let item = decrypt_or_pass_through(self.cipher.as_ref(), item).await?;
                Ok(Some(from_item(item)?))
            }
            None => Ok(None),
        }
    }

    /// Fetches up to one batch of items. Keys the collaborator reports as
    /// unprocessed are logged and omitted; callers needing completeness must
    /// detect a short result and retry themselves.
    pub async fn batch_get<T: DeserializeOwned>(
        &self,
        keys: &[PartitionAndSortKey<T>],
    ) -> Result<Vec<T>> {
        let response = self
            .storage
            .batch_get_items(BatchGetRequest {
                table: self.table.name().to_string(),
                keys: keys.iter().map(PartitionAndSortKey::item_key).collect(),
            })
            .await?;

        if !response.unprocessed_keys.is_empty() {
            tracing::warn!(
                table = self.table.name(),
                unprocessed = response.unprocessed_keys.len(),
                keys = ?response.unprocessed_keys,
                "batch get left keys unprocessed"
            );
        }

        let mut items = Vec::with_capacity(response.items.len());
        for item in response.items {
            let item = decrypt_or_pass_through(self.cipher.as_ref(), item).await?;
            items.push(from_item(item)?);
        }

        Ok(items)
    }

    /// Writes a record under the resolved keys, unconditionally overwriting
    /// any existing item. The key attributes are merged into the serialized
    /// fields before the encryption transform runs.
    pub async fn put<T: Serialize>(
        &self,
        keys: &PartitionAndSortKey<T>,
        fields: &T,
    ) -> Result<()> {
        let mut item = to_item(fields)?;
        item.insert(
            keys.partition().attribute_name().to_string(),
            keys.partition().value().into(),
        );
        item.insert(
            keys.sort().attribute_name().to_string(),
            keys.sort().value().into(),
        );

        let item = encrypt_or_pass_through(
            self.cipher.as_ref(),
            self.table.encryption_blacklist(),
            item,
        )
        .await?;

        self.storage
            .put_item(PutRequest {
                table: self.table.name().to_string(),
                item,
            })
            .await?;

        Ok(())
    }

    /// Starts a range query over the partition the resolved key identifies.
    pub fn query(&self, partition: KeyValue) -> QueryBuilder<'_> {
        QueryBuilder::new(self, partition)
    }
}
