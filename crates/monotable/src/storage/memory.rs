use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{
    BatchGetRequest, BatchGetResponse, GetRequest, PutRequest, QueryRequest, QueryResponse,
    Storage, MAX_BATCH_GET_KEYS,
};
use crate::{error::StorageError, item::Item, key::ItemKey};

/// An in-process storage collaborator with the same observable behavior as
/// the remote service: unconditional overwrites, sort-ordered queries with
/// explicit continuation, a 100-key batch cap, and (optionally) unprocessed
/// batch keys. The test suites run against it.
#[derive(Default)]
pub struct MemoryStorage {
    tables: Mutex<HashMap<String, MemoryTable>>,
    /// When set, batch gets serve only this many keys and report the rest
    /// unprocessed, mimicking a throttled provider.
    process_at_most: Option<usize>,
}

struct MemoryTable {
    partition_key_name: String,
    sort_key_name: String,
    items: BTreeMap<(String, String), Item>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps how many keys each batch get serves, reporting the remainder as
    /// unprocessed.
    pub fn process_at_most(mut self, keys: usize) -> Self {
        self.process_at_most = Some(keys);
        self
    }

    /// Registers a table and its physical key attribute names.
    pub fn create_table(
        &self,
        name: impl Into<String>,
        partition_key_name: impl Into<String>,
        sort_key_name: impl Into<String>,
    ) {
        self.tables.lock().unwrap().insert(
            name.into(),
            MemoryTable {
                partition_key_name: partition_key_name.into(),
                sort_key_name: sort_key_name.into(),
                items: BTreeMap::new(),
            },
        );
    }

    /// Snapshot of a table's stored items, for inspecting the wire shape.
    pub fn items(&self, table: &str) -> Vec<Item> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .map(|table| table.items.values().cloned().collect())
            .unwrap_or_default()
    }

    fn with_table<R>(
        &self,
        name: &str,
        f: impl FnOnce(&mut MemoryTable) -> R,
    ) -> Result<R, StorageError> {
        let mut tables = self.tables.lock().unwrap();
        let table = tables
            .get_mut(name)
            .ok_or_else(|| StorageError::Service(format!("table `{name}` does not exist")))?;
        Ok(f(table))
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_item(&self, request: GetRequest) -> Result<Option<Item>, StorageError> {
        self.with_table(&request.table, |table| {
            table.items.get(&item_key_pair(&request.key)).cloned()
        })
    }

    async fn batch_get_items(
        &self,
        request: BatchGetRequest,
    ) -> Result<BatchGetResponse, StorageError> {
        if request.keys.len() > MAX_BATCH_GET_KEYS {
            return Err(StorageError::BatchTooLarge {
                requested: request.keys.len(),
                max: MAX_BATCH_GET_KEYS,
            });
        }

        let served = self.process_at_most.unwrap_or(request.keys.len());

        self.with_table(&request.table, |table| {
            let mut response = BatchGetResponse::default();

            for (index, key) in request.keys.iter().enumerate() {
                if index >= served {
                    response.unprocessed_keys.push(key.clone());
                    continue;
                }
                if let Some(item) = table.items.get(&item_key_pair(key)) {
                    response.items.push(item.clone());
                }
            }

            response
        })
    }

    async fn put_item(&self, request: PutRequest) -> Result<(), StorageError> {
        self.with_table(&request.table, |table| {
            let pair = (
                attribute_text(&request.item, &table.partition_key_name),
                attribute_text(&request.item, &table.sort_key_name),
            );
            table.items.insert(pair, request.item);
        })
    }

    async fn query(&self, request: QueryRequest) -> Result<QueryResponse, StorageError> {
        self.with_table(&request.table, |table| {
            let mut matches: Vec<Item> = table
                .items
                .values()
                .filter(|item| {
                    attribute_text(item, request.partition.attribute_name())
                        == request.partition.value()
                })
                .filter(|item| match &request.sort_condition {
                    Some(condition) => {
                        condition.matches(&attribute_text(item, &request.sort_key_name))
                    }
                    None => true,
                })
                .cloned()
                .collect();

            // BTreeMap iteration already orders by primary key; a stable sort
            // on the queried sort attribute keeps that as the tie-break.
            matches.sort_by_key(|item| attribute_text(item, &request.sort_key_name));
            if request.descending {
                matches.reverse();
            }

            if let Some(cursor) = &request.exclusive_start_key {
                let position = sort_position(cursor, &request.sort_key_name, table);
                matches.retain(|item| {
                    let item_position = sort_position(item, &request.sort_key_name, table);
                    if request.descending {
                        item_position < position
                    } else {
                        item_position > position
                    }
                });
            }

            let page_len = request
                .limit
                .map(|limit| limit as usize)
                .unwrap_or(matches.len())
                .min(matches.len());
            let more_remaining = matches.len() > page_len;
            let items: Vec<Item> = matches.drain(..page_len).collect();

            let last_evaluated_key = if more_remaining {
                items.last().cloned()
            } else {
                None
            };

            QueryResponse {
                items,
                last_evaluated_key,
            }
        })
    }
}

fn item_key_pair(key: &ItemKey) -> (String, String) {
    (
        key.partition.value().to_string(),
        key.sort.value().to_string(),
    )
}

fn attribute_text(item: &Item, attribute: &str) -> String {
    match item.get(attribute) {
        Some(serde_json::Value::String(value)) => value.clone(),
        Some(value) => value.to_string(),
        None => String::new(),
    }
}

/// Total ordering position of an item within one query's sort: the queried
/// sort attribute first, then the primary key pair.
fn sort_position(item: &Item, sort_key_name: &str, table: &MemoryTable) -> (String, String, String) {
    (
        attribute_text(item, sort_key_name),
        attribute_text(item, &table.partition_key_name),
        attribute_text(item, &table.sort_key_name),
    )
}
