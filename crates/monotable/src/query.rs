use serde::de::DeserializeOwned;

use crate::{
    cipher::decrypt_or_pass_through,
    gsi::Gsi,
    item::{from_item, Item},
    key::KeyValue,
    storage::QueryRequest,
    store::Store,
    Error, Result,
};

/// A range condition over the sort key, built from resolved key values.
#[derive(Debug, Clone)]
pub enum SortCondition {
    Equals(KeyValue),
    BeginsWith(KeyValue),
    Between(KeyValue, KeyValue),
}

impl SortCondition {
    pub(crate) fn attribute_names(&self) -> Vec<&str> {
        match self {
            SortCondition::Equals(key) | SortCondition::BeginsWith(key) => {
                vec![key.attribute_name()]
            }
            SortCondition::Between(lower, upper) => {
                vec![lower.attribute_name(), upper.attribute_name()]
            }
        }
    }

    /// Whether a stored sort value satisfies this condition. Used by
    /// collaborators that evaluate conditions themselves.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            SortCondition::Equals(key) => value == key.value(),
            SortCondition::BeginsWith(key) => value.starts_with(key.value()),
            SortCondition::Between(lower, upper) => {
                value >= lower.value() && value <= upper.value()
            }
        }
    }
}

/// An opaque continuation cursor. Holding one is the only way to resume a
/// query; no page is ever fetched without an explicit request.
#[derive(Debug, Clone)]
pub struct PageCursor(pub(crate) Item);

/// One finite page of decrypted, type-mapped items.
#[derive(Debug)]
pub struct Page<M> {
    pub items: Vec<M>,
    /// Present when the collaborator reports more matching items; pass it to
    /// [`QueryBuilder::start_at`] on a fresh query to continue.
    pub cursor: Option<PageCursor>,
}

/// Builds and executes one range query over a partition or an index.
pub struct QueryBuilder<'a> {
    store: &'a Store,
    partition: KeyValue,
    sort_condition: Option<SortCondition>,
    index: Option<Gsi>,
    limit: Option<u32>,
    start_at: Option<PageCursor>,
    descending: bool,
}

impl<'a> QueryBuilder<'a> {
    pub(crate) fn new(store: &'a Store, partition: KeyValue) -> Self {
        Self {
            store,
            partition,
            sort_condition: None,
            index: None,
            limit: None,
            start_at: None,
            descending: false,
        }
    }

    pub fn sort_key_equals(mut self, key: KeyValue) -> Self {
        self.sort_condition = Some(SortCondition::Equals(key));
        self
    }

    pub fn sort_key_begins_with(mut self, key: KeyValue) -> Self {
        self.sort_condition = Some(SortCondition::BeginsWith(key));
        self
    }

    pub fn sort_key_between(mut self, lower: KeyValue, upper: KeyValue) -> Self {
        self.sort_condition = Some(SortCondition::Between(lower, upper));
        self
    }

    /// Queries the given index instead of the base table.
    pub fn index(mut self, gsi: &Gsi) -> Self {
        self.index = Some(gsi.clone());
        self
    }

    /// Caps the number of items evaluated for this page.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Resumes a prior query from its returned cursor.
    pub fn start_at(mut self, cursor: PageCursor) -> Self {
        self.start_at = Some(cursor);
        self
    }

    /// Returns items in descending sort-key order.
    pub fn descending(mut self) -> Self {
        self.descending = true;
        self
    }

    /// Issues exactly one storage query and maps the page. Fails with
    /// [`Error::InvalidQuery`] before any request when the sort condition
    /// does not belong to the queried table or index.
    pub async fn exec<M: DeserializeOwned>(self) -> Result<Page<M>> {
        let table = self.store.table();

        let sort_key_name = match &self.index {
            Some(gsi) => gsi.sort_key_name(),
            None => table.sort_key_name(),
        };

        if let Some(condition) = &self.sort_condition {
            for attribute in condition.attribute_names() {
                if attribute != sort_key_name {
                    return Err(Error::InvalidQuery(format!(
                        "sort key condition references `{attribute}`, \
                         but the queried sort key is `{sort_key_name}`"
                    )));
                }
            }
        }

        let request = QueryRequest {
            table: table.name().to_string(),
            index_name: self.index.as_ref().map(|gsi| gsi.name().to_string()),
            partition: self.partition,
            sort_condition: self.sort_condition,
            sort_key_name: sort_key_name.to_string(),
            limit: self.limit,
            exclusive_start_key: self.start_at.map(|cursor| cursor.0),
            descending: self.descending,
        };

        let response = self.store.storage().query(request).await?;

        let mut items = Vec::with_capacity(response.items.len());
        for item in response.items {
            let item = decrypt_or_pass_through(self.store.cipher(), item).await?;
            items.push(from_item(item)?);
        }

        Ok(Page {
            items,
            cursor: response.last_evaluated_key.map(PageCursor),
        })
    }
}
