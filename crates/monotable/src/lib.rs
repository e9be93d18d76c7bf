//! Single-table DynamoDB modeling: composite partition/sort keys over
//! heterogeneous entity variants, secondary-index projections, and
//! field-level encryption around a pluggable storage collaborator.
//!
//! Table definitions are usually emitted by `monotable-codegen` from a
//! declarative schema; the same registration API is available for
//! hand-written definitions.

mod cipher;
pub use cipher::{decrypt_or_pass_through, encrypt_or_pass_through, FieldCipher};

mod error;
pub use error::{CipherError, Error, Result, StorageError};

mod gsi;
pub use gsi::{Gsi, GsiBuilder, GsiKeys, GsiPartitionKeyBuilder, GsiSortKeyBuilder};

mod item;
pub use item::{from_item, to_item, Item};

mod key;
pub use key::{key, ItemKey, Key, KeyValue, PartitionAndSortKey, COMPONENT_DELIMITER};

mod model;
pub use model::{Entity, KeySource, KeySpec, Model, PartitionKeyBuilder, SortKeyBuilder};

mod partition;
pub use partition::Partition;

pub mod query;
pub use query::{Page, PageCursor, QueryBuilder, SortCondition};

pub mod storage;
pub use storage::{DynamoStorage, MemoryStorage, Storage};

mod store;
pub use store::Store;

mod table;
pub use table::{Table, CIPHER_METADATA_ATTRIBUTE, DISCRIMINANT_ATTRIBUTE};

pub use async_trait::async_trait;
