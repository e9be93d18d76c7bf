use indexmap::IndexSet;

use crate::{
    gsi::GsiBuilder,
    model::{Entity, KeySource, PartitionKeyBuilder},
    partition::Partition,
};

/// Attribute holding the discriminant that tags which entity variant a
/// stored item represents.
pub const DISCRIMINANT_ATTRIBUTE: &str = "model";

/// Attribute holding the metadata a field cipher needs to reverse its
/// transform exactly.
pub const CIPHER_METADATA_ATTRIBUTE: &str = "__cipher__metadata";

/// The root registry for a single-table design: the table name, the two
/// physical key attribute names, and the encryption blacklist.
///
/// The blacklist grows only through `&mut self` registration calls; handing
/// the table to a [`Store`](crate::Store) consumes it, so no mutation is
/// observable once reads and writes begin.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    partition_key_name: String,
    sort_key_name: String,
    encryption_blacklist: IndexSet<String>,
}

impl Table {
    /// Creates a table, seeding the encryption blacklist with the key
    /// attribute names and the reserved discriminant/metadata attributes so
    /// keys and type tags stay plaintext and queryable.
    pub fn new(
        name: impl Into<String>,
        partition_key_name: impl Into<String>,
        sort_key_name: impl Into<String>,
    ) -> Self {
        let partition_key_name = partition_key_name.into();
        let sort_key_name = sort_key_name.into();

        let mut encryption_blacklist = IndexSet::new();
        encryption_blacklist.insert(partition_key_name.clone());
        encryption_blacklist.insert(sort_key_name.clone());
        encryption_blacklist.insert(DISCRIMINANT_ATTRIBUTE.to_string());
        encryption_blacklist.insert(CIPHER_METADATA_ATTRIBUTE.to_string());

        Self {
            name: name.into(),
            partition_key_name,
            sort_key_name,
            encryption_blacklist,
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

    /// Attributes exempt from field-level encryption.
    pub fn encryption_blacklist(&self) -> &IndexSet<String> {
        &self.encryption_blacklist
    }

    pub fn add_to_encryption_blacklist(&mut self, attribute: impl Into<String>) {
        self.encryption_blacklist.insert(attribute.into());
    }

    /// Starts registering an entity variant. Registration is two-phase: the
    /// builder returned here only accepts a partition-key selector, and the
    /// next step only a sort-key selector, before a [`Model`](crate::Model)
    /// descriptor exists.
    pub fn model<T: Entity>(&self, model_type: impl Into<String>) -> PartitionKeyBuilder<T> {
        PartitionKeyBuilder::new(
            model_type.into(),
            self.partition_key_name.clone(),
            self.sort_key_name.clone(),
        )
    }

    /// Groups one or more registered models under their shared partition
    /// key. The signature requires at least one model.
    pub fn partition<M>(&self, first: &dyn KeySource, rest: &[&dyn KeySource]) -> Partition<M> {
        Partition::new(first, rest)
    }

    /// Starts registering a global secondary index. Completing the builder
    /// chain adds the index's key-source attributes to the encryption
    /// blacklist.
    pub fn gsi(&mut self, name: impl Into<String>) -> GsiBuilder<'_> {
        GsiBuilder::new(self, name.into())
    }
}
