use std::marker::PhantomData;

/// Separator placed between key components when they are joined into the
/// stored attribute value.
pub const COMPONENT_DELIMITER: &str = "|";

/// A named, pure projector from an input record to an ordered list of string
/// components.
///
/// `I` is the input the derivation reads; `M` is the record type (or union of
/// record types) stored under keys this projector produces. Derivation is a
/// plain `fn` so a `Key` can never close over hidden state: identical input
/// always yields identical output.
pub struct Key<I, M> {
    name: &'static str,
    derive: fn(&I) -> Vec<String>,
    _produces: PhantomData<fn() -> M>,
}

/// Builds a [`Key`] from an attribute name and a derivation function.
///
/// This is the constructor generated table definitions call.
pub fn key<I, M>(name: &'static str, derive: fn(&I) -> Vec<String>) -> Key<I, M> {
    Key::new(name, derive)
}

impl<I, M> Key<I, M> {
    pub fn new(name: &'static str, derive: fn(&I) -> Vec<String>) -> Self {
        Self {
            name,
            derive,
            _produces: PhantomData,
        }
    }

    /// Name of the physical attribute this key is stored under.
    pub fn attribute_name(&self) -> &'static str {
        self.name
    }

    /// The ordered components derived from `input`, before joining.
    pub fn components(&self, input: &I) -> Vec<String> {
        (self.derive)(input)
    }

    /// Resolves `input` into the stored attribute value.
    pub fn eval(&self, input: &I) -> KeyValue {
        KeyValue::new(self.name, self.components(input).join(COMPONENT_DELIMITER))
    }
}

impl<I, M> Clone for Key<I, M> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            derive: self.derive,
            _produces: PhantomData,
        }
    }
}

impl<I, M> std::fmt::Debug for Key<I, M> {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt.debug_struct("Key").field("name", &self.name).finish()
    }
}

/// A resolved key: attribute name plus the joined component value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    attribute_name: String,
    value: String,
}

impl KeyValue {
    pub fn new(attribute_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute_name: attribute_name.into(),
            value: value.into(),
        }
    }

    pub fn attribute_name(&self) -> &str {
        &self.attribute_name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A resolved partition + sort key pair identifying exactly one item, typed
/// by the record it stores.
#[derive(Debug, Clone)]
pub struct PartitionAndSortKey<T> {
    partition: KeyValue,
    sort: KeyValue,
    _produces: PhantomData<fn() -> T>,
}

impl<T> PartitionAndSortKey<T> {
    pub fn new(partition: KeyValue, sort: KeyValue) -> Self {
        Self {
            partition,
            sort,
            _produces: PhantomData,
        }
    }

    pub fn partition(&self) -> &KeyValue {
        &self.partition
    }

    pub fn sort(&self) -> &KeyValue {
        &self.sort
    }

    /// Re-types the record this key resolves to, e.g. from a concrete record
    /// to a partition union when mixing models in one batch get.
    pub fn cast<U>(self) -> PartitionAndSortKey<U> {
        PartitionAndSortKey::new(self.partition, self.sort)
    }

    pub(crate) fn item_key(&self) -> ItemKey {
        ItemKey {
            partition: self.partition.clone(),
            sort: self.sort.clone(),
        }
    }
}

/// An untyped resolved key pair as handed to the storage collaborator.
#[derive(Debug, Clone)]
pub struct ItemKey {
    pub partition: KeyValue,
    pub sort: KeyValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoteKey {
        id: String,
    }

    #[test]
    fn eval_joins_components_with_delimiter() {
        let sk: Key<NoteKey, ()> = key("sk", |input| vec!["note".to_string(), input.id.clone()]);

        let resolved = sk.eval(&NoteKey { id: "42".into() });
        assert_eq!(resolved.attribute_name(), "sk");
        assert_eq!(resolved.value(), "note|42");
    }

    #[test]
    fn derivation_is_deterministic() {
        let pk: Key<NoteKey, ()> = key("pk", |input| vec!["note".to_string(), input.id.clone()]);
        let input = NoteKey { id: "7".into() };

        assert_eq!(pk.components(&input), pk.components(&input));
        assert_eq!(pk.eval(&input), pk.eval(&input));
    }
}
