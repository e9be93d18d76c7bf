use serde::{de::DeserializeOwned, Serialize};

use crate::{Error, Result};

/// The flat record shape items take on the wire: two key attributes, one
/// discriminant attribute, optional encryption metadata, and domain fields.
pub type Item = serde_json::Map<String, serde_json::Value>;

/// Serializes a record into its stored item shape.
pub fn to_item<T: Serialize>(record: &T) -> Result<Item> {
    match serde_json::to_value(record)? {
        serde_json::Value::Object(item) => Ok(item),
        _ => Err(Error::InvalidRecord),
    }
}

/// Maps a stored item back onto a typed record.
pub fn from_item<T: DeserializeOwned>(item: Item) -> Result<T> {
    Ok(serde_json::from_value(serde_json::Value::Object(item))?)
}

/// Reads a key source field out of a serialized field record, stringifying
/// numbers the way they are stored in composite keys.
pub(crate) fn key_source_field(fields: &serde_json::Value, field: &str) -> Result<String> {
    let record = fields.as_object().ok_or(Error::InvalidRecord)?;

    match record.get(field) {
        Some(serde_json::Value::String(value)) => Ok(value.clone()),
        Some(serde_json::Value::Number(value)) => Ok(value.to_string()),
        Some(_) => Err(Error::InvalidKeyField(field.to_string())),
        None => Err(Error::MissingKeyField(field.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_source_field_reads_strings_and_numbers() {
        let fields = json!({ "id": "1", "rank": 3 });

        assert_eq!(key_source_field(&fields, "id").unwrap(), "1");
        assert_eq!(key_source_field(&fields, "rank").unwrap(), "3");
    }

    #[test]
    fn key_source_field_rejects_missing_and_structured_values() {
        let fields = json!({ "tags": ["a"] });

        assert!(matches!(
            key_source_field(&fields, "id"),
            Err(Error::MissingKeyField(field)) if field == "id"
        ));
        assert!(matches!(
            key_source_field(&fields, "tags"),
            Err(Error::InvalidKeyField(field)) if field == "tags"
        ));
    }
}
