mod support;

use std::sync::Arc;

use monotable::{
    async_trait, decrypt_or_pass_through, encrypt_or_pass_through, CipherError, FieldCipher, Item,
    Store, CIPHER_METADATA_ATTRIBUTE,
};
use support::*;

/// A trivially reversible cipher: each field value's JSON encoding is
/// reversed, and the metadata attribute records which fields to restore.
struct ReversingCipher;

#[async_trait]
impl FieldCipher for ReversingCipher {
    async fn encrypt(
        &self,
        mut item: Item,
        fields_to_encrypt: Vec<String>,
    ) -> Result<Item, CipherError> {
        for field in &fields_to_encrypt {
            if let Some(value) = item.get_mut(field) {
                let encoded = serde_json::to_string(value)
                    .map_err(|err| CipherError::Encrypt(err.to_string()))?;
                *value = serde_json::Value::String(encoded.chars().rev().collect());
            }
        }
        item.insert(
            CIPHER_METADATA_ATTRIBUTE.to_string(),
            serde_json::json!({ "encrypted": fields_to_encrypt }),
        );
        Ok(item)
    }

    async fn decrypt(&self, mut item: Item) -> Result<Item, CipherError> {
        let Some(metadata) = item.remove(CIPHER_METADATA_ATTRIBUTE) else {
            return Ok(item);
        };

        let fields = metadata
            .get("encrypted")
            .and_then(|fields| fields.as_array())
            .cloned()
            .ok_or_else(|| CipherError::Decrypt("missing field list".to_string()))?;

        for field in fields {
            let field = field
                .as_str()
                .ok_or_else(|| CipherError::Decrypt("malformed field list".to_string()))?;
            let Some(serde_json::Value::String(encoded)) = item.get(field) else {
                return Err(CipherError::Decrypt(format!("field `{field}` not a string")));
            };
            let decoded: String = encoded.chars().rev().collect();
            let value = serde_json::from_str(&decoded)
                .map_err(|err| CipherError::Decrypt(err.to_string()))?;
            item.insert(field.to_string(), value);
        }

        Ok(item)
    }
}

fn encrypted_store(db: &TestDb) -> (Store, Arc<monotable::MemoryStorage>) {
    let (store, storage) = test_store(db);
    (store.with_cipher(ReversingCipher), storage)
}

#[tokio::test]
async fn round_trip_with_cipher_restores_the_record() {
    let db = test_db();
    let (store, _) = encrypted_store(&db);
    let (_, song, _) = a_musician_with_two_songs(&db);

    let key = db.song.key(&song).unwrap();
    store.put(&key, &song).await.unwrap();

    let loaded = store.get(&key).await.unwrap();
    assert_eq!(loaded, Some(song));
}

#[tokio::test]
async fn stored_items_hold_ciphertext_for_non_blacklisted_fields() {
    let db = test_db();
    let (store, storage) = encrypted_store(&db);
    let (_, song, _) = a_musician_with_two_songs(&db);

    store.put(&db.song.key(&song).unwrap(), &song).await.unwrap();

    let items = storage.items("TestTable");
    assert_eq!(items.len(), 1);
    let stored = &items[0];

    // Keys and discriminant stay plaintext and queryable.
    assert_eq!(stored.get("pk").unwrap(), "musician|1");
    assert_eq!(stored.get("sk").unwrap(), "song|2");
    assert_eq!(stored.get("model").unwrap(), "song");
    assert!(stored.contains_key(CIPHER_METADATA_ATTRIBUTE));

    // Domain fields do not.
    assert_ne!(stored.get("title").unwrap(), "Buffalo Soldier");
}

#[tokio::test]
async fn gsi_key_sources_stay_plaintext_under_encryption() {
    let db = test_db();
    let (store, storage) = encrypted_store(&db);
    let (musician, _, _) = a_musician_with_two_songs(&db);

    store
        .put(&db.musician.key(&musician).unwrap(), &musician)
        .await
        .unwrap();

    // `name` and `id` feed the registered indexes, so registration put them
    // on the blacklist and the cipher never saw them.
    let items = storage.items("TestTable");
    assert_eq!(items[0].get("name").unwrap(), "Bob Marley");
    assert_eq!(items[0].get("id").unwrap(), "1");
}

#[tokio::test]
async fn transforms_pass_through_without_a_cipher() {
    let db = test_db();
    let (_, song, _) = a_musician_with_two_songs(&db);
    let item = monotable::to_item(&song).unwrap();

    let encrypted = encrypt_or_pass_through(None, db.table.encryption_blacklist(), item.clone())
        .await
        .unwrap();
    assert_eq!(encrypted, item);

    // The reverse transform is safe on an already-plaintext record.
    let decrypted = decrypt_or_pass_through(None, item.clone()).await.unwrap();
    assert_eq!(decrypted, item);
}

#[tokio::test]
async fn cipher_round_trip_is_identity_on_items() {
    let db = test_db();
    let (_, song, _) = a_musician_with_two_songs(&db);
    let cipher = ReversingCipher;

    let item = monotable::to_item(&song).unwrap();
    let encrypted = cipher
        .encrypt(item.clone(), vec!["title".to_string()])
        .await
        .unwrap();
    assert_ne!(encrypted.get("title"), item.get("title"));

    let decrypted = cipher.decrypt(encrypted).await.unwrap();
    assert_eq!(decrypted, item);
}
