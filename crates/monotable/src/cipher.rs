use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexSet;

use crate::{error::CipherError, item::Item};

/// The field-level encryption collaborator.
///
/// `encrypt` replaces every listed field's value with ciphertext and stores
/// whatever metadata it needs for exact reversal under the reserved metadata
/// attribute; `decrypt` undoes that transform. Implementations own their key
/// material.
#[async_trait]
pub trait FieldCipher: Send + Sync {
    async fn encrypt(
        &self,
        item: Item,
        fields_to_encrypt: Vec<String>,
    ) -> Result<Item, CipherError>;

    async fn decrypt(&self, item: Item) -> Result<Item, CipherError>;
}

/// Applies the encryption transform when a cipher is configured: every
/// attribute not on the blacklist is handed to the cipher. Without a cipher
/// the item passes through unchanged.
pub async fn encrypt_or_pass_through(
    cipher: Option<&Arc<dyn FieldCipher>>,
    blacklist: &IndexSet<String>,
    item: Item,
) -> Result<Item, CipherError> {
    match cipher {
        Some(cipher) => {
            let fields_to_encrypt = item
                .keys()
                .filter(|field| !blacklist.contains(field.as_str()))
                .cloned()
                .collect();
            cipher.encrypt(item, fields_to_encrypt).await
        }
        None => Ok(item),
    }
}

/// Reverses the encryption transform. Safe to apply to a plaintext item when
/// no cipher is configured: it passes through unchanged.
pub async fn decrypt_or_pass_through(
    cipher: Option<&Arc<dyn FieldCipher>>,
    item: Item,
) -> Result<Item, CipherError> {
    match cipher {
        Some(cipher) => cipher.decrypt(item).await,
        None => Ok(item),
    }
}
