//! Key mapping from secret keys onto target placeholder names.

use crate::core::types::{KeyAliasTable, MappedValues, SecretMap};

/// Project a secret map through an alias table.
///
/// For every `placeholder -> secret_key` entry, the value of `secret_key` is
/// copied under `placeholder`. Keys missing from the secret are omitted, never
/// an error. Two placeholders may alias the same secret key.
pub fn map(secrets: &SecretMap, aliases: &KeyAliasTable) -> MappedValues {
    aliases
        .iter()
        .filter_map(|(placeholder, secret_key)| {
            secrets
                .get(secret_key)
                .map(|value| (placeholder.clone(), value.clone()))
        })
        .collect()
}
