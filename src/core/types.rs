//! Type aliases for domain concepts.

use std::collections::BTreeMap;

use crate::core::value::SecretValue;

/// Name of a key inside a secret payload (e.g. `DB_PASS`).
pub type SecretKey = String;

/// Name a target uses for a value (template placeholder or object data key).
pub type Placeholder = String;

/// Flat view of a secret payload.
pub type SecretMap = BTreeMap<SecretKey, SecretValue>;

/// Declarative placeholder -> secret key table.
pub type KeyAliasTable = BTreeMap<Placeholder, SecretKey>;

/// Values resolved for one target, keyed by placeholder.
pub type MappedValues = BTreeMap<Placeholder, SecretValue>;
