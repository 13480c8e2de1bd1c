//! YAML mapping keys are plain strings, so maps keyed by a [`Chain`](alloy_chains::Chain) are
//! (de)serialized with their keys converted through [`ToString`] and [`FromStr`].
//!
//! This lets a config name a chain either by name (`sepolia`) or by id (`"31337"`).

use alloy::primitives::map::HashMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};
use std::{fmt::Display, hash::Hash, str::FromStr};

/// Serializes a map with its keys rendered as strings.
pub fn serialize<S, K, V>(map: &HashMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
where
    K: ToString + Hash + Eq,
    V: Serialize,
    S: Serializer,
{
    map.iter().map(|(k, v)| (k.to_string(), v)).collect::<HashMap<_, _>>().serialize(serializer)
}

/// Deserializes a map whose keys are parsed from strings.
pub fn deserialize<'de, K, V, D>(deserializer: D) -> Result<HashMap<K, V>, D::Error>
where
    K: FromStr<Err: Display> + Hash + Eq,
    V: Deserialize<'de>,
    D: Deserializer<'de>,
{
    HashMap::<String, V>::deserialize(deserializer).and_then(|map| {
        map.into_iter()
            .map(|(k, v)| {
                K::from_str(&k)
                    .map(|parsed| (parsed, v))
                    .map_err(|err| D::Error::custom(format!("invalid key `{k}`: {err}")))
            })
            .collect()
    })
}
