//! Serde adapter for cycle counters.
//!
//! Subgraphs expose `BigInt` fields as decimal strings while hand-written
//! fixtures tend to use plain JSON numbers. Both decode to `u64`; encoding
//! always produces a number.

use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum CycleRepr {
    Number(u64),
    Text(String),
}

pub fn serialize<S>(cycle: &u64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(*cycle)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match CycleRepr::deserialize(deserializer)? {
        CycleRepr::Number(n) => Ok(n),
        CycleRepr::Text(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid cycle '{}': {}", s, e))),
    }
}
