// `serialize_with` helpers for the JSON rendering of converted blocks
use chrono::{DateTime, Utc};
use prost_types::Timestamp;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::Serializer;
use std::collections::BTreeMap;

use crate::models::datasets::traces::ExecutionStatus;

pub fn hex_map<S>(map: &BTreeMap<String, Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut out = serializer.serialize_map(Some(map.len()))?;
    for (key, value) in map {
        out.serialize_entry(key, &hex::encode(value))?;
    }
    out.end()
}

pub fn hex_list<S>(values: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut out = serializer.serialize_seq(Some(values.len()))?;
    for value in values {
        out.serialize_element(&hex::encode(value))?;
    }
    out.end()
}

// Known statuses render by name, anything else as the raw number
pub fn execution_status<S>(status: &i32, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match ExecutionStatus::try_from(*status) {
        Ok(known) => serializer.serialize_str(known.name()),
        Err(_) => serializer.serialize_i32(*status),
    }
}

pub fn timestamp<S>(time: &Option<Timestamp>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match time.as_ref().and_then(timestamp_to_datetime) {
        Some(datetime) => serializer.serialize_str(&datetime.to_rfc3339()),
        None => serializer.serialize_none(),
    }
}

pub fn timestamp_to_datetime(time: &Timestamp) -> Option<DateTime<Utc>> {
    let nanos = u32::try_from(time.nanos).ok()?;
    DateTime::<Utc>::from_timestamp(time.seconds, nanos)
}
