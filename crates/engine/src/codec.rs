//! Record encoding for both stores
//!
//! Primary entries carry three string fields: `data`, `metadata` and
//! `timestamp`. Missing metadata is written as `{}`, so records served from
//! the primary always come back with a metadata object. The backup table
//! stores `NULL` for absent or empty metadata, so the same record served
//! from the backup comes back with `metadata: None`.
//!
//! ## JSON text
//!
//! Payloads are stored, and matched by substring queries, as spaced JSON:
//! `", "` between items, `": "` between key and value, keys in insertion
//! order, and every character outside printable ASCII written as a `\uXXXX`
//! escape (UTF-16 surrogate pairs beyond the BMP). `{"k": "v2"}` is what a
//! record looks like to both a query and a backup `LIKE` pattern.

use chrono::{SecondsFormat, Utc};
use mnemo_core::{
    BackupRow, MemoryRecord, NewBackupRow, Payload, ProjectId, StoreError, StoreResult,
    StreamEntry, StreamFields,
};
use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;

/// Stream field holding the payload JSON
pub const FIELD_DATA: &str = "data";
/// Stream field holding the metadata JSON
pub const FIELD_METADATA: &str = "metadata";
/// Stream field holding the timestamp
pub const FIELD_TIMESTAMP: &str = "timestamp";

/// Current time as an RFC 3339 UTC string with microseconds
///
/// Fixed width, so timestamps compare correctly as strings.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Spaced, ASCII-only JSON text of a payload
pub fn to_json(payload: &Payload) -> StoreResult<String> {
    let mut out = Vec::with_capacity(128);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, SpacedAsciiFormatter);
    payload.serialize(&mut ser)?;
    String::from_utf8(out).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// `serde_json` formatter producing the stored JSON text
#[derive(Debug, Clone, Copy, Default)]
pub struct SpacedAsciiFormatter;

impl Formatter for SpacedAsciiFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut plain = 0;
        for (at, c) in fragment.char_indices() {
            if c.is_ascii() && c != '\x7f' {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[plain..at])?;
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            plain = at + c.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[plain..])
    }
}

/// Build the primary entry fields for a record
pub fn encode_entry(
    data: &Payload,
    metadata: Option<&Payload>,
    timestamp: &str,
) -> StoreResult<StreamFields> {
    let metadata = match metadata {
        Some(m) => to_json(m)?,
        None => "{}".to_string(),
    };
    Ok(StreamFields::from([
        (FIELD_DATA.to_string(), to_json(data)?),
        (FIELD_METADATA.to_string(), metadata),
        (FIELD_TIMESTAMP.to_string(), timestamp.to_string()),
    ]))
}

/// Build the backup row for a record
pub fn encode_row(
    project: &ProjectId,
    data: &Payload,
    metadata: Option<&Payload>,
    timestamp: &str,
) -> StoreResult<NewBackupRow> {
    let metadata = match metadata {
        Some(m) if !m.is_empty() => Some(to_json(m)?),
        _ => None,
    };
    Ok(NewBackupRow {
        project: project.as_str().to_string(),
        timestamp: timestamp.to_string(),
        data: to_json(data)?,
        metadata,
    })
}

/// Decode a primary entry
///
/// A missing `data` field reads as `{}`, a missing or empty `metadata`
/// field as `None`, a missing `timestamp` as the empty string.
pub fn decode_entry(project: &ProjectId, entry: &StreamEntry) -> StoreResult<MemoryRecord> {
    let data = match entry.fields.get(FIELD_DATA) {
        Some(raw) => parse_object(raw)?,
        None => Payload::new(),
    };
    let metadata = match entry.fields.get(FIELD_METADATA) {
        Some(raw) if !raw.is_empty() => Some(parse_object(raw)?),
        _ => None,
    };
    Ok(MemoryRecord {
        id: entry.id.to_string(),
        project: project.clone(),
        timestamp: entry
            .fields
            .get(FIELD_TIMESTAMP)
            .cloned()
            .unwrap_or_default(),
        data,
        metadata,
    })
}

/// Decode a backup row
pub fn decode_row(project: &ProjectId, row: BackupRow) -> StoreResult<MemoryRecord> {
    let metadata = match row.metadata.as_deref() {
        Some(raw) if !raw.is_empty() => Some(parse_object(raw)?),
        _ => None,
    };
    Ok(MemoryRecord {
        id: row.id.to_string(),
        project: project.clone(),
        timestamp: row.timestamp,
        data: parse_object(&row.data)?,
        metadata,
    })
}

fn parse_object(raw: &str) -> StoreResult<Payload> {
    match serde_json::from_str::<serde_json::Value>(raw)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(StoreError::Serialization(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
