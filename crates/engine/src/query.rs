//! Filter/query engine
//!
//! A query is a case-insensitive substring plus optional equality filters.
//! The two stores answer it differently and the difference is kept:
//!
//! - **Primary**: every entry of the project's log is decoded and tested in
//!   memory. The substring is matched against the stored JSON text of `data`
//!   and of `metadata` (see [`codec`](crate::codec)); filters compare values,
//!   `data` first, then `metadata`. Results ascend chronologically.
//! - **Backup**: the same request becomes `LIKE` patterns over the JSON
//!   columns (`%query%`, and `%"key":"value"%` per filter). Matching is
//!   textual and case sensitivity follows SQLite's `LIKE`. Results are
//!   newest first.
//!
//! The filter pattern has no space after the colon while stored JSON text
//! does, so on the backup a filter only matches text that happens to contain
//! the unspaced form (inside a string value, say). Records written by the
//! service itself do not match a filter there.
//!
//! The backup path only runs when the primary store itself fails. A project
//! with no primary log is an empty result, not a fallback.

use mnemo_core::{
    Error, MemoryRecord, PageWindow, Payload, ProjectId, Result, RowFilter, RANGE_MAX, RANGE_MIN,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::codec;
use crate::context::StoreContext;
use crate::read::DEFAULT_LIMIT;

/// Parameters of a query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    /// Substring to look for
    pub query: String,
    /// Maximum records returned
    pub limit: usize,
    /// Records skipped
    pub offset: usize,
    /// Field equality filters
    pub filters: Option<Payload>,
}

impl QueryRequest {
    /// A query with default paging and no filters
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: DEFAULT_LIMIT,
            offset: 0,
            filters: None,
        }
    }

    /// Set paging
    pub fn page(mut self, limit: usize, offset: usize) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    /// Set filters
    pub fn with_filters(mut self, filters: Payload) -> Self {
        self.filters = Some(filters);
        self
    }
}

/// A page of query results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryPage {
    /// Matching records on this page
    pub items: Vec<MemoryRecord>,
    /// All matching records
    pub total: u64,
    /// Requested page size
    pub limit: usize,
    /// Requested offset
    pub offset: usize,
    /// The query as given
    pub query: String,
}

/// Whether the lower-cased needle occurs in the JSON text of `data` or `metadata`
///
/// Absent metadata is matched as `{}`.
pub fn matches_text(needle: &str, data: &Payload, metadata: Option<&Payload>) -> bool {
    let needle = needle.to_lowercase();
    let haystack = |payload: &Payload| {
        codec::to_json(payload)
            .map(|json| json.to_lowercase().contains(&needle))
            .unwrap_or(false)
    };
    haystack(data) || metadata.map_or_else(|| "{}".contains(&needle), haystack)
}

/// Whether every filter holds
///
/// A key is looked up in `data`; only when `data` lacks it is `metadata`
/// consulted. A key found in neither fails the record.
pub fn matches_filters(filters: &Payload, data: &Payload, metadata: Option<&Payload>) -> bool {
    filters.iter().all(|(key, expected)| {
        match data
            .get(key)
            .or_else(|| metadata.and_then(|m| m.get(key)))
        {
            Some(actual) => values_equal(actual, expected),
            None => false,
        }
    })
}

/// Loose JSON equality
///
/// Numbers compare by value (`1 == 1.0`) and booleans count as the numbers
/// `1` and `0` (`true == 1`). Arrays and objects compare element by element
/// under the same rules.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => match (x.as_u64(), y.as_u64()) {
                (Some(x), Some(y)) => x == y,
                _ => x.as_f64() == y.as_f64(),
            },
        },
        (Value::Bool(x), Value::Number(n)) | (Value::Number(n), Value::Bool(x)) => {
            n.as_f64() == Some(if *x { 1.0 } else { 0.0 })
        }
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| values_equal(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).map_or(false, |w| values_equal(v, w)))
        }
        _ => a == b,
    }
}

/// `LIKE` pattern approximating one filter entry on the backup
///
/// The value is written in its display form, see [`display_value`].
pub fn filter_pattern(key: &str, value: &Value) -> String {
    format!("%\"{}\":\"{}\"%", key, display_value(value))
}

/// Display form of a filter value
///
/// Strings are raw, `true`/`false`/`null` read `True`/`False`/`None`,
/// numbers as written. Arrays and objects use bracket notation with
/// single-quoted strings: `['a', 1]`, `{'k': True}`.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => {
            let mut out = String::new();
            write_repr(&mut out, other);
            out
        }
    }
}

fn write_repr(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("None"),
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_quoted(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_repr(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (k, v)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_quoted(out, k);
                out.push_str(": ");
                write_repr(out, v);
            }
            out.push('}');
        }
    }
}

// Single quotes unless the text holds a single quote and no double quote.
fn write_quoted(out: &mut String, s: &str) {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
}

/// Answers queries
#[derive(Debug, Clone)]
pub struct QueryEngine {
    stores: StoreContext,
}

impl QueryEngine {
    /// Create an engine over the given stores
    pub fn new(stores: StoreContext) -> Self {
        Self { stores }
    }

    /// Run a query over a project's records
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidProject`] for a bad identifier
    /// - [`Error::Query`] if an entry cannot be decoded, or if the primary
    ///   failed and the backup failed after it
    pub fn query(&self, project: &str, request: &QueryRequest) -> Result<QueryPage> {
        let project = ProjectId::parse(project)?;

        match self.query_primary(&project, request) {
            Ok(page) => Ok(page),
            Err(Error::PrimaryStore(e)) => {
                warn!(project = %project, error = %e, "primary query failed; falling back to backup");
                self.query_backup(&project, request).map_err(|e| {
                    error!(project = %project, error = %e, "backup fallback query failed");
                    Error::Query(e.to_string())
                })
            }
            Err(e) => Err(e),
        }
    }

    fn query_primary(&self, project: &ProjectId, request: &QueryRequest) -> Result<QueryPage> {
        let entries = self
            .stores
            .primary()
            .range(&project.stream_key(), RANGE_MIN, RANGE_MAX)
            .map_err(Error::PrimaryStore)?;

        let mut matched = Vec::new();
        for entry in &entries {
            let record = codec::decode_entry(project, entry)
                .map_err(|e| Error::Query(format!("undecodable entry {}: {}", entry.id, e)))?;
            if self.accepts(request, &record) {
                matched.push(record);
            }
        }
        debug!(project = %project, scanned = entries.len(), matched = matched.len(), "primary query");

        let total = matched.len() as u64;
        let items = matched
            .into_iter()
            .skip(request.offset)
            .take(request.limit)
            .collect();
        Ok(QueryPage {
            items,
            total,
            limit: request.limit,
            offset: request.offset,
            query: request.query.clone(),
        })
    }

    fn accepts(&self, request: &QueryRequest, record: &MemoryRecord) -> bool {
        if !matches_text(&request.query, &record.data, record.metadata.as_ref()) {
            return false;
        }
        match &request.filters {
            Some(filters) => matches_filters(filters, &record.data, record.metadata.as_ref()),
            None => true,
        }
    }

    fn query_backup(&self, project: &ProjectId, request: &QueryRequest) -> Result<QueryPage> {
        let backup = self.stores.backup();
        let mut filter =
            RowFilter::for_project(project.as_str()).with_pattern(format!("%{}%", request.query));
        if let Some(filters) = &request.filters {
            for (key, value) in filters {
                filter = filter.with_pattern(filter_pattern(key, value));
            }
        }

        let rows = backup
            .select(&filter, PageWindow::new(request.limit, request.offset))
            .map_err(Error::SecondaryStore)?;
        let total = backup.count(&filter).map_err(Error::SecondaryStore)?;
        let items = rows
            .into_iter()
            .map(|row| codec::decode_row(project, row))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::SecondaryStore)?;

        Ok(QueryPage {
            items,
            total,
            limit: request.limit,
            offset: request.offset,
            query: request.query.clone(),
        })
    }
}
