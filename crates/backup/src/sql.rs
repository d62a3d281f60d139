//! SQL text for backup selects and counts
//!
//! Filters become a `WHERE` clause plus positional parameters. Every value
//! is bound; only the clause skeleton is built as text.

use mnemo_core::{PageWindow, RowFilter};
use rusqlite::types::Value;

/// A `WHERE` clause and its bound parameters
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    /// Clause text, starting with `WHERE`
    pub sql: String,
    /// Parameters in placeholder order
    pub params: Vec<Value>,
}

/// Build the `WHERE` clause for a row filter
pub fn where_clause(filter: &RowFilter) -> WhereClause {
    let mut sql = String::from("WHERE project = ?");
    let mut params = vec![Value::Text(filter.project.clone())];

    if let Some(start) = &filter.start_time {
        sql.push_str(" AND timestamp >= ?");
        params.push(Value::Text(start.clone()));
    }
    if let Some(end) = &filter.end_time {
        sql.push_str(" AND timestamp <= ?");
        params.push(Value::Text(end.clone()));
    }
    for pattern in &filter.contains {
        sql.push_str(" AND (data LIKE ? OR metadata LIKE ?)");
        params.push(Value::Text(pattern.clone()));
        params.push(Value::Text(pattern.clone()));
    }

    WhereClause { sql, params }
}

/// `SELECT` of matching rows, newest timestamp first, windowed
pub fn select(filter: &RowFilter, page: PageWindow) -> WhereClause {
    let clause = where_clause(filter);
    let mut params = clause.params;
    params.push(Value::Integer(clamp_i64(page.limit)));
    params.push(Value::Integer(clamp_i64(page.offset)));
    WhereClause {
        sql: format!(
            "SELECT id, project, timestamp, data, metadata FROM memory {} \
             ORDER BY timestamp DESC LIMIT ? OFFSET ?",
            clause.sql
        ),
        params,
    }
}

/// `SELECT COUNT(*)` of matching rows
pub fn count(filter: &RowFilter) -> WhereClause {
    let clause = where_clause(filter);
    WhereClause {
        sql: format!("SELECT COUNT(*) FROM memory {}", clause.sql),
        params: clause.params,
    }
}

fn clamp_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
