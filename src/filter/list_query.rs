//! Query-string driven search, filter and pagination for list endpoints.
//!
//! A [`ListSpec`] describes one resource (table, searchable text fields,
//! filterable fields and their kinds, default ordering and page size). A
//! [`ListQuery`] is the per-request reading of the raw query-string map
//! against that spec, and yields two [`FilterData`] variants: the filtered
//! query without a window (used for the filtered count) and the same query
//! with the page window applied.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use super::error::FilterError;
use super::types::{FilterData, FilterWhereOptions};

/// Query-string names that are never treated as field filters
pub const RESERVED_PARAMS: [&str; 3] = ["keyword", "page", "limit"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Bool,
    Integer,
    Uuid,
    Timestamp,
}

impl FieldKind {
    /// Read a raw query-string value as this kind
    pub fn coerce(&self, field: &str, raw: &str) -> Result<Value, FilterError> {
        let invalid = || FilterError::InvalidFieldValue { field: field.to_string(), value: raw.to_string() };
        let trimmed = raw.trim();
        match self {
            FieldKind::Text => Ok(Value::String(raw.to_string())),
            FieldKind::Bool => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(Value::Bool(true)),
                "false" | "0" => Ok(Value::Bool(false)),
                _ => Err(invalid()),
            },
            FieldKind::Integer => trimmed.parse::<i64>().map(|n| json!(n)).map_err(|_| invalid()),
            // Canonical lowercase form so the cast compares equal regardless of input casing
            FieldKind::Uuid => Uuid::parse_str(trimmed).map(|u| json!(u.to_string())).map_err(|_| invalid()),
            FieldKind::Timestamp => {
                if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
                    return Ok(json!(ts.with_timezone(&Utc).to_rfc3339()));
                }
                NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|dt| json!(dt.and_utc().to_rfc3339()))
                    .ok_or_else(invalid)
            }
        }
    }

    pub fn cast(&self) -> Option<&'static str> {
        match self {
            FieldKind::Uuid => Some("uuid"),
            FieldKind::Timestamp => Some("timestamptz"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// Static description of a listable collection
#[derive(Debug, Clone, Copy)]
pub struct ListSpec {
    pub table: &'static str,
    pub search_fields: &'static [&'static str],
    pub filter_fields: &'static [FieldSpec],
    pub order: &'static str,
    pub result_per_page: i32,
}

impl ListSpec {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.filter_fields.iter().find(|f| f.name == name)
    }

    pub fn options(&self) -> FilterWhereOptions {
        let mut options = FilterWhereOptions::default();
        for field in self.filter_fields {
            if let Some(cast) = field.kind.cast() {
                options.casts.insert(field.name.to_string(), cast);
            }
        }
        options
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub keyword: Option<String>,
    pub page: u32,
    pub result_per_page: i32,
    where_clause: Map<String, Value>,
    order: &'static str,
}

impl ListQuery {
    pub fn parse(spec: &ListSpec, params: &HashMap<String, String>) -> Result<Self, FilterError> {
        let keyword = params
            .get("keyword")
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(str::to_string);

        let page = params
            .get("page")
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .map(|p| p.min(u32::MAX as i64) as u32)
            .unwrap_or(1);

        let max_limit = crate::config::CONFIG.filter.max_limit.unwrap_or(i32::MAX);
        let result_per_page = params
            .get("limit")
            .and_then(|l| l.trim().parse::<i32>().ok())
            .filter(|l| *l >= 1)
            .unwrap_or(spec.result_per_page)
            .min(max_limit.max(1));

        let mut where_clause = Map::new();

        if let Some(ref kw) = keyword {
            if !spec.search_fields.is_empty() {
                let pattern = format!("%{}%", escape_like(kw));
                let any_field: Vec<Value> = spec
                    .search_fields
                    .iter()
                    .map(|field| {
                        let mut condition = Map::new();
                        condition.insert(field.to_string(), json!({ "$ilike": pattern }));
                        Value::Object(condition)
                    })
                    .collect();
                where_clause.insert("$or".to_string(), Value::Array(any_field));
            }
        }

        // Sorted so the generated SQL is stable across requests
        let mut keys: Vec<&String> = params.keys().collect();
        keys.sort();

        for key in keys {
            if RESERVED_PARAMS.contains(&key.as_str()) {
                continue;
            }
            let (name, op) = match split_operator(key) {
                Some(parts) => parts,
                None => {
                    tracing::debug!("Ignoring unsupported list parameter '{}' on {}", key, spec.table);
                    continue;
                }
            };
            // Reserved names stay reserved even in bracket form
            if RESERVED_PARAMS.contains(&name) {
                continue;
            }
            let field = match spec.field(name) {
                Some(field) => field,
                None => {
                    tracing::debug!("Ignoring unknown filter field '{}' on {}", name, spec.table);
                    continue;
                }
            };

            let value = field.kind.coerce(name, &params[key])?;
            let entry = where_clause
                .entry(name.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(ops) = entry {
                ops.insert(op.to_string(), value);
            }
        }

        Ok(Self {
            keyword,
            page,
            result_per_page,
            where_clause,
            order: spec.order,
        })
    }

    pub fn offset(&self) -> i32 {
        let offset = (self.page as i64 - 1) * self.result_per_page as i64;
        offset.min(i32::MAX as i64) as i32
    }

    /// Filtered query without a window
    pub fn filtered(&self) -> FilterData {
        FilterData {
            where_clause: if self.where_clause.is_empty() {
                None
            } else {
                Some(Value::Object(self.where_clause.clone()))
            },
            order: Some(Value::String(self.order.to_string())),
            limit: None,
            offset: None,
        }
    }

    /// Filtered query restricted to the requested page
    pub fn paginated(&self) -> FilterData {
        FilterData {
            limit: Some(self.result_per_page),
            offset: Some(self.offset()),
            ..self.filtered()
        }
    }
}

/// `likes` -> (`likes`, `$eq`), `likes[gte]` -> (`likes`, `$gte`)
fn split_operator(key: &str) -> Option<(&str, &'static str)> {
    match key.split_once('[') {
        None => Some((key, "$eq")),
        Some((name, rest)) => {
            let op = match rest.strip_suffix(']')? {
                "gt" => "$gt",
                "gte" => "$gte",
                "lt" => "$lt",
                "lte" => "$lte",
                "ne" => "$ne",
                _ => return None,
            };
            Some((name, op))
        }
    }
}

/// Escape LIKE metacharacters so the keyword matches literally
pub fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
