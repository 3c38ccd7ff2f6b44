//! In-memory stand-ins for the database layer.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::database::{Collection, DatabaseError};
use crate::filter::{FilterData, ListSpec};

/// A pre-sorted list of JSON records that evaluates `where` documents itself
pub struct MemoryCollection {
    spec: &'static ListSpec,
    records: Vec<Value>,
}

impl MemoryCollection {
    pub fn new(spec: &'static ListSpec, records: Vec<Value>) -> Self {
        Self { spec, records }
    }

    fn matching(&self, filter_data: &FilterData) -> Vec<&Value> {
        self.records
            .iter()
            .filter(|record| match &filter_data.where_clause {
                Some(where_clause) => matches_where(record, where_clause),
                None => true,
            })
            .collect()
    }
}

#[async_trait]
impl Collection for MemoryCollection {
    type Record = Value;

    fn spec(&self) -> &ListSpec {
        self.spec
    }

    async fn select(&self, filter_data: FilterData) -> Result<Vec<Value>, DatabaseError> {
        let offset = filter_data.offset.unwrap_or(0).max(0) as usize;
        let limit = filter_data.limit.map(|l| l.max(0) as usize).unwrap_or(usize::MAX);
        Ok(self
            .matching(&filter_data)
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self, filter_data: FilterData) -> Result<i64, DatabaseError> {
        Ok(self.matching(&filter_data).len() as i64)
    }
}

fn matches_where(record: &Value, where_clause: &Value) -> bool {
    let Some(conditions) = where_clause.as_object() else {
        return true;
    };
    conditions.iter().all(|(key, condition)| match key.as_str() {
        "$and" => condition.as_array().map_or(true, |all| all.iter().all(|c| matches_where(record, c))),
        "$or" => condition.as_array().map_or(false, |any| any.iter().any(|c| matches_where(record, c))),
        "$not" => !matches_where(record, condition),
        field => {
            let actual = record.get(field).unwrap_or(&Value::Null);
            match condition {
                Value::Object(ops) => matches_ops(actual, ops),
                expected => actual == expected,
            }
        }
    })
}

fn matches_ops(actual: &Value, ops: &Map<String, Value>) -> bool {
    ops.iter().all(|(op, expected)| match op.as_str() {
        "$eq" => actual == expected,
        "$ne" => actual != expected,
        "$gt" => compare(actual, expected).map_or(false, |o| o.is_gt()),
        "$gte" => compare(actual, expected).map_or(false, |o| o.is_ge()),
        "$lt" => compare(actual, expected).map_or(false, |o| o.is_lt()),
        "$lte" => compare(actual, expected).map_or(false, |o| o.is_le()),
        "$in" => expected.as_array().map_or(false, |values| values.contains(actual)),
        "$like" | "$ilike" => match (actual.as_str(), expected.as_str()) {
            (Some(text), Some(pattern)) => like(text, pattern, op == "$ilike"),
            _ => false,
        },
        _ => false,
    })
}

fn compare(a: &Value, b: &Value) -> Option<std::cmp::Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Substring patterns of the form `%needle%`, with `\` escapes
fn like(text: &str, pattern: &str, case_insensitive: bool) -> bool {
    let inner = pattern.strip_prefix('%').unwrap_or(pattern);
    let inner = inner.strip_suffix('%').unwrap_or(inner);
    let mut needle = String::with_capacity(inner.len());
    let mut escaped = false;
    for c in inner.chars() {
        if escaped || c != '\\' {
            needle.push(c);
            escaped = false;
        } else {
            escaped = true;
        }
    }
    if case_insensitive {
        text.to_lowercase().contains(&needle.to_lowercase())
    } else {
        text.contains(&needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn like_handles_escapes_and_case() {
        assert!(like("John Smith", "%jo%", true));
        assert!(!like("John Smith", "%jo%", false));
        assert!(like("50%_off", "%50\\%\\_off%", true));
        assert!(!like("500 off", "%50\\%%", true));
    }

    #[test]
    fn where_documents_evaluate() {
        let record = json!({ "role": "admin", "likes": 5, "is_blocked": false });
        assert!(matches_where(&record, &json!({ "role": { "$eq": "admin" }, "likes": { "$gte": 5 } })));
        assert!(!matches_where(&record, &json!({ "likes": { "$gt": 5 } })));
        assert!(matches_where(&record, &json!({ "$or": [ { "role": "user" }, { "is_blocked": false } ] })));
    }
}
