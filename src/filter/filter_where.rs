use serde_json::Value;

use super::error::FilterError;
use super::filter::is_identifier;
use super::types::{FilterOp, FilterWhereOptions};

/// Compiles a Mongo-style `where` document into a parameterized SQL predicate.
///
/// Parameters are numbered `$1..$n` in the order they are emitted, including
/// those nested inside `$and`, `$or` and `$not`.
pub struct FilterWhere<'a> {
    param_values: Vec<Value>,
    options: &'a FilterWhereOptions,
}

impl<'a> FilterWhere<'a> {
    pub fn new(options: &'a FilterWhereOptions) -> Self {
        Self { param_values: vec![], options }
    }

    /// Returns the predicate (empty when there is nothing to filter) and its params.
    pub fn generate(where_data: &Value, options: &FilterWhereOptions) -> Result<(String, Vec<Value>), FilterError> {
        let mut filter_where = FilterWhere::new(options);
        let clause = filter_where.build(where_data)?;
        Ok((clause, filter_where.param_values))
    }

    pub fn validate(where_data: &Value) -> Result<(), FilterError> {
        match where_data {
            Value::Null | Value::Object(_) => Ok(()),
            _ => Err(FilterError::InvalidWhereClause("WHERE must be an object".to_string())),
        }
    }

    fn build(&mut self, where_data: &Value) -> Result<String, FilterError> {
        let obj = match where_data {
            Value::Null => return Ok(String::new()),
            Value::Object(obj) => obj,
            _ => return Err(FilterError::InvalidWhereClause("Unsupported WHERE format".to_string())),
        };

        let mut parts = Vec::with_capacity(obj.len());
        for (key, value) in obj {
            if key.starts_with('$') {
                parts.push(self.build_logical(key, value)?);
            } else {
                parts.extend(self.build_field(key, value)?);
            }
        }
        Ok(parts.join(" AND "))
    }

    fn build_logical(&mut self, op: &str, value: &Value) -> Result<String, FilterError> {
        match op {
            "$and" | "$or" => {
                let arr = value
                    .as_array()
                    .ok_or_else(|| FilterError::InvalidOperatorData(format!("{} requires array", op)))?;
                let mut sql_parts = Vec::with_capacity(arr.len());
                for v in arr {
                    let sql = self.build(v)?;
                    if !sql.is_empty() {
                        sql_parts.push(format!("({})", sql));
                    }
                }
                if sql_parts.is_empty() {
                    // Empty conjunction is true, empty disjunction is false
                    return Ok(if op == "$and" { "1=1" } else { "1=0" }.to_string());
                }
                let joiner = if op == "$and" { " AND " } else { " OR " };
                Ok(format!("({})", sql_parts.join(joiner)))
            }
            "$not" => {
                let sql = self.build(value)?;
                if sql.is_empty() {
                    return Ok("1=0".to_string());
                }
                Ok(format!("NOT ({})", sql))
            }
            _ => Err(FilterError::UnsupportedOperator(op.to_string())),
        }
    }

    fn build_field(&mut self, field: &str, value: &Value) -> Result<Vec<String>, FilterError> {
        if !is_identifier(field) {
            return Err(FilterError::InvalidColumn(format!("Invalid column name format: {}", field)));
        }

        match value {
            Value::Object(obj) if obj.keys().all(|k| k.starts_with('$')) && !obj.is_empty() => {
                let mut out = Vec::with_capacity(obj.len());
                for (op_key, op_val) in obj {
                    let operator = FilterOp::from_key(op_key)
                        .ok_or_else(|| FilterError::UnsupportedOperator(op_key.clone()))?;
                    out.push(self.build_condition(field, operator, op_val)?);
                }
                Ok(out)
            }
            Value::Object(_) => Err(FilterError::InvalidOperatorData(format!(
                "Nested documents are not supported for field '{}'",
                field
            ))),
            // Implicit equality: { field: value }
            _ => Ok(vec![self.build_condition(field, FilterOp::Eq, value)?]),
        }
    }

    fn build_condition(&mut self, column: &str, operator: FilterOp, data: &Value) -> Result<String, FilterError> {
        let quoted_column = format!("\"{}\"", column);
        match operator {
            FilterOp::Eq if data.is_null() => Ok(format!("{} IS NULL", quoted_column)),
            FilterOp::Ne if data.is_null() => Ok(format!("{} IS NOT NULL", quoted_column)),
            FilterOp::In => {
                let values = data
                    .as_array()
                    .ok_or_else(|| FilterError::InvalidOperatorData("$in requires array".to_string()))?;
                if values.is_empty() {
                    return Ok("1=0".to_string());
                }
                let params: Vec<String> = values.iter().map(|v| self.param(column, v.clone())).collect();
                Ok(format!("{} IN ({})", quoted_column, params.join(", ")))
            }
            _ => {
                if data.is_array() || data.is_object() {
                    return Err(FilterError::InvalidOperatorData(format!(
                        "{:?} requires a scalar value",
                        operator
                    )));
                }
                let placeholder = self.param(column, data.clone());
                Ok(format!("{} {} {}", quoted_column, operator.to_sql(), placeholder))
            }
        }
    }

    fn param(&mut self, column: &str, value: Value) -> String {
        self.param_values.push(value);
        let index = self.param_values.len();
        match self.options.casts.get(column) {
            Some(cast) => format!("${}::{}", index, cast),
            None => format!("${}", index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn implicit_equality_binds_param() {
        let options = FilterWhereOptions::default();
        let (sql, params) = FilterWhere::generate(&json!({ "role": "admin" }), &options).unwrap();
        assert_eq!(sql, "\"role\" = $1");
        assert_eq!(params, vec![json!("admin")]);
    }

    #[test]
    fn nested_or_keeps_param_numbering() {
        let options = FilterWhereOptions::default();
        let where_data = json!({
            "$or": [
                { "title": { "$ilike": "%rust%" } },
                { "description": { "$ilike": "%rust%" } }
            ],
            "is_private": false
        });
        let (sql, params) = FilterWhere::generate(&where_data, &options).unwrap();
        assert_eq!(
            sql,
            "((\"title\" ILIKE $1) OR (\"description\" ILIKE $2)) AND \"is_private\" = $3"
        );
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn casts_are_applied_per_column() {
        let mut options = FilterWhereOptions::default();
        options.casts.insert("author_id".to_string(), "uuid");
        let (sql, _) = FilterWhere::generate(
            &json!({ "author_id": "0b7e7d0e-8f53-4a43-9a5e-1f8a4c9e2c11" }),
            &options,
        )
        .unwrap();
        assert_eq!(sql, "\"author_id\" = $1::uuid");
    }

    #[test]
    fn range_operators_and_null() {
        let options = FilterWhereOptions::default();
        let (sql, params) = FilterWhere::generate(&json!({ "likes": { "$gte": 5, "$lt": 10 } }), &options).unwrap();
        assert_eq!(sql, "\"likes\" >= $1 AND \"likes\" < $2");
        assert_eq!(params, vec![json!(5), json!(10)]);

        let (sql, params) = FilterWhere::generate(&json!({ "category_id": null }), &options).unwrap();
        assert_eq!(sql, "\"category_id\" IS NULL");
        assert!(params.is_empty());
    }

    #[test]
    fn empty_in_matches_nothing() {
        let options = FilterWhereOptions::default();
        let (sql, params) = FilterWhere::generate(&json!({ "id": { "$in": [] } }), &options).unwrap();
        assert_eq!(sql, "1=0");
        assert!(params.is_empty());
    }

    #[test]
    fn rejects_unknown_operator_and_bad_column() {
        let options = FilterWhereOptions::default();
        assert!(matches!(
            FilterWhere::generate(&json!({ "name": { "$regex": "x" } }), &options),
            Err(FilterError::UnsupportedOperator(_))
        ));
        assert!(matches!(
            FilterWhere::generate(&json!({ "name; DROP TABLE users": 1 }), &options),
            Err(FilterError::InvalidColumn(_))
        ));
    }
}
