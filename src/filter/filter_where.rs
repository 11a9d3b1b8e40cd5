use serde_json::{Number, Value};

use super::error::FilterError;
use super::types::{FilterField, FilterSpec, Predicate, SqlResult};

#[derive(Debug, Clone)]
pub struct FilterWhereInfo<'a> {
    pub field: &'a FilterField,
    pub data: Value,
}

/// Builds the `WHERE` predicate for one resource's query-string filters.
pub struct FilterWhere<'a> {
    spec: &'a FilterSpec,
    param_values: Vec<Value>,
    param_index: usize,
}

impl<'a> FilterWhere<'a> {
    pub fn new(spec: &'a FilterSpec, starting_param_index: usize) -> Self {
        Self {
            spec,
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Validates `params` against `spec` and renders the conjunction of their
    /// predicates. Placeholders start after `starting_param_index`. An empty
    /// `params` yields an empty query.
    pub fn generate(
        spec: &'a FilterSpec,
        params: &[(String, String)],
        starting_param_index: usize,
    ) -> Result<SqlResult, FilterError> {
        Self::new(spec, starting_param_index).build(params)
    }

    /// Whitelist check, value coercion and range check, in that order.
    pub fn validate(spec: &'a FilterSpec, params: &[(String, String)]) -> Result<Vec<FilterWhereInfo<'a>>, FilterError> {
        let fields = params
            .iter()
            .map(|(param, _)| {
                spec.field(param).ok_or_else(|| FilterError::UnknownFilter {
                    resource: spec.resource.to_string(),
                    param: param.clone(),
                    allowed: spec.allowed(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let conditions = fields
            .into_iter()
            .zip(params)
            .map(|(field, (_, raw))| {
                let data = Self::coerce(field, raw)?;
                Ok(FilterWhereInfo { field, data })
            })
            .collect::<Result<Vec<_>, FilterError>>()?;

        Self::check_ranges(&conditions)?;
        Ok(conditions)
    }

    fn build(mut self, params: &[(String, String)]) -> Result<SqlResult, FilterError> {
        let conditions = Self::validate(self.spec, params)?;

        let sql_conditions: Vec<String> = conditions
            .iter()
            .map(|condition| self.build_sql_condition(condition))
            .collect();

        Ok(SqlResult {
            query: sql_conditions.join(" AND "),
            params: self.param_values,
        })
    }

    fn coerce(field: &FilterField, raw: &str) -> Result<Value, FilterError> {
        match field.predicate {
            Predicate::Contains => {
                if raw.is_empty() {
                    return Err(FilterError::EmptyValue(field.param.to_string()));
                }
                Ok(Value::String(format!("%{}%", escape_like(raw))))
            }
            Predicate::AtLeast | Predicate::AtMost => parse_number(raw)
                .map(Value::Number)
                .ok_or_else(|| FilterError::InvalidNumber {
                    param: field.param.to_string(),
                    value: raw.to_string(),
                }),
            Predicate::NonZero => Ok(Value::Null),
        }
    }

    fn check_ranges(conditions: &[FilterWhereInfo<'_>]) -> Result<(), FilterError> {
        let bound = |c: &FilterWhereInfo<'_>, predicate| {
            (c.field.predicate == predicate).then(|| c.data.as_f64()).flatten()
        };

        for min in conditions {
            let Some(low) = bound(min, Predicate::AtLeast) else { continue };
            for max in conditions.iter().filter(|c| c.field.column == min.field.column) {
                let Some(high) = bound(max, Predicate::AtMost) else { continue };
                if low > high {
                    return Err(FilterError::InvalidRange {
                        min_param: min.field.param.to_string(),
                        max_param: max.field.param.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo<'_>) -> String {
        let column = condition.field.column;
        match condition.field.predicate {
            Predicate::Contains => format!("{} ILIKE {}", column, self.param(condition.data.clone())),
            Predicate::AtLeast => format!("{} >= {}", column, self.param(condition.data.clone())),
            Predicate::AtMost => format!("{} <= {}", column, self.param(condition.data.clone())),
            Predicate::NonZero => format!("{} > 0", column),
        }
    }

    fn param(&mut self, value: Value) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}

/// Escapes LIKE wildcards so the value matches literally.
fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn parse_number(raw: &str) -> Option<Number> {
    let raw = raw.trim();
    if let Ok(i) = raw.parse::<i64>() {
        return Some(Number::from(i));
    }
    raw.parse::<f64>().ok().and_then(Number::from_f64)
}
