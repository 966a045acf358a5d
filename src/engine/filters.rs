//! Renders the filter panel's rows into a WHERE body.
use crate::engine::WhereBody;
use crate::graph::FilterClause;
use log::debug;

/// Builds the WHERE body, or `None` when no row survives. Rows with an empty
/// column or an operator we don't recognize are skipped — half-filled rows
/// are normal while the user is still typing.
pub(crate) fn compile_filters(filters: &[FilterClause]) -> Option<WhereBody> {
    let mut body = String::new();

    for clause in filters {
        if clause.column.trim().is_empty() {
            continue;
        }

        let Some(operator) = FilterOperator::parse(&clause.operator) else {
            debug!("Skipping filter with operator '{}'", clause.operator);
            continue;
        };

        if !body.is_empty() {
            body.push(' ');
            body.push_str(clause.connector.as_sql());
            body.push(' ');
        }

        body.push_str(clause.column.trim());
        body.push(' ');
        body.push_str(operator.as_sql());

        if !operator.is_unary() {
            body.push(' ');
            body.push_str(&quote_value(&clause.value));
        }
    }

    if body.is_empty() {
        None
    } else {
        Some(WhereBody(body))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterOperator {
    Equals,
    NotEquals,
    GreaterThan,
    LesserThan,
    GreaterOrEqual,
    LesserOrEqual,
    Like,
    In,
    IsNull,
    IsNotNull,
}

impl FilterOperator {
    fn parse(raw: &str) -> Option<Self> {
        let operator = match raw.trim().to_uppercase().as_str() {
            "=" => FilterOperator::Equals,
            "!=" => FilterOperator::NotEquals,
            ">" => FilterOperator::GreaterThan,
            "<" => FilterOperator::LesserThan,
            ">=" => FilterOperator::GreaterOrEqual,
            "<=" => FilterOperator::LesserOrEqual,
            "LIKE" => FilterOperator::Like,
            "IN" => FilterOperator::In,
            "IS NULL" => FilterOperator::IsNull,
            "IS NOT NULL" => FilterOperator::IsNotNull,
            _ => return None,
        };

        Some(operator)
    }

    fn as_sql(self) -> &'static str {
        match self {
            FilterOperator::Equals => "=",
            FilterOperator::NotEquals => "!=",
            FilterOperator::GreaterThan => ">",
            FilterOperator::LesserThan => "<",
            FilterOperator::GreaterOrEqual => ">=",
            FilterOperator::LesserOrEqual => "<=",
            FilterOperator::Like => "LIKE",
            FilterOperator::In => "IN",
            FilterOperator::IsNull => "IS NULL",
            FilterOperator::IsNotNull => "IS NOT NULL",
        }
    }

    fn is_unary(self) -> bool {
        matches!(self, FilterOperator::IsNull | FilterOperator::IsNotNull)
    }
}

/// Numbers and NULL go in bare; everything else becomes a single-quoted
/// string literal with embedded quotes doubled.
fn quote_value(raw: &str) -> String {
    let trimmed = raw.trim();

    if try_parse_number(trimmed).is_some() {
        return trimmed.to_string();
    }

    if trimmed.eq_ignore_ascii_case("null") {
        return "NULL".to_string();
    }

    format!("'{}'", raw.replace('\'', "''"))
}

/// Total "is this a numeric literal" check. The whole trimmed value must
/// parse; `inf`/`NaN` spellings don't count as SQL numbers.
fn try_parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|number| number.is_finite())
}
