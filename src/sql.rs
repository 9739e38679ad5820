//! `INSERT` statement construction for the `licenses` table.
//!
//! Two renderings are supported:
//!
//! - **literal**: values inlined as SQL literals, ready to paste into a
//!   SQL console. Single quotes inside string values are doubled, so a
//!   value can never terminate its literal early.
//! - **parameterized**: Postgres `$n` placeholders for the caller-supplied
//!   values, with the bound values returned alongside.
//!
//! `created_at` is always `NOW()` so the database assigns it. The request
//! counters are fixed literals in both renderings.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::clock::Clock;
use crate::constants::{
    DEFAULT_MAX_REQUESTS_DAY, DEFAULT_VALID_DAYS, INITIAL_REQUESTS_TODAY, LICENSE_COLUMNS,
    LICENSES_TABLE,
};
use crate::models::{Expiry, NewLicense};

/// Errors while building a statement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SqlError {
    #[error("invalid expires_at timestamp '{value}': {reason}")]
    Format { value: String, reason: String },

    #[error("invalid valid_days: {value} ({reason})")]
    InvalidParameter { value: u32, reason: &'static str },
}

/// A value bound to a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Text(String),
    Bool(bool),
    Null,
}

/// A statement with `$n` placeholders and the values bound to them, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterizedInsert {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

/// Builds `INSERT INTO licenses ...` statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertBuilder {
    valid_days: u32,
}

impl Default for InsertBuilder {
    fn default() -> Self {
        Self {
            valid_days: DEFAULT_VALID_DAYS,
        }
    }
}

impl InsertBuilder {
    /// A builder whose default expiry lies `valid_days` after "now".
    pub fn with_valid_days(valid_days: u32) -> Self {
        Self { valid_days }
    }

    pub fn valid_days(&self) -> u32 {
        self.valid_days
    }

    /// Render the statement with every value inlined as a SQL literal.
    pub fn literal(&self, license: &NewLicense, clock: &impl Clock) -> Result<String, SqlError> {
        let expires_at = self.resolve_expiry(&license.expires_at, clock.now())?;
        debug!(key = %license.key, expires_at = ?expires_at, "rendering literal insert");

        let values = [
            quote(&license.key),
            quote(&license.user_id),
            quote(&license.plan),
            bool_literal(license.is_active).to_string(),
            expires_at.as_deref().map(quote).unwrap_or_else(|| "NULL".to_string()),
        ];
        Ok(render(&values))
    }

    /// Render the statement with placeholders for the caller-supplied values.
    pub fn parameterized(
        &self,
        license: &NewLicense,
        clock: &impl Clock,
    ) -> Result<ParameterizedInsert, SqlError> {
        let expires_at = self.resolve_expiry(&license.expires_at, clock.now())?;
        debug!(key = %license.key, expires_at = ?expires_at, "rendering parameterized insert");

        let params = vec![
            SqlValue::Text(license.key.clone()),
            SqlValue::Text(license.user_id.clone()),
            SqlValue::Text(license.plan.clone()),
            SqlValue::Bool(license.is_active),
            expires_at.map(SqlValue::Text).unwrap_or(SqlValue::Null),
        ];
        let placeholders: Vec<String> = (1..=params.len()).map(|n| format!("${n}")).collect();

        Ok(ParameterizedInsert {
            sql: render(&placeholders),
            params,
        })
    }

    fn resolve_expiry(
        &self,
        expiry: &Expiry,
        now: DateTime<Utc>,
    ) -> Result<Option<String>, SqlError> {
        match expiry {
            Expiry::Default => {
                let at = now
                    .checked_add_signed(Duration::days(i64::from(self.valid_days)))
                    .ok_or(SqlError::InvalidParameter {
                        value: self.valid_days,
                        reason: "expiry falls past the latest representable date",
                    })?;
                Ok(Some(format_timestamp(at)))
            }
            Expiry::At(value) => {
                DateTime::parse_from_rfc3339(value).map_err(|e| SqlError::Format {
                    value: value.clone(),
                    reason: e.to_string(),
                })?;
                Ok(Some(value.clone()))
            }
            Expiry::Never => Ok(None),
        }
    }
}

/// Literal insert for `license` using the default 365-day validity.
pub fn generate_insert_sql(license: &NewLicense, clock: &impl Clock) -> Result<String, SqlError> {
    InsertBuilder::default().literal(license, clock)
}

/// Format a timestamp as ISO-8601 UTC with millisecond precision, e.g.
/// `2025-06-01T12:00:00.000Z`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Wrap `value` in single quotes, doubling any embedded quote.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn bool_literal(value: bool) -> &'static str {
    if value { "TRUE" } else { "FALSE" }
}

/// Lay out the full statement. `client_values` fills the first five
/// columns; the remaining three are fixed.
fn render<S: AsRef<str>>(client_values: &[S]) -> String {
    let requests_today = INITIAL_REQUESTS_TODAY.to_string();
    let max_requests_day = DEFAULT_MAX_REQUESTS_DAY.to_string();

    let mut values: Vec<&str> = client_values.iter().map(AsRef::as_ref).collect();
    values.extend(["NOW()", requests_today.as_str(), max_requests_day.as_str()]);
    debug_assert_eq!(values.len(), LICENSE_COLUMNS.len());

    let body = values
        .iter()
        .map(|v| format!("    {v}"))
        .collect::<Vec<_>>()
        .join(",\n");

    let sql = format!(
        "INSERT INTO {LICENSES_TABLE} ({})\nVALUES (\n{body}\n);",
        LICENSE_COLUMNS.join(", ")
    );
    sql.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap())
    }

    #[test]
    fn literal_statement_layout() {
        let license = NewLicense::new("ABCD-1234-EFGH-5678")
            .expires(Expiry::At("2030-01-01T00:00:00.000Z".into()));
        let sql = generate_insert_sql(&license, &clock()).unwrap();

        let expected = "\
INSERT INTO licenses (key, user_id, plan, is_active, expires_at, created_at, requests_today, max_requests_day)
VALUES (
    'ABCD-1234-EFGH-5678',
    'custom_user',
    'Pro Custom',
    TRUE,
    '2030-01-01T00:00:00.000Z',
    NOW(),
    0,
    9999
);";
        assert_eq!(sql, expected);
    }

    #[test]
    fn default_expiry_is_365_days_out() {
        let license = NewLicense::new("ABCD-1234-EFGH-5678");
        let sql = generate_insert_sql(&license, &clock()).unwrap();
        assert!(sql.contains("'2026-06-01T12:00:00.000Z'"), "got: {sql}");
    }

    #[test]
    fn custom_validity_period() {
        let builder = InsertBuilder::with_valid_days(30);
        let sql = builder.literal(&NewLicense::new("K"), &clock()).unwrap();
        assert!(sql.contains("'2025-07-01T12:00:00.000Z'"), "got: {sql}");
    }

    #[test]
    fn oversized_validity_period_is_an_error() {
        let builder = InsertBuilder::with_valid_days(u32::MAX);
        let err = builder.literal(&NewLicense::new("K"), &clock()).unwrap_err();
        assert_eq!(
            err,
            SqlError::InvalidParameter {
                value: u32::MAX,
                reason: "expiry falls past the latest representable date",
            }
        );
        assert!(builder.parameterized(&NewLicense::new("K"), &clock()).is_err());
    }

    #[test]
    fn oversized_validity_period_ignored_for_explicit_expiry() {
        let license = NewLicense::new("K").expires(Expiry::Never);
        let sql = InsertBuilder::with_valid_days(u32::MAX).literal(&license, &clock()).unwrap();
        assert!(sql.contains("NULL"));
    }

    #[test]
    fn never_expiring_license_uses_null() {
        let license = NewLicense::new("K").expires(Expiry::Never);
        let sql = generate_insert_sql(&license, &clock()).unwrap();
        assert!(sql.contains("    TRUE,\n    NULL,\n    NOW(),"), "got: {sql}");
    }

    #[test]
    fn inactive_license_uses_false() {
        let license = NewLicense::new("K").active(false);
        let sql = generate_insert_sql(&license, &clock()).unwrap();
        assert!(sql.contains("    FALSE,\n"), "got: {sql}");
        assert!(!sql.contains("TRUE"));
    }

    #[test]
    fn quotes_in_values_are_doubled() {
        let license = NewLicense::new("K")
            .user_id("o'brien")
            .plan("x'); DROP TABLE licenses; --");
        let sql = generate_insert_sql(&license, &clock()).unwrap();
        assert!(sql.contains("'o''brien'"), "got: {sql}");
        assert!(sql.contains("'x''); DROP TABLE licenses; --'"), "got: {sql}");
    }

    #[test]
    fn malformed_expiry_is_rejected() {
        let license = NewLicense::new("K").expires(Expiry::At("next tuesday".into()));
        let err = generate_insert_sql(&license, &clock()).unwrap_err();
        assert!(matches!(err, SqlError::Format { ref value, .. } if value == "next tuesday"));
        assert!(err.to_string().contains("expires_at"));
    }

    #[test]
    fn explicit_expiry_is_not_rewritten() {
        let license = NewLicense::new("K").expires(Expiry::At("2030-01-01T00:00:00+02:00".into()));
        let sql = generate_insert_sql(&license, &clock()).unwrap();
        assert!(sql.contains("'2030-01-01T00:00:00+02:00'"), "got: {sql}");
    }

    #[test]
    fn parameterized_binds_client_values() {
        let license = NewLicense::new("ABCD-1234-EFGH-5678").user_id("o'brien");
        let insert = InsertBuilder::default().parameterized(&license, &clock()).unwrap();

        assert!(insert.sql.contains("    $1,\n    $2,\n    $3,\n    $4,\n    $5,\n    NOW(),"));
        assert!(!insert.sql.contains("o'brien"));
        assert_eq!(
            insert.params,
            vec![
                SqlValue::Text("ABCD-1234-EFGH-5678".into()),
                SqlValue::Text("o'brien".into()),
                SqlValue::Text("Pro Custom".into()),
                SqlValue::Bool(true),
                SqlValue::Text("2026-06-01T12:00:00.000Z".into()),
            ]
        );
    }

    #[test]
    fn parameterized_never_binds_null() {
        let license = NewLicense::new("K").expires(Expiry::Never);
        let insert = InsertBuilder::default().parameterized(&license, &clock()).unwrap();
        assert_eq!(insert.params[4], SqlValue::Null);
    }

    #[test]
    fn params_serialize_as_plain_json() {
        let params = vec![SqlValue::Text("a".into()), SqlValue::Bool(false), SqlValue::Null];
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(json, r#"["a",false,null]"#);
    }

    #[test]
    fn timestamp_has_millisecond_precision() {
        let at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()
            + Duration::microseconds(678_901);
        assert_eq!(format_timestamp(at), "2025-01-02T03:04:05.678Z");
    }
}
