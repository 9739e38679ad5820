//! Key issuance: generate keys and build the statements that register them.

use rand::{CryptoRng, RngCore};
use tracing::info;

use crate::clock::Clock;
use crate::key::{KeyShape, LicenseKey, generate_license_key};
use crate::models::{Expiry, NewLicense};
use crate::sql::{InsertBuilder, ParameterizedInsert, SqlError};

/// Everything needed to issue one or more keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRequest {
    pub shape: KeyShape,
    pub count: usize,
    pub user_id: String,
    pub plan: String,
    pub is_active: bool,
    pub expires_at: Expiry,
    pub valid_days: u32,
    pub parameterized: bool,
}

impl Default for IssueRequest {
    fn default() -> Self {
        let license = NewLicense::new("");
        Self {
            shape: KeyShape::default(),
            count: 1,
            user_id: license.user_id,
            plan: license.plan,
            is_active: license.is_active,
            expires_at: license.expires_at,
            valid_days: InsertBuilder::default().valid_days(),
            parameterized: false,
        }
    }
}

/// The statement registering an issued key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Literal(String),
    Parameterized(ParameterizedInsert),
}

impl Statement {
    pub fn sql(&self) -> &str {
        match self {
            Statement::Literal(sql) => sql,
            Statement::Parameterized(insert) => &insert.sql,
        }
    }
}

/// A generated key and its `INSERT` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedKey {
    pub key: LicenseKey,
    pub statement: Statement,
}

/// Generate `request.count` keys and a statement for each.
///
/// Keys from one call are not checked against each other; a duplicate
/// would be caught by the database's unique constraint.
pub fn issue_keys<R: RngCore + CryptoRng>(
    request: &IssueRequest,
    rng: &mut R,
    clock: &impl Clock,
) -> Result<Vec<IssuedKey>, SqlError> {
    let builder = InsertBuilder::with_valid_days(request.valid_days);

    (0..request.count)
        .map(|_| -> Result<IssuedKey, SqlError> {
            let key = generate_license_key(request.shape, &mut *rng);
            let license = NewLicense::from(key.clone())
                .user_id(request.user_id.as_str())
                .plan(request.plan.as_str())
                .active(request.is_active)
                .expires(request.expires_at.clone());

            let statement = if request.parameterized {
                Statement::Parameterized(builder.parameterized(&license, clock)?)
            } else {
                Statement::Literal(builder.literal(&license, clock)?)
            };
            info!(key = %key, shape = %request.shape, "issued license key");

            Ok(IssuedKey { key, statement })
        })
        .collect()
}
