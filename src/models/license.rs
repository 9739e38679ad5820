//! Client-side fields of a new `licenses` row.

use crate::constants::{DEFAULT_PLAN, DEFAULT_USER_ID};
use crate::key::LicenseKey;

/// How the `expires_at` column is filled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Expiry {
    /// Now plus the configured validity period, computed at build time.
    #[default]
    Default,
    /// An explicit timestamp, written out unchanged.
    At(String),
    /// No expiry; written as SQL `NULL`.
    Never,
}

impl Expiry {
    /// Map an optional timestamp argument onto an expiry.
    ///
    /// `None` means "use the default validity period". An empty string
    /// means the license never expires.
    pub fn from_option(value: Option<String>) -> Self {
        match value {
            None => Expiry::Default,
            Some(s) if s.trim().is_empty() => Expiry::Never,
            Some(s) => Expiry::At(s),
        }
    }
}

/// The values a caller controls when registering a key.
///
/// `created_at`, `requests_today` and `max_requests_day` are fixed by the
/// statement builder and have no field here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLicense {
    pub key: String,
    pub user_id: String,
    pub plan: String,
    pub is_active: bool,
    pub expires_at: Expiry,
}

impl NewLicense {
    /// A license for `key` with the default owner, plan and expiry.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            user_id: DEFAULT_USER_ID.to_string(),
            plan: DEFAULT_PLAN.to_string(),
            is_active: true,
            expires_at: Expiry::Default,
        }
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn plan(mut self, plan: impl Into<String>) -> Self {
        self.plan = plan.into();
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    pub fn expires(mut self, expires_at: Expiry) -> Self {
        self.expires_at = expires_at;
        self
    }
}

impl From<LicenseKey> for NewLicense {
    fn from(key: LicenseKey) -> Self {
        Self::new(key.into_string())
    }
}
