//! App-wide constants.
//!
//! Centralises the tool name, config paths, environment variable names,
//! and the fixed shape of the `licenses` table so a rename only requires
//! changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "keymint";

/// Crate version, as reported by `keymint version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Local config filename (e.g. `.keymint.toml` in the working directory).
pub const CONFIG_FILENAME: &str = ".keymint.toml";

/// Directory name under `~/.config/` for global config.
pub const CONFIG_DIR: &str = "keymint";

// ── Environment variable names ──────────────────────────────────────

pub const ENV_SEGMENTS: &str = "KEYMINT_SEGMENTS";
pub const ENV_SEGMENT_LENGTH: &str = "KEYMINT_SEGMENT_LENGTH";
pub const ENV_USER_ID: &str = "KEYMINT_USER_ID";
pub const ENV_PLAN: &str = "KEYMINT_PLAN";
pub const ENV_VALID_DAYS: &str = "KEYMINT_VALID_DAYS";
pub const ENV_LOG: &str = "KEYMINT_LOG";

// ── Key shape ───────────────────────────────────────────────────────

/// Characters a key segment is drawn from.
pub const KEY_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Separator placed between key segments.
pub const KEY_SEPARATOR: char = '-';

pub const DEFAULT_SEGMENTS: usize = 4;
pub const DEFAULT_SEGMENT_LENGTH: usize = 4;

/// Upper bound for both the segment count and the segment length.
pub const MAX_SHAPE_DIMENSION: usize = 64;

// ── License table ───────────────────────────────────────────────────

/// Table the generated statement inserts into.
pub const LICENSES_TABLE: &str = "licenses";

/// Column list of the generated statement, in insertion order.
pub const LICENSE_COLUMNS: [&str; 8] = [
    "key",
    "user_id",
    "plan",
    "is_active",
    "expires_at",
    "created_at",
    "requests_today",
    "max_requests_day",
];

pub const DEFAULT_USER_ID: &str = "custom_user";
pub const DEFAULT_PLAN: &str = "Pro Custom";

/// Days a license stays valid when no explicit expiry is given.
pub const DEFAULT_VALID_DAYS: u32 = 365;

/// Value of `requests_today` for a freshly issued key.
pub const INITIAL_REQUESTS_TODAY: u32 = 0;

/// Daily request quota for a freshly issued key.
pub const DEFAULT_MAX_REQUESTS_DAY: u32 = 9999;
