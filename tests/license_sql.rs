//! Integration tests for key generation and the generated `INSERT` statement.
//!
//! These tests exercise the public API from the keymint crate the same way
//! the binary wires it together.

use chrono::{DateTime, Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;

use keymint::clock::{FixedClock, SystemClock};
use keymint::config::Config;
use keymint::env::Env;
use keymint::issue::{IssueRequest, issue_keys};
use keymint::key::{KeyShape, generate_default_key, generate_license_key};
use keymint::models::{Expiry, NewLicense};
use keymint::output::OutputFormat;
use keymint::sql::{InsertBuilder, generate_insert_sql};

/// Extract the quoted `expires_at` value (fifth value line) from a literal statement.
fn expires_value(sql: &str) -> &str {
    let line = sql
        .lines()
        .skip_while(|l| !l.starts_with("VALUES"))
        .nth(5)
        .expect("statement has an expires_at line");
    line.trim().trim_end_matches(',').trim_matches('\'')
}

// ---------------------------------------------------------------------------
// key generation
// ---------------------------------------------------------------------------

#[test]
fn keys_have_requested_layout() {
    let mut rng = StdRng::seed_from_u64(11);
    for segments in 1..=8 {
        for length in 1..=8 {
            let shape = KeyShape::new(segments, length).unwrap();
            let key = generate_license_key(shape, &mut rng);
            let groups: Vec<&str> = key.as_str().split('-').collect();

            assert_eq!(groups.len(), segments);
            for group in groups {
                assert_eq!(group.len(), length);
                assert!(group.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
            }
        }
    }
}

#[test]
fn os_rng_keys_are_not_repeated() {
    let keys: std::collections::HashSet<String> =
        (0..100).map(|_| generate_default_key().into_string()).collect();
    assert_eq!(keys.len(), 100);
}

// ---------------------------------------------------------------------------
// SQL statement
// ---------------------------------------------------------------------------

#[test]
fn defaults_produce_expected_literals() {
    let license = NewLicense::new("ABCD-1234-EFGH-5678");
    let sql = generate_insert_sql(&license, &SystemClock).unwrap();

    assert!(sql.contains("'ABCD-1234-EFGH-5678'"));
    assert!(sql.contains("'custom_user'"));
    assert!(sql.contains("'Pro Custom'"));
    assert!(sql.contains("    TRUE,"));
    assert!(sql.trim().ends_with(");"));
}

#[test]
fn statement_lists_eight_columns_in_order() {
    let sql = generate_insert_sql(&NewLicense::new("K"), &SystemClock).unwrap();
    let first_line = sql.lines().next().unwrap();
    assert_eq!(
        first_line,
        "INSERT INTO licenses (key, user_id, plan, is_active, expires_at, created_at, requests_today, max_requests_day)"
    );

    let values: Vec<&str> = sql
        .lines()
        .skip_while(|l| !l.starts_with("VALUES"))
        .skip(1)
        .take_while(|l| *l != ");")
        .collect();
    assert_eq!(values.len(), 8);
    assert_eq!(&values[5..], ["    NOW(),", "    0,", "    9999"]);
}

#[test]
fn explicit_expiry_is_copied_exactly() {
    let license =
        NewLicense::new("K").expires(Expiry::At("2030-01-01T00:00:00.000Z".to_string()));
    let sql = generate_insert_sql(&license, &SystemClock).unwrap();
    assert!(sql.contains("    '2030-01-01T00:00:00.000Z',\n"));
}

#[test]
fn default_expiry_is_about_a_year_from_now() {
    let before = Utc::now();
    let sql = generate_insert_sql(&NewLicense::new("K"), &SystemClock).unwrap();
    let after = Utc::now();

    let value = expires_value(&sql);
    assert!(value.ends_with('Z'), "got: {value}");
    assert_eq!(value.len(), "2025-06-01T12:00:00.000Z".len());

    let expires: DateTime<Utc> = value.parse().unwrap();
    let tolerance = Duration::seconds(1);
    assert!(expires >= before + Duration::days(365) - tolerance);
    assert!(expires <= after + Duration::days(365) + tolerance);
}

#[test]
fn fixed_clock_gives_reproducible_statement() {
    let clock = FixedClock(Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap());
    let a = generate_insert_sql(&NewLicense::new("K"), &clock).unwrap();
    let b = generate_insert_sql(&NewLicense::new("K"), &clock).unwrap();
    assert_eq!(a, b);
    assert_eq!(expires_value(&a), "2025-02-28T23:59:59.000Z");
}

#[test]
fn injection_attempt_stays_inside_literal() {
    let license = NewLicense::new("K").user_id("'); DELETE FROM licenses; --");
    let sql = InsertBuilder::default().literal(&license, &SystemClock).unwrap();
    assert!(sql.contains("'''); DELETE FROM licenses; --'"));
}

// ---------------------------------------------------------------------------
// end to end
// ---------------------------------------------------------------------------

#[test]
fn config_file_drives_issued_statement() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".keymint.toml"),
        r#"
[key]
segments = 3
segment_length = 5

[license]
user_id = "acme"
plan = "Enterprise"
valid_days = 30

[output]
format = "sql"
"#,
    )
    .unwrap();
    let config = Config::load(Some(dir.path()), &Env::mock(Vec::<(&str, &str)>::new())).unwrap();

    let request = IssueRequest {
        shape: config.key_shape(None, None).unwrap(),
        user_id: config.license.user_id.clone(),
        plan: config.license.plan.clone(),
        valid_days: config.license.valid_days,
        ..IssueRequest::default()
    };
    let clock = FixedClock(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    let issued = issue_keys(&request, &mut StdRng::seed_from_u64(5), &clock).unwrap();
    let output = config.output.format.render(&issued);

    assert_eq!(config.output.format, OutputFormat::Sql);
    assert_eq!(issued[0].key.as_str().len(), 17);
    assert!(output.starts_with("INSERT INTO licenses"));
    assert!(output.contains("'acme'"));
    assert!(output.contains("'Enterprise'"));
    assert!(output.contains("'2025-01-31T00:00:00.000Z'"));
}

#[test]
fn text_output_frames_key_and_statement() {
    let issued = issue_keys(
        &IssueRequest::default(),
        &mut StdRng::seed_from_u64(5),
        &SystemClock,
    )
    .unwrap();
    let output = OutputFormat::Text.render(&issued);
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines[0], "--- Generated License Key ---");
    assert_eq!(lines[1], format!("Key: {}", issued[0].key));
    assert_eq!(lines[2], "-------------------------------");
    assert_eq!(lines[3], "SQL command:");
    assert!(lines[4].starts_with("INSERT INTO licenses"));
    assert_eq!(lines[lines.len() - 2], ");");
    assert_eq!(lines[lines.len() - 1], "-------------------------------");
}
