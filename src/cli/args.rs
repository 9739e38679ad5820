//! Clap argument types and request resolution.

use clap::Parser;

use keymint::config::Config;
use keymint::issue::IssueRequest;
use keymint::key::{KeyError, KeyShape};
use keymint::models::Expiry;
use keymint::output::OutputFormat;

/// Generate a license key and the SQL to register it.
#[derive(Parser, Debug)]
#[command(
    name = "keymint",
    version = keymint::constants::VERSION,
    about = super::ABOUT,
    args_conflicts_with_subcommands = true,
)]
pub struct Cli {
    /// Log debug details to stderr.
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub generate: GenerateArgs,
}

/// Available commands. Without one, a key is generated.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Check that a key has the expected shape.
    Check(CheckArgs),

    /// Print version information.
    Version,
}

/// Arguments for generating keys (the default action).
#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    // --- Key shape ---
    /// Number of dash-separated segments (default: 4).
    #[arg(long)]
    pub segments: Option<usize>,

    /// Characters per segment (default: 4).
    #[arg(long)]
    pub segment_length: Option<usize>,

    /// Number of keys to generate.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub count: u32,

    // --- License row ---
    /// Value of the `user_id` column (default: custom_user).
    #[arg(long)]
    pub user_id: Option<String>,

    /// Value of the `plan` column (default: "Pro Custom").
    #[arg(long)]
    pub plan: Option<String>,

    /// Register the key as active, overriding the config.
    #[arg(long, default_value_t = false, conflicts_with = "inactive")]
    pub active: bool,

    /// Register the key as inactive.
    #[arg(long, default_value_t = false)]
    pub inactive: bool,

    /// Explicit RFC 3339 expiry, e.g. 2030-01-01T00:00:00.000Z.
    #[arg(long, conflicts_with_all = ["no_expiry", "valid_days"])]
    pub expires_at: Option<String>,

    /// Register a key that never expires (`expires_at` is NULL).
    #[arg(long, default_value_t = false)]
    pub no_expiry: bool,

    /// Days until the default expiry (default: 365).
    #[arg(
        long,
        conflicts_with = "no_expiry",
        value_parser = clap::value_parser!(u32).range(1..=36500),
    )]
    pub valid_days: Option<u32>,

    // --- Output ---
    /// Output format.
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Emit `$n` placeholders and list bound values instead of inline literals.
    #[arg(long, default_value_t = false)]
    pub parameterized: bool,
}

/// Arguments for the `check` subcommand.
#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// The key to check.
    pub key: String,

    /// Expected number of segments (default: configured value).
    #[arg(long)]
    pub segments: Option<usize>,

    /// Expected characters per segment (default: configured value).
    #[arg(long)]
    pub segment_length: Option<usize>,
}

impl GenerateArgs {
    /// Combine CLI flags with the loaded config. Flags win.
    pub fn to_request(&self, config: &Config) -> Result<IssueRequest, KeyError> {
        let shape = config.key_shape(self.segments, self.segment_length)?;

        let expires_at = if self.no_expiry {
            Expiry::Never
        } else {
            Expiry::from_option(self.expires_at.clone())
        };

        Ok(IssueRequest {
            shape,
            count: self.count as usize,
            user_id: self.user_id.clone().unwrap_or_else(|| config.license.user_id.clone()),
            plan: self.plan.clone().unwrap_or_else(|| config.license.plan.clone()),
            is_active: self.is_active(config),
            expires_at,
            valid_days: self.valid_days.unwrap_or(config.license.valid_days),
            parameterized: self.parameterized || config.output.parameterized,
        })
    }

    /// `--active` / `--inactive` win over the configured value.
    fn is_active(&self, config: &Config) -> bool {
        if self.active {
            true
        } else if self.inactive {
            false
        } else {
            config.license.is_active
        }
    }

    /// Output format, falling back to the configured one.
    pub fn output_format(&self, config: &Config) -> OutputFormat {
        self.format.unwrap_or(config.output.format)
    }
}

impl CheckArgs {
    /// Expected shape, falling back to the configured one.
    pub fn shape(&self, config: &Config) -> Result<KeyShape, KeyError> {
        config.key_shape(self.segments, self.segment_length)
    }
}
