//! keymint: license key generator CLI.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use keymint::clock::SystemClock;
use keymint::config::Config;
use keymint::constants;
use keymint::env::Env;
use keymint::issue;
use keymint::key::LicenseKey;

use std::process;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::debug;

use cli::args::{CheckArgs, Cli, Command, GenerateArgs};

fn main() {
    if let Err(err) = run() {
        use colored::Colorize;
        eprintln!("{} {err:#}", "Error:".red().bold());
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let env = Env::real();
    init_tracing(cli.verbose, &env);

    let work_dir = std::env::current_dir().ok();
    let config = Config::load(work_dir.as_deref(), &env).context("failed to load configuration")?;
    debug!(?config, "effective configuration");

    match cli.command {
        None => run_generate(&cli.generate, &config),
        Some(Command::Check(args)) => run_check(&args, &config),
        Some(Command::Version) => run_version(),
    }
}

/// Send logs to stderr so stdout carries only keys and SQL.
///
/// `KEYMINT_LOG`, then `RUST_LOG`, take precedence over `--verbose`.
fn init_tracing(verbose: bool, env: &Env) {
    use tracing_subscriber::EnvFilter;

    let fallback = if verbose { "keymint=debug" } else { "warn" };
    let filter = env
        .var(constants::ENV_LOG)
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Generate keys and print them with their `INSERT` statements.
fn run_generate(args: &GenerateArgs, config: &Config) -> Result<()> {
    let request = args.to_request(config).context("invalid key parameters")?;
    let issued = issue::issue_keys(&request, &mut rand::rngs::OsRng, &SystemClock)
        .context("failed to build SQL statement")?;

    print!("{}", args.output_format(config).render(&issued));
    Ok(())
}

/// Check a key against the expected shape.
fn run_check(args: &CheckArgs, config: &Config) -> Result<()> {
    let shape = args.shape(config).context("invalid key parameters")?;
    let result = LicenseKey::parse(args.key.trim(), shape);
    cli::print_check(args.key.trim(), shape, &result);

    if result.is_err() {
        bail!("key does not match the {shape} layout");
    }
    Ok(())
}

/// Print version information.
fn run_version() -> Result<()> {
    use colored::Colorize;

    println!(
        "{} {}",
        constants::APP_NAME.bold(),
        constants::VERSION.green().bold()
    );
    Ok(())
}
