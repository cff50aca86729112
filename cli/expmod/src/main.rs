//! expmod: describe the direct dependencies of a Go module.

mod commands;
mod input;
mod logging;
mod settings;

use std::future::Future;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::info;

use expmod_core::CACHE_ENV_KEY;
use input::ManifestSource;
use settings::{Settings, TOKEN_ENV_KEY};

/// Exit status after Ctrl-C.
const INTERRUPTED: i32 = 130;

#[derive(Parser)]
#[command(
    name = "expmod",
    version,
    about = "Print a short description of each direct dependency in a go.mod"
)]
struct Cli {
    /// go.mod file or http(s) URL; `-` or nothing reads stdin
    #[arg(value_name = "FILE|URL|-")]
    input: Option<String>,
    /// Empty the description cache and exit
    #[arg(long)]
    clear_cache: bool,
    /// Ask the package index when the discovery page doesn't name a repository
    #[arg(long)]
    index_fallback: bool,
    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,
    /// Concurrent lookups
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    jobs: Option<u64>,
    /// Settings file
    #[arg(long, value_name = "PATH", env = "EXPMOD_CONFIG")]
    config: Option<PathBuf>,
    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let code = run_until_interrupted(run(cli), tokio::signal::ctrl_c()).await;
    if code != 0 {
        process::exit(code);
    }
}

/// Drive `work` to completion unless `interrupt` fires first. A failed
/// signal registration leaves `work` running.
async fn run_until_interrupted<W, I>(work: W, interrupt: I) -> i32
where
    W: Future<Output = anyhow::Result<()>>,
    I: Future<Output = std::io::Result<()>>,
{
    tokio::select! {
        result = work => exit_code(result),
        Ok(()) = interrupt => {
            eprintln!("interrupted");
            INTERRUPTED
        }
    }
}

fn exit_code(result: anyhow::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("error: {e:#}");
            1
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = resolve_settings(&cli)?;

    if cli.clear_cache {
        let path = commands::cache_path(&settings)?;
        return commands::cache::clear(&path, &mut std::io::stdout().lock());
    }

    let source = ManifestSource::from_arg(cli.input.as_deref())?;
    let summary = commands::describe::run(
        &settings,
        &source,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    )
    .await?;
    info!(
        described = summary.described,
        failed = summary.failed,
        "done"
    );
    Ok(())
}

/// Defaults, then the settings file, then the environment, then flags.
fn resolve_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let mut settings = Settings::discover(cli.config.as_deref())?;
    settings.apply_env(
        std::env::var_os(CACHE_ENV_KEY),
        std::env::var(TOKEN_ENV_KEY).ok(),
    );
    if cli.index_fallback {
        settings.index_fallback = true;
    }
    if let Some(secs) = cli.timeout {
        settings.timeout_secs = secs;
    }
    if let Some(jobs) = cli.jobs {
        settings.concurrency = usize::try_from(jobs)?;
    }
    Ok(settings)
}
