use std::{ffi::OsString, path::PathBuf, process::ExitCode};

use anyhow::{bail, Context, Result};
use clap::Parser;
use httpreplay::config::{load_config, RunSettings, SettingsError, SettingsOverrides};
use httpreplay::driver::run;
use httpreplay::executor::{print_iteration_failure, print_report_written, print_run_summary};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: httpreplay -source <path> -output <path> [-retry <n>] [-sleep <seconds>]";

/// Long flags that may also be spelled with a single dash, e.g. `-source=req.http`.
const SINGLE_DASH_FLAGS: &[&str] = &[
    "source",
    "output",
    "retry",
    "sleep",
    "timeout",
    "config",
    "keep-going",
];

#[derive(Parser, Debug)]
#[command(
    name = "httpreplay",
    version,
    about = "Replay an HTTP request file and write a report per attempt"
)]
struct Cli {
    /// Request file to replay
    #[arg(long, value_name = "PATH")]
    source: Option<PathBuf>,

    /// Prefix for report file names
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Number of send+report iterations (0 means 1)
    #[arg(long, env = "HTTPREPLAY_RETRY")]
    retry: Option<u32>,

    /// Seconds to sleep after every iteration
    #[arg(long, env = "HTTPREPLAY_SLEEP")]
    sleep: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long, env = "HTTPREPLAY_TIMEOUT")]
    timeout: Option<u64>,

    /// Continue with the next iteration after a failure
    #[arg(long)]
    keep_going: bool,

    /// Defaults file (httpreplay.json) or the directory containing it
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse_from(normalize_flags(std::env::args_os()));

    match replay(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn replay(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => match load_config(path)? {
            Some(loaded) => Some(loaded),
            None => bail!("config file {} not found", path.display()),
        },
        None => load_config(&std::env::current_dir()?)?,
    };

    let overrides = SettingsOverrides {
        source: cli.source,
        output: cli.output,
        retry: cli.retry,
        sleep: cli.sleep,
        timeout: cli.timeout,
        keep_going: cli.keep_going,
    };
    let settings = match RunSettings::resolve(overrides, config.as_ref()) {
        Ok(settings) => settings,
        Err(SettingsError::Missing(flag)) => {
            eprintln!("missing --{flag}");
            println!("{USAGE}");
            return Ok(ExitCode::from(2));
        }
    };

    let summary = run(&settings, print_report_written)
        .await
        .with_context(|| format!("replaying {}", settings.source.display()))?;

    for failure in &summary.failures {
        print_iteration_failure(failure);
    }
    print_run_summary(&summary);

    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Rewrites `-source`/`-source=x` style flags to their `--` form for clap.
fn normalize_flags(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| {
            let Some(text) = arg.to_str() else {
                return arg;
            };
            let Some(rest) = text.strip_prefix('-') else {
                return arg;
            };
            if rest.starts_with('-') {
                return arg;
            }
            let name = rest.split_once('=').map_or(rest, |(name, _)| name);
            if SINGLE_DASH_FLAGS.contains(&name) {
                OsString::from(format!("-{text}"))
            } else {
                arg
            }
        })
        .collect()
}
