use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::RunSettings;
use crate::error::ReplayError;
use crate::executor::{write_report, ReqwestTransport, Transport};
use crate::parser::{parse_request_file, RequestDescription};

#[derive(Debug)]
pub struct IterationFailure {
    /// 1-based iteration number.
    pub iteration: u32,
    pub error: ReplayError,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<PathBuf>,
    pub failures: Vec<IterationFailure>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Parses the request file once and replays it `settings.retry` times.
///
/// Errors only when the request file cannot be parsed or the HTTP client
/// cannot be built; per-iteration failures are collected in the summary.
pub async fn run(
    settings: &RunSettings,
    on_report: impl FnMut(u32, &Path),
) -> Result<RunSummary, ReplayError> {
    let request = parse_request_file(&settings.source)?;
    let transport = ReqwestTransport::new(&settings.execution_options())?;
    Ok(run_iterations(&transport, &request, settings, on_report).await)
}

/// Without `keep_going` the first failed iteration ends the run and no later
/// iteration is attempted.
pub async fn run_iterations<T: Transport>(
    transport: &T,
    request: &RequestDescription,
    settings: &RunSettings,
    mut on_report: impl FnMut(u32, &Path),
) -> RunSummary {
    let mut summary = RunSummary::default();

    for iteration in 1..=settings.retry {
        debug!(iteration, total = settings.retry, "starting iteration");
        match replay_once(transport, request, &settings.output).await {
            Ok(path) => {
                info!(iteration, path = %path.display(), "report written");
                on_report(iteration, &path);
                summary.reports.push(path);
            }
            Err(error) => {
                debug!(iteration, %error, "iteration failed");
                summary.failures.push(IterationFailure { iteration, error });
                if !settings.keep_going {
                    break;
                }
            }
        }

        if !settings.sleep.is_zero() {
            debug!(seconds = settings.sleep.as_secs(), "sleeping");
            tokio::time::sleep(settings.sleep).await;
        }
    }

    summary
}

async fn replay_once<T: Transport>(
    transport: &T,
    request: &RequestDescription,
    output: &Path,
) -> Result<PathBuf, ReplayError> {
    let response = transport.send(request).await?;
    write_report(output, request, response).await
}
