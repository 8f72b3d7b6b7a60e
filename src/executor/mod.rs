mod models;
#[cfg(feature = "cli")]
mod printer;
mod runner;
mod writer;

pub use models::{ExecutionOptions, ReportRecord};
#[cfg(feature = "cli")]
pub use printer::{print_iteration_failure, print_report_written, print_run_summary};
pub use runner::{execute_request, ReqwestTransport, Transport};
pub use writer::{write_report, write_report_record};
