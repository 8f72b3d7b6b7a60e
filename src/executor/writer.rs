use std::{
    ffi::OsString,
    fs::{File, OpenOptions},
    io::{self, BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

use chrono::Utc;
use hyper::ext::ReasonPhrase;
use reqwest::Response;
use tracing::debug;

use crate::error::ReplayError;
use crate::parser::RequestDescription;

use super::models::ReportRecord;

/// Drains `response` and writes the exchange to
/// `<prefix>|<unix seconds>-status:<code>.txt`.
///
/// A name already taken gets a `-<n>` suffix before the extension.
pub async fn write_report(
    prefix: &Path,
    request: &RequestDescription,
    response: Response,
) -> Result<PathBuf, ReplayError> {
    let status = response.status();
    let reason = response
        .extensions()
        .get::<ReasonPhrase>()
        .map(|reason| String::from_utf8_lossy(reason.as_bytes()).into_owned());
    let body = response
        .bytes()
        .await
        .map_err(ReplayError::ResponseRead)?
        .to_vec();

    let record = ReportRecord {
        request,
        status,
        reason,
        body,
    };
    write_report_record(prefix, &record, Utc::now().timestamp())
}

pub fn write_report_record(
    prefix: &Path,
    record: &ReportRecord<'_>,
    timestamp: i64,
) -> Result<PathBuf, ReplayError> {
    let (path, file) = create_report_file(prefix, timestamp, record.status.as_u16())?;

    let mut writer = BufWriter::new(file);
    render_report(record, &mut writer)
        .and_then(|_| writer.flush())
        .map_err(|source| ReplayError::FileWrite {
            path: path.clone(),
            source,
        })?;

    debug!(path = %path.display(), body_bytes = record.body.len(), "wrote report");
    Ok(path)
}

pub(super) fn report_path(prefix: &Path, timestamp: i64, status: u16, sequence: u32) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(format!("|{timestamp}-status:{status}"));
    if sequence > 0 {
        name.push(format!("-{sequence}"));
    }
    name.push(".txt");
    PathBuf::from(name)
}

fn create_report_file(
    prefix: &Path,
    timestamp: i64,
    status: u16,
) -> Result<(PathBuf, File), ReplayError> {
    let mut sequence = 0;
    loop {
        let path = report_path(prefix, timestamp, status, sequence);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                debug!(path = %path.display(), "report name taken, trying next suffix");
                sequence += 1;
            }
            Err(source) => return Err(ReplayError::FileWrite { path, source }),
        }
    }
}

fn render_report(record: &ReportRecord<'_>, out: &mut impl Write) -> io::Result<()> {
    let request = record.request;
    write!(
        out,
        "Request Method: {}\nRequest URL: {}\n\n",
        request.method, request.url
    )?;

    writeln!(out, "Request Headers:")?;
    for (name, value) in request.headers.iter() {
        writeln!(out, "{name}: {value}")?;
    }

    write!(out, "\nRequest Body:\n{}\n\n", request.body)?;

    write!(
        out,
        "Response Status: {}\nResponse Body:\n",
        record.status_line()
    )?;
    out.write_all(&record.body)?;
    writeln!(out)
}
