use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use tracing::debug;

use crate::error::ReplayError;

use super::model::{RequestDescription, RequestHeaders};

const HEADER_SEPARATOR: &str = ": ";

pub fn parse_request_file(path: &Path) -> Result<RequestDescription, ReplayError> {
    let read_error = |source: io::Error| ReplayError::FileRead {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(read_error)?;
    let lines = BufReader::new(file)
        .lines()
        .map(|line| line.map_err(read_error));
    let request = parse_lines(lines)?;

    debug!(
        path = %path.display(),
        method = %request.method,
        url = %request.url,
        headers = request.headers.len(),
        body_bytes = request.body.len(),
        "parsed request file"
    );
    Ok(request)
}

pub fn parse_request_contents(contents: &str) -> Result<RequestDescription, ReplayError> {
    parse_lines(contents.lines().map(|line| Ok(line.to_string())))
}

fn parse_lines<I>(mut lines: I) -> Result<RequestDescription, ReplayError>
where
    I: Iterator<Item = Result<String, ReplayError>>,
{
    let request_line = lines.next().transpose()?.unwrap_or_default();
    let Some((method, url)) = request_line.split_once(' ') else {
        return Err(ReplayError::MalformedRequestLine {
            line: request_line.clone(),
        });
    };
    let (method, url) = (method.to_string(), url.to_string());

    let mut headers = RequestHeaders::new();
    for line in lines.by_ref() {
        let line = line?;
        if line.is_empty() {
            break;
        }
        match line.split_once(HEADER_SEPARATOR) {
            Some((name, value)) => headers.insert(name, value),
            None => debug!(line = %line, "skipping header line without separator"),
        }
    }

    let body = lines.collect::<Result<Vec<_>, _>>()?.join("\n");

    Ok(RequestDescription {
        method,
        url,
        headers,
        body,
    })
}
