use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client, Method, Response, Url,
};
use tracing::debug;

use crate::error::ReplayError;
use crate::parser::{RequestDescription, RequestHeaders};

use super::models::ExecutionOptions;

/// Sends a parsed request somewhere and hands back the undrained response.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: &RequestDescription) -> Result<Response, ReplayError>;
}

/// [`Transport`] backed by a shared reqwest client.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(options: &ExecutionOptions) -> Result<Self, ReplayError> {
        let mut builder = Client::builder();
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ReplayError::RequestConstruction(format!("creating HTTP client: {err}")))?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: &RequestDescription) -> Result<Response, ReplayError> {
        execute_request(&self.client, request).await
    }
}

pub async fn execute_request(
    client: &Client,
    request: &RequestDescription,
) -> Result<Response, ReplayError> {
    let method = Method::from_bytes(request.method.as_bytes()).map_err(|_| {
        ReplayError::RequestConstruction(format!("invalid HTTP method {:?}", request.method))
    })?;
    let url = Url::parse(&request.url).map_err(|err| {
        ReplayError::RequestConstruction(format!("invalid URL {:?}: {err}", request.url))
    })?;
    let headers = build_headers(&request.headers)?;

    debug!(%method, %url, headers = headers.len(), "sending request");
    let response = client
        .request(method, url)
        .headers(headers)
        .body(request.body.clone())
        .send()
        .await
        .map_err(ReplayError::Network)?;
    debug!(status = %response.status(), "received response");

    Ok(response)
}

fn build_headers(headers: &RequestHeaders) -> Result<HeaderMap, ReplayError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
            ReplayError::RequestConstruction(format!("invalid header name {name:?}"))
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|_| {
            ReplayError::RequestConstruction(format!("invalid value for header {name}"))
        })?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_request_contents;
    use httpmock::prelude::*;

    #[test]
    fn build_headers_lets_last_case_insensitive_duplicate_win() {
        let headers: RequestHeaders = [("X-Token", "first"), ("x-token", "second"), ("Accept", "*/*")]
            .into_iter()
            .collect();

        let map = build_headers(&headers).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("x-token").unwrap(), "second");
        assert_eq!(map.get("accept").unwrap(), "*/*");
    }

    #[test]
    fn build_headers_rejects_invalid_names() {
        let headers: RequestHeaders = [("Bad Header", "x")].into_iter().collect();
        let err = build_headers(&headers).unwrap_err();
        assert!(matches!(err, ReplayError::RequestConstruction(_)));
        assert!(err.to_string().contains("Bad Header"));
    }

    #[tokio::test]
    async fn execute_request_sends_method_headers_and_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/items")
                    .query_param("q", "1")
                    .header("x-token", "abc")
                    .body("hello\nworld");
                then.status(201).body("created");
            })
            .await;

        let request = parse_request_contents(&format!(
            "POST {}\nX-Token: abc\n\nhello\nworld",
            server.url("/items?q=1")
        ))
        .unwrap();

        let response = execute_request(&Client::new(), &request).await.unwrap();
        assert_eq!(response.status().as_u16(), 201);
        assert_eq!(response.text().await.unwrap(), "created");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn execute_request_rejects_malformed_url() {
        let request = parse_request_contents("GET not a url").unwrap();
        let err = execute_request(&Client::new(), &request).await.unwrap_err();
        assert!(matches!(err, ReplayError::RequestConstruction(_)));
    }

    #[tokio::test]
    async fn execute_request_rejects_empty_method() {
        let request = parse_request_contents(" http://localhost/").unwrap();
        let err = execute_request(&Client::new(), &request).await.unwrap_err();
        assert!(matches!(err, ReplayError::RequestConstruction(_)));
    }

    #[tokio::test]
    async fn execute_request_surfaces_connection_failures() {
        let request = parse_request_contents("GET http://127.0.0.1:1/").unwrap();
        let err = execute_request(&Client::new(), &request).await.unwrap_err();
        assert!(matches!(err, ReplayError::Network(_)));
    }

    #[tokio::test]
    async fn transport_applies_configured_timeout() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.path("/slow");
                then.status(200).delay(std::time::Duration::from_secs(2));
            })
            .await;

        let transport = ReqwestTransport::new(&ExecutionOptions {
            timeout: Some(std::time::Duration::from_millis(100)),
        })
        .unwrap();
        let request = parse_request_contents(&format!("GET {}", server.url("/slow"))).unwrap();

        let err = transport.send(&request).await.unwrap_err();
        assert!(matches!(err, ReplayError::Network(ref source) if source.is_timeout()));
    }
}
