use crate::decoder::decode_body;
use crate::request::{HttpMethod, RequestConfig};
use crate::response::{ExecutionResult, classify_body};
use crate::utils::{browser_entry_order, coerce_to_string};

use anyhow::{Context, Result, anyhow};
use reqwest::{
    Certificate, Client, Request, Url,
    header::{CONTENT_ENCODING, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
};
use serde_json::Value;
use std::fmt::Debug;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const DEFAULT_BODY_CONTENT_TYPE: &str = "text/plain;charset=UTF-8";

pub trait HttpConnectionProfile {
    fn timeout(&self) -> Option<Duration>;
    fn insecure(&self) -> bool;
    fn ca_cert(&self) -> Option<&String>;
}

/// A request whose JSON panes have been parsed and validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

fn parse_pane(text: &str, name: &str) -> Result<Value> {
    let text = if text.is_empty() { "{}" } else { text };
    serde_json::from_str(text).map_err(|_| anyhow!("Invalid JSON in {name}"))
}

fn param_entries(value: Value) -> Result<Vec<(String, String)>> {
    match value {
        Value::Object(map) => Ok(browser_entry_order(
            map.into_iter()
                .map(|(key, value)| (key, coerce_to_string(&value)))
                .collect(),
        )),
        Value::Array(items) => Ok(items
            .iter()
            .enumerate()
            .map(|(index, value)| (index.to_string(), coerce_to_string(value)))
            .collect()),
        Value::Null => Err(anyhow!("Params must be a JSON object")),
        _ => Ok(Vec::new()),
    }
}

fn header_entries(value: Value) -> Result<Vec<(String, String)>> {
    match value {
        Value::Object(map) => Ok(browser_entry_order(
            map.into_iter()
                .map(|(key, value)| (key, coerce_to_string(&value)))
                .collect(),
        )),
        Value::Null => Ok(Vec::new()),
        _ => Err(anyhow!("Headers must be a JSON object")),
    }
}

/// Parses and validates a config without touching the network.
///
/// Params are checked first, then headers, then the URL, then the body.
/// The body is only looked at for methods that send one, and it is kept as
/// the exact text the user typed.
pub fn prepare_request(config: &RequestConfig) -> Result<PreparedRequest> {
    let params = param_entries(parse_pane(&config.params, "Params")?)?;
    let headers = header_entries(parse_pane(&config.headers, "Headers")?)?;

    let mut url =
        Url::parse(&config.url).map_err(|e| anyhow!("Invalid URL '{}': {e}", config.url))?;
    if !params.is_empty() {
        let mut query = url.query_pairs_mut();
        for (key, value) in &params {
            query.append_pair(key, value);
        }
    }

    let body = if config.method.sends_body() {
        serde_json::from_str::<Value>(&config.body)
            .map_err(|_| anyhow!("Invalid JSON in Body"))?;
        Some(config.body.clone())
    } else {
        None
    };

    Ok(PreparedRequest {
        method: config.method,
        url,
        headers,
        body,
    })
}

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("client", &"Client")
            .finish()
    }
}

impl HttpClient {
    pub fn new(profile: &impl HttpConnectionProfile) -> Result<Self> {
        let client = Self::build_client(profile)?;
        Ok(HttpClient { client })
    }

    /// Runs one request. Never fails: every error becomes a `status = 0` result.
    pub async fn execute(&self, config: &RequestConfig) -> ExecutionResult {
        match self.try_execute(config).await {
            Ok(result) => result,
            Err(e) => {
                warn!(url = %config.url, method = %config.method, "request failed: {e}");
                ExecutionResult::failure(&e.to_string())
            }
        }
    }

    async fn try_execute(&self, config: &RequestConfig) -> Result<ExecutionResult> {
        let prepared = prepare_request(config)?;
        debug!(method = %prepared.method, url = %prepared.url, "sending request");

        let started = Instant::now();
        let req = self.build_request(prepared)?;
        let res = self.client.execute(req).await?;

        let status = res.status();
        let headers = res.headers().clone();
        let body_bytes = res.bytes().await?;
        let duration_ms = (started.elapsed().as_secs_f64() * 1000.0).round() as u64;

        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        let content_encoding = headers
            .get(CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok());
        let text = decode_body(body_bytes, content_encoding, content_type)?;
        let (content_kind, data) = classify_body(text, content_type);

        debug!(
            status = status.as_u16(),
            duration_ms,
            kind = %content_kind,
            "received response"
        );

        Ok(ExecutionResult {
            status: status.as_u16(),
            data,
            duration_ms,
            content_kind,
        })
    }

    fn build_request(&self, prepared: PreparedRequest) -> Result<Request> {
        let mut headers = HeaderMap::new();
        for (key, value) in &prepared.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|_| anyhow!("Invalid header name: {key}"))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| anyhow!("Invalid value for header {key}"))?;
            headers.append(name, value);
        }

        let mut req_builder = self.client.request(prepared.method.into(), prepared.url);

        if let Some(body) = prepared.body {
            if !headers.contains_key(CONTENT_TYPE) {
                headers.insert(
                    CONTENT_TYPE,
                    HeaderValue::from_static(DEFAULT_BODY_CONTENT_TYPE),
                );
            }
            req_builder = req_builder.body(body);
        }

        Ok(req_builder.headers(headers).build()?)
    }

    fn build_client(profile: &impl HttpConnectionProfile) -> Result<Client> {
        let mut cli_builder = Client::builder().danger_accept_invalid_certs(profile.insecure());

        if let Some(timeout) = profile.timeout() {
            cli_builder = cli_builder.timeout(timeout);
        }

        if let Some(ca_cert) = profile.ca_cert() {
            let ca_cert = shellexpand::tilde(&ca_cert).to_string();
            let pem = std::fs::read(&ca_cert)
                .with_context(|| format!("Failed to read CA certificate: {ca_cert}"))?;
            let cert = Certificate::from_pem(&pem)
                .with_context(|| format!("Invalid CA certificate: {ca_cert}"))?;
            cli_builder = cli_builder.add_root_certificate(cert);
        }

        Ok(cli_builder.build()?)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn config(method: HttpMethod) -> RequestConfig {
        RequestConfig {
            url: "https://api.example.com/v1/ping".to_string(),
            method,
            headers: "{}".to_string(),
            params: "{}".to_string(),
            body: "{}".to_string(),
        }
    }

    fn error_of(config: &RequestConfig) -> String {
        prepare_request(config).unwrap_err().to_string()
    }

    #[test]
    fn prepare_should_append_params_in_order() {
        let mut c = config(HttpMethod::Get);
        c.params = "{\"page\": 1, \"sort\": \"desc\", \"flag\": true}".to_string();
        let prepared = prepare_request(&c).unwrap();
        assert_eq!(prepared.url.query(), Some("page=1&sort=desc&flag=true"));
    }

    #[test]
    fn prepare_should_enumerate_params_like_a_browser() {
        let mut c = config(HttpMethod::Get);
        c.params = "{\"b\": 1, \"10\": 2, \"2\": 3, \"f\": 1.0}".to_string();
        let prepared = prepare_request(&c).unwrap();
        assert_eq!(prepared.url.query(), Some("2=3&10=2&b=1&f=1"));
    }

    #[test]
    fn prepare_should_append_to_existing_query() {
        let mut c = config(HttpMethod::Get);
        c.url = "https://api.example.com/search?q=a".to_string();
        c.params = "{\"q\": \"b c\"}".to_string();
        let prepared = prepare_request(&c).unwrap();
        let pairs: Vec<(String, String)> = prepared
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), "a".to_string()),
                ("q".to_string(), "b c".to_string())
            ]
        );
    }

    #[test]
    fn prepare_without_params_leaves_url_untouched() {
        let prepared = prepare_request(&config(HttpMethod::Get)).unwrap();
        assert_eq!(prepared.url.as_str(), "https://api.example.com/v1/ping");
    }

    #[test]
    fn prepare_treats_empty_panes_as_empty_objects() {
        let mut c = config(HttpMethod::Get);
        c.params = String::new();
        c.headers = String::new();
        let prepared = prepare_request(&c).unwrap();
        assert!(prepared.headers.is_empty());
        assert_eq!(prepared.url.query(), None);
    }

    #[test]
    fn prepare_should_name_the_offending_pane() {
        let mut c = config(HttpMethod::Post);
        c.params = "{".to_string();
        assert_eq!(error_of(&c), "Invalid JSON in Params");

        let mut c = config(HttpMethod::Post);
        c.headers = "nope".to_string();
        assert_eq!(error_of(&c), "Invalid JSON in Headers");

        let mut c = config(HttpMethod::Post);
        c.body = "not-json".to_string();
        assert_eq!(error_of(&c), "Invalid JSON in Body");
    }

    #[test]
    fn params_are_checked_before_headers() {
        let mut c = config(HttpMethod::Get);
        c.params = "{".to_string();
        c.headers = "{".to_string();
        assert_eq!(error_of(&c), "Invalid JSON in Params");
    }

    #[test]
    fn get_and_head_never_look_at_the_body() {
        for method in [HttpMethod::Get, HttpMethod::Head] {
            let mut c = config(method);
            c.body = "not-json".to_string();
            let prepared = prepare_request(&c).unwrap();
            assert_eq!(prepared.body, None);
        }
    }

    #[test]
    fn body_is_sent_verbatim() {
        let mut c = config(HttpMethod::Put);
        c.body = "{ \"a\" :   1 }\n".to_string();
        let prepared = prepare_request(&c).unwrap();
        assert_eq!(prepared.body.as_deref(), Some("{ \"a\" :   1 }\n"));
    }

    #[test]
    fn empty_body_is_invalid_for_post() {
        let mut c = config(HttpMethod::Post);
        c.body = String::new();
        assert_eq!(error_of(&c), "Invalid JSON in Body");
    }

    #[test]
    fn headers_values_are_coerced() {
        let mut c = config(HttpMethod::Get);
        c.headers = "{\"X-Count\": 3, \"X-Name\": \"abc\"}".to_string();
        let prepared = prepare_request(&c).unwrap();
        assert_eq!(
            prepared.headers,
            vec![
                ("X-Count".to_string(), "3".to_string()),
                ("X-Name".to_string(), "abc".to_string())
            ]
        );
    }

    #[test]
    fn non_object_panes_are_rejected() {
        let mut c = config(HttpMethod::Get);
        c.headers = "[1, 2]".to_string();
        assert_eq!(error_of(&c), "Headers must be a JSON object");

        let mut c = config(HttpMethod::Get);
        c.params = "null".to_string();
        assert_eq!(error_of(&c), "Params must be a JSON object");
    }

    #[test]
    fn invalid_url_is_reported() {
        let mut c = config(HttpMethod::Get);
        c.url = "/relative/path".to_string();
        assert!(error_of(&c).starts_with("Invalid URL '/relative/path'"));
    }
}
