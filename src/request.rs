use anyhow::{Result, anyhow};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

pub const DEFAULT_URL_A: &str = "http://localhost:8000/api/v1/";
pub const DEFAULT_URL_B: &str = "http://localhost:8000/api/v2/";
pub const DEFAULT_PARAMS: &str = "{}";
pub const DEFAULT_BODY: &str = "{}";

pub fn default_headers() -> String {
    "{\n  \"Content-Type\": \"application/json\",\n  \"Authorization\": \"Bearer \"\n}".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Head,
    Patch,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 6] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Head,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// GET and HEAD never carry a request body.
    pub fn sends_body(&self) -> bool {
        !matches!(self, HttpMethod::Get | HttpMethod::Head)
    }
}

impl FromStr for HttpMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow!("Unsupported method: {s}"))
    }
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Patch => reqwest::Method::PATCH,
        }
    }
}

/// Which of the two compared requests a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn label(&self) -> &'static str {
        match self {
            Side::A => "Original Server",
            Side::B => "Other Server",
        }
    }
}

impl FromStr for Side {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" => Ok(Side::A),
            "b" => Ok(Side::B),
            _ => Err(anyhow!("Unknown side '{s}', expected 'a' or 'b'")),
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

/// The three free-text JSON panes of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonPane {
    Params,
    Headers,
    Body,
}

impl JsonPane {
    pub fn name(&self) -> &'static str {
        match self {
            JsonPane::Params => "Params",
            JsonPane::Headers => "Headers",
            JsonPane::Body => "Body",
        }
    }
}

impl FromStr for JsonPane {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "params" => Ok(JsonPane::Params),
            "headers" => Ok(JsonPane::Headers),
            "body" => Ok(JsonPane::Body),
            _ => Err(anyhow!("Unknown pane '{s}', expected params, headers or body")),
        }
    }
}

/// One outbound HTTP call as the user typed it.
///
/// `headers`, `params` and `body` hold raw text and are only parsed when the
/// request is executed, so editing never fails on malformed JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig {
    pub url: String,
    pub method: HttpMethod,
    pub headers: String,
    pub params: String,
    pub body: String,
}

impl RequestConfig {
    pub fn new(url: impl Into<String>) -> Self {
        RequestConfig {
            url: url.into(),
            method: HttpMethod::Get,
            headers: default_headers(),
            params: DEFAULT_PARAMS.to_string(),
            body: DEFAULT_BODY.to_string(),
        }
    }

    pub fn default_for(side: Side) -> Self {
        match side {
            Side::A => RequestConfig::new(DEFAULT_URL_A),
            Side::B => RequestConfig::new(DEFAULT_URL_B),
        }
    }

    pub fn pane(&self, pane: JsonPane) -> &str {
        match pane {
            JsonPane::Params => &self.params,
            JsonPane::Headers => &self.headers,
            JsonPane::Body => &self.body,
        }
    }

    pub fn pane_mut(&mut self, pane: JsonPane) -> &mut String {
        match pane {
            JsonPane::Params => &mut self.params,
            JsonPane::Headers => &mut self.headers,
            JsonPane::Body => &mut self.body,
        }
    }
}
