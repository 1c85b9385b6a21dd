use crate::http::HttpConnectionProfile;
use crate::request::{RequestConfig, Side};

use anyhow::{Context, Result};
use ini::{Ini, ParseOption, Properties};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_INI_FILE_PATH: &str = "~/.abcompare";

const SECTION_CLIENT: &str = "client";
const SECTION_A: &str = "a";
const SECTION_B: &str = "b";

const INI_TIMEOUT: &str = "timeout";
const INI_INSECURE: &str = "insecure";
const INI_CA_CERT: &str = "ca_cert";
const INI_METHOD: &str = "method";
const INI_URL: &str = "url";
const INI_HEADERS: &str = "headers";
const INI_PARAMS: &str = "params";
const INI_BODY: &str = "body";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientProfile {
    timeout: Option<Duration>,
    insecure: bool,
    ca_cert: Option<String>,
}

impl ClientProfile {
    pub fn new(timeout: Option<Duration>, insecure: bool, ca_cert: Option<String>) -> Self {
        ClientProfile {
            timeout,
            insecure,
            ca_cert,
        }
    }
}

impl HttpConnectionProfile for ClientProfile {
    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn insecure(&self) -> bool {
        self.insecure
    }

    fn ca_cert(&self) -> Option<&String> {
        self.ca_cert.as_ref()
    }
}

/// Everything a config file can provide. Missing pieces fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniFile {
    pub client: ClientProfile,
    pub config_a: RequestConfig,
    pub config_b: RequestConfig,
}

impl Default for IniFile {
    fn default() -> Self {
        IniFile {
            client: ClientProfile::default(),
            config_a: RequestConfig::default_for(Side::A),
            config_b: RequestConfig::default_for(Side::B),
        }
    }
}

fn try_get<T>(section: &Properties, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    section
        .get(key)
        .map(|s| {
            s.trim()
                .parse::<T>()
                .map_err(|e| anyhow::anyhow!("Invalid value for '{key}': {e}"))
        })
        .transpose()
}

fn load_request(section: Option<&Properties>, side: Side) -> Result<RequestConfig> {
    let mut config = RequestConfig::default_for(side);
    let Some(section) = section else {
        return Ok(config);
    };

    if let Some(method) = try_get(section, INI_METHOD)? {
        config.method = method;
    }
    if let Some(url) = section.get(INI_URL) {
        config.url = url.trim().to_string();
    }
    if let Some(headers) = section.get(INI_HEADERS) {
        config.headers = headers.to_string();
    }
    if let Some(params) = section.get(INI_PARAMS) {
        config.params = params.to_string();
    }
    if let Some(body) = section.get(INI_BODY) {
        config.body = body.to_string();
    }
    Ok(config)
}

impl IniFile {
    /// Loads `file_path` (with `~` expanded). A missing file yields the defaults.
    pub fn load(file_path: &str) -> Result<IniFile> {
        let extended_path = shellexpand::tilde(file_path).to_string();
        if !Path::new(&extended_path).exists() {
            debug!("config file not found: {}", &extended_path);
            return Ok(IniFile::default());
        }

        // JSON values must survive untouched, so no quote or escape handling.
        let opt = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_file_opt(&extended_path, opt)
            .with_context(|| format!("Failed to read config file: {extended_path}"))?;

        Self::from_ini(&ini).with_context(|| format!("Invalid config file: {extended_path}"))
    }

    fn from_ini(ini: &Ini) -> Result<IniFile> {
        let client = match ini.section(Some(SECTION_CLIENT)) {
            Some(section) => ClientProfile {
                timeout: try_get::<u64>(section, INI_TIMEOUT)?.map(Duration::from_secs),
                insecure: try_get::<bool>(section, INI_INSECURE)?.unwrap_or(false),
                ca_cert: section.get(INI_CA_CERT).map(|s| s.trim().to_string()),
            },
            None => ClientProfile::default(),
        };

        Ok(IniFile {
            client,
            config_a: load_request(ini.section(Some(SECTION_A)), Side::A)?,
            config_b: load_request(ini.section(Some(SECTION_B)), Side::B)?,
        })
    }
}
