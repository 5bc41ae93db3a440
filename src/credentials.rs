//! Credential loading
//!
//! Credentials are the HTTP headers (cookie, tenant alias, authorization)
//! replayed on every Booking Service call. They are read once from a
//! `Name: value` text file and stay immutable for the loop's lifetime.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::config::CredentialsConfig;
use crate::error::{Result, SlotwatchError};

/// Validated request headers for one poll session.
#[derive(Debug, Clone)]
pub struct Credentials {
    entries: BTreeMap<String, String>,
    headers: HeaderMap,
    warnings: Vec<String>,
}

impl Credentials {
    /// Build from raw header pairs, rejecting anything that is not valid header text.
    pub fn from_entries(entries: BTreeMap<String, String>) -> Result<Self> {
        let mut headers = HeaderMap::with_capacity(entries.len());
        for (name, value) in &entries {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                SlotwatchError::InvalidCredentials(format!("header name '{}': {}", name, e))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                SlotwatchError::InvalidCredentials(format!("value of header '{}': {}", name, e))
            })?;
            headers.insert(header_name, header_value);
        }

        Ok(Self {
            entries,
            headers,
            warnings: Vec::new(),
        })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Headers ready to attach to a request
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Non-fatal problems found while loading
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

/// Where a poll session gets its credentials from.
pub trait CredentialSource: Send + Sync {
    fn load(&self) -> Result<Credentials>;
}

/// Reads `Name: value` lines from a text file.
#[derive(Debug, Clone)]
pub struct FileCredentialSource {
    path: PathBuf,
    tenant_header: String,
    auth_header: String,
    token: Option<String>,
}

impl FileCredentialSource {
    pub fn new(config: &CredentialsConfig) -> Self {
        Self {
            path: config.path.clone(),
            tenant_header: config.tenant_header.clone(),
            auth_header: config.auth_header.clone(),
            token: None,
        }
    }

    /// Builder: authorization token that replaces the file's value when non-blank
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        self
    }
}

impl CredentialSource for FileCredentialSource {
    fn load(&self) -> Result<Credentials> {
        if !self.path.exists() {
            return Err(SlotwatchError::CredentialsNotFound(self.path.clone()));
        }

        let content = fs::read_to_string(&self.path)?;
        let mut entries = parse_header_lines(&content);

        if let Some(token) = &self.token {
            entries.insert(self.auth_header.clone(), token.clone());
        }

        let mut warnings = Vec::new();
        if !entries.contains_key(&self.tenant_header) {
            let warning = format!(
                "{} is missing tenant header {}; requests may be refused",
                self.path.display(),
                self.tenant_header
            );
            log::warn!("{}", warning);
            warnings.push(warning);
        }

        let mut credentials = Credentials::from_entries(entries)?;
        credentials.warnings = warnings;
        log::debug!(
            "Loaded {} credential headers from {}",
            credentials.headers().len(),
            self.path.display()
        );
        Ok(credentials)
    }
}

/// Fixed credentials, for callers that already hold the header map.
#[derive(Debug, Clone)]
pub struct StaticCredentialSource {
    credentials: Credentials,
}

impl StaticCredentialSource {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl CredentialSource for StaticCredentialSource {
    fn load(&self) -> Result<Credentials> {
        Ok(self.credentials.clone())
    }
}

/// Split each `Name: value` line at the first `": "`; other lines are skipped.
fn parse_header_lines(content: &str) -> BTreeMap<String, String> {
    content
        .lines()
        .filter_map(|line| line.split_once(": "))
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}
