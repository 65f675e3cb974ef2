use serde::{Deserialize, Serialize};
use std::process::Command;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace, warn};
use url::Url;

/// What a transport hands back after one GET
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportReply {
    /// HTTP status for the native client, process exit code for curl
    pub status: i32,
    /// Captured response text (stdout and stderr merged for curl)
    pub output: String,
}

impl TransportReply {
    pub fn new(status: i32, output: impl Into<String>) -> Self {
        Self {
            status,
            output: output.into(),
        }
    }
}

/// Status reported when an exchange never produced a status of its own:
/// an HTTP request that failed to complete, or a process killed by a signal.
pub const NO_STATUS: i32 = -1;

/// The transport itself is unusable: the program cannot be started, or the
/// HTTP client cannot be built.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP client could not be created: {0}")]
    Http(#[from] reqwest::Error),
}

/// Performs a single blocking GET against a fully built request target
pub trait Transport: Send + Sync {
    fn get(&self, url: &Url) -> Result<TransportReply, TransportError>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Which transport implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Http,
    Curl,
}

impl Default for TransportKind {
    fn default() -> Self {
        TransportKind::Http
    }
}

/// Native HTTP transport. Every status is reported back as-is; the client
/// decides which ones count as failures. A request that never completes
/// (refused, DNS, timeout, broken body) is reported as `NO_STATUS` with the
/// error text as output, the way curl reports it through its exit code.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Client honoring the system proxy settings
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        Self::build(timeout, true)
    }

    /// Client that always connects directly
    pub fn without_proxy(timeout: Option<Duration>) -> Result<Self, TransportError> {
        Self::build(timeout, false)
    }

    fn build(timeout: Option<Duration>, use_proxy: bool) -> Result<Self, TransportError> {
        let mut builder = reqwest::blocking::Client::builder()
            .user_agent(concat!("langcurl/", env!("CARGO_PKG_VERSION")));
        if !use_proxy {
            builder = builder.no_proxy();
        }
        // Without an explicit value the client keeps its own default
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &Url) -> Result<TransportReply, TransportError> {
        debug!(target: "transport", "GET {}", url);
        let response = match self.client.get(url.clone()).send() {
            Ok(response) => response,
            Err(e) => return Ok(incomplete_exchange(&e)),
        };
        let status = response.status();
        let body = match response.text() {
            Ok(body) => body,
            Err(e) => return Ok(incomplete_exchange(&e)),
        };
        debug!(target: "transport", "HTTP {} ({} bytes)", status, body.len());
        Ok(TransportReply::new(i32::from(status.as_u16()), body))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

fn incomplete_exchange(error: &reqwest::Error) -> TransportReply {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    warn!(target: "transport", "HTTP request did not complete: {}", message);
    TransportReply::new(NO_STATUS, message)
}

/// Subprocess transport that shells out to curl
pub struct CurlTransport {
    program: String,
}

impl CurlTransport {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn args(url: &Url) -> Vec<String> {
        vec![
            "--silent".to_string(),
            "--show-error".to_string(),
            "--get".to_string(),
            url.as_str().to_string(),
        ]
    }
}

impl Transport for CurlTransport {
    fn get(&self, url: &Url) -> Result<TransportReply, TransportError> {
        let args = Self::args(url);
        debug!(target: "transport", "{} {}", self.program, args.join(" "));

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| TransportError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // Killed by a signal: no exit code
        let status = output.status.code().unwrap_or(NO_STATUS);

        let mut merged = String::from_utf8_lossy(&output.stdout).into_owned();
        merged.push_str(&String::from_utf8_lossy(&output.stderr));

        trace!(target: "transport", "curl exit code: {}", status);
        Ok(TransportReply::new(status, merged))
    }

    fn name(&self) -> &'static str {
        "curl"
    }
}

/// Build the transport selected by configuration
pub fn build_transport(
    kind: TransportKind,
    curl_program: &str,
    timeout: Option<Duration>,
) -> Result<Box<dyn Transport>, TransportError> {
    Ok(match kind {
        TransportKind::Http => Box::new(HttpTransport::new(timeout)?),
        TransportKind::Curl => Box::new(CurlTransport::new(curl_program)),
    })
}
