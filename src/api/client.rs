use crate::api::outcome::Outcome;
use crate::api::transport::{Transport, TransportError, TransportReply};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5050/api/q";

/// Status codes a transport may report without the lookup counting as a
/// transport failure. 400 is accepted because the service puts structured
/// error payloads in 400 bodies.
pub const DEFAULT_ACCEPTED_STATUSES: [i32; 3] = [0, 200, 400];

/// Fatal lookup errors. Everything past the transport boundary is an `Outcome`.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// A single lookup: search term plus language code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    term: String,
    language_code: String,
}

impl Query {
    pub fn new(
        term: impl Into<String>,
        language_code: impl Into<String>,
    ) -> Result<Self, LookupError> {
        let term = term.into();
        let language_code = language_code.into();

        if term.trim().is_empty() {
            return Err(LookupError::InvalidQuery("search term is empty".into()));
        }
        if language_code.trim().is_empty() {
            return Err(LookupError::InvalidQuery("language code is empty".into()));
        }

        Ok(Self {
            term,
            language_code,
        })
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn language_code(&self) -> &str {
        &self.language_code
    }
}

pub struct LookupClient {
    endpoint: Url,
    accepted_statuses: Vec<i32>,
    transport: Box<dyn Transport>,
}

impl LookupClient {
    pub fn new(endpoint: &str, transport: Box<dyn Transport>) -> Result<Self, LookupError> {
        let endpoint = Url::parse(endpoint).map_err(|source| LookupError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            source,
        })?;

        Ok(Self {
            endpoint,
            accepted_statuses: DEFAULT_ACCEPTED_STATUSES.to_vec(),
            transport,
        })
    }

    pub fn with_accepted_statuses(mut self, statuses: impl Into<Vec<i32>>) -> Self {
        self.accepted_statuses = statuses.into();
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn accepted_statuses(&self) -> &[i32] {
        &self.accepted_statuses
    }

    /// Request target for a query: the endpoint with `s` and `l` appended
    pub fn request_url(&self, query: &Query) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("s", query.term())
            .append_pair("l", query.language_code());
        url
    }

    /// Run one lookup. Only a transport that cannot run at all is an `Err`.
    pub fn execute(&self, query: &Query) -> Result<Outcome, LookupError> {
        info!(
            target: "lookup",
            "Making API request for query: '{}' (language: {})",
            query.term(),
            query.language_code()
        );

        let url = self.request_url(query);
        let reply = self.transport.get(&url)?;
        debug!(
            target: "lookup",
            "{} transport finished with status {}",
            self.transport.name(),
            reply.status
        );

        let outcome = classify(reply, &self.accepted_statuses);
        if !outcome.is_success() {
            warn!(target: "lookup", "Lookup did not succeed: {}", outcome.kind());
        }
        Ok(outcome)
    }
}

/// Turn a raw transport reply into exactly one `Outcome`
pub fn classify(reply: TransportReply, accepted_statuses: &[i32]) -> Outcome {
    if !accepted_statuses.contains(&reply.status) {
        return Outcome::TransportFailure {
            exit_status: reply.status,
            raw_output: reply.output,
        };
    }

    if reply.output.trim().is_empty() {
        return Outcome::EmptyResponseFailure;
    }

    match serde_json::from_str(&reply.output) {
        Ok(payload) => Outcome::Success { payload },
        Err(e) => Outcome::DecodeFailure {
            raw_output: reply.output,
            decode_error: e.to_string(),
        },
    }
}
