//! Entropy service boundary.
//!
//! The entropy provider is modelled as a trait so the generation pipeline can
//! run against the real HTTP service or a deterministic in-memory source in
//! tests. The reference provider is the random.org plain-text API: a quota
//! probe plus a batched integer fetch, both blocking round-trips.

use std::thread;
use std::time::Duration;

use log::{debug, warn};

use crate::config::{ENTROPY_RETRY_ATTEMPTS, ENTROPY_RETRY_BACKOFF_MS, ENTROPY_TIMEOUT_SECS};
use crate::error::KeyGenError;

/// Supplier of raw random chunks.
///
/// A source is stateful (quota drains, streams advance), so both operations
/// take `&mut self`, mirroring the RNG convention.
pub trait EntropySource {
    /// Remaining quota at the provider. Non-positive means refills must stop.
    fn remaining_quota(&mut self) -> Result<i64, KeyGenError>;

    /// Fetch `count` random chunks, each in `[0, 65535]`.
    fn fetch_chunks(&mut self, count: usize) -> Result<Vec<u16>, KeyGenError>;
}

/// Blocking client for the random.org plain-text API.
///
/// Requests carry an explicit timeout; transient failures (HTTP 5xx/429 and
/// transport errors) are retried a bounded number of times with doubling
/// backoff, everything else fails fast as [`KeyGenError::ServiceError`].
pub struct RandomOrgClient {
    agent: ureq::Agent,
    base_url: String,
}

impl RandomOrgClient {
    pub fn new() -> Self {
        Self::with_base_url("https://www.random.org")
    }

    /// Client against an alternative endpoint (test servers, mirrors).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(ENTROPY_TIMEOUT_SECS))
            .build();

        Self {
            agent,
            base_url: base_url.into(),
        }
    }

    fn get_plain(&self, path: &str, query: &[(&str, &str)]) -> Result<String, KeyGenError> {
        let url = format!("{}/{}", self.base_url, path);
        let mut delay = Duration::from_millis(ENTROPY_RETRY_BACKOFF_MS);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let mut request = self.agent.get(&url);
            for &(name, value) in query {
                request = request.query(name, value);
            }

            debug!("GET {} (attempt {}/{})", url, attempt, ENTROPY_RETRY_ATTEMPTS);
            match request.call() {
                Ok(response) => {
                    return response
                        .into_string()
                        .map_err(|e| KeyGenError::Transport(e.to_string()));
                }
                Err(err) if attempt < ENTROPY_RETRY_ATTEMPTS && is_transient(&err) => {
                    warn!("entropy request failed ({}), retrying in {:?}", err, delay);
                    thread::sleep(delay);
                    delay *= 2;
                }
                Err(ureq::Error::Status(code, _)) => return Err(KeyGenError::ServiceError(code)),
                Err(err) => return Err(KeyGenError::Transport(err.to_string())),
            }
        }
    }
}

impl Default for RandomOrgClient {
    fn default() -> Self {
        Self::new()
    }
}

impl EntropySource for RandomOrgClient {
    fn remaining_quota(&mut self) -> Result<i64, KeyGenError> {
        let body = self.get_plain("quota", &[("format", "plain")])?;
        parse_quota(&body)
    }

    fn fetch_chunks(&mut self, count: usize) -> Result<Vec<u16>, KeyGenError> {
        let count_param = count.to_string();
        let body = self.get_plain(
            "integers",
            &[
                ("num", count_param.as_str()),
                ("min", "0"),
                ("max", "65535"),
                ("col", "1"),
                ("base", "2"),
                ("format", "plain"),
                ("rnd", "new"),
            ],
        )?;
        parse_chunk_lines(&body)
    }
}

fn is_transient(err: &ureq::Error) -> bool {
    match err {
        ureq::Error::Status(code, _) => is_transient_status(*code),
        ureq::Error::Transport(_) => true,
    }
}

pub(crate) fn is_transient_status(code: u16) -> bool {
    code == 429 || (500..=599).contains(&code)
}

pub(crate) fn parse_quota(body: &str) -> Result<i64, KeyGenError> {
    let text = body.trim();
    text.parse::<i64>().map_err(|_| {
        KeyGenError::MalformedResponse(format!("quota is not an integer: {:?}", text))
    })
}

/// Parse one base-2 value per line, as served with `base=2&format=plain`.
pub(crate) fn parse_chunk_lines(body: &str) -> Result<Vec<u16>, KeyGenError> {
    body.split_whitespace()
        .map(|line| {
            u16::from_str_radix(line, 2).map_err(|_| {
                KeyGenError::MalformedResponse(format!("bad base-2 chunk: {:?}", line))
            })
        })
        .collect()
}
