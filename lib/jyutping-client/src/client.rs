use crate::{Error, Result, RomanizeRequest, RomanizeResponse};
use reqwest::{
    blocking,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

pub const DEFAULT_URL: &str = "http://127.0.0.1:48000/cantonese_split";

/// Upper bound on a single romanization round trip.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ClientConfig {
    pub url: String,
    pub token: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            token: String::new(),
            user_agent: concat!("jyutping-client/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: MAX_TIMEOUT,
        }
    }
}

/// Blocking client for the Cantonese romanization service.
///
/// Must not be driven from inside an async runtime worker thread.
#[derive(Debug, Clone)]
pub struct Client {
    config: ClientConfig,
    http: blocking::Client,
}

impl Client {
    pub fn new(mut config: ClientConfig) -> Result<Self> {
        if config.timeout > MAX_TIMEOUT || config.timeout.is_zero() {
            log::warn!(
                "romanizer timeout {:?} out of range, using {:?}",
                config.timeout,
                MAX_TIMEOUT
            );
            config.timeout = MAX_TIMEOUT;
        }

        let http = blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Request {
                url: config.url.clone(),
                error: e,
            })?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Ok(v) = HeaderValue::from_str(&self.config.user_agent) {
            headers.insert(USER_AGENT, v);
        }

        if !self.config.token.is_empty()
            && let Ok(v) = HeaderValue::from_str(&format!("Bearer {}", self.config.token))
        {
            headers.insert(AUTHORIZATION, v);
        }

        headers
    }

    /// Sends every sentence in one round trip and checks that each requested key
    /// came back.
    pub fn romanize(&self, request: &RomanizeRequest) -> Result<RomanizeResponse> {
        if request.is_empty() {
            return Ok(RomanizeResponse::default());
        }

        let start = Instant::now();
        let body = serde_json::to_vec(request)?;

        let resp = self
            .http
            .post(&self.config.url)
            .headers(self.headers())
            .body(body)
            .send()
            .map_err(|e| Error::Request {
                url: self.config.url.clone(),
                error: e,
            })?;

        let status = resp.status();
        let text = resp.text().map_err(|e| Error::Request {
            url: self.config.url.clone(),
            error: e,
        })?;

        if !status.is_success() {
            return Err(Error::Status { status, body: text });
        }

        let response = RomanizeResponse::from_json_str(&text)?;
        if let Some(key) = request.keys().find(|k| response.get(k).is_none()) {
            return Err(Error::MalformedResponse(format!(
                "segment {key:?} missing from response"
            )));
        }

        log::debug!(
            "romanized {} segment(s) in {:?}",
            request.len(),
            start.elapsed()
        );
        Ok(response)
    }
}
