use std::time::Duration;

use anyhow::Context;
use log::error;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde_json::Value;

pub mod model;
mod wire;

pub use model::{Candidate, ValidationResult};

use wire::{ErrorEnvelope, XavEnvelope, XavRequest};

/// production Street Level Address Validation endpoint
const ENDPOINT: &str = "https://onlinetools.ups.com/addressvalidation/v1/1";

/// the service answers well under this in practice; anything slower is
/// reported to the caller as a timeout
const TIMEOUT: Duration = Duration::from_secs(2);

const MAX_CANDIDATES: &str = "5";

const CONNECTION_MESSAGE: &str =
    "Could not establish a connection to UPS Address Validation, please try again.";
const TIMEOUT_MESSAGE: &str = "Connection to UPS Address Validation timedout, please try again.";

/// server-side failures mapped to the messages shown to the caller
const SERVER_ERRORS: [(StatusCode, &str); 5] = [
    (StatusCode::UNAUTHORIZED, "Authentication error"),
    (StatusCode::NOT_FOUND, "URL not found"),
    (StatusCode::METHOD_NOT_ALLOWED, "Method Not allowed"),
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
    (StatusCode::SERVICE_UNAVAILABLE, "Resource is Down"),
];

/// Configuration for [`UpsClient`]. Credentials are injected here rather than
/// read by the client itself, so call sites decide where they come from.
#[derive(Debug, Clone)]
pub struct UpsConfig {
    pub url: String,
    pub access_license_number: String,
    pub username: String,
    pub password: String,
    pub timeout: Duration,
}

impl UpsConfig {
    pub fn new(
        access_license_number: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        UpsConfig {
            url: ENDPOINT.to_string(),
            access_license_number: access_license_number.into(),
            username: username.into(),
            password: password.into(),
            timeout: TIMEOUT,
        }
    }

    /// load credentials from `UPS_ACCESS_LICENSE_NUMBER`, `UPS_USERNAME` and
    /// `UPS_PASSWORD`
    pub fn from_env() -> anyhow::Result<Self> {
        let access_license_number = std::env::var("UPS_ACCESS_LICENSE_NUMBER")
            .context("`UPS_ACCESS_LICENSE_NUMBER` environment variable must be set")?;
        let username = std::env::var("UPS_USERNAME")
            .context("`UPS_USERNAME` environment variable must be set")?;
        let password = std::env::var("UPS_PASSWORD")
            .context("`UPS_PASSWORD` environment variable must be set")?;
        Ok(Self::new(access_license_number, username, password))
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP client for the UPS Street Level Address Validation service
pub struct UpsClient {
    client: Client,
    config: UpsConfig,
}

impl UpsClient {
    pub fn new(config: UpsConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(config.timeout)
                .default_headers(Self::default_headers(&config)?)
                .build()?,
            config,
        })
    }

    fn default_headers(config: &UpsConfig) -> anyhow::Result<HeaderMap> {
        let mut map = HeaderMap::new();
        map.insert(
            "AccessLicenseNumber",
            HeaderValue::from_str(&config.access_license_number)?,
        );
        map.insert("Username", HeaderValue::from_str(&config.username)?);
        map.insert("Password", HeaderValue::from_str(&config.password)?);
        Ok(map)
    }

    /// Validate a US postal address, normalizing whatever the service answers
    /// into a [`ValidationResult`]. Never fails; every problem along the way
    /// comes back as a `Failure` with messages for the caller.
    pub async fn validate(
        &self,
        city: &str,
        state: &str,
        zip_code: &str,
        address1: &str,
    ) -> ValidationResult {
        if city.is_empty() || state.is_empty() || zip_code.is_empty() || address1.is_empty() {
            return ValidationResult::failure("Not all data submitted");
        }

        let payload = XavRequest::new(city, state, zip_code, address1);

        let response = match self
            .client
            .post(&self.config.url)
            .query(&[
                ("regionalrequestIndicator", "true"),
                ("maximumcandidatelistsize", MAX_CANDIDATES),
            ])
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => return transport_failure(&err),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => return transport_failure(&err),
        };

        if status == StatusCode::OK {
            interpret_success_body(&body)
        } else if status == StatusCode::BAD_REQUEST {
            interpret_bad_request_body(&body)
        } else {
            interpret_error_status(status)
        }
    }
}

fn transport_failure(err: &reqwest::Error) -> ValidationResult {
    if err.is_timeout() {
        ValidationResult::failure(TIMEOUT_MESSAGE)
    } else {
        ValidationResult::failure(CONNECTION_MESSAGE)
    }
}

/// Interpret a 200 body. A body that is not JSON at all is reported as a
/// success with no candidates; a JSON body without a recognizable
/// `XAVResponse` shape is a parse failure surfaced to the caller.
fn interpret_success_body(body: &str) -> ValidationResult {
    let raw: Value = match serde_json::from_str(body) {
        Ok(raw) => raw,
        Err(err) => {
            error!("could not decode JSON response from a successful API attempt: [{err}]");
            return ValidationResult::success(Vec::new());
        }
    };

    let envelope: XavEnvelope = match serde_json::from_value(raw) {
        Ok(envelope) => envelope,
        Err(err) => {
            error!("could not parse UPS response: [{err}]");
            return ValidationResult::failure("Error parsing UPS response.");
        }
    };

    let response = envelope.xav_response;
    let candidates = response.candidate.into_candidates();

    if response.valid_address_indicator.is_some() {
        return ValidationResult::success(candidates.into_iter().take(1).collect());
    }
    if response.ambiguous_address_indicator.is_some() {
        return ValidationResult::success(candidates);
    }
    if response.no_candidates_indicator.is_some() {
        return ValidationResult::success(Vec::new());
    }

    error!("could not parse UPS response: no indicator present");
    ValidationResult::failure("Error parsing UPS response.")
}

fn interpret_bad_request_body(body: &str) -> ValidationResult {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => match envelope.response.and_then(|response| response.errors) {
            Some(messages) => ValidationResult::Failure { messages },
            None => ValidationResult::failure("Unknown"),
        },
        Err(_) => ValidationResult::failure("Unknown"),
    }
}

fn interpret_error_status(status: StatusCode) -> ValidationResult {
    for (code, message) in SERVER_ERRORS {
        if status == code {
            error!("{}, {}", code.as_u16(), message);
            return ValidationResult::failure(message);
        }
    }
    error!("Unknown Error: [{status}]");
    ValidationResult::failure("Unknown error")
}
