//! HTTP client construction helpers for gateway implementations.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use url::Url;

use crate::erp::error::ApprovalError;
use crate::erp::locator::ApiToken;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds a reqwest client that injects the bearer token on every call.
///
/// This helper consolidates the shared logic for header construction and
/// client configuration across the gateway implementations.
///
/// # Errors
///
/// Returns [`ApprovalError::Configuration`] when the token cannot be encoded
/// as a header value or the client fails to build.
pub(super) fn build_erp_client(token: &ApiToken) -> Result<Client, ApprovalError> {
    let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.value())).map_err(|_| {
        ApprovalError::Configuration {
            message: "API token contains characters not allowed in a header".to_owned(),
        }
    })?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth);

    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .default_headers(headers)
        .build()
        .map_err(|error| ApprovalError::Configuration {
            message: format!("failed to configure HTTP client: {error}"),
        })
}

/// Joins an API path onto the base URL.
///
/// # Errors
///
/// Returns [`ApprovalError::InvalidUrl`] when the joined URL is not valid.
pub(super) fn endpoint(api_base: &Url, path: &str) -> Result<Url, ApprovalError> {
    let joined = format!(
        "{base}{path}",
        base = api_base.as_str().trim_end_matches('/')
    );
    Url::parse(&joined).map_err(|error| ApprovalError::InvalidUrl(error.to_string()))
}
