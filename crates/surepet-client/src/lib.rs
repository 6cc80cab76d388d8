// # SureHub Session Client
//
// This crate provides the reqwest-based implementation of the
// [`PetcareApi`] boundary against the Sure Petcare cloud service.
//
// ## Scope
//
// - Makes exactly ONE HTTP request per trait method call
// - Full error propagation to the caller (no retry, no backoff)
// - HTTP timeout configured (30 seconds by default)
// - Specific error handling for HTTP status codes (401, 403, 404, 429, 5xx)
// - NO token refresh: a rejected token surfaces as an authentication error
// - NO caching of responses between calls
// - NO background tasks, except the explicit polling watcher in `watch`
//
// ## Security Requirements
//
// - Password and session token NEVER appear in logs
// - The Debug implementation redacts the password
//
// ## API Reference
//
// The vendor API is unofficial and reverse engineered; the endpoints below
// are what the official mobile app speaks:
//
// - Login: POST `/api/auth/login`
// - Households: GET `/api/household`
// - Devices: GET `/api/household/:id/device`
// - Pets: GET `/api/household/:id/pet`
// - Device status: GET `/api/device/:id/status`
// - Pet position: GET `/api/pet/:id/position`
// - Timeline: GET `/api/timeline/household/:id`
// - Tag profile: PUT `/api/device/:id/tag/:tag_id`

pub mod watch;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use surepet_core::codes::TagProfile;
use surepet_core::config::SurepetConfig;
use surepet_core::traits::PetcareApi;
use surepet_core::types::{
    Device, Envelope, FlapStatus, Household, Pet, PetPosition, SessionToken, TagInfo,
    TimelineEntry,
};
use surepet_core::{Error, Result};

/// User agent of the mobile app; the vendor rejects some requests without it
const API_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 7.0; SM-G930F Build/NRD90M; wv) \
     AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Chrome/64.0.3282.137 Mobile Safari/537.36";

/// Timeline event types requested from the vendor, kept identical to what
/// the official app asks for so the responses match
const TIMELINE_TYPE_FILTER: &str = "0,3,6,7,12,13,14,17,19,20";

/// SureHub session client
///
/// One instance per account; cheap to clone (the underlying connection pool
/// is shared). All coordination beyond a single request per call is the
/// caller's responsibility.
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the password.
impl std::fmt::Debug for SureHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SureHubClient")
            .field("email", &self.config.credentials.email)
            .field("password", &"<REDACTED>")
            .field("device_id", &self.config.device_id)
            .field("base_url", &self.config.api.base_url)
            .finish()
    }
}

#[derive(Clone)]
pub struct SureHubClient {
    /// Validated client configuration
    config: SurepetConfig,

    /// HTTP client for API requests
    client: reqwest::Client,
}

/// Payload of the login response envelope
#[derive(Debug, Deserialize)]
struct LoginData {
    token: SessionToken,
}

/// Device record as returned with `with[]=tags`; only the tag list matters
#[derive(Debug, Deserialize)]
struct DeviceWithTags {
    #[serde(default)]
    tags: Vec<TagInfo>,
}

impl SureHubClient {
    /// Create a new SureHub client
    ///
    /// Validates the configuration and builds the HTTP client with the
    /// request timeout and the identity headers the vendor expects.
    pub fn new(config: SurepetConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(
            reqwest::header::ORIGIN,
            HeaderValue::from_static("https://surepetcare.io"),
        );
        headers.insert(
            reqwest::header::REFERER,
            HeaderValue::from_static("https://surepetcare.io/"),
        );
        headers.insert(
            "X-Requested-With",
            HeaderValue::from_static("com.sureflap.surepetcare"),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .user_agent(API_USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// The household id configured as the default, if any
    pub fn configured_household(&self) -> Option<i64> {
        self.config.household_id
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api.base_url, path)
    }

    /// Issue an authenticated GET and unwrap the `{"data": ...}` envelope
    async fn get_data<T>(
        &self,
        token: &SessionToken,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!("GET {}", path);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token.as_str())
            .query(query)
            .send()
            .await
            .map_err(|e| Error::http(format!("Request to {} failed: {}", path, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(classify_status(path, status, &body));
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| Error::api(path, format!("Failed to parse response: {}", e)))?;

        Ok(envelope.data)
    }
}

/// Map an HTTP error status to the core error type
///
/// 401/403 are authentication problems, 404 a missing resource, 429 the
/// vendor's rate limit, 5xx a transient server failure.
fn classify_status(endpoint: &str, status: StatusCode, body: &str) -> Error {
    match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "Request rejected: invalid or expired session. Status: {}",
            status
        )),
        404 => Error::not_found(format!("{} (status 404)", endpoint)),
        429 => Error::rate_limited(format!(
            "Vendor rate limit exceeded. Please poll less often. Status: {}",
            status
        )),
        500..=599 => Error::api(
            endpoint,
            format!("Server error (transient): {} - {}", status, body),
        ),
        _ => Error::api(endpoint, format!("Request failed: {} - {}", status, body)),
    }
}

#[async_trait]
impl PetcareApi for SureHubClient {
    /// Authenticate with the configured credentials and device id
    ///
    /// A 401 means the credentials were rejected; it is surfaced as an
    /// authentication error and never retried here.
    async fn login(&self) -> Result<SessionToken> {
        let url = self.url("/api/auth/login");
        tracing::info!("Logging in to SureHub as {}", self.config.credentials.email);

        let body = serde_json::json!({
            "email_address": self.config.credentials.email,
            "password": self.config.credentials.password,
            "device_id": self.config.device_id,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::http(format!("Login request failed: {}", e)))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(Error::auth(
                "Login rejected: check email address and password",
            ));
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(classify_status("/api/auth/login", status, &body));
        }

        let envelope: Envelope<LoginData> = response
            .json()
            .await
            .map_err(|e| Error::api("/api/auth/login", format!("Failed to parse response: {}", e)))?;

        tracing::debug!("Login succeeded");
        Ok(envelope.data.token)
    }

    async fn households(&self, token: &SessionToken) -> Result<Vec<Household>> {
        self.get_data(
            token,
            "/api/household",
            &[("with[]", "household"), ("with[]", "timezone")],
        )
        .await
    }

    async fn devices(&self, token: &SessionToken, household_id: i64) -> Result<Vec<Device>> {
        self.get_data(
            token,
            &format!("/api/household/{}/device", household_id),
            &[("with[]", "children")],
        )
        .await
    }

    async fn pets(&self, token: &SessionToken, household_id: i64) -> Result<Vec<Pet>> {
        self.get_data(
            token,
            &format!("/api/household/{}/pet", household_id),
            &[("with[]", "photo"), ("with[]", "tag")],
        )
        .await
    }

    async fn flap_status(&self, token: &SessionToken, device_id: i64) -> Result<FlapStatus> {
        self.get_data(token, &format!("/api/device/{}/status", device_id), &[])
            .await
    }

    async fn pet_position(&self, token: &SessionToken, pet_id: i64) -> Result<PetPosition> {
        self.get_data(token, &format!("/api/pet/{}/position", pet_id), &[])
            .await
    }

    /// Fetch tag registrations from the device list
    ///
    /// The profiles live on the flap devices, not on the pets; the first
    /// device carrying tags is the flap of interest.
    async fn tags(&self, token: &SessionToken) -> Result<Vec<TagInfo>> {
        let devices: Vec<DeviceWithTags> = self
            .get_data(token, "/api/device", &[("with[]", "tags")])
            .await?;

        Ok(devices
            .into_iter()
            .map(|d| d.tags)
            .find(|tags| !tags.is_empty())
            .unwrap_or_default())
    }

    async fn timeline(
        &self,
        token: &SessionToken,
        household_id: i64,
    ) -> Result<Vec<TimelineEntry>> {
        self.get_data(
            token,
            &format!("/api/timeline/household/{}", household_id),
            &[("type", TIMELINE_TYPE_FILTER)],
        )
        .await
    }

    /// Set the tag profile of a pet on a flap device
    ///
    /// The vendor echoes the stored profile back; the result is true when
    /// the echo matches what was requested.
    async fn set_tag_profile(
        &self,
        token: &SessionToken,
        device_id: i64,
        tag_id: i64,
        profile: TagProfile,
    ) -> Result<bool> {
        let path = format!("/api/device/{}/tag/{}", device_id, tag_id);
        let url = self.url(&path);
        tracing::info!(
            "Setting tag {} on device {} to profile: {}",
            tag_id,
            device_id,
            profile.label()
        );

        let response = self
            .client
            .put(&url)
            .bearer_auth(token.as_str())
            .json(&serde_json::json!({ "profile": profile.code() }))
            .send()
            .await
            .map_err(|e| Error::http(format!("Request to {} failed: {}", path, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(classify_status(&path, status, &body));
        }

        let envelope: Envelope<Value> = response
            .json()
            .await
            .map_err(|e| Error::api(&path, format!("Failed to parse response: {}", e)))?;

        Ok(envelope.data.get("profile").and_then(Value::as_i64) == Some(profile.code()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SurepetConfig {
        SurepetConfig::new("cat@example.com", "correct-horse-battery", "1234567890")
    }

    #[test]
    fn client_creation_with_valid_config() {
        let client = SureHubClient::new(test_config());
        assert!(client.is_ok());
    }

    #[test]
    fn client_creation_rejects_invalid_config() {
        let mut config = test_config();
        config.credentials.password = String::new();
        let client = SureHubClient::new(config);
        assert!(matches!(client, Err(Error::Config(_))));
    }

    #[test]
    fn password_not_exposed_in_debug() {
        let client = SureHubClient::new(test_config()).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("correct-horse-battery"));
        assert!(debug.contains("cat@example.com"));
        assert!(debug.contains("SureHubClient"));
    }

    #[test]
    fn urls_join_against_base() {
        let mut config = test_config();
        config.api.base_url = "http://localhost:4010".to_string();
        let client = SureHubClient::new(config).unwrap();
        assert_eq!(
            client.url("/api/auth/login"),
            "http://localhost:4010/api/auth/login"
        );
    }

    #[test]
    fn status_classification() {
        let err = classify_status("/api/household", StatusCode::UNAUTHORIZED, "");
        assert!(matches!(err, Error::Authentication(_)));

        let err = classify_status("/api/household", StatusCode::FORBIDDEN, "");
        assert!(matches!(err, Error::Authentication(_)));

        let err = classify_status("/api/pet/1/position", StatusCode::NOT_FOUND, "");
        assert!(matches!(err, Error::NotFound(_)));

        let err = classify_status("/api/household", StatusCode::TOO_MANY_REQUESTS, "");
        assert!(matches!(err, Error::RateLimited(_)));

        let err = classify_status("/api/household", StatusCode::BAD_GATEWAY, "oops");
        assert!(matches!(err, Error::Api { .. }));

        let err = classify_status("/api/household", StatusCode::IM_A_TEAPOT, "");
        assert!(matches!(err, Error::Api { .. }));
    }

    #[test]
    fn configured_household_passthrough() {
        let mut config = test_config();
        config.household_id = Some(42);
        let client = SureHubClient::new(config).unwrap();
        assert_eq!(client.configured_household(), Some(42));
    }
}
