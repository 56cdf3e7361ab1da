// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Home Assistant REST client.

use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::error::PlatformError;
use crate::platform::{EntityState, Platform, ServiceData, entity_domain};

// ============================================================================
// HassConfig - Connection parameters
// ============================================================================

/// Configuration for a Home Assistant connection.
///
/// # Examples
///
/// ```
/// use emuhue_lib::platform::HassConfig;
/// use std::time::Duration;
///
/// let config = HassConfig::new("http://homeassistant.local:8123", "long-lived-token")
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.base_url(), "http://homeassistant.local:8123");
/// ```
#[derive(Clone)]
pub struct HassConfig {
    base_url: String,
    token: String,
    timeout: Duration,
}

impl HassConfig {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration for the given instance URL and access token.
    ///
    /// A URL without a scheme is assumed to be plain HTTP. Trailing slashes
    /// are removed.
    #[must_use]
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        let url = url.into();
        let base_url = if url.starts_with("http://") || url.starts_with("https://") {
            url
        } else {
            format!("http://{url}")
        };

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Creates a `HassClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created or the URL has no
    /// host.
    pub fn into_client(self) -> Result<HassClient, PlatformError> {
        let host = self
            .base_url
            .split_once("://")
            .map_or("", |(_, host)| host);
        if host.is_empty() {
            return Err(PlatformError::InvalidAddress(self.base_url));
        }

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(PlatformError::Http)?;

        Ok(HassClient {
            client,
            config: self,
        })
    }
}

impl std::fmt::Debug for HassConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HassConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// HassClient - Platform implementation
// ============================================================================

/// Home Assistant client over the REST API.
///
/// - state: `GET /api/states/<entity_id>`
/// - commands: `POST /api/services/<domain>/turn_on|turn_off`
///
/// # Examples
///
/// ```no_run
/// use emuhue_lib::platform::{HassConfig, Platform};
///
/// # async fn example() -> Result<(), emuhue_lib::PlatformError> {
/// let client = HassConfig::new("192.168.1.20:8123", "token").into_client()?;
/// let state = client.get_entity_state("light.kitchen").await?;
/// println!("kitchen is {}", state.state);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HassClient {
    client: Client,
    config: HassConfig,
}

impl HassClient {
    /// Creates a client with default settings.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Result<Self, PlatformError> {
        HassConfig::new(url, token).into_client()
    }

    /// Returns the base URL of the instance.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    fn state_url(&self, entity_id: &str) -> String {
        format!(
            "{}/api/states/{}",
            self.config.base_url,
            urlencoding::encode(entity_id)
        )
    }

    fn service_url(&self, domain: &str, service: &str) -> String {
        format!(
            "{}/api/services/{}/{}",
            self.config.base_url,
            urlencoding::encode(domain),
            service
        )
    }

    fn map_send_error(&self, err: reqwest::Error) -> PlatformError {
        if err.is_timeout() {
            #[allow(clippy::cast_possible_truncation)]
            let millis = self.config.timeout.as_millis() as u64;
            PlatformError::Timeout(millis)
        } else {
            PlatformError::Http(err)
        }
    }

    async fn call_service(
        &self,
        entity_id: &str,
        service: &str,
        data: &ServiceData,
    ) -> Result<(), PlatformError> {
        let url = self.service_url(entity_domain(entity_id), service);

        let mut body = data.clone();
        body.insert("entity_id".to_string(), entity_id.into());

        tracing::debug!(url = %url, entity_id = %entity_id, "Calling Home Assistant service");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        check_status(response.status(), entity_id)
    }
}

fn check_status(status: StatusCode, entity_id: &str) -> Result<(), PlatformError> {
    match status {
        s if s.is_success() => Ok(()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(PlatformError::AuthenticationFailed)
        }
        StatusCode::NOT_FOUND => Err(PlatformError::EntityNotFound(entity_id.to_string())),
        s => Err(PlatformError::Status {
            status: s.as_u16(),
            message: s.canonical_reason().unwrap_or("Unknown").to_string(),
        }),
    }
}

impl Platform for HassClient {
    async fn get_entity_state(&self, entity_id: &str) -> Result<EntityState, PlatformError> {
        let url = self.state_url(entity_id);

        tracing::debug!(url = %url, "Fetching entity state");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.token)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        check_status(response.status(), entity_id)?;

        let body = response.text().await.map_err(PlatformError::Http)?;
        serde_json::from_str(&body).map_err(|e| PlatformError::InvalidResponse(e.to_string()))
    }

    async fn turn_on(&self, entity_id: &str, data: &ServiceData) -> Result<(), PlatformError> {
        self.call_service(entity_id, "turn_on", data).await
    }

    async fn turn_off(&self, entity_id: &str, data: &ServiceData) -> Result<(), PlatformError> {
        self.call_service(entity_id, "turn_off", data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_adds_scheme() {
        let config = HassConfig::new("192.168.1.20:8123", "t");
        assert_eq!(config.base_url(), "http://192.168.1.20:8123");
    }

    #[test]
    fn config_strips_trailing_slash() {
        let config = HassConfig::new("https://ha.example.org/", "t");
        assert_eq!(config.base_url(), "https://ha.example.org");
    }

    #[test]
    fn debug_hides_token() {
        let config = HassConfig::new("ha.local", "super-secret");
        assert!(!format!("{config:?}").contains("super-secret"));
    }

    #[test]
    fn state_url_encodes_entity() {
        let client = HassClient::new("ha.local:8123", "t").unwrap();
        assert_eq!(
            client.state_url("light.living room"),
            "http://ha.local:8123/api/states/light.living%20room"
        );
    }

    #[test]
    fn service_url_uses_domain() {
        let client = HassClient::new("ha.local:8123", "t").unwrap();
        assert_eq!(
            client.service_url("switch", "turn_off"),
            "http://ha.local:8123/api/services/switch/turn_off"
        );
    }

    #[test]
    fn empty_host_is_invalid() {
        let result = HassConfig::new("http://", "t").into_client();
        assert!(matches!(result, Err(PlatformError::InvalidAddress(_))));
    }

    #[test]
    fn status_mapping() {
        assert!(check_status(StatusCode::OK, "light.a").is_ok());
        assert!(matches!(
            check_status(StatusCode::UNAUTHORIZED, "light.a"),
            Err(PlatformError::AuthenticationFailed)
        ));
        assert!(matches!(
            check_status(StatusCode::NOT_FOUND, "light.a"),
            Err(PlatformError::EntityNotFound(id)) if id == "light.a"
        ));
        assert!(matches!(
            check_status(StatusCode::BAD_GATEWAY, "light.a"),
            Err(PlatformError::Status { status: 502, .. })
        ));
    }
}
