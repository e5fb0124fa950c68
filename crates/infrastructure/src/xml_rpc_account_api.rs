//! Account API adapter speaking XML-RPC over HTTPS.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};
use url::Url;

use dormant_application::{AccountApi, DropOutcome};
use dormant_core::{AppError, AppResult};
use dormant_domain::{Credentials, SessionId, UserId};

use crate::xml_rpc::{MethodCall, MethodResponse, XmlRpcValue};


/// The account service RPC endpoint.
pub const DEFAULT_ACCOUNT_API_URL: &str = "https://api.ithenticate.com/rpc";

const REQUEST_CONTENT_TYPE: &str = "application/xml";
const RESPONSE_CONTENT_TYPE: &str = "text/xml";

/// Connection settings for [`XmlRpcAccountApi`].
#[derive(Debug, Clone)]
pub struct XmlRpcClientConfig {
    /// RPC endpoint receiving every call.
    pub endpoint: Url,
    /// Attempts per call when the connection fails.
    pub max_attempts: u32,
    /// Delay between failed connection attempts.
    pub retry_delay: Duration,
    /// Print raw response bodies to stdout.
    pub echo_responses: bool,
}

impl XmlRpcClientConfig {
    /// Creates a configuration for `endpoint` with the default retry policy.
    #[must_use]
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            max_attempts: 10,
            retry_delay: Duration::from_secs(3),
            echo_responses: false,
        }
    }

    /// Parses `endpoint` and applies the default retry policy.
    pub fn parse(endpoint: &str) -> AppResult<Self> {
        let endpoint = Url::parse(endpoint).map_err(|error| {
            AppError::Validation(format!("invalid account API URL '{endpoint}': {error}"))
        })?;
        Ok(Self::new(endpoint))
    }
}

/// [`AccountApi`] implementation calling the remote XML-RPC endpoint.
pub struct XmlRpcAccountApi {
    http_client: reqwest::Client,
    config: XmlRpcClientConfig,
}

impl XmlRpcAccountApi {
    /// Creates an adapter using a shared HTTP client.
    #[must_use]
    pub fn new(http_client: reqwest::Client, config: XmlRpcClientConfig) -> Self {
        Self {
            http_client,
            config: XmlRpcClientConfig {
                max_attempts: config.max_attempts.max(1),
                ..config
            },
        }
    }

    /// Sends `call` and returns the response struct when `api_status` is OK.
    pub async fn call(&self, call: &MethodCall) -> AppResult<XmlRpcValue> {
        let body = call.to_xml()?;
        debug!(method = call.method_name(), "calling account api");

        let response = self.send_with_retry(body).await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(AppError::Protocol(format!(
                "account api returned HTTP status {}",
                status.as_u16()
            )));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        if !content_type
            .to_ascii_lowercase()
            .starts_with(RESPONSE_CONTENT_TYPE)
        {
            return Err(AppError::Protocol(format!(
                "account api returned unexpected content type '{content_type}'"
            )));
        }

        let text = response.text().await.map_err(|error| {
            AppError::Protocol(format!("failed to read account api response: {error}"))
        })?;
        if self.config.echo_responses {
            println!();
            println!("{text}");
            println!();
        }

        MethodResponse::parse(&text)?.into_result()
    }

    async fn send_with_retry(&self, body: String) -> AppResult<reqwest::Response> {
        let mut attempt = 0_u32;

        loop {
            attempt = attempt.saturating_add(1);
            let result = self
                .http_client
                .post(self.config.endpoint.clone())
                .header(CONTENT_TYPE, REQUEST_CONTENT_TYPE)
                .body(body.clone())
                .send()
                .await;

            match result {
                Ok(response) => return Ok(response),
                Err(error) if attempt >= self.config.max_attempts => {
                    return Err(AppError::Transport(format!(
                        "server kept refusing connection after {attempt} attempts: {error}"
                    )));
                }
                Err(error) => {
                    warn!(
                        attempt,
                        max_attempts = self.config.max_attempts,
                        retry_delay_ms =
                            u64::try_from(self.config.retry_delay.as_millis()).unwrap_or(u64::MAX),
                        error = %error,
                        "connection refused by account api, resting"
                    );
                    tokio::time::sleep(self.config.retry_delay).await;
                }
            }
        }
    }
}

#[async_trait]
impl AccountApi for XmlRpcAccountApi {
    async fn login(&self, credentials: &Credentials) -> AppResult<SessionId> {
        let call = MethodCall::new("login").param(XmlRpcValue::structure([
            (
                "username",
                XmlRpcValue::String(credentials.username().to_owned()),
            ),
            (
                "password",
                XmlRpcValue::String(credentials.password().to_owned()),
            ),
        ]));

        let response = self.call(&call).await?;
        let session = response
            .member("sid")
            .and_then(XmlRpcValue::as_str)
            .ok_or_else(|| AppError::Protocol("session ID not found in login response".to_owned()))?;

        SessionId::new(session)
    }

    async fn drop_user(&self, session: &SessionId, user_id: UserId) -> AppResult<DropOutcome> {
        let call = MethodCall::new("user.drop").param(XmlRpcValue::structure([
            ("sid", XmlRpcValue::String(session.as_str().to_owned())),
            ("id", XmlRpcValue::Int(user_id.as_i64())),
        ]));

        let response = self.call(&call).await?;
        let message = response
            .member("messages")
            .and_then(XmlRpcValue::first_string)
            .map(str::to_owned);

        Ok(DropOutcome { message })
    }
}
