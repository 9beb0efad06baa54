use axum::http::StatusCode;
use reqwest::{Client, Url};
use serde_json::{json, Value};
use std::fmt;
use thiserror::Error;
use tokio::time::Duration;

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("invalid registration service url")]
    InvalidUrlError(#[from] url::ParseError),
    #[error("failed to request to registration service")]
    RequestError(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationEndpoint {
    Register,
    VerifyOtp,
}

impl RegistrationEndpoint {
    fn path(&self) -> &'static str {
        match self {
            RegistrationEndpoint::Register => "register",
            RegistrationEndpoint::VerifyOtp => "verify-otp",
        }
    }
}

impl fmt::Display for RegistrationEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Client of the external service handling sign-up and one-time passcodes.
pub struct RegistrationClient {
    base_url: Url,
    client: Client,
}

impl RegistrationClient {
    pub fn new(base_url: &str) -> Result<Self, RegistrationError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .gzip(true)
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { base_url, client })
    }

    pub fn endpoint_url(&self, endpoint: RegistrationEndpoint) -> Result<Url, RegistrationError> {
        Ok(self.base_url.join(endpoint.path())?)
    }

    /// Posts the payload and hands back the upstream status and body. A body that is not
    /// JSON is wrapped as `{"message": <text>}`.
    pub async fn forward(
        &self,
        endpoint: RegistrationEndpoint,
        payload: &Value,
    ) -> Result<(StatusCode, Value), RegistrationError> {
        let url = self.endpoint_url(endpoint)?;
        tracing::info!("forward {} request to {}", endpoint, url);

        let res = self.client.post(url).json(payload).send().await?;
        let status = StatusCode::from_u16(res.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
        if !status.is_success() {
            tracing::warn!("registration service answered {} to {}", status, endpoint);
        }

        let text = res.text().await?;
        let body = serde_json::from_str(&text).unwrap_or_else(|_| json!({ "message": text }));

        Ok((status, body))
    }
}
