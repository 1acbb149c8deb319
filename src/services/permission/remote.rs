//! HTTP client for the external authorization service.
//!
//! `POST <endpoint>` with a [`PermissionValidationRequest`] JSON body:
//! - 200: allowed
//! - any other status with an `ApiResponse` body: denied, server message kept
//! - transport failure / timeout / unparsable body: the service is unavailable
//!
//! Unavailability and denial stay distinct all the way to the HTTP boundary
//! (400 vs 403).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::api::v1::dto::{ApiResponse, PermissionValidationRequest};

use super::source::{Authorizer, PermissionError, PermissionQuery};

pub const DEFAULT_VALIDATE_BY: &str = "endpoint";

/// What callers see when the authorization service cannot answer.
pub const UNAVAILABLE_MESSAGE: &str = "permission service unavailable";

#[derive(Debug, Clone)]
pub struct RemotePermissionConfig {
    pub endpoint: Url,
    /// Upper bound for one permission check; the request is held open this long at most.
    pub timeout: Duration,
    pub validate_by: String,
}

#[derive(Debug, Error)]
pub enum RemotePermissionError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unreadable response from permission service (status {status}): {detail}")]
    InvalidResponse { status: u16, detail: String },

    #[error("permission denied by authorization service (status {status}): {message}")]
    Denied { status: u16, message: String },
}

#[derive(Debug, Clone)]
pub struct RemotePermissionClient {
    client: Client,
    endpoint: Url,
    validate_by: String,
}

impl RemotePermissionClient {
    pub fn new(config: RemotePermissionConfig) -> Result<Self, RemotePermissionError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(RemotePermissionError::Client)?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
            validate_by: config.validate_by,
        })
    }

    /// Ask the authorization service about one (principal, url, method).
    pub async fn has_permission(
        &self,
        request: &PermissionValidationRequest,
    ) -> Result<(), RemotePermissionError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|source| RemotePermissionError::Transport {
                url: self.endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::OK {
            return Ok(());
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| RemotePermissionError::Transport {
                url: self.endpoint.to_string(),
                source,
            })?;

        let parsed: ApiResponse =
            serde_json::from_slice(&body).map_err(|e| RemotePermissionError::InvalidResponse {
                status: status.as_u16(),
                detail: e.to_string(),
            })?;

        Err(RemotePermissionError::Denied {
            status: status.as_u16(),
            message: parsed.message,
        })
    }
}

#[async_trait]
impl Authorizer for RemotePermissionClient {
    async fn authorize(&self, query: &PermissionQuery<'_>) -> Result<(), PermissionError> {
        let request = PermissionValidationRequest {
            validate_by: self.validate_by.clone(),
            primitive_user_id: query.primitive_user_id.to_string(),
            requested_url: query.path.to_string(),
            requested_method: query.method.to_string(),
        };

        match self.has_permission(&request).await {
            Ok(()) => Ok(()),
            Err(RemotePermissionError::Denied { status, message }) => {
                debug!(
                    status,
                    primitive_user_id = %query.primitive_user_id,
                    path = %query.path,
                    method = %query.method,
                    "authorization service denied request"
                );
                if message.trim().is_empty() {
                    Err(PermissionError::denied())
                } else {
                    Err(PermissionError::Denied(message))
                }
            }
            Err(err) => {
                warn!(error = %err, endpoint = %self.endpoint, "permission check could not be completed");
                Err(PermissionError::Unavailable(UNAVAILABLE_MESSAGE.to_string()))
            }
        }
    }
}
