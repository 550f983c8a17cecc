use crate::domain::model::{ApiEnvelope, ServerDescriptor, SessionData};
use crate::domain::ports::SessionSource;
use crate::utils::error::{Result, UnblockError};
use crate::utils::logger::redact;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const REQUIRED_COUNTRY: &str = "US";

/// 向單一候選伺服器請求 session，不做任何重試
pub struct HttpSessionFetcher {
    client: Client,
    device_id: String,
    api_version: String,
}

impl HttpSessionFetcher {
    pub fn new(client: Client, device_id: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self {
            client,
            device_id: device_id.into(),
            api_version: api_version.into(),
        }
    }

    pub fn with_timeout(
        timeout: Duration,
        device_id: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::new(client, device_id, api_version))
    }
}

/// 驗證順序：錯誤旗標 → 缺少 data → 地區
pub fn validate_session_payload(payload: serde_json::Value) -> Result<SessionData> {
    let envelope: ApiEnvelope<serde_json::Value> = serde_json::from_value(payload)?;

    if envelope.error {
        return Err(UnblockError::ApiError {
            message: envelope
                .message
                .unwrap_or_else(|| "unknown API error".to_string()),
        });
    }

    let data = envelope.data.ok_or_else(|| UnblockError::ApiError {
        message: "response carried no session data".to_string(),
    })?;
    let session: SessionData = serde_json::from_value(data)?;

    if session.country_code != REQUIRED_COUNTRY {
        return Err(UnblockError::WrongRegion {
            country_code: session.country_code,
        });
    }

    Ok(session)
}

#[async_trait]
impl SessionSource for HttpSessionFetcher {
    async fn fetch(&self, server: &ServerDescriptor, auth: Option<&str>) -> Result<SessionData> {
        let mut query: Vec<(&str, &str)> = vec![
            ("device_id", self.device_id.as_str()),
            ("api_ver", self.api_version.as_str()),
            ("device_type", server.device_type.as_str()),
            ("access_token", server.access_token.as_str()),
        ];
        if let Some(auth) = auth {
            query.push(("auth", auth));
        }

        tracing::debug!(
            "Requesting session from {} as {} (auth token: {})",
            server.endpoint,
            server.device_type,
            auth.is_some()
        );
        let response = self.client.get(&server.endpoint).query(&query).send().await?;

        let status = response.status();
        tracing::debug!("Session response status: {}", status);
        if !status.is_success() {
            return Err(UnblockError::Transport {
                status: status.as_u16(),
            });
        }

        let payload: serde_json::Value = response.json().await?;
        let session = validate_session_payload(payload)?;
        tracing::debug!(
            "Got US session {} from {}",
            redact(&session.session_id),
            server.device_type
        );
        Ok(session)
    }
}
