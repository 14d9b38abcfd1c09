//! accessibility.cloud equipment API client.

use chrono::Utc;

use crate::config::ServerConfig;
use crate::facility::Snapshot;

use super::error::SourceError;
use super::parse::parse_equipment_response;

/// Client for the equipment status endpoint.
#[derive(Debug, Clone)]
pub struct EquipmentClient {
    http: reqwest::Client,
    url: String,
    app_token: String,
}

impl EquipmentClient {
    /// Create a new client from the server configuration.
    pub fn new(config: &ServerConfig) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .build()?;

        Ok(Self {
            http,
            url: config.source_url.clone(),
            app_token: config.app_token.clone(),
        })
    }

    /// Fetch all facility statuses as a snapshot stamped with the fetch time.
    pub async fn fetch(&self) -> Result<Snapshot, SourceError> {
        let mut request = self.http.get(&self.url);
        if !self.app_token.is_empty() {
            request = request.query(&[("appToken", self.app_token.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(SourceError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let fetched_at = Utc::now();
        let facilities = parse_equipment_response(&body, fetched_at)?;

        Ok(Snapshot::new(facilities, fetched_at))
    }
}
