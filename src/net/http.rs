//! HTTP implementation of [`LayoutStore`] over `reqwest`.
//!
//! Thin wrapper around the four dashboard endpoints. Status handling and body
//! parsing are delegated to the pure helpers in the parent module.

use std::time::Duration;

use tracing::{debug, warn};

use super::{
    DashboardData, LayoutStore, PersistenceError, SaveLayoutRequest, WidgetDefinition, error_message_from_body,
    parse_catalog_body, parse_layout_body,
};
use crate::layout::DashboardLayout;
use crate::net::data::coerce_dashboard_data;

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpLayoutStore {
    http: reqwest::Client,
    base_url: String,
}

impl HttpLayoutStore {
    /// Build a store rooted at `base_url` (e.g. `http://host/api`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeouts: HttpTimeouts) -> Result<Self, PersistenceError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| PersistenceError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send a request and return `(status, body)`.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<(u16, String), PersistenceError> {
        let response = request
            .send()
            .await
            .map_err(|e| PersistenceError::Request(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| PersistenceError::Request(e.to_string()))?;
        Ok((status, text))
    }

    async fn get_ok(&self, path: &str) -> Result<String, PersistenceError> {
        let (status, body) = self.send(self.http.get(self.url(path))).await?;
        if !(200..300).contains(&status) {
            return Err(PersistenceError::Response { status, message: error_message_from_body(&body) });
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl LayoutStore for HttpLayoutStore {
    async fn load_layout(&self, user_id: &str) -> Result<Option<DashboardLayout>, PersistenceError> {
        let request = self
            .http
            .get(self.url("/dashboard/layouts"))
            .query(&[("user_id", user_id)]);
        let (status, body) = self.send(request).await?;
        if status == 404 {
            debug!(%user_id, "no saved layout");
            return Ok(None);
        }
        if !(200..300).contains(&status) {
            return Err(PersistenceError::Response { status, message: error_message_from_body(&body) });
        }
        parse_layout_body(&body)
    }

    async fn save_layout(&self, user_id: &str, layout: &DashboardLayout) -> Result<(), PersistenceError> {
        let request = self
            .http
            .post(self.url("/dashboard/layouts"))
            .json(&SaveLayoutRequest::new(user_id, layout));
        let (status, body) = self.send(request).await?;
        if !(200..300).contains(&status) {
            let message = error_message_from_body(&body);
            warn!(status, ?message, "layout save rejected");
            return Err(PersistenceError::Response { status, message });
        }
        Ok(())
    }

    async fn widget_catalog(&self) -> Result<Vec<WidgetDefinition>, PersistenceError> {
        let body = self.get_ok("/dashboard/widgets").await?;
        parse_catalog_body(&body)
    }

    async fn dashboard_data(&self) -> Result<DashboardData, PersistenceError> {
        let body = self.get_ok("/dashboard/data").await?;
        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| PersistenceError::Parse(e.to_string()))?;
        Ok(coerce_dashboard_data(value))
    }
}
