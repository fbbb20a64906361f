//! JSON-over-HTTP client for a managed month backend.

use std::time::Duration;

use reqwest::{
    blocking::{Client, RequestBuilder, Response},
    StatusCode,
};
use tracing::{debug, warn};

use crate::{
    config::RemoteSettings,
    core::registry::DimensionRegistry,
    domain::{MonthKey, MonthRecords},
    errors::StoreError,
};

use super::{ensure_same_month, MonthStore, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Remote backend reached through `{base}/months/{YYYY-MM}` and
/// `{base}/dimensions`.
pub struct RemoteMonthStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RemoteMonthStore {
    pub fn new(settings: &RemoteSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| StoreError::Unavailable(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            client,
            base_url: settings.url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn get(&self, path: &str) -> Result<Option<String>> {
        let url = self.endpoint(path);
        debug!(%url, "remote GET");
        let response = self.authorized(self.client.get(&url)).send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(checked(response)?.text()?))
    }

    fn put(&self, path: &str, body: String) -> Result<()> {
        let url = self.endpoint(path);
        debug!(%url, "remote PUT");
        let response = self
            .authorized(self.client.put(&url))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()?;
        checked(response)?;
        Ok(())
    }
}

fn checked(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let detail = response.text().unwrap_or_default();
    warn!(%status, "remote store rejected request");
    Err(StoreError::Rejected(format!("{status}: {}", detail.trim())))
}

impl MonthStore for RemoteMonthStore {
    fn backend_name(&self) -> &'static str {
        "remote"
    }

    fn load_month(&self, month: &MonthKey) -> Result<Option<MonthRecords>> {
        match self.get(&format!("months/{month}"))? {
            Some(body) => Ok(Some(serde_json::from_str(&body)?)),
            None => Ok(None),
        }
    }

    fn save_month(&self, month: &MonthKey, records: &MonthRecords) -> Result<()> {
        ensure_same_month(month, records)?;
        self.put(&format!("months/{month}"), serde_json::to_string(records)?)
    }

    fn list_months(&self) -> Result<Vec<MonthKey>> {
        let Some(body) = self.get("months")? else {
            return Ok(Vec::new());
        };
        let raw: Vec<String> = serde_json::from_str(&body)?;
        let mut months: Vec<MonthKey> = raw.iter().filter_map(|key| key.parse().ok()).collect();
        months.sort();
        Ok(months)
    }

    fn load_dimensions(&self) -> Result<DimensionRegistry> {
        match self.get("dimensions")? {
            Some(body) => Ok(serde_json::from_str(&body)?),
            None => Ok(DimensionRegistry::default()),
        }
    }

    fn save_dimensions(&self, registry: &DimensionRegistry) -> Result<()> {
        self.put("dimensions", serde_json::to_string(registry)?)
    }
}
