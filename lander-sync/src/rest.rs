//! Section store backed by a JSON REST API.
//!
//! Routes, relative to `base_url`:
//!
//! | call               | request                               |
//! |--------------------|---------------------------------------|
//! | list sections      | `GET {sections}?type=…`               |
//! | create             | `POST {sections}`                     |
//! | update             | `PUT {sections}/{id}`                 |
//! | delete             | `DELETE {sections}/{id}`              |
//! | publish/unpublish  | `POST {sections}/{id}/publish` etc.   |
//! | reorder            | `PUT {sections}/reorder`              |
//! | list collections   | `GET {collections}`                   |
//!
//! Responses may be bare or wrapped as `{ "data": … }`.

use crate::error::{SyncError, SyncResult};
use crate::store::SectionStore;
use async_trait::async_trait;
use lander_types::{
    Collection, FieldErrors, OrderUpdate, SectionId, SectionPayload, SectionRecord, SectionType,
};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Connection settings for [`RestSectionStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RestStoreConfig {
    /// API root, e.g. `https://shop.example.com/api/admin`.
    pub base_url: String,
    pub sections_path: String,
    pub collections_path: String,
    /// Whole-request timeout.
    pub timeout_secs: u64,
    /// Sent as a bearer token when set.
    pub auth_token: Option<String>,
}

impl Default for RestStoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            sections_path: "sections".to_string(),
            collections_path: "collections".to_string(),
            timeout_secs: 30,
            auth_token: None,
        }
    }
}

/// Error body returned by the API on rejected writes.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<BTreeMap<String, ServerMessages>>,
}

/// A field's messages: a list, or a single string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ServerMessages {
    Many(Vec<String>),
    One(String),
}

impl ServerMessages {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::Many(v) => v,
            Self::One(s) => vec![s],
        }
    }
}

#[derive(Serialize)]
struct ReorderBody<'a> {
    sections: &'a [OrderUpdate],
}

/// HTTP implementation of [`SectionStore`].
pub struct RestSectionStore {
    config: RestStoreConfig,
    client: Client,
}

impl RestSectionStore {
    pub fn new(config: RestStoreConfig) -> SyncResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SyncError::Config(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &RestStoreConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn sections_url(&self) -> String {
        self.url(&self.config.sections_path)
    }

    fn section_url(&self, id: &SectionId, action: Option<&str>) -> String {
        match action {
            Some(action) => format!("{}/{}/{}", self.sections_url(), id, action),
            None => format!("{}/{}", self.sections_url(), id),
        }
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        let request = self.client.request(method, url);
        match &self.config.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends the request and maps transport failures and error statuses.
    async fn send(&self, request: RequestBuilder, what: &str) -> SyncResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| SyncError::Network(format!("{what} failed: {e}")))?;
        if response.status().is_success() {
            return Ok(response);
        }
        let err = error_from_response(response, what).await;
        warn!(operation = what, error = %err, "store rejected request");
        Err(err)
    }
}

async fn error_from_response(response: Response, what: &str) -> SyncError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
    let message = body
        .message
        .clone()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            if text.trim().is_empty() {
                format!("{what} failed")
            } else {
                text.clone()
            }
        });

    if status == StatusCode::NOT_FOUND {
        return SyncError::NotFound(message);
    }
    match body.errors {
        Some(fields) if status.is_client_error() => {
            let errors = FieldErrors::from_server(
                Some(message.clone()),
                fields.into_iter().map(|(k, v)| (k, v.into_vec())),
            );
            SyncError::Validation { message, errors }
        }
        _ => SyncError::Http {
            status: status.as_u16(),
            message,
        },
    }
}

/// Reads a JSON body, unwrapping a `{ "data": … }` envelope.
async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> SyncResult<T> {
    let value: Value = response
        .json()
        .await
        .map_err(|e| SyncError::Serialization(format!("failed to parse {what} response: {e}")))?;
    let value = match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };
    Ok(serde_json::from_value(value)?)
}

#[async_trait]
impl SectionStore for RestSectionStore {
    async fn list_sections(
        &self,
        section_type: Option<SectionType>,
    ) -> SyncResult<Vec<SectionRecord>> {
        let mut request = self.request(Method::GET, self.sections_url());
        if let Some(t) = section_type {
            request = request.query(&[("type", t.as_str())]);
        }
        let response = self.send(request, "list sections").await?;
        let sections: Vec<SectionRecord> = read_json(response, "list sections").await?;
        debug!(count = sections.len(), "listed sections");
        Ok(sections)
    }

    async fn create_section(&self, payload: SectionPayload) -> SyncResult<SectionRecord> {
        let request = self
            .request(Method::POST, self.sections_url())
            .json(&payload);
        let response = self.send(request, "create section").await?;
        let record: SectionRecord = read_json(response, "create section").await?;
        info!(section_id = %record.id, section_type = %record.section_type, "created section");
        Ok(record)
    }

    async fn update_section(
        &self,
        id: &SectionId,
        payload: SectionPayload,
    ) -> SyncResult<SectionRecord> {
        let request = self
            .request(Method::PUT, self.section_url(id, None))
            .json(&payload);
        let response = self.send(request, "update section").await?;
        let record = read_json(response, "update section").await?;
        debug!(section_id = %id, "updated section");
        Ok(record)
    }

    async fn delete_section(&self, id: &SectionId) -> SyncResult<()> {
        let request = self.request(Method::DELETE, self.section_url(id, None));
        self.send(request, "delete section").await?;
        info!(section_id = %id, "deleted section");
        Ok(())
    }

    async fn publish_section(&self, id: &SectionId) -> SyncResult<SectionRecord> {
        let request = self.request(Method::POST, self.section_url(id, Some("publish")));
        let response = self.send(request, "publish section").await?;
        read_json(response, "publish section").await
    }

    async fn unpublish_section(&self, id: &SectionId) -> SyncResult<SectionRecord> {
        let request = self.request(Method::POST, self.section_url(id, Some("unpublish")));
        let response = self.send(request, "unpublish section").await?;
        read_json(response, "unpublish section").await
    }

    async fn reorder_sections(&self, updates: Vec<OrderUpdate>) -> SyncResult<()> {
        let url = format!("{}/reorder", self.sections_url());
        let request = self
            .request(Method::PUT, url)
            .json(&ReorderBody { sections: &updates });
        self.send(request, "reorder sections").await?;
        debug!(count = updates.len(), "reordered sections");
        Ok(())
    }

    async fn list_collections(&self) -> SyncResult<Vec<Collection>> {
        let request = self.request(Method::GET, self.url(&self.config.collections_path));
        let response = self.send(request, "list collections").await?;
        read_json(response, "list collections").await
    }
}
