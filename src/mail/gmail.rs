//! Gmail v1 REST adapter.
//!
//! Token acquisition is the caller's problem; this client only spends an
//! already-issued bearer token. Both timeouts are deliberate: a run is only
//! as fast as its slowest message fetch, so a hung provider call must not
//! hang the pipeline.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use crate::mail::{Label, ListCriteria, MailError, MailSource, RawMessage};

const GMAIL_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct GmailClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl GmailClient {
    pub fn new(access_token: impl Into<String>) -> Self {
        let http = reqwest::ClientBuilder::new()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            base_url: GMAIL_API_BASE.to_string(),
            access_token: access_token.into(),
        }
    }

    /// Point the client at a different API root. Used by tests to talk to a
    /// local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base = base_url.into();
        self.base_url = base.trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url, MailError> {
        Url::parse(&format!("{}/{}", self.base_url, path))
            .map_err(|err| MailError::InvalidResponse(format!("bad endpoint url: {err}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, MailError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(MailError::from_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(MailError::from_status(status));
        }

        response
            .json::<T>()
            .await
            .map_err(|err| MailError::InvalidResponse(err.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct LabelsResponse {
    #[serde(default)]
    labels: Vec<Label>,
}

#[derive(Debug, Deserialize)]
struct MessageListResponse {
    #[serde(default)]
    messages: Vec<MessageRef>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

#[async_trait]
impl MailSource for GmailClient {
    #[instrument(skip(self))]
    async fn list_labels(&self) -> Result<Vec<Label>, MailError> {
        let url = self.endpoint("users/me/labels")?;
        let response: LabelsResponse = self.get_json(url).await?;
        Ok(response.labels)
    }

    #[instrument(skip(self))]
    async fn list_message_ids(&self, criteria: ListCriteria) -> Result<Vec<String>, MailError> {
        let mut url = self.endpoint("users/me/messages")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("maxResults", &criteria.max.to_string());
            if let Some(label_id) = &criteria.label_id {
                pairs.append_pair("labelIds", label_id);
            } else if let Some(query) = &criteria.query {
                pairs.append_pair("q", query);
            }
        }

        let response: MessageListResponse = self.get_json(url).await?;
        Ok(response.messages.into_iter().map(|m| m.id).collect())
    }

    #[instrument(skip(self), fields(message_id = %id))]
    async fn get_message(&self, id: &str) -> Result<RawMessage, MailError> {
        let mut url = self.endpoint(&format!("users/me/messages/{id}"))?;
        url.query_pairs_mut().append_pair("format", "full");
        self.get_json(url).await
    }
}
