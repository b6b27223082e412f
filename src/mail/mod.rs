//! Mail provider boundary.
//!
//! Everything the pipeline needs from the inbox goes through [`MailSource`];
//! the Gmail REST adapter in [`gmail`] is the production implementation and
//! tests substitute their own.

pub mod decode;
pub mod errors;
pub mod gmail;
pub mod label;

pub use errors::MailError;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A named message grouping, resolved to a provider id before listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: String,
    pub name: String,
}

/// Listing scope: either a resolved label id or a provider search query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListCriteria {
    pub label_id: Option<String>,
    pub query: Option<String>,
    pub max: usize,
}

impl ListCriteria {
    pub fn for_label(label_id: impl Into<String>, max: usize) -> Self {
        Self {
            label_id: Some(label_id.into()),
            query: None,
            max,
        }
    }

    pub fn for_query(query: impl Into<String>, max: usize) -> Self {
        Self {
            label_id: None,
            query: Some(query.into()),
            max,
        }
    }
}

/// One full message as the provider returns it: headers plus a tree of MIME
/// parts whose bodies are base64url-encoded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMessage {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub payload: Option<MessagePart>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePart {
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default)]
    pub body: Option<PartBody>,
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartBody {
    #[serde(default)]
    pub data: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailSource: Send + Sync {
    async fn list_labels(&self) -> Result<Vec<Label>, MailError>;

    async fn list_message_ids(&self, criteria: ListCriteria) -> Result<Vec<String>, MailError>;

    async fn get_message(&self, id: &str) -> Result<RawMessage, MailError>;
}
