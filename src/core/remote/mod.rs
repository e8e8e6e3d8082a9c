//! Remote studio API transport.
//!
//! `StudioRemote` is the seam between the resource cache and the studio
//! server: the cache talks only to this trait, so tests substitute an
//! in-memory implementation and the application wires in
//! [`HttpStudioRemote`].

mod http;

pub use http::HttpStudioRemote;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::resources::{ResourceKind, ResourceRecord};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{method} {path} returned {status}: {body}")]
    Status {
        method: &'static str,
        path: String,
        status: u16,
        /// Response body text, best-effort; may be empty.
        body: String,
    },

    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid attachment: {0}")]
    Attachment(String),
}

impl RemoteError {
    /// HTTP status of the failed call, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            RemoteError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

// ============================================================================
// Mutation Payloads
// ============================================================================

/// Binary part of a mutation payload (a preset preview image, typically).
#[derive(Debug, Clone)]
pub struct Attachment {
    /// Form field name the server expects, e.g. `"image"`.
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Mutation payload: text fields in submission order plus an optional
/// binary attachment, encoded as a multipart form on the wire.
#[derive(Debug, Clone, Default)]
pub struct ResourceDraft {
    pub fields: Vec<(String, String)>,
    pub attachment: Option<Attachment>,
}

impl ResourceDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Attach a binary part.
    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Value of a text field, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Typed payload for style preset create/update calls.
#[derive(Debug, Clone, Default)]
pub struct StylePresetDraft {
    pub name: String,
    pub positive_prompt: String,
    pub negative_prompt: String,
    /// Optional preview image, submitted under the `image` field.
    pub image: Option<Attachment>,
}

impl From<StylePresetDraft> for ResourceDraft {
    fn from(preset: StylePresetDraft) -> Self {
        let mut draft = ResourceDraft::new()
            .text("name", preset.name)
            .text("positive_prompt", preset.positive_prompt)
            .text("negative_prompt", preset.negative_prompt);
        if let Some(image) = preset.image {
            draft = draft.attachment(image);
        }
        draft
    }
}

// ============================================================================
// StudioRemote Trait
// ============================================================================

/// Remote studio resource endpoints.
///
/// One method per protocol operation; implementations map each call to
/// `GET <base>/`, `GET <base>/i/<id>`, `POST <base>/`, `PATCH <base>/i/<id>`
/// or `DELETE <base>/i/<id>` for the kind's base path.
#[async_trait]
pub trait StudioRemote: Send + Sync {
    /// Fetch the full collection of a kind.
    async fn list(&self, kind: ResourceKind) -> RemoteResult<Vec<ResourceRecord>>;

    /// Fetch one record by id.
    async fn get(&self, kind: ResourceKind, id: &str) -> RemoteResult<ResourceRecord>;

    /// Create a record, returning the stored form.
    async fn create(&self, kind: ResourceKind, draft: &ResourceDraft)
        -> RemoteResult<ResourceRecord>;

    /// Replace an existing record's fields, returning the stored form.
    async fn update(
        &self,
        kind: ResourceKind,
        id: &str,
        draft: &ResourceDraft,
    ) -> RemoteResult<ResourceRecord>;

    /// Delete a record.
    async fn delete(&self, kind: ResourceKind, id: &str) -> RemoteResult<()>;
}
