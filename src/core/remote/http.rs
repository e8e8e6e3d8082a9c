//! HTTP implementation of the studio transport.

use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use url::Url;

use crate::config::ClientConfig;
use crate::core::resources::{ResourceKind, ResourceRecord};

use super::{RemoteError, RemoteResult, ResourceDraft, StudioRemote};

/// Studio API client speaking the `/api/v1` resource protocol.
#[derive(Debug)]
pub struct HttpStudioRemote {
    client: Client,
    base_url: Url,
}

impl HttpStudioRemote {
    pub fn new(config: &ClientConfig) -> RemoteResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Self::with_client(client, &config.remote.base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> RemoteResult<Self> {
        let mut base_url = Url::parse(base_url)?;
        // Url::join drops the last path segment unless it ends in a slash.
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }
        Ok(Self { client, base_url })
    }

    /// `<base>/api/v1/<kind path>/`
    fn collection_url(&self, kind: ResourceKind) -> RemoteResult<Url> {
        Ok(self
            .base_url
            .join(&format!("api/v1/{}/", kind.base_path()))?)
    }

    /// `<base>/api/v1/<kind path>/i/<id>`
    fn item_url(&self, kind: ResourceKind, id: &str) -> RemoteResult<Url> {
        Ok(self
            .base_url
            .join(&format!("api/v1/{}/i/{}", kind.base_path(), id))?)
    }

    /// Encode a draft as a multipart form: attachment first, then the
    /// text fields in draft order.
    fn build_form(draft: &ResourceDraft) -> RemoteResult<multipart::Form> {
        let mut form = multipart::Form::new();
        if let Some(attachment) = &draft.attachment {
            let part = multipart::Part::bytes(attachment.bytes.clone())
                .file_name(attachment.file_name.clone())
                .mime_str(&attachment.mime)
                .map_err(|e| RemoteError::Attachment(e.to_string()))?;
            form = form.part(attachment.field.clone(), part);
        }
        for (name, value) in &draft.fields {
            form = form.text(name.clone(), value.clone());
        }
        Ok(form)
    }

    async fn check_status(
        method: &'static str,
        url: &Url,
        response: Response,
    ) -> RemoteResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::Status {
            method,
            path: url.path().to_string(),
            status,
            body,
        })
    }
}

#[async_trait]
impl StudioRemote for HttpStudioRemote {
    async fn list(&self, kind: ResourceKind) -> RemoteResult<Vec<ResourceRecord>> {
        let url = self.collection_url(kind)?;
        let response = self.client.get(url.clone()).send().await?;
        let response = Self::check_status("GET", &url, response).await?;
        Ok(response.json().await?)
    }

    async fn get(&self, kind: ResourceKind, id: &str) -> RemoteResult<ResourceRecord> {
        let url = self.item_url(kind, id)?;
        let response = self.client.get(url.clone()).send().await?;
        let response = Self::check_status("GET", &url, response).await?;
        Ok(response.json().await?)
    }

    async fn create(
        &self,
        kind: ResourceKind,
        draft: &ResourceDraft,
    ) -> RemoteResult<ResourceRecord> {
        let url = self.collection_url(kind)?;
        let response = self
            .client
            .post(url.clone())
            .multipart(Self::build_form(draft)?)
            .send()
            .await?;
        let response = Self::check_status("POST", &url, response).await?;
        Ok(response.json().await?)
    }

    async fn update(
        &self,
        kind: ResourceKind,
        id: &str,
        draft: &ResourceDraft,
    ) -> RemoteResult<ResourceRecord> {
        let url = self.item_url(kind, id)?;
        let response = self
            .client
            .patch(url.clone())
            .multipart(Self::build_form(draft)?)
            .send()
            .await?;
        let response = Self::check_status("PATCH", &url, response).await?;
        Ok(response.json().await?)
    }

    async fn delete(&self, kind: ResourceKind, id: &str) -> RemoteResult<()> {
        let url = self.item_url(kind, id)?;
        let response = self.client.delete(url.clone()).send().await?;
        Self::check_status("DELETE", &url, response).await?;
        Ok(())
    }
}
