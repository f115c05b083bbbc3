//! REST client for the environment-manager console API.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use mimeo_common::{CatalogObject, ObjectType};

/// Client errors
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{status}: {message}")]
    Api { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Collection pages arrive as `{"items": [...]}`; a missing list counts
/// as empty, matching how the consoles answer sparse projects.
#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    items: Vec<Value>,
}

/// Console API client
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ApiClient {
    /// Create a new client. Certificate verification is skipped unless
    /// `verify_ssl` is set, since lab consoles run on self-signed certs.
    pub fn new(base_url: &str, api_key: &str, verify_ssl: bool) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .danger_accept_invalid_certs(!verify_ssl)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build headers for requests
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Ok(value) = HeaderValue::from_str(&self.api_key) {
            headers.insert("X-API-KEY", value);
        }

        headers
    }

    /// URL of one object collection.
    pub fn collection_url(&self, project: &str, object_type: ObjectType) -> String {
        format!(
            "{}/apis/{}/v1/projects/{}/{}",
            self.base_url,
            object_type.api_group(),
            urlencoding::encode(project),
            object_type
        )
    }

    /// URL of one object's version history.
    pub fn versions_url(&self, project: &str, object_type: ObjectType, name: &str) -> String {
        format!(
            "{}/{}/versions",
            self.collection_url(project, object_type),
            urlencoding::encode(name)
        )
    }

    /// Fetch the newest page of a collection.
    pub async fn list_objects(&self, project: &str, object_type: ObjectType) -> Result<Vec<Value>> {
        let response = self
            .client
            .get(self.collection_url(project, object_type))
            .query(&[
                ("limit", "100"),
                ("offset", "0"),
                ("order", "DESC"),
                ("orderBy", "createdAt"),
            ])
            .headers(self.headers())
            .send()
            .await?;

        let page: ListResponse = self.handle_response(response).await?;
        Ok(page.items)
    }

    /// Fetch every stored version of one object.
    pub async fn list_versions(
        &self,
        project: &str,
        object_type: ObjectType,
        name: &str,
    ) -> Result<Vec<Value>> {
        let response = self
            .client
            .get(self.versions_url(project, object_type, name))
            .headers(self.headers())
            .send()
            .await?;

        let page: ListResponse = self.handle_response(response).await?;
        Ok(page.items)
    }

    /// Publish one cleaned object into the target collection.
    pub async fn publish(
        &self,
        project: &str,
        object_type: ObjectType,
        document: &CatalogObject,
    ) -> Result<()> {
        let response = self
            .client
            .post(self.collection_url(project, object_type))
            .headers(self.headers())
            .json(document)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            Err(ClientError::Api { status, message })
        }
    }

    /// Handle API response
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new("https://console.example.com/", "k3y", false).unwrap()
    }

    #[test]
    fn test_collection_url_per_api_group() {
        let client = client();
        assert_eq!(
            client.collection_url("system-catalog", ObjectType::EnvironmentTemplates),
            "https://console.example.com/apis/eaas.envmgmt.io/v1/projects/system-catalog/environmenttemplates"
        );
        assert_eq!(
            client.collection_url("system-catalog", ObjectType::ComputeProfiles),
            "https://console.example.com/apis/paas.envmgmt.io/v1/projects/system-catalog/computeprofiles"
        );
    }

    #[test]
    fn test_versions_url_encodes_name() {
        let client = client();
        assert_eq!(
            client.versions_url("my project", ObjectType::WorkflowHandlers, "hook runner"),
            "https://console.example.com/apis/eaas.envmgmt.io/v1/projects/my%20project/workflowhandlers/hook%20runner/versions"
        );
    }

    #[test]
    fn test_list_response_defaults_items() {
        let page: ListResponse = serde_json::from_str("{}").unwrap();
        assert!(page.items.is_empty());

        let page: ListResponse =
            serde_json::from_str("{\"items\": [{\"metadata\": {}}], \"total\": 1}").unwrap();
        assert_eq!(page.items.len(), 1);
    }
}
