use crate::config::api::ApiConfig;
use crate::domain::model::{Invoice, Kpi, PlanningEntry, Project, StatusDefinition};
use crate::domain::ports::ProjectApi;
use crate::utils::error::{ExportError, Result};
use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// Blue Ant REST client。帶固定 bearer token，逾時由 transport 層強制。
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key)).map_err(
            |e| ExportError::ConfigError {
                message: format!("API key is not a valid header value: {}", e),
            },
        )?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json(&self, endpoint: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("❌ {} {}: {}", status.as_u16(), url, body);
            return Err(ExportError::HttpStatusError {
                status: status.as_u16(),
                url,
                body,
            });
        }

        Ok(response.json().await?)
    }

    /// 取出 envelope 中指定 key 的片段。缺少或格式不符時退回預設值（記 warn）。
    fn fragment<T>(envelope: &Value, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        match envelope.get(key) {
            Some(value) => match serde_json::from_value(value.clone()) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::warn!("⚠️ Malformed '{}' fragment: {}", key, e);
                    T::default()
                }
            },
            None => {
                tracing::warn!("⚠️ Response has no '{}' key", key);
                T::default()
            }
        }
    }
}

#[async_trait]
impl ProjectApi for ApiClient {
    async fn get_projects(&self) -> Result<Vec<Project>> {
        let envelope = self.get_json("/projects").await?;
        Ok(Self::fragment(&envelope, "projects"))
    }

    async fn get_project(&self, project_id: i64) -> Result<Project> {
        let envelope = self.get_json(&format!("/projects/{}", project_id)).await?;
        Ok(Self::fragment(&envelope, "project"))
    }

    async fn get_project_kpis(&self, project_id: i64) -> Result<Vec<Kpi>> {
        let envelope = self
            .get_json(&format!("/projects/{}/kpis", project_id))
            .await?;
        Ok(Self::fragment(&envelope, "kpis"))
    }

    async fn get_planning_entries(&self, project_id: i64) -> Result<Vec<PlanningEntry>> {
        let envelope = self
            .get_json(&format!("/projects/{}/planningentries", project_id))
            .await?;
        Ok(Self::fragment(&envelope, "planningEntries"))
    }

    async fn get_project_invoices(&self, project_id: i64) -> Result<Vec<Invoice>> {
        let envelope = self
            .get_json(&format!("/projects/{}/invoices", project_id))
            .await?;
        Ok(Self::fragment(&envelope, "invoices"))
    }

    async fn get_invoice(&self, invoice_id: i64) -> Result<Invoice> {
        let envelope = self.get_json(&format!("/invoices/{}", invoice_id)).await?;
        Ok(Self::fragment(&envelope, "invoice"))
    }

    async fn get_project_resources(&self, project_id: i64) -> Result<Vec<Value>> {
        let envelope = self
            .get_json(&format!("/projects/{}/resources", project_id))
            .await?;
        Ok(Self::fragment(&envelope, "resources"))
    }

    async fn get_project_roles(&self, project_id: i64) -> Result<Vec<Value>> {
        let envelope = self
            .get_json(&format!("/projects/{}/roles", project_id))
            .await?;
        Ok(Self::fragment(&envelope, "roles"))
    }

    async fn get_project_status_history(&self, project_id: i64) -> Result<Vec<Value>> {
        let envelope = self
            .get_json(&format!("/projects/{}/statushistory", project_id))
            .await?;
        Ok(Self::fragment(&envelope, "statusHistory"))
    }

    async fn get_project_statuses(&self) -> Result<Vec<StatusDefinition>> {
        let envelope = self.get_json("/masterdata/projects/statuses").await?;
        Ok(Self::fragment(&envelope, "projectStatus"))
    }

    async fn get_customfield_contexttypes(&self) -> Result<Value> {
        self.get_json("/masterdata/customfield/contexttypes").await
    }

    async fn get_customfield_definitions(&self, context_type: &str) -> Result<Value> {
        self.get_json(&format!(
            "/masterdata/customfield/definitions/{}",
            context_type
        ))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn test_client(server: &MockServer) -> ApiClient {
        let config = ApiConfig::new(server.base_url(), "test-key");
        ApiClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_get_projects_unwraps_envelope_and_sends_bearer_token() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/projects")
                .header("authorization", "Bearer test-key")
                .header("accept", "application/json");
            then.status(200).json_body(serde_json::json!({
                "projects": [
                    {"id": 1, "name": "Alpha"},
                    {"id": 2, "name": "Beta"}
                ]
            }));
        });

        let client = test_client(&server);
        let projects = client.get_projects().await.unwrap();

        api_mock.assert();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].id, 1);
        assert_eq!(projects[1].name.as_deref(), Some("Beta"));
    }

    #[tokio::test]
    async fn test_non_2xx_maps_to_http_status_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/projects/7");
            then.status(404).body("not found");
        });

        let client = test_client(&server);
        let err = client.get_project(7).await.unwrap_err();

        match err {
            ExportError::HttpStatusError { status, body, .. } => {
                assert_eq!(status, 404);
                assert_eq!(body, "not found");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_envelope_key_defaults_to_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/projects/3/kpis");
            then.status(200).json_body(serde_json::json!({"unexpected": true}));
        });

        let client = test_client(&server);
        let kpis = client.get_project_kpis(3).await.unwrap();
        assert!(kpis.is_empty());
    }

    #[tokio::test]
    async fn test_status_list_uses_project_status_key() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/masterdata/projects/statuses");
            then.status(200).json_body(serde_json::json!({
                "projectStatus": [
                    {"id": 10, "name": "aktiv"},
                    {"id": 20, "name": "abgeschlossen"}
                ]
            }));
        });

        let client = test_client(&server);
        let statuses = client.get_project_statuses().await.unwrap();
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[1].name.as_deref(), Some("abgeschlossen"));
    }
}
