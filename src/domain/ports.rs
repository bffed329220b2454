use crate::domain::model::{Invoice, Kpi, PlanningEntry, Project, StatusDefinition};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 上游 REST 資源的讀取介面，每個 endpoint 一個操作。
/// context type 與 definition 回應保留原始 JSON，不做型別化。
#[async_trait]
pub trait ProjectApi: Send + Sync {
    async fn get_projects(&self) -> Result<Vec<Project>>;
    async fn get_project(&self, project_id: i64) -> Result<Project>;
    async fn get_project_kpis(&self, project_id: i64) -> Result<Vec<Kpi>>;
    async fn get_planning_entries(&self, project_id: i64) -> Result<Vec<PlanningEntry>>;
    async fn get_project_invoices(&self, project_id: i64) -> Result<Vec<Invoice>>;
    async fn get_invoice(&self, invoice_id: i64) -> Result<Invoice>;
    async fn get_project_resources(&self, project_id: i64) -> Result<Vec<Value>>;
    async fn get_project_roles(&self, project_id: i64) -> Result<Vec<Value>>;
    async fn get_project_status_history(&self, project_id: i64) -> Result<Vec<Value>>;
    async fn get_project_statuses(&self) -> Result<Vec<StatusDefinition>>;
    async fn get_customfield_contexttypes(&self) -> Result<Value>;
    async fn get_customfield_definitions(&self, context_type: &str) -> Result<Value>;
}
