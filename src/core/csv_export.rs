use crate::domain::model::{Invoice, Project};
use crate::domain::ports::ProjectApi;
use crate::utils::error::Result;
use serde::Serialize;
use serde_json::Value;
use std::io::Write;
use std::time::Duration;

/// Excel 需要 BOM 才會把分號分隔的 UTF-8 檔案讀對
const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// 一列 = 一個 (project, invoice) 組合。沒有發票的專案輸出單獨一列，
/// 發票欄位留空。複合資料以 JSON 字串內嵌。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InvoiceRow {
    pub project_id: i64,
    pub project_name: Option<String>,
    pub project_number: Option<String>,
    pub project_cost_center: Option<String>,
    pub project_start: Option<String>,
    pub project_end: Option<String>,
    pub project_status_id: Option<i64>,
    pub project_type_id: Option<i64>,
    pub project_priority_id: Option<i64>,
    pub planning_type: Option<String>,
    pub billing_type: Option<String>,
    pub invoice_id: Option<i64>,
    pub invoice_number: Option<String>,
    pub invoice_amount: Option<f64>,
    pub invoice_discount: Option<f64>,
    pub invoice_vat: Option<f64>,
    pub invoice_status_id: Option<i64>,
    pub invoice_date: Option<String>,
    pub invoice_due_date: Option<String>,
    pub project_kpis: String,
    pub project_planning_entries: String,
    pub project_resources: String,
    pub project_roles: String,
    pub project_status_history: String,
}

fn json_column<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "[]".to_string())
}

fn project_columns(project_id: i64, project: &Project) -> InvoiceRow {
    InvoiceRow {
        project_id,
        project_name: project.name.clone(),
        project_number: project.number.clone(),
        project_cost_center: project.cost_centre_number.clone(),
        project_start: project.start.clone(),
        project_end: project.end.clone(),
        project_status_id: project.status_id,
        project_type_id: project.type_id,
        project_priority_id: project.priority_id,
        planning_type: project.planning_type.clone(),
        billing_type: project.billing_type.clone(),
        ..Default::default()
    }
}

fn invoice_columns(row: &mut InvoiceRow, listed: &Invoice, detail: Option<Invoice>) {
    let detail = detail.unwrap_or_default();
    row.invoice_id = listed.id;
    // 清單項目是 detail 查詢失敗時的後備來源
    row.invoice_number = detail.number.clone().or_else(|| listed.number.clone());
    row.invoice_amount = detail.amount.or(listed.amount);
    row.invoice_discount = detail.discount;
    row.invoice_vat = detail.vat;
    row.invoice_status_id = detail.status_id;
    row.invoice_date = detail.date.clone();
    row.invoice_due_date = detail.due_date.clone();
}

/// 逐專案抓取發票與附屬資料並攤平成列。detail 失敗的專案會被跳過
/// （記 log），其餘子查詢失敗以空集合代替。
pub async fn collect_invoice_rows<A: ProjectApi>(
    api: &A,
    request_delay: Duration,
) -> Vec<InvoiceRow> {
    let mut rows = Vec::new();

    let projects = match api.get_projects().await {
        Ok(projects) => projects,
        Err(e) => {
            tracing::error!("❌ Project listing failed: {}", e);
            return rows;
        }
    };

    for (idx, listed) in projects.iter().enumerate() {
        let project_id = listed.id;
        tracing::info!("📦 Collecting invoices for project {}", project_id);

        let project = match api.get_project(project_id).await {
            Ok(project) => project,
            Err(e) => {
                tracing::warn!("⚠️ Skipping project {} (detail failed): {}", project_id, e);
                continue;
            }
        };

        let invoices = api.get_project_invoices(project_id).await.unwrap_or_default();
        let kpis = api.get_project_kpis(project_id).await.unwrap_or_default();
        let planning = api.get_planning_entries(project_id).await.unwrap_or_default();
        let resources: Vec<Value> = api
            .get_project_resources(project_id)
            .await
            .unwrap_or_default();
        let roles: Vec<Value> = api.get_project_roles(project_id).await.unwrap_or_default();
        let status_history: Vec<Value> = api
            .get_project_status_history(project_id)
            .await
            .unwrap_or_default();

        let mut base = project_columns(project_id, &project);
        base.project_kpis = json_column(&kpis);
        base.project_planning_entries = json_column(&planning);
        base.project_resources = json_column(&resources);
        base.project_roles = json_column(&roles);
        base.project_status_history = json_column(&status_history);

        if invoices.is_empty() {
            rows.push(base);
        } else {
            for listed_invoice in &invoices {
                let detail = match listed_invoice.id {
                    Some(invoice_id) => api.get_invoice(invoice_id).await.ok(),
                    None => None,
                };
                let mut row = base.clone();
                invoice_columns(&mut row, listed_invoice, detail);
                rows.push(row);
            }
        }

        if idx + 1 < projects.len() {
            tokio::time::sleep(request_delay).await;
        }
    }

    rows
}

/// 分號分隔、UTF-8 含 BOM，欄名取自 InvoiceRow 的欄位名。
pub fn write_invoice_csv<W: Write>(rows: &[InvoiceRow], mut writer: W) -> Result<()> {
    writer.write_all(&UTF8_BOM)?;

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(writer);

    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;

    Ok(())
}
