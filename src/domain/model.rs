use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// 專案主檔（`/projects/{id}` 回應的 `project` 片段）。
/// 未被消費的欄位透過 flatten 保留，匯出時不會遺失。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: i64,
    pub name: Option<String>,
    pub number: Option<String>,
    pub status_id: Option<i64>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub cost_centre_number: Option<String>,
    pub type_id: Option<i64>,
    pub priority_id: Option<i64>,
    pub planning_type: Option<String>,
    pub billing_type: Option<String>,
    pub status_memo: Option<String>,
    pub subject: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Project {
    pub fn display_name(&self) -> String {
        format!(
            "{} ({})",
            self.name.as_deref().unwrap_or("Unbekannt"),
            self.number.as_deref().unwrap_or("-")
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Kpi {
    pub id: String,
    pub name: Option<String>,
    pub period: Option<String>,
    pub value: Value,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Kpi {
    /// 非數值的 KPI 視為缺值
    pub fn numeric_value(&self) -> Option<f64> {
        self.value.as_f64()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanningEntry {
    pub id: Option<i64>,
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
    pub planned_work: f64,
    pub actual_work: f64,
    pub start: Option<String>,
    pub end: Option<String>,
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl PlanningEntry {
    /// 沒有 type 的排程項目視為里程碑
    pub fn is_milestone(&self) -> bool {
        self.entry_type
            .as_deref()
            .map_or(true, |t| t.trim().is_empty())
    }

    pub fn progress_pct(&self) -> f64 {
        if self.planned_work > 0.0 {
            self.actual_work / self.planned_work * 100.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Invoice {
    pub id: Option<i64>,
    pub number: Option<String>,
    pub amount: Option<f64>,
    pub discount: Option<f64>,
    pub vat: Option<f64>,
    pub status_id: Option<i64>,
    pub date: Option<String>,
    pub due_date: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusDefinition {
    pub id: i64,
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// 單一專案的匯出片段。子查詢失敗時該欄位為空，專案本身仍保留。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectBundle {
    pub project: Option<Project>,
    pub kpis: Vec<Kpi>,
    pub planning_entries: Vec<PlanningEntry>,
}

/// 專案 ID → 匯出片段。BTreeMap 讓序列化順序穩定。
pub type ProjectExport = BTreeMap<i64, ProjectBundle>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasterData {
    pub project_statuses: Vec<StatusDefinition>,
    pub context_types: Option<Value>,
    pub customfield_definitions: BTreeMap<String, Value>,
}

/// Join 結果：每個匯出的專案一筆，即使 KPI／狀態查詢失敗也存在。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombinedRecord {
    pub project_id: i64,
    pub project_data: Option<Project>,
    pub kpis: Vec<Kpi>,
    pub planning_entries: Vec<PlanningEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_info: Option<StatusDefinition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customfield_definitions: Option<Value>,
}
