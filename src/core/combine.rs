use crate::domain::model::{CombinedRecord, MasterData, ProjectExport, StatusDefinition};
use std::collections::HashMap;

/// 只有這個 context type 的 definitions 會被接到 combined record 上
pub const PROJECT_CONTEXT_TYPE: &str = "Project";

/// 將專案匯出與 master data join 成每專案一筆的 denormalized record。
/// 狀態以 status id 查表，查不到就不帶 status_info；"Project" context 的
/// custom field definitions 為所有 record 共用同一份。
pub fn combine(project_export: &ProjectExport, masterdata: &MasterData) -> Vec<CombinedRecord> {
    let status_lookup: HashMap<i64, &StatusDefinition> = masterdata
        .project_statuses
        .iter()
        .map(|status| (status.id, status))
        .collect();

    let project_definitions = masterdata.customfield_definitions.get(PROJECT_CONTEXT_TYPE);

    project_export
        .iter()
        .map(|(project_id, bundle)| {
            let status_info = bundle
                .project
                .as_ref()
                .and_then(|project| project.status_id)
                .and_then(|status_id| status_lookup.get(&status_id))
                .map(|status| (*status).clone());

            CombinedRecord {
                project_id: *project_id,
                project_data: bundle.project.clone(),
                kpis: bundle.kpis.clone(),
                planning_entries: bundle.planning_entries.clone(),
                status_info,
                customfield_definitions: project_definitions.cloned(),
            }
        })
        .collect()
}
