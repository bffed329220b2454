use crate::domain::model::{MasterData, ProjectBundle, ProjectExport};
use crate::domain::ports::ProjectApi;
use std::time::Duration;

/// 逐一匯出所有專案的 detail／KPI／planning entries。
/// 任一子查詢失敗只清空該欄位，專案不會被丟掉，後續專案照常處理。
pub async fn export_all_projects<A: ProjectApi>(api: &A, request_delay: Duration) -> ProjectExport {
    let mut export = ProjectExport::new();

    let projects = match api.get_projects().await {
        Ok(projects) => projects,
        Err(e) => {
            tracing::error!("❌ Project listing failed: {}", e);
            return export;
        }
    };

    tracing::info!("✅ {} projects found", projects.len());

    for (idx, listed) in projects.iter().enumerate() {
        let project_id = listed.id;
        tracing::info!("📦 Exporting project {}", project_id);

        let project = match api.get_project(project_id).await {
            Ok(project) => Some(project),
            Err(e) => {
                tracing::warn!("⚠️ Detail fetch failed for project {}: {}", project_id, e);
                None
            }
        };

        let kpis = match api.get_project_kpis(project_id).await {
            Ok(kpis) => kpis,
            Err(e) => {
                tracing::warn!("⚠️ KPI fetch failed for project {}: {}", project_id, e);
                Vec::new()
            }
        };

        let planning_entries = match api.get_planning_entries(project_id).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("⚠️ Planning fetch failed for project {}: {}", project_id, e);
                Vec::new()
            }
        };

        export.insert(
            project_id,
            ProjectBundle {
                project,
                kpis,
                planning_entries,
            },
        );

        // 固定延遲避免觸發上游 rate limit
        if idx + 1 < projects.len() {
            tokio::time::sleep(request_delay).await;
        }
    }

    export
}

/// 匯出 master data：狀態清單、context type 清單、每個 context type 的
/// custom field definitions。單一 context type 失敗會被跳過（記 log）。
pub async fn export_all_masterdata<A: ProjectApi>(
    api: &A,
    context_types: &[String],
    request_delay: Duration,
) -> MasterData {
    let mut master = MasterData::default();

    tracing::info!("🔧 Loading master data");

    match api.get_project_statuses().await {
        Ok(statuses) => {
            tracing::info!("✅ {} project statuses loaded", statuses.len());
            master.project_statuses = statuses;
        }
        Err(e) => tracing::warn!("⚠️ Status list fetch failed: {}", e),
    }
    tokio::time::sleep(request_delay).await;

    match api.get_customfield_contexttypes().await {
        Ok(response) => master.context_types = Some(response),
        Err(e) => tracing::warn!("⚠️ Context type list fetch failed: {}", e),
    }

    tracing::info!(
        "🔍 Loading definitions for {} context types",
        context_types.len()
    );
    for context_type in context_types {
        match api.get_customfield_definitions(context_type).await {
            Ok(definitions) => {
                master
                    .customfield_definitions
                    .insert(context_type.clone(), definitions);
            }
            Err(e) => tracing::warn!("⚠️ Skipping context type {}: {}", context_type, e),
        }
        tokio::time::sleep(request_delay).await;
    }

    tracing::info!(
        "✅ Definitions loaded for {} of {} context types",
        master.customfield_definitions.len(),
        context_types.len()
    );

    master
}
