use blueant_export::{export_all_projects, ApiClient, ApiConfig};
use httpmock::prelude::*;
use std::time::Duration;

fn client_for(server: &MockServer) -> ApiClient {
    let config = ApiConfig::new(server.base_url(), "test-key");
    ApiClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_export_produces_one_bundle_per_listed_project() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET)
            .path("/projects")
            .header("authorization", "Bearer test-key");
        then.status(200).json_body(serde_json::json!({
            "projects": [{"id": 1}, {"id": 2}]
        }));
    });

    server.mock(|when, then| {
        when.method(GET).path("/projects/1");
        then.status(200).json_body(serde_json::json!({
            "project": {"id": 1, "name": "Alpha", "number": "P-001", "statusId": 10}
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/projects/1/kpis");
        then.status(200).json_body(serde_json::json!({
            "kpis": [
                {"id": "WorkTotalPlan", "period": "TOTAL", "value": 100.0},
                {"id": "WorkTotalActual", "period": "TOTAL", "value": 80.0}
            ]
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/projects/1/planningentries");
        then.status(200).json_body(serde_json::json!({
            "planningEntries": [
                {"id": 11, "type": "Task", "plannedWork": 40.0, "actualWork": 40.0}
            ]
        }));
    });

    // project 2: detail and KPIs fail, planning succeeds
    server.mock(|when, then| {
        when.method(GET).path("/projects/2");
        then.status(500).body("boom");
    });
    server.mock(|when, then| {
        when.method(GET).path("/projects/2/kpis");
        then.status(503);
    });
    server.mock(|when, then| {
        when.method(GET).path("/projects/2/planningentries");
        then.status(200).json_body(serde_json::json!({
            "planningEntries": [{"id": 21, "plannedWork": 8.0}]
        }));
    });

    let client = client_for(&server);
    let export = export_all_projects(&client, Duration::ZERO).await;

    // no entry silently dropped, even with failing sub-fetches
    assert_eq!(export.len(), 2);

    let alpha = &export[&1];
    assert_eq!(
        alpha.project.as_ref().and_then(|p| p.name.as_deref()),
        Some("Alpha")
    );
    assert_eq!(alpha.kpis.len(), 2);
    assert_eq!(alpha.planning_entries.len(), 1);

    let degraded = &export[&2];
    assert!(degraded.project.is_none());
    assert!(degraded.kpis.is_empty());
    assert_eq!(degraded.planning_entries.len(), 1);
    assert!(degraded.planning_entries[0].is_milestone());
}

#[tokio::test]
async fn test_failed_listing_yields_empty_export() {
    let server = MockServer::start();
    let listing_mock = server.mock(|when, then| {
        when.method(GET).path("/projects");
        then.status(502);
    });

    let client = client_for(&server);
    let export = export_all_projects(&client, Duration::ZERO).await;

    listing_mock.assert();
    assert!(export.is_empty());
}

#[tokio::test]
async fn test_duplicate_listed_ids_collapse_to_one_entry() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/projects");
        then.status(200).json_body(serde_json::json!({
            "projects": [{"id": 5}, {"id": 5}]
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/projects/5");
        then.status(200).json_body(serde_json::json!({
            "project": {"id": 5, "name": "Twice"}
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/projects/5/kpis");
        then.status(200).json_body(serde_json::json!({"kpis": []}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/projects/5/planningentries");
        then.status(200).json_body(serde_json::json!({"planningEntries": []}));
    });

    let client = client_for(&server);
    let export = export_all_projects(&client, Duration::ZERO).await;

    assert_eq!(export.len(), 1);
    assert!(export.contains_key(&5));
}
