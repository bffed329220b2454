use crate::domain::model::{CombinedRecord, Kpi};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const KPI_PERIOD_TOTAL: &str = "TOTAL";
pub const KPI_WORK_PLAN: &str = "WorkTotalPlan";
pub const KPI_WORK_ACTUAL: &str = "WorkTotalActual";

/// 總分達到這個值就視為 critical
pub const CRITICAL_THRESHOLD: u32 = 3;

/// 紅綠燈分級，純粹由進度百分比決定，門檻為固定常數。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusIndicator {
    Green,
    Yellow,
    Red,
    Gray,
}

impl StatusIndicator {
    pub fn from_progress(progress_pct: f64) -> Self {
        if progress_pct >= 90.0 {
            Self::Green
        } else if progress_pct >= 50.0 {
            Self::Yellow
        } else if progress_pct > 0.0 {
            Self::Red
        } else {
            Self::Gray
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Green => "🟢",
            Self::Yellow => "🟡",
            Self::Red => "🔴",
            Self::Gray => "⚪",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
            Self::Gray => "gray",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectMetrics {
    pub work_plan: f64,
    pub work_actual: f64,
    pub variance: f64,
    pub variance_pct: f64,
    pub progress_pct: f64,
    pub indicator: StatusIndicator,
}

impl ProjectMetrics {
    /// 從 KPI 清單取出 TOTAL 期間的 plan／actual 工時。缺少或非數值的
    /// KPI 視為 0。
    pub fn from_kpis(kpis: &[Kpi]) -> Self {
        let mut work_plan = 0.0;
        let mut work_actual = 0.0;

        for kpi in kpis {
            if kpi.period.as_deref() != Some(KPI_PERIOD_TOTAL) {
                continue;
            }
            match kpi.id.as_str() {
                KPI_WORK_PLAN => work_plan = kpi.numeric_value().unwrap_or(0.0),
                KPI_WORK_ACTUAL => work_actual = kpi.numeric_value().unwrap_or(0.0),
                _ => {}
            }
        }

        let progress_pct = if work_plan > 0.0 {
            work_actual / work_plan * 100.0
        } else {
            0.0
        };
        let variance = work_actual - work_plan;
        let variance_pct = if work_plan > 0.0 {
            variance / work_plan * 100.0
        } else {
            0.0
        };

        Self {
            work_plan,
            work_actual,
            variance,
            variance_pct,
            progress_pct,
            indicator: StatusIndicator::from_progress(progress_pct),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalityScore {
    pub score: u32,
    pub is_critical: bool,
    pub overdue_entries: usize,
}

/// 加法式風險評分：紅燈 +3、黃燈 +1；進度落後但工時已大量消耗 +2；
/// 偏差超過計畫的 10% +2；狀態備註含風險關鍵字 +1；每個逾期且未完成的
/// planning entry +1。reference_date 由呼叫端傳入，函式本身不看時鐘。
pub fn criticality(
    record: &CombinedRecord,
    metrics: &ProjectMetrics,
    risk_keywords: &[String],
    reference_date: NaiveDate,
) -> CriticalityScore {
    let mut score = match metrics.indicator {
        StatusIndicator::Red => 3,
        StatusIndicator::Yellow => 1,
        _ => 0,
    };

    if metrics.progress_pct < 80.0 && metrics.work_actual > 0.8 * metrics.work_plan {
        score += 2;
    }

    if metrics.work_plan > 0.0 && metrics.variance.abs() > 0.10 * metrics.work_plan {
        score += 2;
    }

    if let Some(project) = &record.project_data {
        let memo = format!(
            "{} {}",
            project.status_memo.as_deref().unwrap_or(""),
            project.subject.as_deref().unwrap_or("")
        )
        .to_lowercase();
        if risk_keywords
            .iter()
            .any(|keyword| !keyword.is_empty() && memo.contains(&keyword.to_lowercase()))
        {
            score += 1;
        }
    }

    let overdue_entries = record
        .planning_entries
        .iter()
        .filter(|entry| {
            entry
                .end
                .as_deref()
                .and_then(parse_date)
                .map(|end| end < reference_date && entry.progress_pct() < 100.0)
                .unwrap_or(false)
        })
        .count();
    score += overdue_entries as u32;

    CriticalityScore {
        score,
        is_critical: score >= CRITICAL_THRESHOLD,
        overdue_entries,
    }
}

/// 接受 "YYYY-MM-DD" 或以其開頭的 ISO 時間戳
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{PlanningEntry, Project};

    fn total_kpi(id: &str, value: f64) -> Kpi {
        Kpi {
            id: id.to_string(),
            period: Some(KPI_PERIOD_TOTAL.to_string()),
            value: serde_json::json!(value),
            ..Default::default()
        }
    }

    fn metrics_for(plan: f64, actual: f64) -> ProjectMetrics {
        ProjectMetrics::from_kpis(&[
            total_kpi(KPI_WORK_PLAN, plan),
            total_kpi(KPI_WORK_ACTUAL, actual),
        ])
    }

    #[test]
    fn test_zero_plan_means_zero_progress() {
        let metrics = metrics_for(0.0, 50.0);
        assert_eq!(metrics.progress_pct, 0.0);
        assert_eq!(metrics.variance, 50.0);
        assert_eq!(metrics.variance_pct, 0.0);
        assert_eq!(metrics.indicator, StatusIndicator::Gray);
    }

    #[test]
    fn test_green_boundary_is_inclusive() {
        let metrics = metrics_for(100.0, 90.0);
        assert_eq!(metrics.progress_pct, 90.0);
        assert_eq!(metrics.indicator, StatusIndicator::Green);
    }

    #[test]
    fn test_yellow_boundary_is_inclusive() {
        let metrics = metrics_for(100.0, 50.0);
        assert_eq!(metrics.indicator, StatusIndicator::Yellow);
    }

    #[test]
    fn test_low_progress_is_red() {
        let metrics = metrics_for(100.0, 49.0);
        assert_eq!(metrics.indicator, StatusIndicator::Red);
    }

    #[test]
    fn test_no_actual_work_is_gray() {
        let metrics = metrics_for(100.0, 0.0);
        assert_eq!(metrics.indicator, StatusIndicator::Gray);
    }

    #[test]
    fn test_kpis_outside_total_period_are_ignored() {
        let mut monthly = total_kpi(KPI_WORK_ACTUAL, 500.0);
        monthly.period = Some("MONTH".to_string());

        let metrics = ProjectMetrics::from_kpis(&[total_kpi(KPI_WORK_PLAN, 100.0), monthly]);
        assert_eq!(metrics.work_plan, 100.0);
        assert_eq!(metrics.work_actual, 0.0);
    }

    #[test]
    fn test_non_numeric_kpi_value_counts_as_zero() {
        let mut plan = total_kpi(KPI_WORK_PLAN, 0.0);
        plan.value = serde_json::json!("n/a");

        let metrics = ProjectMetrics::from_kpis(&[plan, total_kpi(KPI_WORK_ACTUAL, 10.0)]);
        assert_eq!(metrics.work_plan, 0.0);
        assert_eq!(metrics.work_actual, 10.0);
    }

    fn keywords() -> Vec<String> {
        crate::config::api::DEFAULT_RISK_KEYWORDS
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 18).unwrap()
    }

    #[test]
    fn test_criticality_example_scores_six() {
        // red indicator (+3), 15% variance (+2), one overdue milestone (+1)
        let record = CombinedRecord {
            project_id: 1,
            project_data: Some(Project {
                id: 1,
                ..Default::default()
            }),
            kpis: vec![
                total_kpi(KPI_WORK_PLAN, 100.0),
                total_kpi(KPI_WORK_ACTUAL, 15.0),
            ],
            planning_entries: vec![PlanningEntry {
                end: Some("2025-12-01".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let metrics = ProjectMetrics::from_kpis(&record.kpis);
        assert_eq!(metrics.indicator, StatusIndicator::Red);

        let result = criticality(&record, &metrics, &keywords(), today());
        assert_eq!(result.overdue_entries, 1);
        assert_eq!(result.score, 6);
        assert!(result.is_critical);
    }

    #[test]
    fn test_healthy_project_is_not_critical() {
        let record = CombinedRecord {
            project_id: 2,
            project_data: Some(Project::default()),
            kpis: vec![
                total_kpi(KPI_WORK_PLAN, 100.0),
                total_kpi(KPI_WORK_ACTUAL, 95.0),
            ],
            ..Default::default()
        };
        let metrics = ProjectMetrics::from_kpis(&record.kpis);
        assert_eq!(metrics.indicator, StatusIndicator::Green);

        let result = criticality(&record, &metrics, &keywords(), today());
        assert_eq!(result.score, 0);
        assert!(!result.is_critical);
    }

    #[test]
    fn test_risk_keyword_in_memo_adds_one() {
        let record = CombinedRecord {
            project_id: 3,
            project_data: Some(Project {
                status_memo: Some("Budget KRITISCH, Lieferant im Verzug".to_string()),
                ..Default::default()
            }),
            kpis: vec![
                total_kpi(KPI_WORK_PLAN, 100.0),
                total_kpi(KPI_WORK_ACTUAL, 95.0),
            ],
            ..Default::default()
        };
        let metrics = ProjectMetrics::from_kpis(&record.kpis);

        // two keywords match but the memo contributes a single point
        let result = criticality(&record, &metrics, &keywords(), today());
        assert_eq!(result.score, 1);
        assert!(!result.is_critical);
    }

    #[test]
    fn test_overdue_entries_count_individually() {
        let overdue = |end: &str| PlanningEntry {
            end: Some(end.to_string()),
            planned_work: 10.0,
            actual_work: 5.0,
            ..Default::default()
        };
        let done = PlanningEntry {
            end: Some("2025-06-01".to_string()),
            planned_work: 10.0,
            actual_work: 10.0,
            ..Default::default()
        };
        let future = PlanningEntry {
            end: Some("2027-01-01T00:00:00".to_string()),
            ..Default::default()
        };

        let record = CombinedRecord {
            project_id: 4,
            planning_entries: vec![overdue("2025-01-01"), overdue("2025-02-01"), done, future],
            ..Default::default()
        };
        let metrics = ProjectMetrics::from_kpis(&record.kpis);

        let result = criticality(&record, &metrics, &keywords(), today());
        assert_eq!(result.overdue_entries, 2);
        // plan and actual are both zero, so no other condition fires
        assert_eq!(result.score, 2);
    }

    #[test]
    fn test_parse_date_accepts_datetime_strings() {
        assert_eq!(
            parse_date("2026-01-18T09:30:00"),
            NaiveDate::from_ymd_opt(2026, 1, 18)
        );
        assert_eq!(parse_date("2026-01-18"), NaiveDate::from_ymd_opt(2026, 1, 18));
        assert_eq!(parse_date("gestern"), None);
    }
}
