use crate::utils::error::{ExportError, Result};
use crate::utils::validation::{self, Validate};

pub const DEFAULT_BASE_URL: &str = "https://dashboard-examples.blueant.cloud/rest/v1";
pub const API_KEY_ENV: &str = "API_KEY";

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
/// 每個專案抓取週期之間的固定延遲（rate-limit 保護，非退避策略）
pub const DEFAULT_PROJECT_DELAY_MS: u64 = 200;
pub const DEFAULT_MASTERDATA_DELAY_MS: u64 = 150;

/// Custom field definitions 會逐一查詢的 context types
pub const DEFAULT_CONTEXT_TYPES: [&str; 20] = [
    "Project",
    "Task",
    "Ticket",
    "Person",
    "Department",
    "Invoice",
    "Risk",
    "VoucherCollective",
    "Voucher",
    "Quote",
    "Proposal",
    "Todo",
    "Worktime",
    "StatusReport",
    "QuotePosition",
    "Portfolio",
    "Program",
    "Stakeholder",
    "ProjectResource",
    "Event",
];

/// 狀態備註中的風險關鍵字（德文，可由設定覆寫）
pub const DEFAULT_RISK_KEYWORDS: [&str; 5] =
    ["kritisch", "risiko", "problem", "eskalation", "verzug"];

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_seconds: u64,
    pub project_delay_ms: u64,
    pub masterdata_delay_ms: u64,
    pub context_types: Vec<String>,
    pub risk_keywords: Vec<String>,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            project_delay_ms: DEFAULT_PROJECT_DELAY_MS,
            masterdata_delay_ms: DEFAULT_MASTERDATA_DELAY_MS,
            context_types: DEFAULT_CONTEXT_TYPES.iter().map(|s| s.to_string()).collect(),
            risk_keywords: DEFAULT_RISK_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// 從環境讀取 API key，缺少時在任何網路操作之前就失敗。
    pub fn from_env() -> Result<Self> {
        let api_key =
            std::env::var(API_KEY_ENV).map_err(|_| ExportError::MissingConfigError {
                field: API_KEY_ENV.to_string(),
            })?;
        Ok(Self::new(DEFAULT_BASE_URL, api_key))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Validate for ApiConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("base_url", &self.base_url)?;
        validation::validate_non_empty_string("api_key", &self.api_key)?;
        validation::validate_positive_number("timeout_seconds", self.timeout_seconds, 1)?;
        Ok(())
    }
}
