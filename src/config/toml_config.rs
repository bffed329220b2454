use crate::config::api::{ApiConfig, API_KEY_ENV, DEFAULT_BASE_URL};
use crate::utils::error::{ExportError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 選用的 TOML 設定檔。`${VAR}` 會以環境變數代換，
/// 沒有對應變數時保留原樣。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub api: ApiSection,
    pub export: ExportSection,
    pub analysis: AnalysisSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub project_delay_ms: Option<u64>,
    pub masterdata_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSection {
    pub context_types: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSection {
    pub risk_keywords: Option<Vec<String>>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ExportError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ExportError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 代換 `${VAR_NAME}` 形式的環境變數
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    /// 疊出最終的 ApiConfig。API key 優先取檔案內的值，
    /// 沒有（或代換失敗留下 `${...}`）就退回環境變數，兩者皆無是致命錯誤。
    pub fn into_api_config(self) -> Result<ApiConfig> {
        let api_key = match self.api.api_key {
            Some(key) if !key.trim().is_empty() && !key.starts_with("${") => key,
            _ => std::env::var(API_KEY_ENV).map_err(|_| ExportError::MissingConfigError {
                field: API_KEY_ENV.to_string(),
            })?,
        };

        let base_url = self
            .api
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut config = ApiConfig::new(base_url, api_key);

        if let Some(timeout) = self.api.timeout_seconds {
            config.timeout_seconds = timeout;
        }
        if let Some(delay) = self.api.project_delay_ms {
            config.project_delay_ms = delay;
        }
        if let Some(delay) = self.api.masterdata_delay_ms {
            config.masterdata_delay_ms = delay;
        }
        if let Some(context_types) = self.export.context_types {
            config.context_types = context_types;
        }
        if let Some(keywords) = self.analysis.risk_keywords {
            config.risk_keywords = keywords;
        }

        Ok(config)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(base_url) = &self.api.base_url {
            validation::validate_url("api.base_url", base_url)?;
        }
        if let Some(timeout) = self.api.timeout_seconds {
            validation::validate_positive_number("api.timeout_seconds", timeout, 1)?;
        }
        if let Some(context_types) = &self.export.context_types {
            for context_type in context_types {
                validation::validate_non_empty_string("export.context_types", context_type)?;
            }
        }
        Ok(())
    }
}
