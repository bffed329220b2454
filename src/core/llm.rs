use crate::core::metrics::ProjectMetrics;
use crate::utils::error::{ExportError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";

/// 本地推論比一般 API 慢得多
const GENERATE_TIMEOUT_SECONDS: u64 = 60;

/// 本地 Ollama endpoint 的最小 client：單次 blocking 呼叫，
/// 文字進、文字出，沒有串流。
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(GENERATE_TIMEOUT_SECONDS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        tracing::debug!("POST {} (model: {})", url, self.model);

        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExportError::LlmError {
                message: format!("HTTP {} from {}: {}", status.as_u16(), url, body),
            });
        }

        let body: GenerateResponse = response.json().await?;
        Ok(body.response)
    }
}

/// 專案控制視角的分析 prompt（德文，對齊報表的語言）
pub fn analysis_prompt(project_name: &str, metrics: &ProjectMetrics) -> String {
    format!(
        "Du bist ein Projektcontrolling-Experte.\n\
         Analysiere kurz und präzise die Plan-vs-Ist-Abweichung.\n\
         \n\
         Projekt: {}\n\
         Geplanter Aufwand: {:.2} Stunden\n\
         Tatsächlicher Aufwand: {:.2} Stunden\n\
         Abweichung: {:.2} Stunden ({:.2} %)\n\
         \n\
         Erstelle:\n\
         - eine kurze Bewertung\n\
         - eine mögliche Ursache\n\
         - eine konkrete Empfehlung\n\
         \n\
         Antworte sachlich, professionell und kompakt.\n",
        project_name, metrics.work_plan, metrics.work_actual, metrics.variance, metrics.variance_pct
    )
}
