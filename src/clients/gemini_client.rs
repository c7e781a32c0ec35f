/// Gemini API 客户端
///
/// 调用 Generative Language REST 接口 `models/{model}:generateContent`，
/// 通过 `responseMimeType` + `responseSchema` 约束返回 JSON。
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::{read_api_key, ContentBackend, GenerationRequest};
use crate::config::Config;
use crate::error::{AppError, AppResult, LlmError};

/// Gemini 客户端
pub struct GeminiClient {
    http: reqwest::Client,
    api_base_url: String,
    api_key_env: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GeminiClient {
    /// 创建新的 Gemini 客户端
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base_url: config.llm_api_base_url.clone(),
            api_key_env: config.llm_api_key_env.clone(),
        }
    }

    fn endpoint(&self, model_id: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base_url.trim_end_matches('/'),
            model_id
        )
    }
}

#[async_trait]
impl ContentBackend for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> AppResult<Option<String>> {
        let model_id = request.model.id();
        let api_key = read_api_key(&self.api_key_env)?;
        let url = self.endpoint(model_id);

        debug!("调用 Gemini API，模型: {}", model_id);
        debug!("提示词长度: {} 字符", request.prompt.chars().count());

        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": request.schema,
                "temperature": request.temperature
            }
        });

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!("Gemini API 请求失败: {}", e);
                AppError::llm_api_failed(model_id, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!("Gemini API 返回错误状态: HTTP {}", status);
            return Err(LlmError::BadStatus {
                model: model_id.to_string(),
                status: status.as_u16(),
                body: error_body,
            }
            .into());
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::llm_api_failed(model_id, e))?;

        if let Some(reason) = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            warn!("Gemini 拒绝了请求 (模型: {}): {}", model_id, reason);
        }

        let Some(candidate) = parsed.candidates.into_iter().next() else {
            return Ok(None);
        };

        if let Some(reason) = candidate.finish_reason.as_deref() {
            debug!("finishReason: {}", reason);
        }

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        debug!("Gemini API 调用成功，返回 {} 字符", text.chars().count());

        if text.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(text))
        }
    }

    fn backend_name(&self) -> &'static str {
        "gemini"
    }
}
