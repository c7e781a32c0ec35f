/// OpenAI 兼容 API 客户端
///
/// 用于通过兼容 OpenAI API 的代理服务（如 menshen、OneAPI 等）调用 Gemini 模型。
/// 这类代理通常不支持 `responseSchema`，因此把 schema 写进系统消息，
/// 并在解析前去掉模型可能包上的 ```json 代码块。
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, warn};

use super::{read_api_key, ContentBackend, GenerationRequest};
use crate::config::Config;
use crate::error::{AppError, AppResult};

/// LLM 客户端（OpenAI 兼容）
pub struct LlmClient {
    api_base_url: String,
    api_key_env: String,
}

impl LlmClient {
    /// 创建新的 LLM 客户端
    pub fn new(config: &Config) -> Self {
        Self {
            api_base_url: config.llm_api_base_url.clone(),
            api_key_env: config.llm_api_key_env.clone(),
        }
    }

    /// 构建系统消息：要求只返回符合 schema 的 JSON
    fn build_system_message(schema: &serde_json::Value) -> String {
        let schema_text = serde_json::to_string_pretty(schema).unwrap_or_default();
        format!(
            "Bạn chỉ trả về một đối tượng JSON hợp lệ, không kèm giải thích, \
             tuân thủ đúng schema sau:\n{}",
            schema_text
        )
    }
}

/// 去掉 ```json ... ``` 代码块包装，没有包装时原样返回
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let re = match Regex::new(r"(?s)^```[a-zA-Z]*\s*(.*?)\s*```$") {
        Ok(re) => re,
        Err(_) => return trimmed,
    };
    re.captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(trimmed)
}

#[async_trait]
impl ContentBackend for LlmClient {
    async fn generate(&self, request: &GenerationRequest) -> AppResult<Option<String>> {
        let model_id = request.model.id();
        let api_key = read_api_key(&self.api_key_env)?;

        debug!("调用 LLM API，模型: {}", model_id);
        debug!("用户消息长度: {} 字符", request.prompt.chars().count());

        // 每次调用都用当前的 API Key 重新创建客户端
        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(&self.api_base_url);
        let client = Client::with_config(openai_config);

        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(Self::build_system_message(&request.schema))
            .build()
            .map_err(|e| AppError::llm_api_failed(model_id, e))?;

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(request.prompt.as_str())
            .build()
            .map_err(|e| AppError::llm_api_failed(model_id, e))?;

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(model_id)
            .messages(vec![
                ChatCompletionRequestMessage::System(system_msg),
                ChatCompletionRequestMessage::User(user_msg),
            ])
            .temperature(request.temperature)
            .build()
            .map_err(|e| AppError::llm_api_failed(model_id, e))?;

        let response = client.chat().create(chat_request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::llm_api_failed(model_id, e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| strip_code_fence(&text).to_string())
            .filter(|text| !text.is_empty());

        Ok(content)
    }

    fn backend_name(&self) -> &'static str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn test_system_message_embeds_schema() {
        let schema = crate::models::exam_response_schema();
        let msg = LlmClient::build_system_message(&schema);
        assert!(msg.contains("\"mcqPart\""));
        assert!(msg.contains("\"generalGuide\""));
    }

    /// 测试 OpenAI 兼容代理的连通性
    ///
    /// 运行方式：
    /// ```bash
    /// LLM_API_BASE_URL=... GEMINI_API_KEY=... cargo test test_openai_proxy_live -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_openai_proxy_live() {
        let _ = tracing_subscriber::fmt::try_init();

        let config = Config::from_env().expect("读取配置失败");
        let client = LlmClient::new(&config);
        let request = GenerationRequest {
            model: crate::models::AiModel::Gemini25Flash,
            prompt: crate::services::build_exam_prompt(&crate::models::ExamConfig::default()),
            schema: crate::models::exam_response_schema(),
            temperature: crate::models::EXAM_TEMPERATURE,
        };

        let text = client.generate(&request).await.expect("调用失败");
        println!("{:?}", text);
        assert!(text.is_some());
    }
}
