//! 生成能力的客户端
//!
//! `ContentBackend` 是"给定提示词和 schema，返回 JSON 文本或失败"这一能力的抽象。
//! 回退逻辑只依赖这个 trait，测试时可以替换为脚本化的实现。

pub mod gemini_client;
pub mod llm_client;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::{Config, LlmBackend};
use crate::error::{AppResult, LlmError};
use crate::models::AiModel;

pub use gemini_client::GeminiClient;
pub use llm_client::LlmClient;

/// 一次生成请求
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model: AiModel,
    pub prompt: String,
    pub schema: Value,
    pub temperature: f32,
}

#[async_trait]
pub trait ContentBackend: Send + Sync {
    /// 发送请求，返回响应文本；远端没有返回任何文本时返回 `Ok(None)`
    async fn generate(&self, request: &GenerationRequest) -> AppResult<Option<String>>;

    /// 后端名称（日志用）
    fn backend_name(&self) -> &'static str;
}

/// 根据配置创建后端
pub fn backend_from_config(config: &Config) -> Box<dyn ContentBackend> {
    match config.llm_backend {
        LlmBackend::Gemini => Box::new(GeminiClient::new(config)),
        LlmBackend::OpenAi => Box::new(LlmClient::new(config)),
    }
}

/// 从环境变量读取 API Key
///
/// 每次调用时读取，先读配置指定的变量，再退回到 `API_KEY`。
pub(crate) fn read_api_key(var_name: &str) -> AppResult<String> {
    [var_name, "API_KEY"]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
        .ok_or_else(|| {
            LlmError::MissingApiKey {
                var_name: var_name.to_string(),
            }
            .into()
        })
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::error::AppError;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// 脚本中的一步
    pub enum Scripted {
        Text(String),
        Empty,
        NetworkError(String),
    }

    /// 按顺序返回预设结果的后端，并记录每次请求的模型
    pub struct ScriptedBackend {
        script: Mutex<VecDeque<Scripted>>,
        calls: Mutex<Vec<AiModel>>,
    }

    impl ScriptedBackend {
        pub fn new(script: Vec<Scripted>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<AiModel> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ContentBackend for ScriptedBackend {
        async fn generate(&self, request: &GenerationRequest) -> AppResult<Option<String>> {
            self.calls.lock().unwrap().push(request.model);
            let step = self.script.lock().unwrap().pop_front();
            match step {
                Some(Scripted::Text(text)) => Ok(Some(text)),
                Some(Scripted::Empty) | None => Ok(None),
                Some(Scripted::NetworkError(msg)) => Err(AppError::llm_api_failed(
                    request.model.id(),
                    std::io::Error::new(std::io::ErrorKind::ConnectionReset, msg),
                )),
            }
        }

        fn backend_name(&self) -> &'static str {
            "scripted"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_api_key_prefers_configured_var() {
        std::env::set_var("HISTORY_EXAM_TEST_KEY_A", "  key-a  ");
        assert_eq!(read_api_key("HISTORY_EXAM_TEST_KEY_A").unwrap(), "key-a");
    }

    #[test]
    fn test_backend_from_config() {
        let mut config = Config::default();
        assert_eq!(backend_from_config(&config).backend_name(), "gemini");
        config.llm_backend = LlmBackend::OpenAi;
        assert_eq!(backend_from_config(&config).backend_name(), "openai");
    }
}
