//! 试卷生成服务 - 业务能力层
//!
//! 只负责"拿到一套试卷"的能力：按固定顺序依次尝试候选模型，
//! 第一个返回可解析内容的模型即为结果。
//!
//! - 严格串行：上一个模型的请求结束后才会尝试下一个
//! - 单个模型的失败只记录日志，不向上抛出
//! - 全部失败时返回最后一个模型的错误

use serde::de;
use serde_json::Value;
use tracing::{info, warn};

use crate::clients::{ContentBackend, GenerationRequest};
use crate::error::{AppError, AppResult, LlmError};
use crate::models::{
    exam_response_schema, AiModel, ExamConfig, GeneratedExamData, EXAM_TEMPERATURE,
    FALLBACK_MODELS,
};
use crate::services::prompt::build_exam_prompt;
use crate::utils::logging::log_attempt;

/// 试卷生成服务
pub struct ExamGenerator {
    backend: Box<dyn ContentBackend>,
}

impl ExamGenerator {
    pub fn new(backend: Box<dyn ContentBackend>) -> Self {
        Self { backend }
    }

    /// 候选模型顺序：用户所选模型在前，其余按回退列表顺序
    pub fn candidate_models(selected: AiModel) -> Vec<AiModel> {
        std::iter::once(selected)
            .chain(FALLBACK_MODELS.iter().copied().filter(|m| *m != selected))
            .collect()
    }

    /// 生成试卷（不关心进度）
    pub async fn generate_exam(&self, config: &ExamConfig) -> AppResult<GeneratedExamData> {
        self.generate_exam_with_progress(config, |_| {}).await
    }

    /// 生成试卷
    ///
    /// `on_model_try` 在每次尝试之前被同步调用一次，参数是即将请求的模型。
    pub async fn generate_exam_with_progress<F>(
        &self,
        config: &ExamConfig,
        mut on_model_try: F,
    ) -> AppResult<GeneratedExamData>
    where
        F: FnMut(AiModel),
    {
        let prompt = build_exam_prompt(config);
        let schema = exam_response_schema();
        let candidates = Self::candidate_models(config.selected_model);

        let mut last_error: Option<AppError> = None;

        for (idx, model) in candidates.iter().copied().enumerate() {
            on_model_try(model);
            log_attempt(idx + 1, candidates.len(), model, self.backend.backend_name());

            let request = GenerationRequest {
                model,
                prompt: prompt.clone(),
                schema: schema.clone(),
                temperature: EXAM_TEMPERATURE,
            };

            match self.try_model(&request).await {
                Ok(data) => {
                    info!("✓ 模型 {} 生成成功", model);
                    return Ok(data);
                }
                Err(e) => {
                    warn!("⚠️ 模型 {} 失败: {}", model, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| LlmError::AllModelsFailed.into()))
    }

    /// 单个模型的一次尝试
    async fn try_model(&self, request: &GenerationRequest) -> AppResult<GeneratedExamData> {
        let text = self
            .backend
            .generate(request)
            .await?
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| LlmError::EmptyResponse {
                model: request.model.id().to_string(),
            })?;

        parse_exam_json(request.model, &text)
    }
}

/// 把模型返回的文本解析为试卷
///
/// 顶层必须是 JSON 对象；数组等其它形式即使能被 serde 按顺序填充也视为无效。
pub fn parse_exam_json(model: AiModel, text: &str) -> AppResult<GeneratedExamData> {
    let invalid = |source: serde_json::Error| -> AppError {
        LlmError::InvalidJson {
            model: model.id().to_string(),
            source,
        }
        .into()
    };

    let value: Value = serde_json::from_str(text).map_err(invalid)?;
    if !value.is_object() {
        return Err(invalid(de::Error::invalid_type(
            unexpected_kind(&value),
            &"a JSON object",
        )));
    }
    serde_json::from_value(value).map_err(invalid)
}

fn unexpected_kind(value: &Value) -> de::Unexpected<'_> {
    match value {
        Value::Null => de::Unexpected::Unit,
        Value::Bool(b) => de::Unexpected::Bool(*b),
        Value::Number(_) => de::Unexpected::Other("number"),
        Value::String(s) => de::Unexpected::Str(s),
        Value::Array(_) => de::Unexpected::Seq,
        Value::Object(_) => de::Unexpected::Map,
    }
}
