//! 出题会话 - 流程层
//!
//! 持有当前的试卷参数和生成结果（原先散落在界面里的全局状态）。
//! 一次只能有一个生成请求：`submit` 需要 `&mut self`，
//! 上一次提交结束之前不可能发起新的提交。

use tracing::{info, warn};

use crate::error::{AppResult, SessionError};
use crate::models::{AiModel, ExamConfig, GeneratedExamData};
use crate::render::{render_text, View};
use crate::services::ExamGenerator;

/// 失败提示前缀（面向教师）
pub const ERROR_PREFIX: &str = "Đã dừng do lỗi: ";

/// 出题会话
#[derive(Debug, Default)]
pub struct ExamSession {
    config: ExamConfig,
    exam: Option<GeneratedExamData>,
    error: Option<String>,
    attempted_models: Vec<AiModel>,
    /// 正在请求的模型，只在提交过程中有值
    active_model: Option<AiModel>,
    active_view: View,
}

impl ExamSession {
    pub fn new(config: ExamConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &ExamConfig {
        &self.config
    }

    /// 修改参数（相当于表单输入）
    pub fn config_mut(&mut self) -> &mut ExamConfig {
        &mut self.config
    }

    /// 提交按钮是否可用
    pub fn can_submit(&self) -> bool {
        self.config.can_submit()
    }

    /// 提交生成请求
    ///
    /// 开始前清空上一次的结果和错误；失败时保存可读的错误提示并返回原始错误。
    pub async fn submit(&mut self, generator: &ExamGenerator) -> AppResult<&GeneratedExamData> {
        self.config.validate()?;

        self.exam = None;
        self.error = None;
        self.attempted_models.clear();

        let attempted = &mut self.attempted_models;
        let active = &mut self.active_model;
        let result = generator
            .generate_exam_with_progress(&self.config, |model| {
                info!("⏳ AI 正在使用 {} 编写试卷...", model.display_name());
                *active = Some(model);
                attempted.push(model);
            })
            .await;
        self.active_model = None;

        match result {
            Ok(data) => {
                self.active_view = View::Exam;
                Ok(self.exam.insert(data))
            }
            Err(e) => {
                let message = format!("{}{}", ERROR_PREFIX, e);
                warn!("{}", message);
                self.error = Some(message);
                Err(e)
            }
        }
    }

    pub fn exam(&self) -> Option<&GeneratedExamData> {
        self.exam.as_ref()
    }

    /// 最近一次失败的提示文本
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// 最近一次提交按顺序尝试过的模型
    pub fn attempted_models(&self) -> &[AiModel] {
        &self.attempted_models
    }

    pub fn active_model(&self) -> Option<AiModel> {
        self.active_model
    }

    pub fn active_view(&self) -> View {
        self.active_view
    }

    pub fn set_view(&mut self, view: View) {
        self.active_view = view;
    }

    /// 渲染当前视图（切换视图不会重新请求模型）
    pub fn render_active_view(&self) -> AppResult<String> {
        let exam = self.exam.as_ref().ok_or(SessionError::NoResult)?;
        Ok(render_text(exam, self.active_view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::mock::{Scripted, ScriptedBackend};
    use crate::error::{AppError, ConfigError};
    use crate::models::DifficultyRatio;

    const VALID_JSON: &str = r#"{"title": "Đề 15 phút", "subtitle": "Lịch sử 9", "timeLimit": "15 phút",
        "matrix": [], "mcqPart": [], "essayPart": [], "generalGuide": ""}"#;

    #[tokio::test]
    async fn test_submit_blocked_when_ratio_not_hundred() {
        let generator = ExamGenerator::new(Box::new(ScriptedBackend::new(vec![])));
        let mut session = ExamSession::new(ExamConfig::default());
        session.config_mut().difficulty_ratio = DifficultyRatio::new(40, 30, 20, 5);

        assert!(!session.can_submit());
        let err = session.submit(&generator).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::RatioNotHundred { total: 95 })
        ));
        assert!(session.attempted_models().is_empty());
    }

    #[tokio::test]
    async fn test_submit_success_tracks_attempts_and_views() {
        let generator = ExamGenerator::new(Box::new(ScriptedBackend::new(vec![
            Scripted::Empty,
            Scripted::Text(VALID_JSON.to_string()),
        ])));
        let mut session = ExamSession::new(ExamConfig::default());

        let title = session.submit(&generator).await.unwrap().title.clone();
        assert_eq!(title, "Đề 15 phút");
        assert_eq!(
            session.attempted_models(),
            &[AiModel::Gemini3FlashPreview, AiModel::Gemini3ProPreview]
        );
        assert!(session.error_message().is_none());
        assert!(session.active_model().is_none());

        session.set_view(View::Answers);
        assert!(session.render_active_view().unwrap().starts_with("ĐÁP ÁN"));
        session.set_view(View::Exam);
        assert!(session.render_active_view().unwrap().starts_with("ĐỀ 15 PHÚT"));
    }

    #[tokio::test]
    async fn test_failed_submit_clears_previous_result() {
        let generator = ExamGenerator::new(Box::new(ScriptedBackend::new(vec![Scripted::Text(
            VALID_JSON.to_string(),
        )])));
        let mut session = ExamSession::new(ExamConfig::default());
        session.submit(&generator).await.unwrap();
        assert!(session.exam().is_some());

        // 脚本已经用完，之后的请求都返回空
        let err = session.submit(&generator).await.unwrap_err();
        assert!(session.exam().is_none());
        let message = session.error_message().unwrap();
        assert!(message.starts_with(ERROR_PREFIX));
        assert!(message.ends_with(&err.to_string()));
        assert!(matches!(
            session.render_active_view(),
            Err(AppError::Session(SessionError::NoResult))
        ));
    }

    #[tokio::test]
    async fn test_resubmit_after_failure_is_allowed() {
        let generator = ExamGenerator::new(Box::new(ScriptedBackend::new(vec![
            Scripted::Empty,
            Scripted::Empty,
            Scripted::Empty,
            Scripted::Text(VALID_JSON.to_string()),
        ])));
        let mut session = ExamSession::new(ExamConfig::default());

        assert!(session.submit(&generator).await.is_err());
        assert!(session.active_model().is_none());
        assert_eq!(session.attempted_models().len(), 3);

        // 上一次提交结束后即可手动重试
        session.submit(&generator).await.unwrap();
        assert!(session.error_message().is_none());
        assert!(session.active_model().is_none());
        assert_eq!(session.attempted_models(), &[AiModel::Gemini3FlashPreview]);
    }
}
