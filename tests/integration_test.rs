use std::sync::Mutex;

use async_trait::async_trait;
use history_exam::config::Config;
use history_exam::error::{AppError, AppResult, LlmError};
use history_exam::export::ExportFormat;
use history_exam::models::{AiModel, ExamConfig};
use history_exam::{App, ContentBackend, ExamGenerator, ExamSession, GenerateOptions, GenerationRequest, View};

const EXAM_JSON: &str = r#"{
  "title": "Đề kiểm tra 45 phút",
  "subtitle": "Lịch Sử 9 - Cánh Diều",
  "timeLimit": "45 phút",
  "matrix": [
    {"topic": "Liên Xô và Đông Âu", "levels": {"knowledge": 2, "comprehension": "1", "application": "1", "highApplication": "0", "total": "4"}}
  ],
  "mcqPart": [
    {"id": 1, "question": "Liên Xô tan rã năm nào?", "options": ["1989", "1990", "1991", "1992"], "correctAnswer": "C", "explanation": "Tháng 12/1991", "level": "Nhận biết"}
  ],
  "essayPart": [
    {"id": 1, "question": "Nêu ý nghĩa của Chiến tranh lạnh kết thúc.", "points": 3, "guide": "Trật tự hai cực sụp đổ.", "level": "Vận dụng"}
  ],
  "generalGuide": "Chấm linh hoạt."
}"#;

/// 按模型返回预设结果的后端
struct FakeBackend {
    /// 返回 JSON 的模型；其余模型返回空
    succeeds_on: Option<AiModel>,
    calls: Mutex<Vec<AiModel>>,
}

impl FakeBackend {
    fn new(succeeds_on: Option<AiModel>) -> Self {
        Self {
            succeeds_on,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ContentBackend for FakeBackend {
    async fn generate(&self, request: &GenerationRequest) -> AppResult<Option<String>> {
        self.calls.lock().unwrap().push(request.model);
        assert!(request.prompt.contains("Lịch Sử lớp 9"));
        assert_eq!(request.temperature, 0.7);
        if Some(request.model) == self.succeeds_on {
            Ok(Some(EXAM_JSON.to_string()))
        } else {
            Ok(None)
        }
    }

    fn backend_name(&self) -> &'static str {
        "fake"
    }
}

/// 输出目录和日志文件都放在临时目录里；返回的 `TempDir` 需要在测试结束前保持存活
fn temp_config() -> (tempfile::TempDir, Config) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        output_dir: dir.path().join("out").display().to_string(),
        output_log_file: dir.path().join("output.txt").display().to_string(),
        ..Config::default()
    };
    (dir, config)
}

#[tokio::test]
async fn test_session_falls_back_to_last_model() {
    let generator = ExamGenerator::new(Box::new(FakeBackend::new(Some(
        AiModel::Gemini25Flash,
    ))));
    let mut session = ExamSession::new(ExamConfig::default());

    let exam = session.submit(&generator).await.unwrap();
    assert_eq!(exam.matrix[0].levels.knowledge, "2");
    assert_eq!(
        session.attempted_models(),
        &[
            AiModel::Gemini3FlashPreview,
            AiModel::Gemini3ProPreview,
            AiModel::Gemini25Flash
        ]
    );

    session.set_view(View::Matrix);
    assert!(session.render_active_view().unwrap().contains("Liên Xô và Đông Âu"));
}

#[tokio::test]
async fn test_session_reports_last_error_when_all_models_fail() {
    let generator = ExamGenerator::new(Box::new(FakeBackend::new(None)));
    let mut session = ExamSession::new(ExamConfig {
        selected_model: AiModel::Gemini25Flash,
        ..Default::default()
    });

    let err = session.submit(&generator).await.unwrap_err();
    // 所选模型最先尝试，最后一个候选是 pro-preview
    match err {
        AppError::Llm(LlmError::EmptyResponse { model }) => {
            assert_eq!(model, AiModel::Gemini3ProPreview.id())
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(session.error_message().unwrap().starts_with("Đã dừng do lỗi: "));
    assert!(session.exam().is_none());
}

#[tokio::test]
async fn test_app_run_exports_docx_and_html() {
    let (_dir, config) = temp_config();
    let out_dir = std::path::PathBuf::from(&config.output_dir);
    let app = App::with_backend(config, Box::new(FakeBackend::new(Some(AiModel::Gemini3FlashPreview))));

    let options = GenerateOptions {
        view: None,
        formats: vec![ExportFormat::Docx, ExportFormat::Html],
    };
    let report = app.run(ExamConfig::default(), &options).await.unwrap();

    assert_eq!(report.attempted_models, vec![AiModel::Gemini3FlashPreview]);
    assert_eq!(report.exam.title, "Đề kiểm tra 45 phút");
    assert_eq!(
        report.written_files,
        vec![
            out_dir.join("Đề kiểm tra 45 phút.docx"),
            out_dir.join("Đề kiểm tra 45 phút.html"),
        ]
    );

    let docx = std::fs::read(&report.written_files[0]).unwrap();
    assert!(docx.starts_with(b"PK"));
    let html = std::fs::read_to_string(&report.written_files[1]).unwrap();
    assert!(html.contains("Liên Xô tan rã năm nào?"));
}

#[tokio::test]
async fn test_app_run_rejects_invalid_ratio_without_calling_backend() {
    let (_dir, config) = temp_config();
    let app = App::with_backend(config, Box::new(FakeBackend::new(Some(AiModel::Gemini3FlashPreview))));

    let mut exam = ExamConfig::default();
    exam.difficulty_ratio.high_application = 5;

    let err = app.run(exam, &GenerateOptions::default()).await.unwrap_err();
    assert!(err.to_string().contains("95"));
}

/// 需要真实的 GEMINI_API_KEY
///
/// 运行方式：
/// ```bash
/// cargo test test_generate_with_real_gemini -- --ignored --nocapture
/// ```
#[tokio::test]
#[ignore]
async fn test_generate_with_real_gemini() {
    history_exam::logger::init(true);

    let config = Config::default();
    let generator = ExamGenerator::new(history_exam::backend_from_config(&config));
    let mut session = ExamSession::new(ExamConfig {
        mcq_count: 4,
        essay_count: 1,
        ..Default::default()
    });

    let exam = session.submit(&generator).await.expect("生成试卷失败");
    assert!(!exam.mcq_part.is_empty());
}
