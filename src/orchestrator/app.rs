use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{error, info};

use crate::clients::{backend_from_config, ContentBackend};
use crate::config::Config;
use crate::error::AppResult;
use crate::export::{write_docx, write_pdf, write_print_html, ExportFormat};
use crate::models::{AiModel, ExamConfig, GeneratedExamData};
use crate::render::View;
use crate::services::ExamGenerator;
use crate::utils::logging::{
    append_log_line, display_file_name, init_log_file, log_exam_request, log_startup,
    print_generation_summary,
};
use crate::workflow::ExamSession;

/// 单次生成的输出选项
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// 打印到终端的视图，`None` 表示不打印
    pub view: Option<View>,
    /// 导出格式，按顺序写入
    pub formats: Vec<ExportFormat>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            view: Some(View::Exam),
            formats: vec![ExportFormat::Docx],
        }
    }
}

/// 单次生成的结果
#[derive(Debug)]
pub struct GenerationReport {
    pub exam: GeneratedExamData,
    pub attempted_models: Vec<AiModel>,
    pub written_files: Vec<PathBuf>,
}

/// 应用主结构
pub struct App {
    config: Config,
    generator: ExamGenerator,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        init_log_file(&config.output_log_file).await?;
        log_startup(&config);

        let backend = backend_from_config(&config);
        Ok(Self::with_backend(config, backend))
    }

    /// 使用指定的模型后端创建应用（不写日志文件）
    pub fn with_backend(config: Config, backend: Box<dyn ContentBackend>) -> Self {
        Self {
            config,
            generator: ExamGenerator::new(backend),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 生成一套试卷并导出
    pub async fn run(&self, exam: ExamConfig, options: &GenerateOptions) -> Result<GenerationReport> {
        log_exam_request(&exam);

        let mut session = ExamSession::new(exam);
        if let Err(e) = session.submit(&self.generator).await {
            let message = session
                .error_message()
                .map(str::to_string)
                .unwrap_or_else(|| e.to_string());
            error!("❌ {}", message);
            self.write_log_line(&message).await;
            return Err(e.into());
        }

        if let Some(view) = options.view {
            session.set_view(view);
            println!("{}", session.render_active_view()?);
        }

        let Some(data) = session.exam() else {
            return Err(crate::error::SessionError::NoResult.into());
        };

        let output_dir = Path::new(&self.config.output_dir);
        let mut written_files = Vec::with_capacity(options.formats.len());
        for format in &options.formats {
            let path = self.export(data, *format, output_dir).await?;
            info!("💾 已导出: {}", display_file_name(&path));
            written_files.push(path);
        }

        let attempted_models = session.attempted_models().to_vec();
        print_generation_summary(
            data,
            &attempted_models,
            &written_files,
            &self.config.output_log_file,
        );
        if let Some(model) = attempted_models.last() {
            self.write_log_line(&format!("✓ {} - {}", model.id(), data.title))
                .await;
        }

        Ok(GenerationReport {
            exam: data.clone(),
            attempted_models,
            written_files,
        })
    }

    async fn export(
        &self,
        data: &GeneratedExamData,
        format: ExportFormat,
        output_dir: &Path,
    ) -> AppResult<PathBuf> {
        match format {
            ExportFormat::Docx => write_docx(data, output_dir).await,
            ExportFormat::Html => write_print_html(data, output_dir).await,
            ExportFormat::Pdf => {
                write_pdf(data, output_dir, self.config.chrome_executable.as_deref()).await
            }
        }
    }

    /// 日志文件只是附带记录，写入失败不影响本次生成
    async fn write_log_line(&self, line: &str) {
        if let Err(e) = append_log_line(&self.config.output_log_file, line).await {
            error!("写入日志文件失败: {}", e);
        }
    }
}
