/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{AiModel, ExamConfig, GeneratedExamData};

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// 初始化日志文件（覆盖旧内容，写入表头）
pub async fn init_log_file(log_file_path: &str) -> AppResult<()> {
    let log_header = format!(
        "{}\nNhật ký tạo đề thi - {}\n{}\n\n",
        "=".repeat(60),
        timestamp(),
        "=".repeat(60)
    );
    tokio::fs::write(log_file_path, log_header)
        .await
        .map_err(|e| AppError::file_write_failed(log_file_path, e))
}

/// 在日志文件末尾追加一行
pub async fn append_log_line(log_file_path: &str, line: &str) -> AppResult<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .await
        .map_err(|e| AppError::file_write_failed(log_file_path, e))?;
    file.write_all(format!("[{}] {}\n", timestamp(), line).as_bytes())
        .await
        .map_err(|e| AppError::file_write_failed(log_file_path, e))
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 历史试卷生成");
    info!("🔌 模型后端: {}", config.llm_backend);
    info!("📁 输出目录: {}", config.output_dir);
    info!("{}", "=".repeat(60));
}

/// 记录本次出题参数
pub fn log_exam_request(exam: &ExamConfig) {
    info!(
        "📋 {} | {} | {}",
        exam.textbook.label(),
        exam.exam_type.label(),
        truncate_text(&exam.topic, 40)
    );
    info!(
        "📝 选择题 {} 道, 自由作答题 {} 道, 总分 {}",
        exam.mcq_count, exam.essay_count, exam.total_score
    );
    let r = &exam.difficulty_ratio;
    info!(
        "📊 难度比例: {}/{}/{}/{}",
        r.knowledge, r.comprehension, r.application, r.high_application
    );
}

/// 记录一次模型尝试
pub fn log_attempt(attempt: usize, total: usize, model: AiModel, backend: &str) {
    info!(
        "🤖 [{}/{}] 使用模型 {} 生成试卷 (后端: {})",
        attempt, total, model, backend
    );
}

/// 打印生成结果统计
pub fn print_generation_summary(
    data: &GeneratedExamData,
    attempted: &[AiModel],
    written: &[PathBuf],
    log_file_path: &str,
) {
    info!("\n{}", "=".repeat(60));
    info!("📊 试卷生成完成");
    info!("完成时间: {}", timestamp());
    info!("{}", "=".repeat(60));
    info!("📄 标题: {}", data.title);
    info!(
        "✅ 选择题 {} 道, 自由作答题 {} 道",
        data.mcq_part.len(),
        data.essay_part.len()
    );
    let models: Vec<&str> = attempted.iter().map(|m| m.id()).collect();
    info!("🤖 尝试过的模型: {}", models.join(" → "));
    for path in written {
        info!("💾 {}", path.display());
    }
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 导出文件的显示名
pub fn display_file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_counts_chars() {
        assert_eq!(truncate_text("Chiến tranh lạnh", 7), "Chiến t...");
        assert_eq!(truncate_text("ngắn", 10), "ngắn");
    }

    #[test]
    fn test_display_file_name() {
        assert_eq!(
            display_file_name(Path::new("output/Đề thi.docx")),
            "Đề thi.docx"
        );
    }

    #[tokio::test]
    async fn test_log_file_header_and_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.txt");
        let path = path.to_str().unwrap();

        init_log_file(path).await.unwrap();
        append_log_line(path, "gemini-2.5-flash: ok").await.unwrap();

        let content = tokio::fs::read_to_string(path).await.unwrap();
        assert!(content.starts_with(&"=".repeat(60)));
        assert!(content.contains("Nhật ký tạo đề thi"));
        assert!(content.trim_end().ends_with("gemini-2.5-flash: ok"));
    }
}
