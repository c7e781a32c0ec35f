use crate::error::{AppError, AppResult, FileError};
use crate::models::ExamConfig;
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载试卷参数
///
/// 文件中没有写的字段使用默认值。
pub async fn load_exam_config(toml_file_path: &Path) -> AppResult<ExamConfig> {
    let path_str = toml_file_path.display().to_string();

    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|e| AppError::file_read_failed(&path_str, e))?;

    let config: ExamConfig = toml::from_str(&content).map_err(|e| FileError::TomlParseFailed {
        path: path_str.clone(),
        source: e,
    })?;

    tracing::info!("成功加载试卷配置: {}", path_str);

    Ok(config)
}

/// 把试卷参数写成 TOML 文件
pub async fn save_exam_config(config: &ExamConfig, toml_file_path: &Path) -> AppResult<()> {
    let content = toml::to_string_pretty(config).map_err(FileError::from)?;

    if let Some(parent) = toml_file_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::file_write_failed(parent.display().to_string(), e))?;
        }
    }

    fs::write(toml_file_path, content)
        .await
        .map_err(|e| AppError::file_write_failed(toml_file_path.display().to_string(), e))?;

    Ok(())
}
