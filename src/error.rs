use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 导出错误
    #[error("导出错误: {0}")]
    Export(#[from] ExportError),
    /// 会话错误
    #[error("会话错误: {0}")]
    Session(#[from] SessionError),
}

/// LLM 服务错误
///
/// 除 `AllModelsFailed` 外，其余都是"单个候选模型"的失败，
/// 在回退循环中会被记录并跳到下一个模型。
#[derive(Debug, Error)]
pub enum LlmError {
    /// 网络请求或 SDK 调用失败
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 远端返回非 2xx 状态码
    #[error("LLM API返回错误状态 (模型: {model}): HTTP {status}: {body}")]
    BadStatus {
        model: String,
        status: u16,
        body: String,
    },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyResponse { model: String },
    /// 返回内容不是合法的试卷 JSON
    #[error("无法解析LLM返回的JSON (模型: {model}): {source}")]
    InvalidJson {
        model: String,
        #[source]
        source: serde_json::Error,
    },
    /// 环境变量中没有 API Key
    #[error("未找到 API Key，请设置环境变量 {var_name}")]
    MissingApiKey { var_name: String },
    /// 所有候选模型都失败，且没有记录到任何具体错误
    #[error("所有模型都失败了")]
    AllModelsFailed,
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 难度比例之和不等于 100
    #[error("难度比例之和必须为 100%，当前为 {total}%")]
    RatioNotHundred { total: u64 },
    /// 总分必须是正数
    #[error("总分必须大于 0，当前为 {score}")]
    InvalidTotalScore { score: f64 },
    /// 未知的模型标识
    #[error("未知的模型: {id}")]
    UnknownModel { id: String },
    /// 未知的 LLM 后端
    #[error("未知的 LLM 后端: {name}")]
    UnknownBackend { name: String },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// TOML 序列化失败
    #[error("TOML序列化失败: {0}")]
    TomlSerializeFailed(#[from] toml::ser::Error),
}

/// 导出错误
#[derive(Debug, Error)]
pub enum ExportError {
    /// docx 打包失败
    #[error("生成 Word 文档失败: {source}")]
    DocxPackFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 无头浏览器相关失败
    #[error("浏览器打印失败 ({stage}): {source}")]
    BrowserFailed {
        stage: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 会话错误
#[derive(Debug, Error)]
pub enum SessionError {
    /// 还没有生成任何试卷
    #[error("尚未生成试卷，无法预览或导出")]
    NoResult,
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建 LLM API 调用错误
    pub fn llm_api_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Llm(LlmError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建浏览器打印错误
    pub fn browser_failed(
        stage: &'static str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Export(ExportError::BrowserFailed {
            stage,
            source: Box::new(source),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_error_display() {
        let err: AppError = LlmError::EmptyResponse {
            model: "gemini-2.5-flash".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "LLM错误: LLM返回内容为空 (模型: gemini-2.5-flash)"
        );
    }

    #[test]
    fn test_ratio_error_mentions_total() {
        let err = ConfigError::RatioNotHundred { total: 95 };
        assert!(err.to_string().contains("95%"));
    }
}
