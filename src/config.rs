use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// LLM 后端类型
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LlmBackend {
    /// Google Generative Language 原生接口（支持 responseSchema）
    Gemini,
    /// 兼容 OpenAI API 的代理服务
    OpenAi,
}

impl FromStr for LlmBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(LlmBackend::Gemini),
            "openai" | "openai-compatible" => Ok(LlmBackend::OpenAi),
            other => Err(ConfigError::UnknownBackend {
                name: other.to_string(),
            }),
        }
    }
}

impl LlmBackend {
    /// 未设置 `LLM_API_BASE_URL` 时使用的接口地址
    pub fn default_api_base_url(self) -> &'static str {
        match self {
            LlmBackend::Gemini => "https://generativelanguage.googleapis.com",
            LlmBackend::OpenAi => "https://generativelanguage.googleapis.com/v1beta/openai",
        }
    }
}

impl fmt::Display for LlmBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmBackend::Gemini => write!(f, "gemini"),
            LlmBackend::OpenAi => write!(f, "openai"),
        }
    }
}

/// 程序配置
///
/// 只包含运行环境相关的设置；试卷参数在 `ExamConfig` 里。
#[derive(Clone, Debug)]
pub struct Config {
    /// LLM 后端
    pub llm_backend: LlmBackend,
    /// LLM API 基础URL
    pub llm_api_base_url: String,
    /// 存放 API Key 的环境变量名（每次调用时读取）
    pub llm_api_key_env: String,
    /// 导出文件目录
    pub output_dir: String,
    /// 打印 PDF 用的浏览器可执行文件（为空则自动查找）
    pub chrome_executable: Option<String>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_backend: LlmBackend::Gemini,
            llm_api_base_url: LlmBackend::Gemini.default_api_base_url().to_string(),
            llm_api_key_env: "GEMINI_API_KEY".to_string(),
            output_dir: "output".to_string(),
            chrome_executable: None,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 按变量名取值构造配置，`from_env` 传入进程环境
    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let default = Self::default();
        let llm_backend = match get("LLM_BACKEND") {
            Some(v) => v.parse()?,
            None => default.llm_backend,
        };
        Ok(Self {
            llm_backend,
            llm_api_base_url: get("LLM_API_BASE_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| llm_backend.default_api_base_url().to_string()),
            llm_api_key_env: get("LLM_API_KEY_ENV").unwrap_or(default.llm_api_key_env),
            output_dir: get("OUTPUT_DIR").unwrap_or(default.output_dir),
            chrome_executable: get("CHROME_EXECUTABLE").filter(|v| !v.is_empty()),
            verbose_logging: match get("VERBOSE_LOGGING") {
                Some(v) => parse_bool("VERBOSE_LOGGING", &v)?,
                None => default.verbose_logging,
            },
            output_log_file: get("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        })
    }
}

fn parse_bool(var_name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: value.to_string(),
            expected_type: "bool".to_string(),
        }),
    }
}
