//! # History Exam
//!
//! 为越南九年级历史课生成试卷（试卷矩阵、选择题、自由作答题、评分指南），
//! 并导出为 Word 文档或可打印页面。
//!
//! ## 架构设计
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 模型接口，只负责"发出请求、拿回文本"
//! - `GeminiClient` - Gemini 原生 `generateContent`，带结构化输出约束
//! - `LlmClient` - OpenAI 兼容接口
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `build_exam_prompt` - 由出题参数构造提示词
//! - `ExamGenerator` - 按顺序尝试候选模型，返回第一份可解析的试卷
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 出题会话：参数、结果、错误提示和当前视图
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/` - 一次完整的出题流程（提交 → 预览 → 导出）
//!
//! ### 输出
//! - `render/` - 终端文本视图（矩阵 / 试卷 / 答案）
//! - `export/` - Word、可打印 HTML、PDF
//!
//! ## 模块结构

pub mod browser;
pub mod clients;
pub mod config;
pub mod error;
pub mod export;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod render;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{backend_from_config, ContentBackend, GenerationRequest};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{AiModel, ExamConfig, GeneratedExamData};
pub use orchestrator::{App, GenerateOptions, GenerationReport};
pub use render::View;
pub use services::ExamGenerator;
pub use workflow::ExamSession;
