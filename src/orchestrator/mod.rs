//! 编排层（Orchestration Layer）
//!
//! 负责一次完整的出题流程：读取参数 → 会话提交 → 终端预览 → 导出文件。
//!
//! ```text
//! orchestrator::App
//!     ↓
//! workflow::ExamSession (参数 + 结果 + 当前视图)
//!     ↓
//! services::ExamGenerator (模型回退)
//!     ↓
//! clients (Gemini / OpenAI 兼容接口)
//! ```
//!
//! 本层只做调度和统计，不做具体业务判断。

pub mod app;

pub use app::{App, GenerateOptions, GenerationReport};
