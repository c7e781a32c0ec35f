pub mod ai_model;
pub mod exam;
pub mod exam_config;
pub mod loaders;
pub mod schema;

pub use ai_model::{AiModel, FALLBACK_MODELS};
pub use exam::{
    format_points, option_label, GeneratedExamData, MatrixItem, MatrixLevels, QuestionEssay,
    QuestionMcq, OPTION_LABELS,
};
pub use exam_config::{DifficultyRatio, ExamConfig, ExamType, Textbook};
pub use loaders::{load_exam_config, save_exam_config};
pub use schema::{exam_response_schema, EXAM_TEMPERATURE};
