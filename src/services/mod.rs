pub mod exam_generator;
pub mod prompt;

pub use exam_generator::{parse_exam_json, ExamGenerator};
pub use prompt::build_exam_prompt;
