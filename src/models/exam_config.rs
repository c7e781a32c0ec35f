use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::AiModel;

/// 教材版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Textbook {
    #[serde(rename = "KNTT")]
    KetNoiTriThuc,
    #[serde(rename = "CANH_DIEU")]
    CanhDieu,
    #[serde(rename = "CTST")]
    ChanTroiSangTao,
}

impl Textbook {
    /// 教材全称（写入提示词）
    pub fn label(self) -> &'static str {
        match self {
            Textbook::KetNoiTriThuc => "Kết nối tri thức và cuộc sống",
            Textbook::CanhDieu => "Cánh Diều",
            Textbook::ChanTroiSangTao => "Chân trời sáng tạo",
        }
    }
}

impl std::fmt::Display for Textbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 考试类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExamType {
    #[serde(rename = "MIN_15")]
    Min15,
    #[serde(rename = "MIN_45")]
    Min45,
    #[serde(rename = "MID_TERM")]
    MidTerm,
    #[serde(rename = "FINAL")]
    Final,
}

impl ExamType {
    pub fn label(self) -> &'static str {
        match self {
            ExamType::Min15 => "Kiểm tra 15 phút",
            ExamType::Min45 => "Kiểm tra 1 tiết (45 phút)",
            ExamType::MidTerm => "Thi giữa kỳ",
            ExamType::Final => "Thi cuối kỳ",
        }
    }
}

impl std::fmt::Display for ExamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 认知层级比例（百分比）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyRatio {
    pub knowledge: u32,
    pub comprehension: u32,
    pub application: u32,
    pub high_application: u32,
}

impl DifficultyRatio {
    pub fn new(knowledge: u32, comprehension: u32, application: u32, high_application: u32) -> Self {
        Self {
            knowledge,
            comprehension,
            application,
            high_application,
        }
    }

    /// 四项之和（用 u64 避免溢出）
    pub fn total(&self) -> u64 {
        [
            self.knowledge,
            self.comprehension,
            self.application,
            self.high_application,
        ]
        .iter()
        .map(|v| u64::from(*v))
        .sum()
    }
}

impl Default for DifficultyRatio {
    fn default() -> Self {
        Self::new(40, 30, 20, 10)
    }
}

/// 试卷参数
///
/// 启动时取默认值，之后由配置文件 / 命令行参数修改，
/// 提交时只读一次，不做持久化。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExamConfig {
    pub name: String,
    pub textbook: Textbook,
    pub exam_type: ExamType,
    pub topic: String,
    pub mcq_count: u32,
    pub essay_count: u32,
    pub total_score: f64,
    pub selected_model: AiModel,
    /// 放在最后，序列化为 TOML 时作为子表输出
    pub difficulty_ratio: DifficultyRatio,
}

impl Default for ExamConfig {
    fn default() -> Self {
        Self {
            name: "Đề kiểm tra Lịch Sử 9".to_string(),
            textbook: Textbook::KetNoiTriThuc,
            exam_type: ExamType::Min45,
            topic: "Thế giới từ năm 1945 đến năm 1991".to_string(),
            mcq_count: 12,
            essay_count: 2,
            total_score: 10.0,
            selected_model: AiModel::default(),
            difficulty_ratio: DifficultyRatio::default(),
        }
    }
}

impl ExamConfig {
    /// 是否允许提交（难度比例之和必须为 100）
    pub fn can_submit(&self) -> bool {
        self.validate().is_ok()
    }

    /// 校验提交条件，返回不能提交的原因
    pub fn validate(&self) -> Result<(), ConfigError> {
        let total = self.difficulty_ratio.total();
        if total != 100 {
            return Err(ConfigError::RatioNotHundred { total });
        }
        if !(self.total_score.is_finite() && self.total_score > 0.0) {
            return Err(ConfigError::InvalidTotalScore {
                score: self.total_score,
            });
        }
        Ok(())
    }
}
