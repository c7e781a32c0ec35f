use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 可用的生成模型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiModel {
    /// Gemini 3 Flash（默认）
    #[serde(rename = "gemini-3-flash-preview")]
    Gemini3FlashPreview,
    /// Gemini 3 Pro
    #[serde(rename = "gemini-3-pro-preview")]
    Gemini3ProPreview,
    /// Gemini 2.5 Flash
    #[serde(rename = "gemini-2.5-flash")]
    Gemini25Flash,
}

/// 回退顺序：用户所选模型失败后，按此顺序尝试其余模型
pub const FALLBACK_MODELS: [AiModel; 3] = [
    AiModel::Gemini3FlashPreview,
    AiModel::Gemini3ProPreview,
    AiModel::Gemini25Flash,
];

impl AiModel {
    /// 请求时使用的模型标识
    pub fn id(self) -> &'static str {
        match self {
            AiModel::Gemini3FlashPreview => "gemini-3-flash-preview",
            AiModel::Gemini3ProPreview => "gemini-3-pro-preview",
            AiModel::Gemini25Flash => "gemini-2.5-flash",
        }
    }

    /// 显示名称
    pub fn display_name(self) -> &'static str {
        match self {
            AiModel::Gemini3FlashPreview => "Gemini 3 Flash",
            AiModel::Gemini3ProPreview => "Gemini 3 Pro",
            AiModel::Gemini25Flash => "Gemini 2.5 Flash",
        }
    }

    /// 模型说明（面向教师，越南语）
    pub fn description(self) -> &'static str {
        match self {
            AiModel::Gemini3FlashPreview => "Nhanh nhất, phù hợp cho đề thi cơ bản.",
            AiModel::Gemini3ProPreview => "Thông minh nhất, lý luận sâu cho đề thi khó.",
            AiModel::Gemini25Flash => "Ổn định, cân bằng giữa tốc độ và chất lượng.",
        }
    }

    pub fn is_default(self) -> bool {
        self == AiModel::default()
    }

    /// 所有模型（目录顺序）
    pub fn all() -> &'static [AiModel] {
        &FALLBACK_MODELS
    }

    /// 从标识解析模型
    pub fn from_id(id: &str) -> Option<Self> {
        AiModel::all().iter().copied().find(|m| m.id() == id.trim())
    }
}

impl Default for AiModel {
    fn default() -> Self {
        AiModel::Gemini3FlashPreview
    }
}

impl std::str::FromStr for AiModel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AiModel::from_id(s).ok_or_else(|| ConfigError::UnknownModel { id: s.to_string() })
    }
}

impl std::fmt::Display for AiModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_round_trip() {
        for model in AiModel::all() {
            assert_eq!(AiModel::from_id(model.id()), Some(*model));
        }
        assert_eq!(AiModel::from_id("gpt-4o"), None);
    }

    #[test]
    fn test_only_flash_preview_is_default() {
        let defaults: Vec<_> = AiModel::all().iter().filter(|m| m.is_default()).collect();
        assert_eq!(defaults, vec![&AiModel::Gemini3FlashPreview]);
    }

    #[test]
    fn test_serde_uses_model_id() {
        let json = serde_json::to_string(&AiModel::Gemini25Flash).unwrap();
        assert_eq!(json, "\"gemini-2.5-flash\"");
    }
}
