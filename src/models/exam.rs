use serde::{Deserialize, Serialize};

/// 选择题选项字母（按位置分配，只有前四个有字母）
pub const OPTION_LABELS: [&str; 4] = ["A", "B", "C", "D"];

/// 模型生成的整套试卷
///
/// 只在当前会话内存中保存，不写入持久化存储。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedExamData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subtitle: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub time_limit: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub matrix: Vec<MatrixItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mcq_part: Vec<QuestionMcq>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub essay_part: Vec<QuestionEssay>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub general_guide: String,
}

/// 矩阵中的一行：主题 × 认知层级
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub topic: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub levels: MatrixLevels,
}

/// 各层级题量
///
/// 全部按文本保存：模型可能返回数字，也可能返回"-"之类的占位符。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixLevels {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub knowledge: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub comprehension: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub application: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub high_application: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub total: String,
}

/// 选择题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionMcq {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub question: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub correct_answer: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub explanation: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub level: String,
}

impl QuestionMcq {
    /// 带字母的选项列表，第五个及以后的选项没有字母
    pub fn labeled_options(&self) -> Vec<(Option<&'static str>, &str)> {
        self.options
            .iter()
            .enumerate()
            .map(|(i, opt)| (option_label(i), opt.as_str()))
            .collect()
    }
}

/// 自由作答题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionEssay {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub question: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub points: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub guide: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub level: String,
}

impl QuestionEssay {
    /// 分值文本：整数不带小数点（2 → "2"，1.5 → "1.5"）
    pub fn points_text(&self) -> String {
        format_points(self.points)
    }
}

/// 按位置取选项字母
pub fn option_label(index: usize) -> Option<&'static str> {
    OPTION_LABELS.get(index).copied()
}

pub fn format_points(points: f64) -> String {
    if points.fract() == 0.0 && points.abs() < 1e15 {
        format!("{}", points as i64)
    } else {
        format!("{}", points)
    }
}

// 模型偶尔给出 null，按缺省值处理
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// 矩阵字段既接受字符串也接受数字
fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or number")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(format_points(value))
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(TextVisitor)
}
