//! 试卷响应的结构约束
//!
//! 使用 Gemini `responseSchema` 的类型写法（OBJECT / STRING / ...），
//! OpenAI 兼容后端则把同一份 schema 以文本形式放进系统消息。

use serde_json::{json, Value};

/// 生成请求使用的采样温度
pub const EXAM_TEMPERATURE: f32 = 0.7;

/// 试卷 JSON 的固定 schema
pub fn exam_response_schema() -> Value {
    let string = json!({ "type": "STRING" });

    json!({
        "type": "OBJECT",
        "properties": {
            "title": string,
            "subtitle": string,
            "timeLimit": string,
            "matrix": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "topic": string,
                        "levels": {
                            "type": "OBJECT",
                            "properties": {
                                "knowledge": string,
                                "comprehension": string,
                                "application": string,
                                "highApplication": string,
                                "total": string
                            }
                        }
                    }
                }
            },
            "mcqPart": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "INTEGER" },
                        "question": string,
                        "options": { "type": "ARRAY", "items": string },
                        "correctAnswer": string,
                        "explanation": string,
                        "level": string
                    }
                }
            },
            "essayPart": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "INTEGER" },
                        "question": string,
                        "points": { "type": "NUMBER" },
                        "guide": string,
                        "level": string
                    }
                }
            },
            "generalGuide": string
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lists_all_top_level_fields() {
        let schema = exam_response_schema();
        let props = schema["properties"].as_object().unwrap();
        for key in [
            "title",
            "subtitle",
            "timeLimit",
            "matrix",
            "mcqPart",
            "essayPart",
            "generalGuide",
        ] {
            assert!(props.contains_key(key), "缺少字段: {}", key);
        }
        assert_eq!(schema["properties"]["essayPart"]["items"]["properties"]["points"]["type"], "NUMBER");
        assert_eq!(schema["properties"]["mcqPart"]["items"]["properties"]["id"]["type"], "INTEGER");
    }
}
