//! 提示词构建
//!
//! 提示词面向越南语历史老师的出题场景，所有配置字段都写进去。

use crate::models::ExamConfig;

/// 构建出题提示词
pub fn build_exam_prompt(config: &ExamConfig) -> String {
    let ratio = &config.difficulty_ratio;
    format!(
        r#"Bạn là một giáo viên Lịch Sử lớp 9 giỏi tại Việt Nam.
Tạo đề thi dựa trên:
- Sách: {textbook}
- Loại: {exam_type}
- Nội dung: {topic}
- Cấu trúc: {mcq} câu trắc nghiệm (4 lựa chọn A,B,C,D), {essay} câu tự luận.
- Tổng điểm: {score}
- Ma trận nhận thức (%): Nhận biết {knowledge}, Thông hiểu {comprehension}, Vận dụng {application}, Vận dụng cao {high}.

Yêu cầu: Trả về JSON chuẩn theo schema. Nội dung chính xác kiến thức Lịch sử 9 chương trình mới."#,
        textbook = config.textbook.label(),
        exam_type = config.exam_type.label(),
        topic = config.topic,
        mcq = config.mcq_count,
        essay = config.essay_count,
        score = crate::models::format_points(config.total_score),
        knowledge = ratio.knowledge,
        comprehension = ratio.comprehension,
        application = ratio.application,
        high = ratio.high_application,
    )
}
