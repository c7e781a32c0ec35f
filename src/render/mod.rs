//! 试卷预览 - 文本视图
//!
//! 同一份 `GeneratedExamData` 可以在三个视图之间切换，不需要重新请求模型。

use std::fmt::Write as _;
use std::str::FromStr;

use crate::models::{GeneratedExamData, MatrixItem};

/// 预览视图
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// 试卷矩阵
    Matrix,
    /// 试卷正文
    #[default]
    Exam,
    /// 答案
    Answers,
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "matrix" | "ma-tran" => Ok(View::Matrix),
            "exam" | "de-thi" => Ok(View::Exam),
            "answers" | "answer" | "dap-an" => Ok(View::Answers),
            other => Err(format!("未知的视图: {}", other)),
        }
    }
}

/// 矩阵表头
pub const MATRIX_HEADERS: [&str; 6] = [
    "Chủ đề",
    "Nhận biết",
    "Thông hiểu",
    "Vận dụng",
    "VD Cao",
    "Tổng",
];

/// 把矩阵行展开为六列文本
pub fn matrix_row_cells(item: &MatrixItem) -> [&str; 6] {
    [
        item.topic.as_str(),
        item.levels.knowledge.as_str(),
        item.levels.comprehension.as_str(),
        item.levels.application.as_str(),
        item.levels.high_application.as_str(),
        item.levels.total.as_str(),
    ]
}

/// 渲染指定视图
pub fn render_text(data: &GeneratedExamData, view: View) -> String {
    match view {
        View::Matrix => render_matrix(data),
        View::Exam => render_exam(data),
        View::Answers => render_answers(data),
    }
}

fn render_header(out: &mut String, data: &GeneratedExamData) {
    let _ = writeln!(out, "{}", data.title.to_uppercase());
    if !data.subtitle.is_empty() {
        let _ = writeln!(out, "{}", data.subtitle);
    }
    if !data.time_limit.is_empty() {
        let _ = writeln!(out, "Thời gian: {}", data.time_limit);
    }
    let _ = writeln!(out, "{}", "=".repeat(60));
}

fn render_matrix(data: &GeneratedExamData) -> String {
    let mut rows: Vec<[&str; 6]> = vec![MATRIX_HEADERS];
    rows.extend(data.matrix.iter().map(matrix_row_cells));

    // 按字符数计算列宽（越南语含组合字符，按 char 计数已足够对齐）
    let mut widths = [0usize; 6];
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "Ma trận đề thi");
    let separator: String = widths
        .iter()
        .map(|w| "-".repeat(w + 2))
        .collect::<Vec<_>>()
        .join("+");
    let _ = writeln!(out, "+{}+", separator);
    for (idx, row) in rows.iter().enumerate() {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let pad = widths[i] - cell.chars().count();
                format!(" {}{} ", cell, " ".repeat(pad))
            })
            .collect();
        let _ = writeln!(out, "|{}|", cells.join("|"));
        if idx == 0 {
            let _ = writeln!(out, "+{}+", separator);
        }
    }
    let _ = writeln!(out, "+{}+", separator);
    out
}

fn render_exam(data: &GeneratedExamData) -> String {
    let mut out = String::new();
    render_header(&mut out, data);

    let _ = writeln!(out, "\nI. PHẦN TRẮC NGHIỆM");
    for (idx, q) in data.mcq_part.iter().enumerate() {
        let _ = writeln!(out, "\nCâu {}: {}", idx + 1, q.question);
        for (label, opt) in q.labeled_options() {
            match label {
                Some(label) => {
                    let _ = writeln!(out, "    {}. {}", label, opt);
                }
                None => {
                    let _ = writeln!(out, "    {}", opt);
                }
            }
        }
    }

    let _ = writeln!(out, "\nII. PHẦN TỰ LUẬN");
    for (idx, q) in data.essay_part.iter().enumerate() {
        let _ = writeln!(
            out,
            "\nCâu {} ({} điểm): {}",
            idx + 1,
            q.points_text(),
            q.question
        );
    }
    out
}

fn render_answers(data: &GeneratedExamData) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ĐÁP ÁN");
    let _ = writeln!(out, "{}", "=".repeat(60));

    for (idx, q) in data.mcq_part.iter().enumerate() {
        let _ = writeln!(
            out,
            "Câu {}: {} - {}",
            idx + 1,
            q.correct_answer,
            q.explanation
        );
    }

    for (idx, q) in data.essay_part.iter().enumerate() {
        let _ = writeln!(out, "\nCâu {} (Tự luận):", idx + 1);
        let _ = writeln!(out, "{}", q.guide);
    }

    if !data.general_guide.trim().is_empty() {
        let _ = writeln!(out, "\nHướng dẫn chung:");
        let _ = writeln!(out, "{}", data.general_guide);
    }
    out
}
