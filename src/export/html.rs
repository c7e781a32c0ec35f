//! 可打印的 HTML
//!
//! 浏览器打印（或 `pdf` 模块的无头打印）以此为输入：
//! 矩阵只在屏幕上显示，打印时隐藏；每道自由作答题下方留出作答行；
//! 答案从新的一页开始。

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::GeneratedExamData;
use crate::render::{matrix_row_cells, MATRIX_HEADERS};

/// 每道自由作答题下方的作答行数
const ANSWER_LINES_PER_ESSAY: usize = 6;

const PRINT_CSS: &str = r#"
body { font-family: "Times New Roman", serif; font-size: 13pt; margin: 2cm; color: #111; }
h1 { text-align: center; text-transform: uppercase; font-size: 16pt; margin-bottom: 4pt; }
.subtitle { text-align: center; font-style: italic; margin-top: 0; }
h3 { text-transform: uppercase; font-size: 13pt; margin-top: 18pt; }
table.matrix { border-collapse: collapse; width: 100%; }
table.matrix th, table.matrix td { border: 1px solid #333; padding: 4pt 6pt; text-align: center; }
table.matrix td:first-child { text-align: left; }
.question { break-inside: avoid; margin-bottom: 10pt; }
.options { display: grid; grid-template-columns: 1fr 1fr; gap: 2pt 16pt; margin-left: 16pt; }
.answer-line { border-bottom: 1px dotted #666; height: 22pt; }
.answers { break-before: page; }
.answers .explanation { font-style: italic; }
.guide { white-space: pre-line; }
@media print { .screen-only { display: none; } }
"#;

/// HTML 转义
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// 渲染可打印的 HTML 页面
pub fn render_print_html(data: &GeneratedExamData) -> String {
    let mut out = String::new();
    let e = escape_html;

    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, "<html lang=\"vi\">\n<head>\n<meta charset=\"utf-8\">");
    let _ = writeln!(out, "<title>{}</title>", e(&data.title));
    let _ = writeln!(out, "<style>{}</style>\n</head>\n<body>", PRINT_CSS);

    let _ = writeln!(out, "<header>");
    let _ = writeln!(out, "<h1>{}</h1>", e(&data.title));
    let _ = writeln!(out, "<p class=\"subtitle\">{}</p>", e(&data.subtitle));
    if !data.time_limit.is_empty() {
        let _ = writeln!(
            out,
            "<p class=\"subtitle\">Thời gian làm bài: {}</p>",
            e(&data.time_limit)
        );
    }
    let _ = writeln!(out, "</header>");

    // 矩阵：仅屏幕预览
    let _ = writeln!(out, "<section class=\"screen-only\">\n<h3>Ma trận đề thi</h3>");
    let _ = writeln!(out, "<table class=\"matrix\">\n<thead><tr>");
    for header in MATRIX_HEADERS {
        let _ = write!(out, "<th>{}</th>", e(header));
    }
    let _ = writeln!(out, "</tr></thead>\n<tbody>");
    for item in &data.matrix {
        let _ = write!(out, "<tr>");
        for cell in matrix_row_cells(item) {
            let _ = write!(out, "<td>{}</td>", e(cell));
        }
        let _ = writeln!(out, "</tr>");
    }
    let _ = writeln!(out, "</tbody>\n</table>\n</section>");

    // 试卷正文
    let _ = writeln!(out, "<section class=\"exam\">\n<h3>I. Phần Trắc Nghiệm</h3>");
    for (idx, q) in data.mcq_part.iter().enumerate() {
        let _ = writeln!(
            out,
            "<div class=\"question\"><p><u>Câu {}:</u> {}</p>",
            idx + 1,
            e(&q.question)
        );
        let _ = write!(out, "<div class=\"options\">");
        for (label, opt) in q.labeled_options() {
            match label {
                Some(label) => {
                    let _ = write!(out, "<div><b>{}.</b> {}</div>", label, e(opt));
                }
                None => {
                    let _ = write!(out, "<div>{}</div>", e(opt));
                }
            }
        }
        let _ = writeln!(out, "</div></div>");
    }

    let _ = writeln!(out, "<h3>II. Phần Tự Luận</h3>");
    for (idx, q) in data.essay_part.iter().enumerate() {
        let _ = writeln!(
            out,
            "<div class=\"question\"><p><u>Câu {} ({} điểm):</u> {}</p>",
            idx + 1,
            q.points_text(),
            e(&q.question)
        );
        for _ in 0..ANSWER_LINES_PER_ESSAY {
            let _ = write!(out, "<div class=\"answer-line\"></div>");
        }
        let _ = writeln!(out, "</div>");
    }
    let _ = writeln!(out, "</section>");

    // 答案
    let _ = writeln!(out, "<section class=\"answers\">\n<h3>Đáp án</h3>");
    for (idx, q) in data.mcq_part.iter().enumerate() {
        let _ = writeln!(
            out,
            "<p><b>Câu {}:</b> <b>{}</b> <span class=\"explanation\">- {}</span></p>",
            idx + 1,
            e(&q.correct_answer),
            e(&q.explanation)
        );
    }
    for (idx, q) in data.essay_part.iter().enumerate() {
        let _ = writeln!(
            out,
            "<p><b>Câu {} (Tự luận):</b></p>\n<p class=\"guide\">{}</p>",
            idx + 1,
            e(&q.guide)
        );
    }
    if !data.general_guide.trim().is_empty() {
        let _ = writeln!(
            out,
            "<p><b>Lưu ý chung:</b></p>\n<p class=\"guide\">{}</p>",
            e(&data.general_guide)
        );
    }
    let _ = writeln!(out, "</section>\n</body>\n</html>");

    out
}

/// 写入 `{title}.html`，返回文件路径
pub async fn write_print_html(data: &GeneratedExamData, output_dir: &Path) -> AppResult<PathBuf> {
    let html = render_print_html(data);
    let path = output_dir.join(super::output_file_name(&data.title, "html"));

    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| AppError::file_write_failed(output_dir.display().to_string(), e))?;
    tokio::fs::write(&path, html)
        .await
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;

    info!("🖨️ 打印页面已保存: {}", path.display());
    Ok(path)
}
