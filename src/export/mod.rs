//! 导出
//!
//! - `docx`：Word 文档（试卷页 + 答案页）
//! - `html`：可打印页面
//! - `pdf`：通过无头浏览器打印的 PDF

pub mod docx;
pub mod html;
pub mod pdf;

use std::str::FromStr;

pub use self::docx::{build_docx, write_docx};
pub use self::html::{escape_html, render_print_html, write_print_html};
pub use self::pdf::{print_html_to_pdf, write_pdf};

/// 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Docx,
    Html,
    Pdf,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "docx" | "word" => Ok(ExportFormat::Docx),
            "html" => Ok(ExportFormat::Html),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(format!("未知的导出格式: {}", other)),
        }
    }
}

/// 由试卷标题生成文件名，去掉文件系统不允许的字符
pub fn output_file_name(title: &str, extension: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim().trim_matches('.');
    let stem = if cleaned.is_empty() { "de-thi" } else { cleaned };
    format!("{}.{}", stem, extension)
}
