//! Word 文档导出
//!
//! 两页结构：第一页是试卷（标题、副标题、矩阵表、选择题、自由作答题），
//! 分页后第二页是答案与评分指引。

use std::io::Cursor;
use std::path::{Path, PathBuf};

use docx_rs::{
    AlignmentType, BreakType, Docx, LineSpacing, Paragraph, Run, RunFonts, Table, TableCell,
    TableRow,
};
use tracing::info;

use crate::error::{AppError, AppResult, ExportError};
use crate::models::GeneratedExamData;
use crate::render::{matrix_row_cells, MATRIX_HEADERS};

const FONT: &str = "Times New Roman";
/// 半磅为单位，26 即 13pt
const FONT_SIZE: usize = 26;
const SPACING_AFTER: u32 = 120;

fn text_run(text: &str, bold: bool) -> Run {
    let run = Run::new()
        .add_text(text)
        .size(FONT_SIZE)
        .fonts(RunFonts::new().ascii(FONT).hi_ansi(FONT).cs(FONT));
    if bold {
        run.bold()
    } else {
        run
    }
}

fn para(text: &str, bold: bool, alignment: AlignmentType) -> Paragraph {
    Paragraph::new()
        .add_run(text_run(text, bold))
        .align(alignment)
        .line_spacing(LineSpacing::new().after(SPACING_AFTER))
}

fn left(text: &str) -> Paragraph {
    para(text, false, AlignmentType::Left)
}

fn heading(text: &str) -> Paragraph {
    para(text, true, AlignmentType::Left)
}

/// 多行文本拆成多个段落
fn multiline(text: &str) -> Vec<Paragraph> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(left)
        .collect()
}

fn matrix_table(data: &GeneratedExamData) -> Table {
    let cell = |text: &str, bold: bool| {
        TableCell::new().add_paragraph(
            Paragraph::new()
                .add_run(text_run(text, bold))
                .align(AlignmentType::Center),
        )
    };

    let mut rows = vec![TableRow::new(
        MATRIX_HEADERS.iter().map(|h| cell(h, true)).collect(),
    )];
    rows.extend(data.matrix.iter().map(|item| {
        TableRow::new(
            matrix_row_cells(item)
                .iter()
                .map(|text| cell(text, false))
                .collect(),
        )
    }));

    Table::new(rows)
}

/// 构建 docx 文档并打包为字节
pub fn build_docx(data: &GeneratedExamData) -> AppResult<Vec<u8>> {
    let mut docx = Docx::new()
        .add_paragraph(para(&data.title.to_uppercase(), true, AlignmentType::Center))
        .add_paragraph(para(&data.subtitle, false, AlignmentType::Center));

    if !data.time_limit.is_empty() {
        docx = docx.add_paragraph(para(
            &format!("Thời gian làm bài: {}", data.time_limit),
            false,
            AlignmentType::Center,
        ));
    }

    if !data.matrix.is_empty() {
        docx = docx
            .add_paragraph(heading("MA TRẬN ĐỀ THI"))
            .add_table(matrix_table(data));
    }

    docx = docx.add_paragraph(heading("I. PHẦN TRẮC NGHIỆM"));
    for (idx, q) in data.mcq_part.iter().enumerate() {
        docx = docx.add_paragraph(left(&format!("Câu {}: {}", idx + 1, q.question)));
        for (label, opt) in q.labeled_options() {
            let line = match label {
                Some(label) => format!("{}. {}", label, opt),
                None => opt.to_string(),
            };
            docx = docx.add_paragraph(left(&line));
        }
    }

    docx = docx.add_paragraph(heading("II. PHẦN TỰ LUẬN"));
    for (idx, q) in data.essay_part.iter().enumerate() {
        docx = docx.add_paragraph(left(&format!(
            "Câu {} ({}đ): {}",
            idx + 1,
            q.points_text(),
            q.question
        )));
    }

    // 答案页
    docx = docx
        .add_paragraph(Paragraph::new().add_run(Run::new().add_break(BreakType::Page)))
        .add_paragraph(para("ĐÁP ÁN VÀ HƯỚNG DẪN CHẤM", true, AlignmentType::Center))
        .add_paragraph(heading("I. PHẦN TRẮC NGHIỆM"));

    for (idx, q) in data.mcq_part.iter().enumerate() {
        docx = docx.add_paragraph(left(&format!(
            "Câu {}: {} - {}",
            idx + 1,
            q.correct_answer,
            q.explanation
        )));
    }

    docx = docx.add_paragraph(heading("II. PHẦN TỰ LUẬN"));
    for (idx, q) in data.essay_part.iter().enumerate() {
        docx = docx.add_paragraph(heading(&format!(
            "Câu {} ({}đ):",
            idx + 1,
            q.points_text()
        )));
        for p in multiline(&q.guide) {
            docx = docx.add_paragraph(p);
        }
    }

    if !data.general_guide.trim().is_empty() {
        docx = docx.add_paragraph(heading("Lưu ý chung:"));
        for p in multiline(&data.general_guide) {
            docx = docx.add_paragraph(p);
        }
    }

    let mut buffer = Cursor::new(Vec::new());
    docx.build().pack(&mut buffer).map_err(|e| ExportError::DocxPackFailed {
        source: Box::new(e),
    })?;

    Ok(buffer.into_inner())
}

/// 写入 `{title}.docx`，返回文件路径
pub async fn write_docx(data: &GeneratedExamData, output_dir: &Path) -> AppResult<PathBuf> {
    let bytes = build_docx(data)?;
    let path = output_dir.join(super::output_file_name(&data.title, "docx"));

    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| AppError::file_write_failed(output_dir.display().to_string(), e))?;
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;

    info!("📄 Word 文档已保存: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::sample_exam;
    use regex::Regex;
    use std::io::Read;

    /// 从 docx 中按顺序取出所有可见文本
    fn visible_text(bytes: &[u8]) -> Vec<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();

        let re = Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>").unwrap();
        re.captures_iter(&xml)
            .map(|c| {
                c[1].replace("&lt;", "<")
                    .replace("&gt;", ">")
                    .replace("&quot;", "\"")
                    .replace("&apos;", "'")
                    .replace("&amp;", "&")
            })
            .collect()
    }

    /// 断言 `needles` 依次出现在 `texts` 中
    fn assert_in_order(texts: &[String], needles: &[String]) {
        let mut cursor = 0;
        for needle in needles {
            let found = texts[cursor..]
                .iter()
                .position(|t| t.contains(needle.as_str()))
                .unwrap_or_else(|| panic!("没有按顺序找到: {}", needle));
            cursor += found + 1;
        }
    }

    #[test]
    fn test_docx_round_trip_keeps_all_content_in_order() {
        let data = sample_exam();
        let texts = visible_text(&build_docx(&data).unwrap());

        let mut expected = vec![data.title.to_uppercase(), data.subtitle.clone()];
        for q in &data.mcq_part {
            expected.push(q.question.clone());
            for opt in &q.options {
                expected.push(opt.clone());
            }
        }
        for q in &data.essay_part {
            expected.push(format!("({}đ): {}", q.points_text(), q.question));
        }
        for q in &data.mcq_part {
            expected.push(format!("{} - {}", q.correct_answer, q.explanation));
        }
        for q in &data.essay_part {
            expected.push(q.guide.clone());
        }
        expected.push(data.general_guide.clone());

        assert_in_order(&texts, &expected);
    }

    #[test]
    fn test_docx_options_are_lettered() {
        let texts = visible_text(&build_docx(&sample_exam()).unwrap());
        assert!(texts.iter().any(|t| t == "A. 1989"));
        assert!(texts.iter().any(|t| t == "D. 1992"));
    }

    #[test]
    fn test_docx_contains_matrix_table() {
        let bytes = build_docx(&sample_exam()).unwrap();
        let texts = visible_text(&bytes);
        assert!(texts.iter().any(|t| t == "Chủ đề"));
        assert!(texts.iter().any(|t| t == "Chiến tranh lạnh"));
    }

    #[test]
    fn test_docx_escapes_special_characters() {
        let mut data = sample_exam();
        data.mcq_part[0].question = "Pháp & Mỹ <1954>".to_string();
        let texts = visible_text(&build_docx(&data).unwrap());
        assert!(texts.iter().any(|t| t.contains("Pháp & Mỹ <1954>")));
    }

    #[tokio::test]
    async fn test_write_docx_uses_title_as_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_docx(&sample_exam(), &dir.path().join("out"))
            .await
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "Đề kiểm tra giữa kỳ.docx");
        assert!(path.exists());
    }
}
