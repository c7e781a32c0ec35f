//! 通过无头浏览器把打印页面输出为 PDF

use std::path::{Path, PathBuf};

use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use tracing::{info, warn};

use crate::browser::launch_headless_browser;
use crate::error::{AppError, AppResult};
use crate::export::html::render_print_html;
use crate::models::GeneratedExamData;

/// 把 HTML 打印为 PDF 文件
pub async fn print_html_to_pdf(
    html: &str,
    path: &Path,
    chrome_executable: Option<&str>,
) -> AppResult<()> {
    let mut browser = launch_headless_browser(chrome_executable).await?;

    let result = async {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| AppError::browser_failed("创建页面", e))?;
        page.set_content(html)
            .await
            .map_err(|e| AppError::browser_failed("写入页面", e))?;

        let mut params = PrintToPdfParams::default();
        params.print_background = Some(true);
        params.prefer_css_page_size = Some(true);

        page.save_pdf(params, path)
            .await
            .map_err(|e| AppError::browser_failed("打印", e))?;
        Ok::<(), AppError>(())
    }
    .await;

    // 无论打印成功与否都关闭浏览器
    if let Err(e) = browser.close().await {
        warn!("关闭无头浏览器失败: {}", e);
    }

    result
}

/// 写入 `{title}.pdf`，返回文件路径
pub async fn write_pdf(
    data: &GeneratedExamData,
    output_dir: &Path,
    chrome_executable: Option<&str>,
) -> AppResult<PathBuf> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| AppError::file_write_failed(output_dir.display().to_string(), e))?;

    let path = output_dir.join(super::output_file_name(&data.title, "pdf"));
    let html = render_print_html(data);
    print_html_to_pdf(&html, &path, chrome_executable).await?;

    info!("🖨️ PDF 已保存: {}", path.display());
    Ok(path)
}
