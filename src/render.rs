//! 検索結果のグリッド表示
//!
//! 1ページ分のURLを取得し、列数ごとに折り返して端末に表示する。
//! 取得に失敗したセルはエラーメッセージを表示し、他のセルは通常通り描画する。

use crate::error::{PhotoSearchError, Result};
use crate::fetcher::{FetchedImage, ImageFetcher};
use indicatif::{ProgressBar, ProgressStyle};
use photo_search_common::{resolve_links, CatalogTable, ResultPage};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// セルの中身
#[derive(Debug, Clone)]
pub enum CellContent {
    Image(FetchedImage),
    Failed(String),
    /// 取得しない（--no-fetch）
    LinkOnly,
}

/// グリッドの1セル
#[derive(Debug, Clone)]
pub struct GridCell {
    /// 結果全体での通し番号（1始まり）
    pub index: usize,
    pub url: String,
    pub view_url: String,
    pub caption: Option<String>,
    pub content: CellContent,
}

impl GridCell {
    fn status_line(&self) -> String {
        match &self.content {
            CellContent::Image(image) => format!(
                "✔ {}x{} {}",
                image.width,
                image.height,
                image.extension()
            ),
            CellContent::Failed(reason) => format!("✖ {}", reason),
            CellContent::LinkOnly => "-".to_string(),
        }
    }
}

/// ページの各URLについてセルを作る
///
/// `fetcher` が None の場合は画像を取得せずリンクだけのセルにする。
pub async fn build_cells(
    page: &ResultPage,
    catalog: &CatalogTable,
    fetcher: Option<&ImageFetcher>,
) -> Vec<GridCell> {
    let (start, _) = page.display_range();
    let progress = fetcher.map(|_| {
        let pb = ProgressBar::new(page.urls.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("{spinner} 画像取得中 {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb
    });

    let mut cells = Vec::with_capacity(page.urls.len());
    for (offset, url) in page.urls.iter().enumerate() {
        let (view_url, fetch_url) = resolve_links(url);

        let content = match fetcher {
            Some(fetcher) => match fetcher.fetch(&fetch_url).await {
                Ok(image) => CellContent::Image(image),
                Err(PhotoSearchError::ImageFetchFailed { reason, .. }) => {
                    CellContent::Failed(reason)
                }
                Err(e) => CellContent::Failed(e.to_string()),
            },
            None => CellContent::LinkOnly,
        };
        if let Some(pb) = &progress {
            pb.inc(1);
        }

        cells.push(GridCell {
            index: start + offset,
            url: url.clone(),
            view_url,
            caption: catalog.caption_for_url(url).map(str::to_string),
            content,
        });
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    cells
}

/// セルを `columns` 列ごとに並べた文字列
pub fn render_grid(cells: &[GridCell], columns: usize) -> String {
    let mut out = String::new();

    for (row_idx, row) in cells.chunks(columns.max(1)).enumerate() {
        if row_idx > 0 {
            out.push('\n');
        }
        for cell in row {
            out.push_str(&format!("[{}] {}\n", cell.index, cell.status_line()));
            if let Some(caption) = cell.caption.as_deref().filter(|c| !c.is_empty()) {
                out.push_str(&format!("    {}\n", caption));
            }
            out.push_str(&format!("    {}\n", cell.view_url));
        }
    }

    out
}

/// ページ見出し
pub fn page_header(page: &ResultPage) -> String {
    let (start, end) = page.display_range();
    format!("Displaying results {} to {}:", start, end)
}

/// 保存ファイル名（URLのSHA-256先頭16桁 + 拡張子）
pub fn image_file_name(url: &str, image: &FetchedImage) -> String {
    let digest = Sha256::digest(url.as_bytes());
    format!("{}.{}", &hex::encode(digest)[..16], image.extension())
}

/// 取得できた画像をディレクトリへ保存
pub fn save_images(cells: &[GridCell], dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let mut saved = Vec::new();
    for cell in cells {
        if let CellContent::Image(image) = &cell.content {
            let path = dir.join(image_file_name(&cell.url, image));
            std::fs::write(&path, &image.bytes)?;
            saved.push(path);
        }
    }
    Ok(saved)
}

/// 1ページ分を取得して表示
pub async fn show_page(
    page: &ResultPage,
    catalog: &CatalogTable,
    fetcher: Option<&ImageFetcher>,
    columns: usize,
    save_dir: Option<&Path>,
) -> Result<()> {
    if page.total == 0 {
        println!("該当する写真はありません");
        return Ok(());
    }

    let cells = build_cells(page, catalog, fetcher).await;
    println!("{}\n", page_header(page));
    print!("{}", render_grid(&cells, columns));

    if let Some(dir) = save_dir {
        let saved = save_images(&cells, dir)?;
        println!("\n✔ {}枚を保存: {}", saved.len(), dir.display());
    }

    if !page.has_more {
        println!("\nNo more results to display.");
    }
    Ok(())
}
