//! 結果ページング
//!
//! 結果URLリストから表示する1ページ分を切り出す。I/Oなし。

use crate::types::ResultPage;

/// 1ページ分を切り出す
///
/// 戻り値は (ページ内のURL, 次ページがあるか)。
/// 範囲外のページは空スライスになる。`page_size` が0の場合は1として扱う。
pub fn page(urls: &[String], page_index: usize, page_size: usize) -> (&[String], bool) {
    let page_size = page_size.max(1);
    let start = page_index.saturating_mul(page_size).min(urls.len());
    let end = start.saturating_add(page_size).min(urls.len());
    let has_more = page_index
        .saturating_add(1)
        .saturating_mul(page_size)
        < urls.len();
    (&urls[start..end], has_more)
}

/// `page` の結果を `ResultPage` として返す
pub fn result_page(urls: &[String], page_index: usize, page_size: usize) -> ResultPage {
    let (slice, has_more) = page(urls, page_index, page_size);
    ResultPage {
        urls: slice.to_vec(),
        page_index,
        page_size: page_size.max(1),
        total: urls.len(),
        has_more,
    }
}

/// 最後の空でないページの番号（結果0件なら0）
pub fn last_page_index(total: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    total.saturating_sub(1) / page_size
}
