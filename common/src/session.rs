//! 検索セッション状態
//!
//! 現在のページ・結果URL・ページサイズを保持する、呼び出し側所有の
//! コンテキスト。新しいクエリ送信でリセットし、終了時に破棄する。

use crate::pager::{last_page_index, result_page};
use crate::types::{ResultPage, DEFAULT_RESULT_COUNT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSession {
    result_urls: Vec<String>,
    page_size: usize,
    current_page: usize,
    query_submitted: bool,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self {
            result_urls: Vec::new(),
            page_size: DEFAULT_RESULT_COUNT,
            current_page: 0,
            query_submitted: false,
        }
    }
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新しい結果でリセット（ページは先頭へ）
    pub fn submit(&mut self, result_urls: Vec<String>, page_size: usize) {
        self.result_urls = result_urls;
        self.page_size = page_size.max(1);
        self.current_page = 0;
        self.query_submitted = true;
    }

    /// 結果を破棄して初期状態に戻す
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// 指定ページへ移動（最後の空でないページでクランプ）
    pub fn jump_to(&mut self, page_index: usize) {
        self.current_page = page_index.min(last_page_index(self.result_urls.len(), self.page_size));
    }

    /// 次ページへ。移動できたら true
    pub fn next(&mut self) -> bool {
        if self.has_next() {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// 前ページへ。移動できたら true
    pub fn back(&mut self) -> bool {
        if self.has_back() {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    pub fn has_next(&self) -> bool {
        (self.current_page + 1) * self.page_size < self.result_urls.len()
    }

    pub fn has_back(&self) -> bool {
        self.current_page > 0
    }

    /// 現在ページ
    pub fn current(&self) -> ResultPage {
        result_page(&self.result_urls, self.current_page, self.page_size)
    }

    /// 先頭から現在ページ末尾までの累積（「もっと見る」表示用）
    pub fn loaded(&self) -> &[String] {
        let end = ((self.current_page + 1) * self.page_size).min(self.result_urls.len());
        &self.result_urls[..end]
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn result_urls(&self) -> &[String] {
        &self.result_urls
    }

    pub fn is_submitted(&self) -> bool {
        self.query_submitted
    }

    pub fn is_empty(&self) -> bool {
        self.result_urls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("u{}", i)).collect()
    }

    #[test]
    fn test_new_session() {
        let session = SearchSession::new();
        assert!(!session.is_submitted());
        assert!(session.is_empty());
        assert_eq!(session.page_size(), 6);
        assert!(!session.has_next());
    }

    #[test]
    fn test_next_and_back_are_clamped() {
        let mut session = SearchSession::new();
        session.submit(urls(14), 6);

        assert!(!session.back());
        assert_eq!(session.current_page(), 0);

        assert!(session.next());
        assert!(session.next());
        assert!(!session.next());
        assert_eq!(session.current_page(), 2);
        assert_eq!(session.current().urls.len(), 2);

        assert!(session.back());
        assert_eq!(session.current_page(), 1);
    }

    #[test]
    fn test_submit_resets_page() {
        let mut session = SearchSession::new();
        session.submit(urls(14), 6);
        session.next();
        session.submit(urls(3), 2);
        assert_eq!(session.current_page(), 0);
        assert_eq!(session.page_size(), 2);
        assert!(session.has_next());
    }

    #[test]
    fn test_jump_to_clamps() {
        let mut session = SearchSession::new();
        session.submit(urls(14), 6);
        session.jump_to(10);
        assert_eq!(session.current_page(), 2);
    }

    #[test]
    fn test_loaded_accumulates() {
        let mut session = SearchSession::new();
        session.submit(urls(14), 6);
        assert_eq!(session.loaded().len(), 6);
        session.next();
        assert_eq!(session.loaded().len(), 12);
        session.next();
        assert_eq!(session.loaded().len(), 14);
    }

    #[test]
    fn test_reset() {
        let mut session = SearchSession::new();
        session.submit(urls(4), 3);
        session.reset();
        assert_eq!(session, SearchSession::default());
    }
}
