//! 生成AIレスポンスパーサー
//!
//! 生成AIは厳密なJSONだけを返すとは限らない（前置きの文章やmarkdownの
//! コードフェンスで包まれることがある）。周囲のノイズは許容するが、
//! `{ ... }` の中身の修復はしない。

use crate::error::{Error, Result};
use crate::normalizer::normalize_value;
use crate::types::FilterCriteria;

/// コードフェンス記号を前後から除去
pub fn strip_code_fences(response: &str) -> &str {
    response.trim().trim_matches('`').trim()
}

/// レスポンスからJSONオブジェクト部分を抽出
///
/// 最初の `{` から最後の `}` までを候補とする。
/// `}` が `{` より前にしか無い場合は `{` 以降すべてを返す
/// （パース時に `InvalidJson` になる）。
///
/// # Examples
/// ```
/// use photo_search_common::extract_json;
///
/// let response = "Sure! {\"Players\": [\"Ms Dhoni\"]} Hope this helps.";
/// assert_eq!(extract_json(response).unwrap(), "{\"Players\": [\"Ms Dhoni\"]}");
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    let cleaned = strip_code_fences(response);

    let start = cleaned.find('{').ok_or(Error::NoJsonFound)?;
    match cleaned.rfind('}') {
        Some(end) if end > start => Ok(&cleaned[start..=end]),
        _ => Ok(&cleaned[start..]),
    }
}

/// 生成AIレスポンスを検索条件にパース
///
/// # Arguments
/// * `response` - 生成AIの生レスポンス
/// * `query` - ユーザーが入力した元の自然文（件数抽出に使う）
pub fn parse_query_response(response: &str, query: &str) -> Result<FilterCriteria> {
    let json_str = extract_json(response)?;
    let value: serde_json::Value =
        serde_json::from_str(json_str).map_err(|e| Error::InvalidJson(e.to_string()))?;
    normalize_value(&value, query)
}
