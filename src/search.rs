//! 検索パイプライン
//!
//! - 自然文: 生成AIの応答 → 条件の正規化 → フィルタ
//! - 項目指定: コマンドライン引数 → 条件の正規化 → フィルタ
//! - 条件フォーム: 人物選択 + 動作/アクティビティ/日付/顔数

use crate::error::{PhotoSearchError, Result};
use crate::generator::QueryGenerator;
use photo_search_common::{
    apply_form, filter, missing_columns, normalize_fields, parse_query_response, CatalogTable,
    Column, Error as CatalogError, FilterCriteria, FilterForm, GroupedCatalog, QueryFields,
};
use std::path::Path;

/// 検索結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// 一致したURL（カタログ順）
    pub urls: Vec<String>,
    /// 1ページの表示枚数
    pub page_size: usize,
    /// 正規化後の条件（条件フォームでは None）
    pub criteria: Option<FilterCriteria>,
    /// 利用者に見せる警告
    pub warnings: Vec<String>,
}

/// 正規化済みの条件でフィルタ
pub fn resolve_criteria(catalog: &GroupedCatalog, criteria: FilterCriteria) -> SearchOutcome {
    let warnings = column_warnings(&missing_columns(catalog, &criteria));
    let urls = filter(catalog, &criteria);
    tracing::debug!(matched = urls.len(), ?criteria, "フィルタ完了");

    SearchOutcome {
        urls,
        page_size: criteria.results,
        criteria: Some(criteria),
        warnings,
    }
}

/// 生成AIの応答テキストから検索
pub fn resolve_text_query(
    catalog: &GroupedCatalog,
    query: &str,
    response: &str,
) -> Result<SearchOutcome> {
    let criteria = parse_query_response(response, query)?;
    Ok(resolve_criteria(catalog, criteria))
}

/// 項目指定で検索
pub fn resolve_fields(catalog: &GroupedCatalog, fields: QueryFields) -> Result<SearchOutcome> {
    let criteria = normalize_fields(fields)?;
    Ok(resolve_criteria(catalog, criteria))
}

/// 条件フォームで検索
pub fn resolve_form(catalog: &CatalogTable, form: &FilterForm, page_size: usize) -> SearchOutcome {
    let mut warnings = Vec::new();

    if form.players.is_empty() {
        warnings.push("人物が選択されていません".to_string());
    }

    let outcome = apply_form(catalog, form);
    warnings.extend(column_warnings(&outcome.missing_columns));
    if outcome.fell_back && !outcome.urls.is_empty() {
        tracing::info!(players = ?form.players, "条件に一致しないため選択人物の全写真を表示");
        warnings.push("条件に一致する写真がないため、選択した人物の写真をすべて表示します".into());
    }

    SearchOutcome {
        urls: outcome.urls,
        page_size: page_size.max(1),
        criteria: None,
        warnings,
    }
}

/// 自然文クエリを生成AI（または保存済み応答）で解析して検索
///
/// `response_file` があれば生成AIを呼ばずにその内容を応答として使う。
pub async fn run_text_search(
    catalog: &GroupedCatalog,
    query: &str,
    generator: Option<&QueryGenerator>,
    response_file: Option<&Path>,
    verbose: bool,
) -> Result<SearchOutcome> {
    let response = match (response_file, generator) {
        (Some(path), _) => {
            if verbose {
                println!("  応答ファイル: {}", path.display());
            }
            std::fs::read_to_string(path)?
        }
        (None, Some(generator)) => generator.generate(query, verbose).await?,
        (None, None) => {
            return Err(PhotoSearchError::Config(
                "生成AIも応答ファイルも指定されていません".into(),
            ))
        }
    };

    resolve_text_query(catalog, query, &response)
}

fn column_warnings(columns: &[Column]) -> Vec<String> {
    columns
        .iter()
        .map(|column| {
            let message = CatalogError::MissingColumn(column.header().to_string()).to_string();
            tracing::warn!(column = %column, "{}", message);
            message
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use photo_search_common::Activity;

    const CSV: &str = "ID,Name,URL,Action,Environment,Day/Night\n\
        1,Ms Dhoni,u1,Batting,Outdoor,Day\n\
        1,Virat Kohli,u1,Fielding,Outdoor,Day\n\
        2,Ms Dhoni,u2,Batting,Indoor,Night\n\
        3,Rohit Sharma,u3,Bowling,Outdoor,Night\n";

    fn table() -> CatalogTable {
        CatalogTable::from_csv_str(CSV).unwrap()
    }

    #[test]
    fn test_text_query_with_fenced_response() {
        let response = "```json\n{\"Players\": [\"Ms Dhoni\"], \"Action\": \"Batting\"}\n```";
        let outcome =
            resolve_text_query(&table().group(), "show 1 image of dhoni batting", response).unwrap();

        assert_eq!(outcome.urls, vec!["u1", "u2"]);
        assert_eq!(outcome.page_size, 1);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_text_query_malformed() {
        let result = resolve_text_query(&table().group(), "dhoni", "no json here");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_column_warning() {
        let fields = QueryFields {
            location: Some("Chennai".into()),
            ..QueryFields::default()
        };
        let outcome = resolve_fields(&table().group(), fields).unwrap();

        assert_eq!(outcome.urls.len(), 3);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("Location"));
    }

    #[test]
    fn test_form_without_players() {
        let outcome = resolve_form(&table(), &FilterForm::default(), 6);
        assert!(outcome.urls.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn test_form_fallback_warning() {
        let form = FilterForm {
            players: vec!["Rohit Sharma".into()],
            activity: Activity::Day,
            ..FilterForm::default()
        };
        let outcome = resolve_form(&table(), &form, 6);

        assert_eq!(outcome.urls, vec!["u3"]);
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_run_text_search_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("response.json");
        std::fs::write(&path, r#"{"Players": ["Virat Kohli"]}"#).unwrap();

        let outcome = run_text_search(&table().group(), "kohli", None, Some(&path), false)
            .await
            .unwrap();
        assert_eq!(outcome.urls, vec!["u1"]);
        assert_eq!(outcome.page_size, 6);
    }
}
