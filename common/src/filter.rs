//! フィルタエンジン
//!
//! 集約済みカタログと検索条件から、一致する写真のURLをカタログ順で返す。
//! 副作用なし・失敗なし（空カタログなら空リスト）。
//!
//! 一致規則（すべてAND、条件が空なら常に一致）:
//! - 人物: 条件の人物が写真の人物集合の部分集合（完全一致・大文字小文字区別）
//! - 動作: 条件の動作が写真の動作集合に含まれる（完全一致）
//! - 環境/昼夜/ショット/日付/場所: 大文字小文字を無視した部分一致
//!
//! カタログに列そのものが無い条件は無効化する（呼び出し側で警告）。

use crate::catalog::GroupedCatalog;
use crate::normalizer::effective_players;
use crate::types::{Column, FilterCriteria, GroupedPhoto};

/// 一致する写真のURL（カタログ順、重複除去なし）
pub fn filter(catalog: &GroupedCatalog, criteria: &FilterCriteria) -> Vec<String> {
    let players = effective_players(&criteria.players);

    catalog
        .photos()
        .iter()
        .filter(|photo| matches_photo(catalog, photo, &players, criteria))
        .map(|photo| photo.url.clone())
        .collect()
}

/// 条件が指定されているのにカタログに無い列
///
/// これらの条件は `filter` で無視される。
pub fn missing_columns(catalog: &GroupedCatalog, criteria: &FilterCriteria) -> Vec<Column> {
    scalar_criteria(criteria)
        .into_iter()
        .chain(std::iter::once((Column::Action, criteria.action.as_deref())))
        .filter(|(column, value)| is_set(*value) && !catalog.has_column(*column))
        .map(|(column, _)| column)
        .collect()
}

fn matches_photo(
    catalog: &GroupedCatalog,
    photo: &GroupedPhoto,
    players: &[String],
    criteria: &FilterCriteria,
) -> bool {
    if !players.iter().all(|p| photo.subjects.contains(p)) {
        return false;
    }

    if let Some(action) = criteria.action.as_deref().filter(|a| !a.is_empty()) {
        if catalog.has_column(Column::Action) && !photo.actions.contains(action) {
            return false;
        }
    }

    scalar_criteria(criteria)
        .into_iter()
        .filter(|(column, needle)| is_set(*needle) && catalog.has_column(*column))
        .all(|(column, needle)| {
            let needle = needle.unwrap_or_default();
            scalar_field(photo, column)
                .map(|value| contains_ignore_case(value, needle))
                .unwrap_or(false)
        })
}

fn scalar_criteria(criteria: &FilterCriteria) -> [(Column, Option<&str>); 5] {
    [
        (Column::Environment, criteria.environment.as_deref()),
        (Column::DayNight, criteria.day_night.as_deref()),
        (Column::ShotType, criteria.shot_type.as_deref()),
        (Column::Date, criteria.date.as_deref()),
        (Column::Location, criteria.location.as_deref()),
    ]
}

fn scalar_field(photo: &GroupedPhoto, column: Column) -> Option<&str> {
    match column {
        Column::Environment => photo.environment.as_deref(),
        Column::DayNight => photo.day_night.as_deref(),
        Column::ShotType => photo.shot_type.as_deref(),
        Column::Date => photo.date.as_deref(),
        Column::Location => photo.location.as_deref(),
        _ => None,
    }
}

fn is_set(value: Option<&str>) -> bool {
    value.map(|v| !v.is_empty()).unwrap_or(false)
}

/// 大文字小文字を無視した部分一致
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
