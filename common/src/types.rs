//! カタログ・検索条件の型定義
//!
//! - PhotoRecord: カタログの1行（写真×人物）
//! - GroupedPhoto: ID単位にまとめた写真
//! - FilterCriteria: 1クエリ分の正規化済み検索条件
//! - ResultPage: 結果リストの1ページ分

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 結果件数の既定値（1ページの表示枚数）
pub const DEFAULT_RESULT_COUNT: usize = 6;

/// カタログの列
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Column {
    Id,
    Name,
    Url,
    Action,
    Environment,
    DayNight,
    ShotType,
    Date,
    Location,
    Captions,
    NoOfFaces,
    Distance,
}

impl Column {
    /// 必須列（無ければカタログとして扱えない）
    pub const REQUIRED: &'static [Column] = &[Column::Id, Column::Name, Column::Url];

    pub const ALL: &'static [Column] = &[
        Column::Id,
        Column::Name,
        Column::Url,
        Column::Action,
        Column::Environment,
        Column::DayNight,
        Column::ShotType,
        Column::Date,
        Column::Location,
        Column::Captions,
        Column::NoOfFaces,
        Column::Distance,
    ];

    /// カタログファイル上のヘッダー名
    pub fn header(&self) -> &'static str {
        match self {
            Column::Id => "ID",
            Column::Name => "Name",
            Column::Url => "URL",
            Column::Action => "Action",
            Column::Environment => "Environment",
            Column::DayNight => "Day/Night",
            Column::ShotType => "ShotType",
            Column::Date => "Date",
            Column::Location => "Location",
            Column::Captions => "Captions",
            Column::NoOfFaces => "No_of_faces",
            Column::Distance => "Distance",
        }
    }

    /// ヘッダー名から列を判定
    ///
    /// 大文字小文字・空白・`_`・`/`・`-` の違いは無視する
    /// （`Day/Night` と `Day_Night` は同じ列）
    pub fn from_header(header: &str) -> Option<Self> {
        let key: String = header
            .trim()
            .trim_start_matches('\u{feff}')
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '/' | '-'))
            .flat_map(char::to_lowercase)
            .collect();

        Column::ALL.iter().copied().find(|col| {
            let expected: String = col
                .header()
                .chars()
                .filter(|c| !matches!(c, ' ' | '_' | '/' | '-'))
                .flat_map(char::to_lowercase)
                .collect();
            expected == key
        })
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.header())
    }
}

/// カタログの1行（1写真に写る1人物）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    /// 写真ID（複数人物が写る写真は同じIDで複数行）
    pub id: String,
    pub name: String,
    pub url: String,
    pub action: Option<String>,
    pub environment: Option<String>,
    pub day_night: Option<String>,
    pub shot_type: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub caption: Option<String>,
    pub no_of_faces: Option<u32>,
    pub distance: Option<String>,
}

/// ID単位にまとめた写真
///
/// 集約規則:
/// - subjects / actions: 全行の和集合
/// - url: 最初の行の値
/// - その他のスカラー列: 最初に出現した空でない値
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedPhoto {
    pub id: String,
    pub subjects: BTreeSet<String>,
    pub url: String,
    pub actions: BTreeSet<String>,
    pub environment: Option<String>,
    pub day_night: Option<String>,
    pub shot_type: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub caption: Option<String>,
}

/// 正規化済みの検索条件
///
/// `None` / 空文字 / 空リストの条件は「常に一致」として扱われる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// 人物名（汎用語は除去済み、完全一致・大文字小文字区別）
    pub players: Vec<String>,
    /// 動作タグ（集合への完全一致）
    pub action: Option<String>,
    pub environment: Option<String>,
    pub day_night: Option<String>,
    pub shot_type: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    /// 要求件数（>= 1）
    pub results: usize,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            players: Vec::new(),
            action: None,
            environment: None,
            day_night: None,
            shot_type: None,
            date: None,
            location: None,
            results: DEFAULT_RESULT_COUNT,
        }
    }
}

/// 結果リストの1ページ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPage {
    pub urls: Vec<String>,
    pub page_index: usize,
    pub page_size: usize,
    pub total: usize,
    pub has_more: bool,
}

impl ResultPage {
    /// 表示範囲（1始まり、`total`でクリップ）
    pub fn display_range(&self) -> (usize, usize) {
        let start = self.page_index * self.page_size + 1;
        let end = (self.page_index * self.page_size + self.urls.len()).min(self.total);
        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_from_header() {
        assert_eq!(Column::from_header("ID"), Some(Column::Id));
        assert_eq!(Column::from_header("Day/Night"), Some(Column::DayNight));
        assert_eq!(Column::from_header("Day_Night"), Some(Column::DayNight));
        assert_eq!(Column::from_header(" shottype "), Some(Column::ShotType));
        assert_eq!(Column::from_header("No_of_faces"), Some(Column::NoOfFaces));
        assert_eq!(Column::from_header("\u{feff}ID"), Some(Column::Id));
        assert_eq!(Column::from_header("Photographer"), None);
    }

    #[test]
    fn test_filter_criteria_default() {
        let criteria = FilterCriteria::default();
        assert!(criteria.players.is_empty());
        assert!(criteria.action.is_none());
        assert_eq!(criteria.results, 6);
    }

    #[test]
    fn test_filter_criteria_serialize() {
        let criteria = FilterCriteria {
            players: vec!["Ms Dhoni".to_string()],
            day_night: Some("Night".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_string(&criteria).expect("シリアライズ失敗");
        assert!(json.contains("\"players\":[\"Ms Dhoni\"]"));
        assert!(json.contains("\"dayNight\":\"Night\""));
    }

    #[test]
    fn test_display_range() {
        let page = ResultPage {
            urls: vec!["a".into(), "b".into()],
            page_index: 2,
            page_size: 6,
            total: 14,
            has_more: false,
        };
        assert_eq!(page.display_range(), (13, 14));
    }
}
